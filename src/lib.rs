//! Hybrid solar, battery and diesel microgrid sizing engine.
//!
//! [`calc::run_calculation`] takes an immutable [`config::ScenarioConfig`] and
//! returns a fresh [`calc::CalcResults`]: sized assets, seasonal dispatch,
//! annual energy and fuel, a lifetime cash-flow table and sensitivity sweeps.

pub mod accounting;
#[cfg(feature = "api")]
pub mod api;
pub mod calc;
pub mod catalog;
pub mod config;
pub mod error;
pub mod finance;
/// Load-profile import and result export.
pub mod io;
pub mod load;
pub mod runner;
pub mod sensitivity;
/// Hourly dispatch simulation of the sized plant.
pub mod sim;
pub mod sizing;
pub mod solar;

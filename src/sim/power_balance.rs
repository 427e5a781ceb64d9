//! Hourly energy balance.

use super::types::DispatchTimestep;

/// Supply minus consumption for one dispatched hour (kW).
///
/// Supply is solar, battery discharge, diesel and the unserved residual;
/// consumption is load, battery charge and curtailment. A closed balance
/// returns zero.
///
/// # Arguments
///
/// * `step` - A dispatched hour
///
/// # Returns
///
/// `solar + discharge + diesel + unserved − charge − curtailed − load`
pub fn balance_residual_kw(step: &DispatchTimestep) -> f64 {
    step.solar_kw + step.discharge_kw + step.diesel_kw + step.unserved_kw
        - step.charge_kw
        - step.curtailed_kw
        - step.load_kw
}

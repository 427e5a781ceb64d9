//! Deterministic single-pass capacity sizing for PV, battery and diesel.

use serde::Serialize;
use tracing::debug;

use crate::config::ScenarioConfig;
use crate::error::{Advisory, CalcError};
use crate::load::LoadProfile;
use crate::solar::annual_mean_peak_sun_hours;

/// Extra PV margin applied to diesel-free window energy.
const AUTONOMY_PV_MARGIN: f64 = 1.3;
/// Hours of window-average load the battery must hold for autonomy.
const AUTONOMY_STORAGE_HOURS: f64 = 6.0;
/// Auto-sized diesel plant rating relative to peak load.
pub const DIESEL_PEAK_MARGIN: f64 = 1.2;

/// Diesel-free operating target.
#[derive(Debug, Clone, PartialEq)]
pub struct Autonomy {
    pub days: u32,
    /// Load energy over the daily window (kWh).
    pub window_kwh: f64,
    /// Window length in hours; zero is treated as one.
    pub window_hours: usize,
}

/// How the diesel plant is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DieselSizing {
    /// Single unit at [`DIESEL_PEAK_MARGIN`] × peak.
    Auto,
    /// `unit_kw × max(1, units)`.
    Manual { unit_kw: f64, units: u32 },
}

/// Everything the sizing heuristic reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingInputs {
    pub annual_demand_kwh: f64,
    pub average_kw: f64,
    pub peak_kw: f64,
    /// Renewable fraction target (0..=1).
    pub renewable_fraction: f64,
    /// PR × tracking gain.
    pub effective_pr: f64,
    /// Annual yield per installed kWp (kWh/kWp).
    pub effective_yield_kwh_per_kwp: f64,
    pub autonomy: Option<Autonomy>,
    pub depth_of_discharge: f64,
    pub c_rate: f64,
    pub storage_hours: f64,
    pub min_pv_kwp: f64,
    pub max_pv_kwp: f64,
    pub min_battery_kwh: f64,
    pub max_battery_kwh: f64,
    pub max_battery_kw: f64,
    pub spinning_reserve_pct: f64,
    pub dc_ac_ratio: f64,
    pub diesel: DieselSizing,
}

impl SizingInputs {
    /// Derives sizing inputs from a scenario and its scaled load profile.
    pub fn from_config(cfg: &ScenarioConfig, load: &LoadProfile) -> Self {
        let adv = &cfg.advanced;
        let effective_pr = adv.performance_ratio * cfg.design.tracking.gain();
        let effective_yield_kwh_per_kwp =
            annual_mean_peak_sun_hours(cfg.site.latitude) * 365.0 * effective_pr;

        let autonomy = (adv.autonomy_days > 0).then(|| Autonomy {
            days: adv.autonomy_days,
            window_kwh: load.window_kwh(adv.autonomy_start_hour, adv.autonomy_end_hour),
            window_hours: adv.autonomy_end_hour.saturating_sub(adv.autonomy_start_hour),
        });

        let diesel = if adv.diesel_auto_size {
            DieselSizing::Auto
        } else {
            DieselSizing::Manual {
                unit_kw: adv.diesel_unit_kw,
                units: adv.diesel_units,
            }
        };

        Self {
            annual_demand_kwh: load.annual_kwh(),
            average_kw: load.average_kw(),
            peak_kw: load.peak_kw(),
            renewable_fraction: cfg.design.renewable_target_pct / 100.0,
            effective_pr,
            effective_yield_kwh_per_kwp,
            autonomy,
            depth_of_discharge: cfg.design.battery.spec().dod,
            c_rate: adv.c_rate,
            storage_hours: adv.storage_hours,
            min_pv_kwp: adv.min_pv_kwp,
            max_pv_kwp: adv.max_pv_kwp,
            min_battery_kwh: adv.min_battery_kwh,
            max_battery_kwh: adv.max_battery_kwh,
            max_battery_kw: adv.max_battery_kw,
            spinning_reserve_pct: adv.spinning_reserve_pct,
            dc_ac_ratio: adv.dc_ac_ratio,
            diesel,
        }
    }
}

/// Sized asset capacities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingResult {
    /// PV DC capacity (kWp).
    pub pv_kwp: f64,
    /// Inverter AC capacity (kW), rounded to a whole kW.
    pub inverter_kw: f64,
    pub battery_kwh: f64,
    pub battery_kw: f64,
    /// Total diesel plant capacity (kW).
    pub diesel_kw: f64,
    pub diesel_units: u32,
    /// Renewable energy target (kWh/yr).
    pub renewable_target_kwh: f64,
    /// Daily-window load energy used for autonomy, zero when disabled (kWh).
    pub autonomy_window_kwh: f64,
    pub effective_pr: f64,
    pub specific_yield_kwh_per_kwp: f64,
}

/// Sizing result together with the advisories it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingOutcome {
    pub result: SizingResult,
    pub advisories: Vec<Advisory>,
}

/// Sizes PV, battery and diesel in one pass.
///
/// Battery energy follows storage hours at average load whatever the target.
/// Power is limited by both C-rate and peak load plus spinning reserve, and
/// is taken from the unclamped battery energy.
///
/// # Errors
///
/// Returns [`CalcError::Computation`] if the effective yield is zero or not finite.
pub fn size_system(inputs: &SizingInputs) -> Result<SizingOutcome, CalcError> {
    let yield_kwh = inputs.effective_yield_kwh_per_kwp;
    if !(yield_kwh.is_finite() && yield_kwh > 0.0) {
        return Err(CalcError::computation(
            "sizing",
            format!("effective PV yield must be positive and finite, got {yield_kwh}"),
        ));
    }

    let mut advisories = Vec::new();
    let renewable_target_kwh = inputs.annual_demand_kwh * inputs.renewable_fraction;
    let mut pv = renewable_target_kwh / yield_kwh;
    let mut battery = inputs.average_kw * inputs.storage_hours / inputs.depth_of_discharge;

    let mut autonomy_window_kwh = 0.0;
    if let Some(autonomy) = &inputs.autonomy {
        autonomy_window_kwh = autonomy.window_kwh;
        pv += autonomy.window_kwh * f64::from(autonomy.days) * AUTONOMY_PV_MARGIN / yield_kwh;
        let hours = autonomy.window_hours.max(1) as f64;
        let autonomy_battery =
            autonomy.window_kwh / hours * AUTONOMY_STORAGE_HOURS / inputs.depth_of_discharge;
        battery = battery.max(autonomy_battery);
        advisories.push(Advisory::new(
            "sizing",
            format!("Sized for {} diesel-free days", autonomy.days),
        ));
    }

    let power = (battery * inputs.c_rate)
        .min(inputs.peak_kw * (1.0 + inputs.spinning_reserve_pct / 100.0));

    let pv = bounded(pv, inputs.min_pv_kwp, inputs.max_pv_kwp);
    let battery = bounded(battery, inputs.min_battery_kwh, inputs.max_battery_kwh);
    let power = bounded(power, 0.0, inputs.max_battery_kw);
    let inverter = (pv / inputs.dc_ac_ratio).round();

    let (diesel_kw, diesel_units) = match inputs.diesel {
        DieselSizing::Auto => (inputs.peak_kw * DIESEL_PEAK_MARGIN, 1),
        DieselSizing::Manual { unit_kw, units } => {
            let units = units.max(1);
            let capacity = unit_kw * f64::from(units);
            if capacity < inputs.peak_kw {
                advisories.push(Advisory::new(
                    "sizing",
                    format!(
                        "Diesel ({:.0} kW) is below peak load ({:.0} kW)",
                        capacity, inputs.peak_kw
                    ),
                ));
            }
            (capacity, units)
        }
    };

    debug!(
        pv_kwp = pv,
        battery_kwh = battery,
        battery_kw = power,
        diesel_kw,
        "sizing complete"
    );

    Ok(SizingOutcome {
        result: SizingResult {
            pv_kwp: pv,
            inverter_kw: inverter,
            battery_kwh: battery,
            battery_kw: power,
            diesel_kw,
            diesel_units,
            renewable_target_kwh,
            autonomy_window_kwh,
            effective_pr: inputs.effective_pr,
            specific_yield_kwh_per_kwp: yield_kwh,
        },
        advisories,
    })
}

/// Clamps without panicking on inverted bounds (the lower bound wins).
fn bounded(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

//! Annual energy, fuel and emissions rollups.
//!
//! Diesel energy is the part of annual demand not covered by the renewable
//! target; fuel follows from a three-band specific fuel consumption curve
//! chosen by the diesel plant's average load factor.

use serde::Serialize;
use tracing::debug;

use crate::catalog::DieselSpec;
use crate::config::ScenarioConfig;
use crate::error::Advisory;
use crate::load::{HOURS_PER_DAY, HOURS_PER_YEAR, LoadProfile};
use crate::sizing::SizingResult;
use crate::solar::peak_sun_hours;

/// Diesel CO₂ emission factor (kg/L).
pub const CO2_KG_PER_LITRE: f64 = 2.7;
/// CO₂ absorbed by one mature tree per year (kg).
pub const CO2_KG_PER_TREE_YEAR: f64 = 22.0;
/// Share of diesel-free window energy assumed displaced per autonomy day.
const AUTONOMY_DIESEL_OFFSET: f64 = 0.8;
/// Load factor below which the part-load SFC applies.
pub const PARTIAL_LOAD_BAND: f64 = 0.3;
/// Load factor at and above which the base SFC applies.
pub const FULL_LOAD_BAND: f64 = 0.5;
/// Target above which a low diesel load factor is flagged.
const LOW_LOAD_ADVISORY_TARGET_PCT: f64 = 70.0;
const DAYS_PER_MONTH: f64 = 30.0;

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Specific fuel consumption (L/kWh) at average diesel `load_factor`.
///
/// Below 30 % the part-load figure applies, from there up to 50 %
/// the mean of part-load and base, and base at 50 % and above. The result
/// never increases with load factor.
pub fn specific_fuel_consumption(load_factor: f64, spec: &DieselSpec) -> f64 {
    if load_factor < PARTIAL_LOAD_BAND {
        spec.sfc_partial
    } else if load_factor < FULL_LOAD_BAND {
        (spec.sfc_base + spec.sfc_partial) / 2.0
    } else {
        spec.sfc_base
    }
}

/// Annual energy and fuel totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualEnergy {
    pub demand_kwh: f64,
    pub renewable_kwh: f64,
    pub diesel_kwh: f64,
    /// Diesel energy over the plant's annual capacity (0..1).
    pub diesel_load_factor: f64,
    /// Effective SFC (L/kWh).
    pub sfc_l_per_kwh: f64,
    pub fuel_litres: f64,
    /// Fuel a diesel-only plant would burn at the same SFC.
    pub diesel_only_fuel_litres: f64,
    pub fuel_saved_litres: f64,
    pub fuel_saved_pct: f64,
    pub diesel_run_hours: f64,
}

/// Annual emissions (tonnes CO₂).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environmental {
    pub co2_hybrid_t: f64,
    pub co2_diesel_only_t: f64,
    pub co2_avoided_t: f64,
    pub tree_equivalent: f64,
}

/// Ratios describing the sized plant against the load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub average_load_kw: f64,
    pub peak_load_kw: f64,
    pub min_load_kw: f64,
    pub load_factor: f64,
    /// PV kWp per kW of peak load.
    pub pv_to_peak_ratio: f64,
    /// Battery energy in hours of average load.
    pub battery_hours: f64,
    pub pv_capacity_factor: f64,
}

/// One row of the monthly energy table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyEnergy {
    /// Month index (0 = January).
    pub month: usize,
    pub name: &'static str,
    pub peak_sun_hours: f64,
    pub solar_kwh: f64,
    pub diesel_kwh: f64,
    pub load_kwh: f64,
    pub fuel_litres: f64,
    pub fuel_cost: f64,
    pub renewable_fraction: f64,
}

/// Everything the accountant produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accounting {
    pub annual: AnnualEnergy,
    pub environmental: Environmental,
    pub metrics: SystemMetrics,
    pub monthly: Vec<MonthlyEnergy>,
    #[serde(skip)]
    pub advisories: Vec<Advisory>,
}

/// Rolls up annual energy, fuel, emissions and the monthly table.
pub fn account(cfg: &ScenarioConfig, load: &LoadProfile, sizing: &SizingResult) -> Accounting {
    let diesel_spec = cfg.design.diesel.spec();
    let min_load = cfg.advanced.diesel_min_load_pct / 100.0;
    let mut advisories = Vec::new();

    let demand_kwh = load.annual_kwh();
    let renewable_kwh = sizing.renewable_target_kwh;
    let mut diesel_kwh = demand_kwh - renewable_kwh;
    if cfg.advanced.autonomy_days > 0 {
        diesel_kwh -= sizing.autonomy_window_kwh
            * f64::from(cfg.advanced.autonomy_days)
            * AUTONOMY_DIESEL_OFFSET;
    }
    let diesel_kwh = diesel_kwh.max(0.0);

    let diesel_load_factor = if sizing.diesel_kw > 0.0 {
        diesel_kwh / HOURS_PER_YEAR / sizing.diesel_kw
    } else {
        0.0
    };
    let sfc = specific_fuel_consumption(diesel_load_factor, &diesel_spec);
    let fuel_litres = diesel_kwh * sfc;
    let diesel_only_fuel_litres = demand_kwh * sfc;

    if diesel_load_factor < min_load
        && cfg.design.renewable_target_pct > LOW_LOAD_ADVISORY_TARGET_PCT
    {
        advisories.push(Advisory::new(
            "accounting",
            format!("Low diesel load factor: {:.0}%", diesel_load_factor * 100.0),
        ));
    }

    // Falls back to a divisor of one when the plant never runs.
    let run_divisor = sizing.diesel_kw * diesel_load_factor;
    let diesel_run_hours = diesel_kwh / if run_divisor != 0.0 { run_divisor } else { 1.0 };

    let fuel_saved_litres = diesel_only_fuel_litres - fuel_litres;
    let fuel_saved_pct = if diesel_only_fuel_litres > 0.0 {
        fuel_saved_litres / diesel_only_fuel_litres * 100.0
    } else {
        0.0
    };

    let co2_hybrid_t = fuel_litres * CO2_KG_PER_LITRE / 1000.0;
    let co2_diesel_only_t = diesel_only_fuel_litres * CO2_KG_PER_LITRE / 1000.0;
    let co2_avoided_t = co2_diesel_only_t - co2_hybrid_t;

    let average_kw = load.average_kw();
    let peak_kw = load.peak_kw();
    let metrics = SystemMetrics {
        average_load_kw: average_kw,
        peak_load_kw: peak_kw,
        min_load_kw: load.min_kw(),
        load_factor: load.load_factor(),
        pv_to_peak_ratio: ratio(sizing.pv_kwp, peak_kw),
        battery_hours: ratio(sizing.battery_kwh, average_kw),
        pv_capacity_factor: ratio(renewable_kwh, sizing.pv_kwp * HOURS_PER_YEAR),
    };

    let monthly = monthly_table(
        cfg.site.latitude,
        average_kw,
        sizing,
        sfc,
        cfg.opex.fuel_price_per_litre,
    );

    debug!(
        diesel_kwh,
        diesel_load_factor,
        sfc,
        fuel_litres,
        "annual accounting complete"
    );

    Accounting {
        annual: AnnualEnergy {
            demand_kwh,
            renewable_kwh,
            diesel_kwh,
            diesel_load_factor,
            sfc_l_per_kwh: sfc,
            fuel_litres,
            diesel_only_fuel_litres,
            fuel_saved_litres,
            fuel_saved_pct,
            diesel_run_hours,
        },
        environmental: Environmental {
            co2_hybrid_t,
            co2_diesel_only_t,
            co2_avoided_t,
            tree_equivalent: co2_avoided_t * 1000.0 / CO2_KG_PER_TREE_YEAR,
        },
        metrics,
        monthly,
        advisories,
    }
}

/// Twelve 30-day months of solar against average load.
pub fn monthly_table(
    latitude: f64,
    average_kw: f64,
    sizing: &SizingResult,
    sfc: f64,
    fuel_price: f64,
) -> Vec<MonthlyEnergy> {
    let load_kwh = average_kw * HOURS_PER_DAY as f64 * DAYS_PER_MONTH;
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(month, &name)| {
            let psh = peak_sun_hours(month, latitude);
            let solar_kwh = psh * sizing.pv_kwp * DAYS_PER_MONTH * sizing.effective_pr;
            let diesel_kwh = (load_kwh - solar_kwh).max(0.0);
            let fuel_litres = diesel_kwh * sfc;
            MonthlyEnergy {
                month,
                name,
                peak_sun_hours: psh,
                solar_kwh,
                diesel_kwh,
                load_kwh,
                fuel_litres,
                fuel_cost: fuel_litres * fuel_price,
                renewable_fraction: ratio(solar_kwh, load_kwh),
            }
        })
        .collect()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::catalog::DieselClass;
    use crate::sizing::{SizingInputs, size_system};

    fn run(cfg: &ScenarioConfig) -> (SizingResult, Accounting) {
        let load = cfg.load_profile();
        let inputs = SizingInputs::from_config(cfg, &load);
        let sizing = size_system(&inputs).expect("sizing should succeed").result;
        let acc = account(cfg, &load, &sizing);
        (sizing, acc)
    }

    #[test]
    fn sfc_bands_are_non_increasing() {
        for class in DieselClass::ALL {
            let spec = class.spec();
            let low = specific_fuel_consumption(0.1, &spec);
            let mid = specific_fuel_consumption(0.4, &spec);
            let high = specific_fuel_consumption(0.8, &spec);
            assert_eq!(low, spec.sfc_partial);
            assert_relative_eq!(mid, (spec.sfc_base + spec.sfc_partial) / 2.0);
            assert_eq!(high, spec.sfc_base);
            assert!(low >= mid && mid >= high);
        }
    }

    #[test]
    fn sfc_band_edges() {
        let spec = DieselClass::Medium.spec();
        assert_relative_eq!(specific_fuel_consumption(0.3, &spec), 0.27);
        assert_eq!(specific_fuel_consumption(0.5, &spec), 0.24);
        assert_eq!(specific_fuel_consumption(0.2999, &spec), 0.30);
    }

    #[test]
    fn min_load_setting_moves_advisory_not_sfc() {
        let mut cfg = ScenarioConfig::flat_load();
        cfg.design.renewable_target_pct = 80.0;
        let (_, default_acc) = run(&cfg);
        cfg.advanced.diesel_min_load_pct = 10.0;
        let (_, relaxed) = run(&cfg);

        // 20 % of demand over 600 kW is a 16.7 % load factor.
        assert_eq!(relaxed.annual.sfc_l_per_kwh, DieselClass::Medium.spec().sfc_partial);
        assert_eq!(relaxed.annual.sfc_l_per_kwh, default_acc.annual.sfc_l_per_kwh);
        assert!(default_acc.advisories.iter().any(|a| a.message.starts_with("Low diesel")));
        assert!(relaxed.advisories.is_empty());
    }

    #[test]
    fn flat_load_diesel_energy_and_fuel() {
        let cfg = ScenarioConfig::flat_load();
        let (_, acc) = run(&cfg);
        let demand = 500.0 * 8760.0;
        assert_relative_eq!(acc.annual.diesel_kwh, demand * 0.3, epsilon = 1e-6);
        // 1.314 GWh over 600 kW × 8760 h = 25 %, below the partial band.
        assert_relative_eq!(acc.annual.diesel_load_factor, 0.25, epsilon = 1e-9);
        assert_eq!(acc.annual.sfc_l_per_kwh, 0.30);
        assert_relative_eq!(acc.annual.fuel_litres, demand * 0.3 * 0.3, epsilon = 1e-6);
        assert_relative_eq!(acc.annual.diesel_run_hours, 8760.0, epsilon = 1e-6);
        assert_relative_eq!(acc.annual.fuel_saved_pct, 70.0, epsilon = 1e-9);
        // Target is exactly 70 %, so no low-load advisory.
        assert!(acc.advisories.is_empty());
    }

    #[test]
    fn full_renewable_has_no_diesel() {
        let mut cfg = ScenarioConfig::flat_load();
        cfg.design.renewable_target_pct = 100.0;
        let (_, acc) = run(&cfg);
        assert!(acc.annual.diesel_kwh.abs() < 1e-6);
        assert!(acc.environmental.co2_hybrid_t.abs() < 1e-9);
        assert_eq!(acc.annual.diesel_run_hours, 0.0);
        assert!(acc.advisories.iter().any(|a| a.message.contains("Low diesel load factor: 0%")));
    }

    #[test]
    fn autonomy_offsets_diesel_energy() {
        let mut cfg = ScenarioConfig::flat_load();
        let (_, base) = run(&cfg);
        cfg.advanced.autonomy_days = 2;
        let (_, acc) = run(&cfg);
        let offset = 3000.0 * 2.0 * 0.8;
        assert_relative_eq!(
            acc.annual.diesel_kwh,
            base.annual.diesel_kwh - offset,
            epsilon = 1e-6
        );
    }

    #[test]
    fn emissions_and_trees() {
        let cfg = ScenarioConfig::flat_load();
        let (_, acc) = run(&cfg);
        let env = &acc.environmental;
        assert_relative_eq!(env.co2_hybrid_t, acc.annual.fuel_litres * 2.7 / 1000.0);
        assert_relative_eq!(env.co2_avoided_t, env.co2_diesel_only_t - env.co2_hybrid_t);
        assert_relative_eq!(env.tree_equivalent, env.co2_avoided_t * 1000.0 / 22.0);
    }

    #[test]
    fn monthly_table_rows() {
        let cfg = ScenarioConfig::flat_load();
        let (sizing, acc) = run(&cfg);
        assert_eq!(acc.monthly.len(), 12);
        let jan = &acc.monthly[0];
        assert_eq!(jan.name, "Jan");
        assert_relative_eq!(jan.load_kwh, 500.0 * 24.0 * 30.0);
        assert_relative_eq!(jan.solar_kwh, 7.4 * sizing.pv_kwp * 30.0 * 0.82, epsilon = 1e-6);
        assert!(acc.monthly.iter().all(|m| m.diesel_kwh >= 0.0));
        assert_relative_eq!(jan.fuel_cost, jan.fuel_litres * 1.85);
    }

    #[test]
    fn zero_diesel_capacity_zero_load_factor() {
        let mut cfg = ScenarioConfig::flat_load();
        cfg.advanced.diesel_auto_size = false;
        cfg.advanced.diesel_unit_kw = 0.0;
        let load = cfg.load_profile();
        let inputs = SizingInputs::from_config(&cfg, &load);
        let sizing = size_system(&inputs).expect("sizing should succeed").result;
        let acc = account(&cfg, &load, &sizing);
        assert_eq!(acc.annual.diesel_load_factor, 0.0);
        // Divisor falls back to one.
        assert_relative_eq!(acc.annual.diesel_run_hours, acc.annual.diesel_kwh);
    }

    #[test]
    fn metrics_ratios() {
        let cfg = ScenarioConfig::flat_load();
        let (sizing, acc) = run(&cfg);
        assert_relative_eq!(acc.metrics.pv_to_peak_ratio, sizing.pv_kwp / 500.0);
        assert_relative_eq!(acc.metrics.battery_hours, 4.0 / 0.9, epsilon = 1e-9);
        assert_relative_eq!(acc.metrics.load_factor, 1.0);
    }
}

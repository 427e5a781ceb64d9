//! Parameter sweeps over fuel price and renewable target.

use serde::Serialize;

use crate::error::CalcError;
use crate::finance::{FinanceInputs, evaluate};
use crate::sizing::{SizingInputs, size_system};

/// Year-one fuel prices swept ($/L).
pub const FUEL_PRICES: [f64; 6] = [1.20, 1.50, 1.85, 2.20, 2.60, 3.00];
/// Renewable targets swept (%).
pub const RENEWABLE_TARGETS_PCT: [f64; 5] = [30.0, 50.0, 70.0, 85.0, 95.0];
/// Targets above this get deeper storage in the sweep.
const DEEP_STORAGE_TARGET_PCT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelPricePoint {
    pub fuel_price: f64,
    pub lcoe_hybrid: f64,
    pub lcoe_diesel: f64,
    /// Nominal lifetime savings, CAPEX difference included ($).
    pub lifetime_savings: f64,
    pub npv_benefit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewableTargetPoint {
    pub renewable_target_pct: f64,
    pub pv_kwp: f64,
    pub battery_kwh: f64,
    /// PV, battery and diesel equipment cost only ($).
    pub capex: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sensitivity {
    pub fuel_price: Vec<FuelPricePoint>,
    pub renewable_target: Vec<RenewableTargetPoint>,
}

/// Re-runs the cash-flow loop at each price in [`FUEL_PRICES`] with sizing
/// and dispatch held fixed.
pub fn fuel_price_sweep(finance: &FinanceInputs) -> Result<Vec<FuelPricePoint>, CalcError> {
    FUEL_PRICES
        .iter()
        .map(|&price| {
            let s = evaluate(&finance.with_fuel_price(price))?.summary;
            Ok(FuelPricePoint {
                fuel_price: price,
                lcoe_hybrid: s.lcoe_hybrid,
                lcoe_diesel: s.lcoe_diesel,
                lifetime_savings: s.lifetime_savings,
                npv_benefit: s.npv_benefit,
            })
        })
        .collect()
}

/// Re-sizes at each target in [`RENEWABLE_TARGETS_PCT`], using 6 h of storage
/// above 80 % and 4 h otherwise.
///
/// # Arguments
///
/// * `sizing` - Baseline sizing inputs; autonomy and bounds carry over
/// * `pv_per_kwp` - PV cost ($/kWp)
/// * `battery_per_kwh` - Battery cost ($/kWh)
/// * `diesel_per_kw` - Diesel cost ($/kW)
pub fn renewable_target_sweep(
    sizing: &SizingInputs,
    pv_per_kwp: f64,
    battery_per_kwh: f64,
    diesel_per_kw: f64,
) -> Result<Vec<RenewableTargetPoint>, CalcError> {
    RENEWABLE_TARGETS_PCT
        .iter()
        .map(|&target| {
            let inputs = SizingInputs {
                renewable_fraction: target / 100.0,
                storage_hours: if target > DEEP_STORAGE_TARGET_PCT { 6.0 } else { 4.0 },
                ..sizing.clone()
            };
            let r = size_system(&inputs)?.result;
            Ok(RenewableTargetPoint {
                renewable_target_pct: target,
                pv_kwp: r.pv_kwp,
                battery_kwh: r.battery_kwh,
                capex: r.pv_kwp * pv_per_kwp
                    + r.battery_kwh * battery_per_kwh
                    + r.diesel_kw * diesel_per_kw,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::accounting::account;
    use crate::config::ScenarioConfig;

    fn baseline() -> (SizingInputs, FinanceInputs) {
        let cfg = ScenarioConfig::baseline();
        let load = cfg.load_profile();
        let sizing_inputs = SizingInputs::from_config(&cfg, &load);
        let sizing = size_system(&sizing_inputs).expect("sizing should succeed").result;
        let acc = account(&cfg, &load, &sizing);
        let finance = FinanceInputs::from_config(&cfg, &sizing, &acc);
        (sizing_inputs, finance)
    }

    #[test]
    fn fuel_sweep_has_one_row_per_price() {
        let (_, finance) = baseline();
        let rows = fuel_price_sweep(&finance).expect("sweep should succeed");
        assert_eq!(rows.len(), FUEL_PRICES.len());
        assert_eq!(rows[2].fuel_price, 1.85);
    }

    #[test]
    fn npv_benefit_non_decreasing_with_fuel_price() {
        let (_, finance) = baseline();
        let rows = fuel_price_sweep(&finance).expect("sweep should succeed");
        for pair in rows.windows(2) {
            assert!(pair[1].npv_benefit >= pair[0].npv_benefit);
            assert!(pair[1].lcoe_diesel > pair[0].lcoe_diesel);
        }
    }

    #[test]
    fn base_price_row_matches_main_run() {
        let (_, finance) = baseline();
        let main = evaluate(&finance).expect("finance should succeed").summary;
        let rows = fuel_price_sweep(&finance).expect("sweep should succeed");
        assert_relative_eq!(rows[2].npv_benefit, main.npv_benefit, epsilon = 1e-6);
    }

    #[test]
    fn target_sweep_grows_pv_and_deepens_storage() {
        let (sizing, _) = baseline();
        let rows = renewable_target_sweep(&sizing, 1100.0, 800.0, 450.0).expect("sweep should succeed");
        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[1].pv_kwp > pair[0].pv_kwp);
        }
        let avg = sizing.average_kw;
        assert_relative_eq!(rows[0].battery_kwh, avg * 4.0 / 0.9, epsilon = 1e-9);
        assert_relative_eq!(rows[3].battery_kwh, avg * 6.0 / 0.9, epsilon = 1e-9);
        let r = &rows[1];
        assert_relative_eq!(
            r.capex,
            r.pv_kwp * 1100.0 + r.battery_kwh * 800.0 + sizing.peak_kw * 1.2 * 450.0,
            epsilon = 1e-6
        );
    }
}

//! Year-by-year cash flows for the hybrid plant against a diesel-only baseline.

use serde::Serialize;
use tracing::debug;

use crate::accounting::Accounting;
use crate::config::ScenarioConfig;
use crate::error::{CalcError, ensure_finite};
use crate::sizing::{DIESEL_PEAK_MARGIN, SizingResult};

/// Diesel-only installed cost uplift over bare genset cost.
const DIESEL_ONLY_INSTALL_FACTOR: f64 = 1.1;
/// Diesel-only maintenance uplift for continuous running.
const DIESEL_ONLY_MAINTENANCE_FACTOR: f64 = 1.5;
/// Battery replacement cost as a share of the initial battery CAPEX.
const BATTERY_REPLACEMENT_FRACTION: f64 = 0.7;

/// Hybrid capital cost by line item ($).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexBreakdown {
    pub pv: f64,
    pub battery: f64,
    pub diesel: f64,
    /// Balance of system on PV + battery.
    pub bos: f64,
    /// EPC margin on equipment + BOS.
    pub epc: f64,
    pub land: f64,
    pub total: f64,
}

impl CapexBreakdown {
    pub fn new(cfg: &ScenarioConfig, sizing: &SizingResult) -> Self {
        let c = &cfg.capex;
        let pv = sizing.pv_kwp * c.pv_per_kwp;
        let battery = sizing.battery_kwh * c.battery_per_kwh;
        let diesel = sizing.diesel_kw * c.diesel_per_kw;
        let bos = (pv + battery) * c.bos_pct / 100.0;
        let epc = (pv + battery + diesel + bos) * c.epc_pct / 100.0;
        Self {
            pv,
            battery,
            diesel,
            bos,
            epc,
            land: c.land,
            total: pv + battery + diesel + bos + epc + c.land,
        }
    }
}

/// Hybrid operating cost for year one ($).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridOpex {
    pub pv_om: f64,
    pub battery_om: f64,
    pub diesel_om: f64,
    pub fuel: f64,
    pub insurance: f64,
    pub site: f64,
    pub total: f64,
}

/// Diesel-only operating cost for year one ($).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DieselOnlyOpex {
    pub maintenance: f64,
    pub fuel: f64,
    pub insurance: f64,
    pub total: f64,
}

/// One row of the cash-flow table. Year 0 holds CAPEX only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowYear {
    pub year: u32,
    pub hybrid_nominal: f64,
    pub diesel_nominal: f64,
    pub hybrid_discounted: f64,
    pub diesel_discounted: f64,
    pub hybrid_cumulative: f64,
    pub diesel_cumulative: f64,
    /// Diesel-only cumulative cost minus hybrid cumulative cost.
    pub cumulative_savings: f64,
    pub battery_replacement: bool,
}

/// Headline financial results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub capex: CapexBreakdown,
    pub diesel_only_capex: f64,
    /// Hybrid OPEX averaged over project life, replacement included.
    pub hybrid_average_opex: f64,
    pub diesel_average_opex: f64,
    pub year_one_hybrid: HybridOpex,
    pub year_one_diesel: DieselOnlyOpex,
    /// Discounted diesel-only lifetime cost minus discounted hybrid lifetime
    /// cost. Positive means the hybrid is cheaper.
    pub npv_benefit: f64,
    /// Lifetime savings spread evenly over the project life, CAPEX included.
    pub average_annual_savings: f64,
    /// Nominal lifetime savings including the CAPEX difference.
    pub lifetime_savings: f64,
    /// Extra CAPEX over average annual savings. Negative when the hybrid costs
    /// less to build; `None` when it never saves.
    pub payback_years: Option<f64>,
    /// Hybrid cost of energy ($/kWh).
    pub lcoe_hybrid: f64,
    pub lcoe_diesel: f64,
}

/// Summary plus the full cash-flow table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Financials {
    pub summary: FinancialSummary,
    pub cash_flows: Vec<CashFlowYear>,
}

/// Inputs to the cash-flow loop, fixed once sizing and accounting are done.
///
/// Rates are fractions, not percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceInputs {
    pub capex: CapexBreakdown,
    pub diesel_only_capex: f64,
    pub pv_kwp: f64,
    pub battery_kwh: f64,
    pub diesel_kw: f64,
    pub peak_kw: f64,
    pub annual_demand_kwh: f64,
    pub hybrid_fuel_litres: f64,
    pub diesel_only_fuel_litres: f64,
    pub fuel_price: f64,
    pub pv_om_per_kw: f64,
    pub battery_om_per_kwh: f64,
    pub diesel_om_per_kw: f64,
    pub diesel_only_maintenance_per_kw: f64,
    pub insurance_rate: f64,
    pub fixed_site_costs: f64,
    pub fuel_escalation: f64,
    pub inflation: f64,
    pub discount_rate: f64,
    pub project_life_years: u32,
    /// Replacement year (0 or beyond project life disables it).
    pub battery_replacement_year: u32,
}

impl FinanceInputs {
    pub fn from_config(cfg: &ScenarioConfig, sizing: &SizingResult, accounting: &Accounting) -> Self {
        let diesel_spec = cfg.design.diesel.spec();
        let capex = CapexBreakdown::new(cfg, sizing);
        let peak_kw = accounting.metrics.peak_load_kw;
        let diesel_om_per_kw = if cfg.opex.diesel_om_auto {
            diesel_spec.maintenance_per_kw
        } else {
            cfg.opex.diesel_om_per_kw
        };
        Self {
            capex,
            diesel_only_capex: DIESEL_PEAK_MARGIN
                * peak_kw
                * cfg.capex.diesel_per_kw
                * DIESEL_ONLY_INSTALL_FACTOR,
            pv_kwp: sizing.pv_kwp,
            battery_kwh: sizing.battery_kwh,
            diesel_kw: sizing.diesel_kw,
            peak_kw,
            annual_demand_kwh: accounting.annual.demand_kwh,
            hybrid_fuel_litres: accounting.annual.fuel_litres,
            diesel_only_fuel_litres: accounting.annual.diesel_only_fuel_litres,
            fuel_price: cfg.opex.fuel_price_per_litre,
            pv_om_per_kw: cfg.opex.pv_om_per_kw,
            battery_om_per_kwh: cfg.opex.battery_om_per_kwh,
            diesel_om_per_kw,
            diesel_only_maintenance_per_kw: diesel_spec.maintenance_per_kw,
            insurance_rate: cfg.opex.insurance_pct / 100.0,
            fixed_site_costs: cfg.opex.fixed_site_costs(),
            fuel_escalation: cfg.finance.fuel_escalation_pct / 100.0,
            inflation: cfg.finance.inflation_pct / 100.0,
            discount_rate: cfg.finance.discount_rate_pct / 100.0,
            project_life_years: cfg.finance.project_life_years,
            battery_replacement_year: cfg.advanced.battery_replacement_year,
        }
    }

    /// Same inputs at a different year-one fuel price.
    pub fn with_fuel_price(&self, fuel_price: f64) -> Self {
        Self {
            fuel_price,
            ..self.clone()
        }
    }

    /// Hybrid OPEX at inflation factor `i` and fuel factor `f`.
    fn hybrid_opex(&self, i: f64, f: f64) -> HybridOpex {
        let pv_om = self.pv_kwp * self.pv_om_per_kw * i;
        let battery_om = self.battery_kwh * self.battery_om_per_kwh * i;
        let diesel_om = self.diesel_kw * self.diesel_om_per_kw * i;
        let insurance = self.capex.total * self.insurance_rate * i;
        let site = self.fixed_site_costs * i;
        let fuel = self.hybrid_fuel_litres * self.fuel_price * f;
        HybridOpex {
            pv_om,
            battery_om,
            diesel_om,
            fuel,
            insurance,
            site,
            total: pv_om + battery_om + diesel_om + insurance + site + fuel,
        }
    }

    fn diesel_only_opex(&self, i: f64, f: f64) -> DieselOnlyOpex {
        let maintenance = DIESEL_PEAK_MARGIN
            * self.peak_kw
            * self.diesel_only_maintenance_per_kw
            * DIESEL_ONLY_MAINTENANCE_FACTOR
            * i;
        let fuel = self.diesel_only_fuel_litres * self.fuel_price * f;
        let insurance = self.diesel_only_capex * self.insurance_rate * i;
        DieselOnlyOpex {
            maintenance,
            fuel,
            insurance,
            total: maintenance + fuel + insurance,
        }
    }
}

/// Runs the cash-flow loop over the project life.
///
/// Non-fuel costs inflate from year one, fuel escalates from year one, and
/// year `y` is discounted by `(1 + r)^−y`. The one-off battery replacement is
/// inflated to its year and booked in that year only.
///
/// # Errors
///
/// Returns [`CalcError::Computation`] if any headline figure is not finite.
pub fn evaluate(inputs: &FinanceInputs) -> Result<Financials, CalcError> {
    let life = inputs.project_life_years;
    let capex = inputs.capex.total;
    let diesel_capex = inputs.diesel_only_capex;

    let mut cash_flows = Vec::with_capacity(life as usize + 1);
    cash_flows.push(CashFlowYear {
        year: 0,
        hybrid_nominal: capex,
        diesel_nominal: diesel_capex,
        hybrid_discounted: capex,
        diesel_discounted: diesel_capex,
        hybrid_cumulative: capex,
        diesel_cumulative: diesel_capex,
        cumulative_savings: diesel_capex - capex,
        battery_replacement: false,
    });

    let mut hybrid_pv_cost = capex;
    let mut diesel_pv_cost = diesel_capex;
    let mut hybrid_cum = capex;
    let mut diesel_cum = diesel_capex;
    let mut hybrid_opex_sum = 0.0;
    let mut diesel_opex_sum = 0.0;

    for year in 1..=life {
        let exponent = f64::from(year - 1);
        let i = (1.0 + inputs.inflation).powf(exponent);
        let f = (1.0 + inputs.fuel_escalation).powf(exponent);
        let d = (1.0 + inputs.discount_rate).powf(-f64::from(year));

        let replacement = year == inputs.battery_replacement_year;
        let mut hybrid = inputs.hybrid_opex(i, f).total;
        if replacement {
            hybrid += inputs.capex.battery * BATTERY_REPLACEMENT_FRACTION * i;
        }
        let diesel = inputs.diesel_only_opex(i, f).total;

        hybrid_pv_cost += hybrid * d;
        diesel_pv_cost += diesel * d;
        hybrid_cum += hybrid;
        diesel_cum += diesel;
        hybrid_opex_sum += hybrid;
        diesel_opex_sum += diesel;

        cash_flows.push(CashFlowYear {
            year,
            hybrid_nominal: hybrid,
            diesel_nominal: diesel,
            hybrid_discounted: hybrid * d,
            diesel_discounted: diesel * d,
            hybrid_cumulative: hybrid_cum,
            diesel_cumulative: diesel_cum,
            cumulative_savings: diesel_cum - hybrid_cum,
            battery_replacement: replacement,
        });
    }

    let years = f64::from(life.max(1));
    let lifetime_energy = inputs.annual_demand_kwh * years;
    let average_annual_savings = (diesel_cum - hybrid_cum) / years;
    let payback_years =
        (average_annual_savings > 0.0).then(|| (capex - diesel_capex) / average_annual_savings);

    let npv_benefit = ensure_finite("finance", "NPV benefit", diesel_pv_cost - hybrid_pv_cost)?;
    let lcoe_hybrid = ensure_finite("finance", "hybrid LCOE", hybrid_cum / lifetime_energy)?;
    let lcoe_diesel = ensure_finite("finance", "diesel LCOE", diesel_cum / lifetime_energy)?;

    debug!(capex, npv_benefit, lcoe_hybrid, lcoe_diesel, "cash flows complete");

    Ok(Financials {
        summary: FinancialSummary {
            capex: inputs.capex.clone(),
            diesel_only_capex: diesel_capex,
            hybrid_average_opex: hybrid_opex_sum / years,
            diesel_average_opex: diesel_opex_sum / years,
            year_one_hybrid: inputs.hybrid_opex(1.0, 1.0),
            year_one_diesel: inputs.diesel_only_opex(1.0, 1.0),
            npv_benefit,
            average_annual_savings,
            lifetime_savings: diesel_cum - hybrid_cum,
            payback_years,
            lcoe_hybrid,
            lcoe_diesel,
        },
        cash_flows,
    })
}

//! The calculation pipeline: sizing, dispatch, accounting, finance, sensitivity.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::accounting::{Accounting, account};
use crate::catalog::{BatterySpec, DieselSpec, PvSpec};
use crate::config::{ScenarioConfig, SiteConfig};
use crate::error::{Advisory, CalcError};
use crate::finance::{FinanceInputs, Financials, evaluate};
use crate::load::LoadProfile;
use crate::sensitivity::{Sensitivity, fuel_price_sweep, renewable_target_sweep};
use crate::sim::engine::{DispatchPlant, simulate_seasons};
use crate::sim::types::{Season, SeasonalProfile};
use crate::sizing::{SizingInputs, SizingOutcome, SizingResult, size_system};

/// Catalog records the run was evaluated with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Technology {
    pub pv: PvSpec,
    pub tracking: &'static str,
    pub tracking_gain: f64,
    pub battery: BatterySpec,
    pub diesel: DieselSpec,
}

/// Complete output of one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcResults {
    pub site: SiteConfig,
    pub renewable_target_pct: f64,
    pub technology: Technology,
    pub load: LoadProfile,
    pub sizing: SizingResult,
    pub seasons: Vec<SeasonalProfile>,
    pub accounting: Accounting,
    pub financials: Financials,
    pub sensitivity: Sensitivity,
    pub advisories: Vec<Advisory>,
}

impl CalcResults {
    /// Dispatch day for `season`.
    pub fn season(&self, season: Season) -> Option<&SeasonalProfile> {
        self.seasons.iter().find(|s| s.season == season)
    }
}

/// Runs every stage against an immutable scenario and returns fresh results.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] if the scenario fails validation or
/// its average load is not positive, and [`CalcError::Computation`] if a
/// stage produces a degenerate value.
pub fn run_calculation(cfg: &ScenarioConfig) -> Result<CalcResults, CalcError> {
    let errors = cfg.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CalcError::InvalidInput(joined));
    }

    let load = cfg.load_profile();
    let average_kw = load.average_kw();
    if !(average_kw.is_finite() && average_kw > 0.0) {
        return Err(CalcError::InvalidInput(format!(
            "average load must be positive, got {average_kw} kW"
        )));
    }
    debug!(
        site = %cfg.site.name,
        average_kw,
        peak_kw = load.peak_kw(),
        "starting calculation"
    );

    let sizing_inputs = SizingInputs::from_config(cfg, &load);
    let SizingOutcome {
        result: sizing,
        mut advisories,
    } = size_system(&sizing_inputs)?;

    let battery = cfg.design.battery.spec();
    let plant = DispatchPlant {
        pv_kwp: sizing.pv_kwp,
        inverter_kw: sizing.inverter_kw,
        effective_pr: sizing.effective_pr,
        battery_kwh: sizing.battery_kwh,
        battery_kw: sizing.battery_kw,
        depth_of_discharge: battery.dod,
        round_trip_efficiency: battery.round_trip_efficiency,
        charge_source: cfg.advanced.charge_source,
    };
    let seasons = simulate_seasons(cfg.site.latitude, &load, &plant);

    let mut accounting = account(cfg, &load, &sizing);
    advisories.append(&mut accounting.advisories);

    let finance_inputs = FinanceInputs::from_config(cfg, &sizing, &accounting);
    let financials = evaluate(&finance_inputs)?;

    let sensitivity = Sensitivity {
        fuel_price: fuel_price_sweep(&finance_inputs)?,
        renewable_target: renewable_target_sweep(
            &sizing_inputs,
            cfg.capex.pv_per_kwp,
            cfg.capex.battery_per_kwh,
            cfg.capex.diesel_per_kw,
        )?,
    };

    for advisory in &advisories {
        warn!(stage = advisory.stage, "{}", advisory.message);
    }
    debug!(advisories = advisories.len(), "calculation complete");

    Ok(CalcResults {
        site: cfg.site.clone(),
        renewable_target_pct: cfg.design.renewable_target_pct,
        technology: Technology {
            pv: cfg.design.pv.spec(),
            tracking: cfg.design.tracking.name(),
            tracking_gain: cfg.design.tracking.gain(),
            battery,
            diesel: cfg.design.diesel.spec(),
        },
        load,
        sizing,
        seasons,
        accounting,
        financials,
        sensitivity,
        advisories,
    })
}

impl fmt::Display for CalcResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sizing;
        let a = &self.accounting.annual;
        let m = &self.accounting.metrics;
        let env = &self.accounting.environmental;
        let fin = &self.financials.summary;

        writeln!(f, "--- Microgrid Sizing Report ---")?;
        writeln!(
            f,
            "Site:                {} ({:.2}, {:.2})",
            self.site.name, self.site.latitude, self.site.longitude
        )?;
        writeln!(
            f,
            "Load:                avg {:.1} kW, peak {:.1} kW, load factor {:.1}%",
            m.average_load_kw,
            m.peak_load_kw,
            m.load_factor * 100.0
        )?;
        writeln!(f, "Renewable target:    {:.1}%", self.renewable_target_pct)?;
        writeln!(
            f,
            "PV array:            {:.1} kWp DC / {:.0} kW AC ({:.0} kWh/kWp, PR {:.1}%)",
            s.pv_kwp,
            s.inverter_kw,
            s.specific_yield_kwh_per_kwp,
            s.effective_pr * 100.0
        )?;
        writeln!(
            f,
            "Battery:             {:.1} kWh / {:.1} kW",
            s.battery_kwh, s.battery_kw
        )?;
        writeln!(
            f,
            "Diesel:              {:.1} kW ({} unit{})",
            s.diesel_kw,
            s.diesel_units,
            if s.diesel_units == 1 { "" } else { "s" }
        )?;
        writeln!(
            f,
            "Diesel energy:       {:.0} kWh/yr (load factor {:.1}%, SFC {:.3} L/kWh)",
            a.diesel_kwh,
            a.diesel_load_factor * 100.0,
            a.sfc_l_per_kwh
        )?;
        writeln!(
            f,
            "Fuel:                {:.0} L/yr (saves {:.0} L, {:.1}%)",
            a.fuel_litres, a.fuel_saved_litres, a.fuel_saved_pct
        )?;
        writeln!(
            f,
            "CO2:                 {:.1} t/yr hybrid, {:.1} t/yr diesel-only ({:.1} t avoided)",
            env.co2_hybrid_t, env.co2_diesel_only_t, env.co2_avoided_t
        )?;
        writeln!(
            f,
            "CAPEX:               ${:.0} (diesel-only ${:.0})",
            fin.capex.total, fin.diesel_only_capex
        )?;
        writeln!(
            f,
            "Average OPEX:        ${:.0}/yr hybrid, ${:.0}/yr diesel-only",
            fin.hybrid_average_opex, fin.diesel_average_opex
        )?;
        writeln!(f, "NPV benefit:         ${:.0}", fin.npv_benefit)?;
        match fin.payback_years {
            Some(years) => writeln!(f, "Payback:             {years:.1} years")?,
            None => writeln!(f, "Payback:             n/a")?,
        }
        write!(
            f,
            "LCOE:                ${:.3}/kWh hybrid, ${:.3}/kWh diesel-only",
            fin.lcoe_hybrid, fin.lcoe_diesel
        )?;
        for advisory in &self.advisories {
            write!(f, "\nAdvisory:            {}", advisory.message)?;
        }
        Ok(())
    }
}

//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use microgrid_sizer::calc::CalcResults;
use microgrid_sizer::catalog::LoadPattern;
use microgrid_sizer::config::ScenarioConfig;
use microgrid_sizer::sim::engine::DispatchPlant;

/// Perth latitude used by the reference scenarios.
pub const PERTH_LATITUDE: f64 = -31.95;

/// Flat 500 kW load in Perth at `target_pct`, every other input at its default.
pub fn flat_scenario(target_pct: f64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.load.pattern = LoadPattern::Flat;
    cfg.site.latitude = PERTH_LATITUDE;
    cfg.design.renewable_target_pct = target_pct;
    cfg
}

/// Reference scenario A: flat 500 kW, 70 % target.
pub fn scenario_a() -> ScenarioConfig {
    flat_scenario(70.0)
}

/// Reference scenario B: flat 500 kW, no renewable target.
pub fn scenario_b() -> ScenarioConfig {
    flat_scenario(0.0)
}

/// Reference scenario C: flat 500 kW, fully renewable, no autonomy days.
pub fn scenario_c() -> ScenarioConfig {
    let mut cfg = flat_scenario(100.0);
    cfg.advanced.autonomy_days = 0;
    cfg
}

/// Every built-in preset as a `(name, config)` pair.
pub fn all_presets() -> Vec<(&'static str, ScenarioConfig)> {
    ScenarioConfig::PRESETS
        .iter()
        .map(|&name| {
            let cfg = ScenarioConfig::from_preset(name).expect("preset should exist");
            (name, cfg)
        })
        .collect()
}

/// Dispatch plant matching a finished run, for driving the engine directly.
pub fn plant_for(cfg: &ScenarioConfig, results: &CalcResults) -> DispatchPlant {
    let s = &results.sizing;
    DispatchPlant {
        pv_kwp: s.pv_kwp,
        inverter_kw: s.inverter_kw,
        effective_pr: s.effective_pr,
        battery_kwh: s.battery_kwh,
        battery_kw: s.battery_kw,
        depth_of_discharge: results.technology.battery.dod,
        round_trip_efficiency: results.technology.battery.round_trip_efficiency,
        charge_source: cfg.advanced.charge_source,
    }
}

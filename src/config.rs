//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{
    BatteryChemistry, DieselClass, LoadPattern, PvTechnology, REFERENCE_SITES, TrackingSystem,
};
use crate::load::LoadProfile;
use crate::sim::types::ChargeSource;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline study. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`] for
/// the built-in default. A run treats the value as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Site name and coordinates.
    #[serde(default)]
    pub site: SiteConfig,
    /// Hourly demand profile.
    #[serde(default)]
    pub load: LoadConfig,
    /// Renewable target and technology selections.
    #[serde(default)]
    pub design: DesignConfig,
    /// Capital cost inputs.
    #[serde(default)]
    pub capex: CapexConfig,
    /// Operating cost inputs.
    #[serde(default)]
    pub opex: OpexConfig,
    /// Escalation, inflation and discounting.
    #[serde(default)]
    pub finance: FinanceConfig,
    /// Sizing heuristics and bounds.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// Site location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub name: String,
    /// Latitude in signed degrees (south negative).
    pub latitude: f64,
    /// Longitude in signed degrees (west negative).
    pub longitude: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let perth = REFERENCE_SITES[0];
        Self {
            name: perth.name.to_string(),
            latitude: perth.latitude,
            longitude: perth.longitude,
        }
    }
}

/// Hourly demand profile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Built-in shape used when `hourly_kw` is absent.
    pub pattern: LoadPattern,
    /// Explicit hourly demand (kW); missing entries are padded, extras dropped.
    pub hourly_kw: Option<Vec<f64>>,
    /// Multiplier applied to every hour.
    pub scale: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            pattern: LoadPattern::default(),
            hourly_kw: None,
            scale: 1.0,
        }
    }
}

/// Renewable target and catalog selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignConfig {
    /// Share of annual demand to be met by solar (0–100 %).
    pub renewable_target_pct: f64,
    pub pv: PvTechnology,
    pub tracking: TrackingSystem,
    pub battery: BatteryChemistry,
    pub diesel: DieselClass,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            renewable_target_pct: 70.0,
            pv: PvTechnology::default(),
            tracking: TrackingSystem::default(),
            battery: BatteryChemistry::default(),
            diesel: DieselClass::default(),
        }
    }
}

/// Capital cost inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapexConfig {
    /// PV installed cost ($/kWp DC).
    pub pv_per_kwp: f64,
    /// Battery installed cost ($/kWh).
    pub battery_per_kwh: f64,
    /// Diesel genset installed cost ($/kW).
    pub diesel_per_kw: f64,
    /// Balance of system as % of PV + battery.
    pub bos_pct: f64,
    /// EPC margin as % of equipment + BOS.
    pub epc_pct: f64,
    /// Flat land cost ($).
    pub land: f64,
}

impl Default for CapexConfig {
    fn default() -> Self {
        Self {
            pv_per_kwp: 1100.0,
            battery_per_kwh: 800.0,
            diesel_per_kw: 450.0,
            bos_pct: 15.0,
            epc_pct: 12.0,
            land: 0.0,
        }
    }
}

/// Operating cost inputs. Per-unit rates are in year-one dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpexConfig {
    /// Delivered diesel price ($/L), year one.
    pub fuel_price_per_litre: f64,
    /// PV O&M ($/kWp/year).
    pub pv_om_per_kw: f64,
    /// Battery O&M ($/kWh/year).
    pub battery_om_per_kwh: f64,
    /// Diesel O&M ($/kW/year), used when `diesel_om_auto` is false.
    pub diesel_om_per_kw: f64,
    /// Take diesel O&M from the diesel class catalog.
    pub diesel_om_auto: bool,
    /// Insurance as % of CAPEX per year.
    pub insurance_pct: f64,
    pub site_management: f64,
    pub network_fees: f64,
    pub spares: f64,
    pub env_compliance: f64,
    pub water_chemicals: f64,
    pub remote_monitoring: f64,
}

impl OpexConfig {
    /// Sum of the fixed site cost lines ($/year).
    pub fn fixed_site_costs(&self) -> f64 {
        self.site_management
            + self.network_fees
            + self.spares
            + self.env_compliance
            + self.water_chemicals
            + self.remote_monitoring
    }
}

impl Default for OpexConfig {
    fn default() -> Self {
        Self {
            fuel_price_per_litre: 1.85,
            pv_om_per_kw: 15.0,
            battery_om_per_kwh: 10.0,
            diesel_om_per_kw: 0.0,
            diesel_om_auto: true,
            insurance_pct: 0.5,
            site_management: 0.0,
            network_fees: 0.0,
            spares: 0.0,
            env_compliance: 0.0,
            water_chemicals: 0.0,
            remote_monitoring: 0.0,
        }
    }
}

/// Escalation, inflation and discounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    /// Annual fuel price escalation (%).
    pub fuel_escalation_pct: f64,
    /// Annual general inflation applied to non-fuel costs (%).
    pub inflation_pct: f64,
    /// Discount rate for NPV (%).
    pub discount_rate_pct: f64,
    /// Analysis horizon (years).
    pub project_life_years: u32,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            fuel_escalation_pct: 3.0,
            inflation_pct: 2.5,
            discount_rate_pct: 8.0,
            project_life_years: 25,
        }
    }
}

/// Sizing heuristics, bounds and dispatch policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvancedConfig {
    /// PV system performance ratio before tracking gain.
    pub performance_ratio: f64,
    /// Battery autonomy at average load (hours).
    pub storage_hours: f64,
    /// Battery power-to-energy ratio (1/h).
    pub c_rate: f64,
    /// Consecutive diesel-free days to design for (0 disables).
    pub autonomy_days: u32,
    /// Start of the daily diesel-free window (hour, inclusive).
    pub autonomy_start_hour: usize,
    /// End of the daily diesel-free window (hour, exclusive).
    pub autonomy_end_hour: usize,
    pub min_pv_kwp: f64,
    pub max_pv_kwp: f64,
    pub min_battery_kwh: f64,
    pub max_battery_kwh: f64,
    pub max_battery_kw: f64,
    /// PV DC to inverter AC ratio.
    pub dc_ac_ratio: f64,
    /// Which sources may charge the battery.
    pub charge_source: ChargeSource,
    /// Year in which the battery is replaced once (0 disables).
    pub battery_replacement_year: u32,
    /// Headroom over peak load for battery power (%).
    pub spinning_reserve_pct: f64,
    /// Diesel load factor below which the low-load advisory fires (%).
    pub diesel_min_load_pct: f64,
    /// Size the diesel plant at 1.2 × peak instead of `diesel_unit_kw × diesel_units`.
    pub diesel_auto_size: bool,
    pub diesel_unit_kw: f64,
    pub diesel_units: u32,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            performance_ratio: 0.82,
            storage_hours: 4.0,
            c_rate: 0.5,
            autonomy_days: 0,
            autonomy_start_hour: 10,
            autonomy_end_hour: 16,
            min_pv_kwp: 0.0,
            max_pv_kwp: 15_000.0,
            min_battery_kwh: 0.0,
            max_battery_kwh: 50_000.0,
            max_battery_kw: 15_000.0,
            dc_ac_ratio: 1.2,
            charge_source: ChargeSource::Both,
            battery_replacement_year: 12,
            spinning_reserve_pct: 10.0,
            diesel_min_load_pct: 30.0,
            diesel_auto_size: true,
            diesel_unit_kw: 0.0,
            diesel_units: 1,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"advanced.c_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline study: commercial load near Perth, 70 % renewable.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the flat-load study: constant 500 kW at Perth, default technology.
    pub fn flat_load() -> Self {
        Self {
            load: LoadConfig {
                pattern: LoadPattern::Flat,
                ..LoadConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the mining-camp preset: Pilbara site, single-axis tracking, 85 % target.
    pub fn mining_camp() -> Self {
        let karratha = REFERENCE_SITES[2];
        Self {
            site: SiteConfig {
                name: karratha.name.to_string(),
                latitude: karratha.latitude,
                longitude: karratha.longitude,
            },
            load: LoadConfig {
                pattern: LoadPattern::Mining,
                ..LoadConfig::default()
            },
            design: DesignConfig {
                renewable_target_pct: 85.0,
                tracking: TrackingSystem::SingleAxis,
                diesel: DieselClass::Large,
                ..DesignConfig::default()
            },
            opex: OpexConfig {
                fuel_price_per_litre: 2.10,
                site_management: 40_000.0,
                remote_monitoring: 12_000.0,
                ..OpexConfig::default()
            },
            advanced: AdvancedConfig {
                autonomy_days: 1,
                ..AdvancedConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the telecoms preset: small constant load, manual diesel, high target.
    pub fn telecoms() -> Self {
        let alice = REFERENCE_SITES[3];
        Self {
            site: SiteConfig {
                name: alice.name.to_string(),
                latitude: alice.latitude,
                longitude: alice.longitude,
            },
            load: LoadConfig {
                pattern: LoadPattern::Telecoms,
                ..LoadConfig::default()
            },
            design: DesignConfig {
                renewable_target_pct: 95.0,
                diesel: DieselClass::Small,
                ..DesignConfig::default()
            },
            advanced: AdvancedConfig {
                storage_hours: 12.0,
                diesel_auto_size: false,
                diesel_unit_kw: 30.0,
                diesel_units: 2,
                ..AdvancedConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "flat_load", "mining_camp", "telecoms"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "flat_load" => Ok(Self::flat_load()),
            "mining_camp" => Ok(Self::mining_camp()),
            "telecoms" => Ok(Self::telecoms()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown fields,
    /// or names an unknown catalog entry.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Builds the scaled hourly load profile for this scenario.
    pub fn load_profile(&self) -> LoadProfile {
        match &self.load.hourly_kw {
            Some(values) => LoadProfile::from_slice(values, self.load.scale),
            None => LoadProfile::new(self.load.pattern.hourly_kw(), self.load.scale),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Demand itself is
    /// checked by the calculation, not here.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let site = &self.site;
        if !(-90.0..=90.0).contains(&site.latitude) {
            errors.push(ConfigError::new("site.latitude", "must be in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            errors.push(ConfigError::new("site.longitude", "must be in [-180, 180]"));
        }

        if !positive(self.load.scale) {
            errors.push(ConfigError::new("load.scale", "must be > 0"));
        }

        if !(0.0..=100.0).contains(&self.design.renewable_target_pct) {
            errors.push(ConfigError::new(
                "design.renewable_target_pct",
                "must be in [0, 100]",
            ));
        }

        let c = &self.capex;
        for (field, v) in [
            ("capex.pv_per_kwp", c.pv_per_kwp),
            ("capex.battery_per_kwh", c.battery_per_kwh),
            ("capex.diesel_per_kw", c.diesel_per_kw),
            ("capex.bos_pct", c.bos_pct),
            ("capex.epc_pct", c.epc_pct),
            ("capex.land", c.land),
        ] {
            if !non_negative(v) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let o = &self.opex;
        if !non_negative(o.fuel_price_per_litre) {
            errors.push(ConfigError::new("opex.fuel_price_per_litre", "must be >= 0"));
        }
        if !non_negative(o.insurance_pct) {
            errors.push(ConfigError::new("opex.insurance_pct", "must be >= 0"));
        }

        let f = &self.finance;
        if f.project_life_years == 0 {
            errors.push(ConfigError::new("finance.project_life_years", "must be > 0"));
        }
        if !above_minus_100(f.discount_rate_pct) {
            errors.push(ConfigError::new("finance.discount_rate_pct", "must be > -100"));
        }
        if !above_minus_100(f.inflation_pct) {
            errors.push(ConfigError::new("finance.inflation_pct", "must be > -100"));
        }
        if !above_minus_100(f.fuel_escalation_pct) {
            errors.push(ConfigError::new("finance.fuel_escalation_pct", "must be > -100"));
        }

        let a = &self.advanced;
        if !(a.performance_ratio > 0.0 && a.performance_ratio <= 1.0) {
            errors.push(ConfigError::new("advanced.performance_ratio", "must be in (0, 1]"));
        }
        if !non_negative(a.storage_hours) {
            errors.push(ConfigError::new("advanced.storage_hours", "must be >= 0"));
        }
        if !positive(a.c_rate) {
            errors.push(ConfigError::new("advanced.c_rate", "must be > 0"));
        }
        if !positive(a.dc_ac_ratio) {
            errors.push(ConfigError::new("advanced.dc_ac_ratio", "must be > 0"));
        }
        if !(non_negative(a.min_pv_kwp) && a.min_pv_kwp <= a.max_pv_kwp) {
            errors.push(ConfigError::new(
                "advanced.min_pv_kwp",
                "must be >= 0 and <= advanced.max_pv_kwp",
            ));
        }
        if !(non_negative(a.min_battery_kwh) && a.min_battery_kwh <= a.max_battery_kwh) {
            errors.push(ConfigError::new(
                "advanced.min_battery_kwh",
                "must be >= 0 and <= advanced.max_battery_kwh",
            ));
        }
        if !non_negative(a.max_battery_kw) {
            errors.push(ConfigError::new("advanced.max_battery_kw", "must be >= 0"));
        }
        if a.autonomy_days > 0 {
            if a.autonomy_end_hour > 24 {
                errors.push(ConfigError::new("advanced.autonomy_end_hour", "must be <= 24"));
            }
            if a.autonomy_start_hour >= a.autonomy_end_hour {
                errors.push(ConfigError::new(
                    "advanced.autonomy_start_hour",
                    "must be < advanced.autonomy_end_hour",
                ));
            }
        }
        if !non_negative(a.spinning_reserve_pct) {
            errors.push(ConfigError::new("advanced.spinning_reserve_pct", "must be >= 0"));
        }
        if !(0.0..100.0).contains(&a.diesel_min_load_pct) {
            errors.push(ConfigError::new(
                "advanced.diesel_min_load_pct",
                "must be in [0, 100)",
            ));
        }
        if !a.diesel_auto_size && !positive(a.diesel_unit_kw) {
            errors.push(ConfigError::new(
                "advanced.diesel_unit_kw",
                "must be > 0 when advanced.diesel_auto_size is false",
            ));
        }

        errors
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

// Growth and discount rates, in percent.
fn above_minus_100(v: f64) -> bool {
    v.is_finite() && v > -100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
name = "Broome, WA"
latitude = -17.96
longitude = 122.24

[load]
hourly_kw = [100, 100, 100, 100, 100, 100, 200, 300, 300, 300, 300, 300,
             300, 300, 300, 300, 300, 250, 200, 150, 120, 100, 100, 100]
scale = 1.5

[design]
renewable_target_pct = 60
pv = "topcon"
tracking = "single_axis"
battery = "nmc"
diesel = "small"

[capex]
pv_per_kwp = 950.0

[opex]
fuel_price_per_litre = 2.2
diesel_om_auto = false
diesel_om_per_kw = 50.0

[finance]
project_life_years = 20

[advanced]
charge_source = "pv"
autonomy_days = 2
autonomy_start_hour = 9
autonomy_end_hour = 15
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.design.pv), Some(PvTechnology::Topcon));
        assert_eq!(
            cfg.as_ref().map(|c| c.advanced.charge_source),
            Some(ChargeSource::Pv)
        );
        assert_eq!(cfg.as_ref().map(|c| c.load_profile().at(7)), Some(450.0));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[design]
renewable_target_pct = 50
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_catalog_key_is_rejected() {
        let toml = r#"
[design]
battery = "sodium_ion"
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[design]
renewable_target_pct = 40
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.design.renewable_target_pct), Some(40.0));
        assert_eq!(cfg.as_ref().map(|c| c.finance.project_life_years), Some(25));
        assert_eq!(cfg.as_ref().map(|c| c.capex.pv_per_kwp), Some(1100.0));
    }

    #[test]
    fn validation_catches_target_out_of_range() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.design.renewable_target_pct = 120.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "design.renewable_target_pct"));
    }

    #[test]
    fn validation_catches_inverted_bounds() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.advanced.min_pv_kwp = 20_000.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "advanced.min_pv_kwp"));
    }

    #[test]
    fn validation_checks_autonomy_window_only_when_enabled() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.advanced.autonomy_start_hour = 16;
        cfg.advanced.autonomy_end_hour = 10;
        assert!(cfg.validate().is_empty());
        cfg.advanced.autonomy_days = 1;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "advanced.autonomy_start_hour"));
    }

    #[test]
    fn validation_requires_manual_diesel_size() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.advanced.diesel_auto_size = false;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "advanced.diesel_unit_kw"));
    }

    #[test]
    fn validation_rejects_nan_from_toml() {
        let toml = r#"
[advanced]
c_rate = nan
dc_ac_ratio = nan
storage_hours = nan
spinning_reserve_pct = nan
max_pv_kwp = nan
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("nan is valid TOML");
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        for field in [
            "advanced.c_rate",
            "advanced.dc_ac_ratio",
            "advanced.storage_hours",
            "advanced.spinning_reserve_pct",
            "advanced.min_pv_kwp",
        ] {
            assert!(fields.iter().any(|f| f == field), "{field} missing from {fields:?}");
        }
    }

    #[test]
    fn validation_rejects_non_finite_costs_and_rates() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.capex.pv_per_kwp = f64::NAN;
        cfg.opex.fuel_price_per_litre = f64::INFINITY;
        cfg.finance.discount_rate_pct = f64::NAN;
        cfg.advanced.diesel_auto_size = false;
        cfg.advanced.diesel_unit_kw = f64::NAN;
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        for field in [
            "capex.pv_per_kwp",
            "opex.fuel_price_per_litre",
            "finance.discount_rate_pct",
            "advanced.diesel_unit_kw",
        ] {
            assert!(fields.iter().any(|f| f == field), "{field} missing from {fields:?}");
        }
    }

    #[test]
    fn config_error_display_includes_field() {
        let e = ConfigError::new("load.scale", "must be > 0");
        assert_eq!(e.to_string(), "config error: load.scale: must be > 0");
    }

    #[test]
    fn serialized_config_parses_back() {
        let cfg = ScenarioConfig::mining_camp();
        let text = toml::to_string(&cfg).expect("config should serialize");
        let back = ScenarioConfig::from_toml_str(&text).expect("serialized config should parse");
        assert_eq!(back, cfg);
    }
}

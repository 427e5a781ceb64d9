//! Dispatch data types: seasons, charge policy, per-hour records and day totals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which sources may charge the battery.
///
/// Diesel-to-battery charging is not modelled, so `Diesel` only disables
/// charging from PV surplus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeSource {
    Pv,
    Diesel,
    #[default]
    Both,
}

impl ChargeSource {
    /// Whether PV surplus is allowed into the battery.
    pub fn charges_from_pv(self) -> bool {
        matches!(self, Self::Pv | Self::Both)
    }
}

/// Representative season, each simulated as one day of its first month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Self; 4] = [Self::Summer, Self::Autumn, Self::Winter, Self::Spring];

    /// Representative month index (0 = January).
    pub const fn month(self) -> usize {
        match self {
            Self::Summer => 0,
            Self::Autumn => 3,
            Self::Winter => 6,
            Self::Spring => 9,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown season \"{s}\", expected summer, autumn, winter or spring"))
    }
}

/// Complete record of one dispatched hour. Power values are kW over a
/// one-hour step, so they double as kWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchTimestep {
    pub hour: usize,
    pub load_kw: f64,
    /// Solar delivered after inverter clipping.
    pub solar_kw: f64,
    /// Battery charge, input side (before round-trip losses).
    pub charge_kw: f64,
    pub discharge_kw: f64,
    pub diesel_kw: f64,
    pub curtailed_kw: f64,
    /// Deficit at or below the diesel start tolerance, left unmet.
    pub unserved_kw: f64,
    /// Battery state of charge at the start of the hour (0–100 %).
    pub soc_pct: f64,
}

impl fmt::Display for DispatchTimestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} | load={:>8.1} kW  solar={:>8.1} kW | bat(+{:.1}/-{:.1}) \
             (SoC={:.1}%) | diesel={:.1}  curtailed={:.1}  unserved={:.2}",
            self.hour,
            self.load_kw,
            self.solar_kw,
            self.charge_kw,
            self.discharge_kw,
            self.soc_pct,
            self.diesel_kw,
            self.curtailed_kw,
            self.unserved_kw,
        )
    }
}

/// One simulated representative day with its aggregate totals (kWh).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalProfile {
    pub season: Season,
    pub month: usize,
    pub peak_sun_hours: f64,
    pub hours: Vec<DispatchTimestep>,
    pub total_solar_kwh: f64,
    pub total_diesel_kwh: f64,
    pub total_load_kwh: f64,
    pub total_curtailed_kwh: f64,
    pub total_discharge_kwh: f64,
    /// Solar delivered over load (0..1); zero for a zero-load day.
    pub renewable_fraction: f64,
}

impl SeasonalProfile {
    /// Builds the profile and its totals from a day of timesteps.
    pub fn from_hours(season: Season, peak_sun_hours: f64, hours: Vec<DispatchTimestep>) -> Self {
        let total_solar_kwh = hours.iter().map(|h| h.solar_kw).sum();
        let total_diesel_kwh = hours.iter().map(|h| h.diesel_kw).sum();
        let total_load_kwh: f64 = hours.iter().map(|h| h.load_kw).sum();
        let total_curtailed_kwh = hours.iter().map(|h| h.curtailed_kw).sum();
        let total_discharge_kwh = hours.iter().map(|h| h.discharge_kw).sum();
        let renewable_fraction = if total_load_kwh > 0.0 {
            total_solar_kwh / total_load_kwh
        } else {
            0.0
        };
        Self {
            season,
            month: season.month(),
            peak_sun_hours,
            hours,
            total_solar_kwh,
            total_diesel_kwh,
            total_load_kwh,
            total_curtailed_kwh,
            total_discharge_kwh,
            renewable_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(hour: usize, solar: f64, load: f64) -> DispatchTimestep {
        DispatchTimestep {
            hour,
            load_kw: load,
            solar_kw: solar,
            charge_kw: 0.0,
            discharge_kw: 0.0,
            diesel_kw: (load - solar).max(0.0),
            curtailed_kw: (solar - load).max(0.0),
            unserved_kw: 0.0,
            soc_pct: 0.0,
        }
    }

    #[test]
    fn season_months_and_parsing() {
        assert_eq!(Season::Winter.month(), 6);
        assert_eq!("spring".parse::<Season>(), Ok(Season::Spring));
        assert_eq!(" SUMMER ".parse::<Season>(), Ok(Season::Summer));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn charge_source_policy() {
        assert!(ChargeSource::Both.charges_from_pv());
        assert!(ChargeSource::Pv.charges_from_pv());
        assert!(!ChargeSource::Diesel.charges_from_pv());
    }

    #[test]
    fn profile_totals_sum_hours() {
        let hours = vec![step(0, 0.0, 100.0), step(12, 300.0, 100.0)];
        let p = SeasonalProfile::from_hours(Season::Autumn, 5.0, hours);
        assert_eq!(p.month, 3);
        assert_eq!(p.total_load_kwh, 200.0);
        assert_eq!(p.total_solar_kwh, 300.0);
        assert_eq!(p.total_diesel_kwh, 100.0);
        assert_eq!(p.total_curtailed_kwh, 200.0);
        assert_eq!(p.renewable_fraction, 1.5);
    }

    #[test]
    fn zero_load_day_has_zero_fraction() {
        let p = SeasonalProfile::from_hours(Season::Summer, 7.0, vec![step(0, 0.0, 0.0)]);
        assert_eq!(p.renewable_fraction, 0.0);
    }

    #[test]
    fn timestep_display_does_not_panic() {
        let s = format!("{}", step(7, 120.0, 80.0));
        assert!(s.contains("h= 7"));
    }
}

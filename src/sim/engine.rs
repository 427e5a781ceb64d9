//! Rule-based hourly dispatch over representative seasonal days.

use tracing::{debug, trace};

use crate::load::{HOURS_PER_DAY, LoadProfile};
use crate::solar::{hourly_solar_fraction, peak_sun_hours};

use super::battery::Battery;
use super::power_balance::balance_residual_kw;
use super::types::{ChargeSource, DispatchTimestep, Season, SeasonalProfile};

/// Deficit at or below this (kW) is left unserved rather than starting diesel.
pub const DIESEL_START_TOLERANCE_KW: f64 = 0.1;

/// Days simulated per season so the battery settles; only the last is kept.
pub const WARMUP_CYCLES: usize = 3;

/// Sized plant and policy that dispatch runs against.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlant {
    pub pv_kwp: f64,
    pub inverter_kw: f64,
    /// PR × tracking gain.
    pub effective_pr: f64,
    pub battery_kwh: f64,
    pub battery_kw: f64,
    pub depth_of_discharge: f64,
    pub round_trip_efficiency: f64,
    pub charge_source: ChargeSource,
}

/// Dispatch engine owning the battery state for one representative day.
///
/// Surplus solar charges the battery (when the policy allows) and the rest
/// is curtailed. Deficits draw on the battery first and diesel covers what
/// remains.
pub struct DispatchEngine<'a> {
    load: &'a LoadProfile,
    plant: &'a DispatchPlant,
    battery: Battery,
}

impl<'a> DispatchEngine<'a> {
    /// Creates an engine with the battery at minimum state of charge.
    pub fn new(load: &'a LoadProfile, plant: &'a DispatchPlant) -> Self {
        let battery = Battery::new(
            plant.battery_kwh,
            plant.depth_of_discharge,
            plant.battery_kw,
            plant.round_trip_efficiency,
        );
        Self {
            load,
            plant,
            battery,
        }
    }

    /// Solar delivered at `hour` for a day with `psh` peak-sun-hours,
    /// clipped to the inverter rating.
    pub fn solar_kw(&self, hour: usize, psh: f64) -> f64 {
        let dc = self.plant.pv_kwp * hourly_solar_fraction(hour, psh) * self.plant.effective_pr;
        dc.min(self.plant.inverter_kw).max(0.0)
    }

    /// Dispatches one hour and returns its record.
    ///
    /// # Arguments
    ///
    /// * `hour` - Hour of day (0..24)
    /// * `psh` - Peak-sun-hours of the simulated day
    pub fn step(&mut self, hour: usize, psh: f64) -> DispatchTimestep {
        let soc_pct = self.battery.soc_pct();
        let load_kw = self.load.at(hour);
        let solar_kw = self.solar_kw(hour, psh);
        let net = solar_kw - load_kw;

        let mut charge_kw = 0.0;
        let mut discharge_kw = 0.0;
        let mut diesel_kw = 0.0;
        let mut curtailed_kw = 0.0;
        let mut unserved_kw = 0.0;

        if net > 0.0 {
            if self.plant.charge_source.charges_from_pv() {
                charge_kw = self.battery.charge(net);
            }
            curtailed_kw = (net - charge_kw).max(0.0);
        } else if net < 0.0 {
            let deficit = -net;
            discharge_kw = self.battery.discharge(deficit);
            let residual = (deficit - discharge_kw).max(0.0);
            if residual > DIESEL_START_TOLERANCE_KW {
                diesel_kw = residual;
            } else {
                unserved_kw = residual;
            }
        }

        let step = DispatchTimestep {
            hour,
            load_kw,
            solar_kw,
            charge_kw,
            discharge_kw,
            diesel_kw,
            curtailed_kw,
            unserved_kw,
            soc_pct,
        };
        debug_assert!(balance_residual_kw(&step).abs() < 1e-6);
        trace!(%step, "dispatch step");
        step
    }

    /// Dispatches a full day, carrying battery state in from the previous day.
    pub fn run_day(&mut self, psh: f64) -> Vec<DispatchTimestep> {
        (0..HOURS_PER_DAY).map(|h| self.step(h, psh)).collect()
    }

    /// Read-only view of the battery.
    pub fn battery(&self) -> &Battery {
        &self.battery
    }
}

/// Simulates one season: [`WARMUP_CYCLES`] days from minimum SOC, keeping the last.
pub fn simulate_season(
    season: Season,
    latitude: f64,
    load: &LoadProfile,
    plant: &DispatchPlant,
) -> SeasonalProfile {
    let psh = peak_sun_hours(season.month(), latitude);
    let mut engine = DispatchEngine::new(load, plant);
    let mut day = Vec::new();
    for _ in 0..WARMUP_CYCLES {
        day = engine.run_day(psh);
    }
    let profile = SeasonalProfile::from_hours(season, psh, day);
    debug!(
        season = %season,
        solar_kwh = profile.total_solar_kwh,
        diesel_kwh = profile.total_diesel_kwh,
        curtailed_kwh = profile.total_curtailed_kwh,
        "season dispatched"
    );
    profile
}

/// Simulates all four seasons in calendar order of their representative months.
pub fn simulate_seasons(
    latitude: f64,
    load: &LoadProfile,
    plant: &DispatchPlant,
) -> Vec<SeasonalProfile> {
    Season::ALL
        .into_iter()
        .map(|season| simulate_season(season, latitude, load, plant))
        .collect()
}

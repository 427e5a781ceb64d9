/// Battery energy store for hourly dispatch.
///
/// State of charge is tracked in kWh and held within
/// `[capacity × (1 − DoD), capacity]`. Round-trip losses are booked on the
/// charge side; discharge is lossless. Each call covers a one-hour step, so
/// kW and kWh are interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct Battery {
    capacity_kwh: f64,
    min_soc_kwh: f64,
    soc_kwh: f64,
    max_power_kw: f64,
    round_trip_efficiency: f64,
}

impl Battery {
    /// Creates a battery sitting at its minimum state of charge.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Usable nameplate energy (kWh); negatives are treated as zero
    /// * `depth_of_discharge` - Fraction of capacity that may be cycled (0..1)
    /// * `max_power_kw` - Charge and discharge power limit (kW)
    /// * `round_trip_efficiency` - Fraction of charged energy that is stored (0..1)
    pub fn new(
        capacity_kwh: f64,
        depth_of_discharge: f64,
        max_power_kw: f64,
        round_trip_efficiency: f64,
    ) -> Self {
        let capacity_kwh = capacity_kwh.max(0.0);
        let min_soc_kwh = capacity_kwh * (1.0 - depth_of_discharge.clamp(0.0, 1.0));
        Self {
            capacity_kwh,
            min_soc_kwh,
            soc_kwh: min_soc_kwh,
            max_power_kw: max_power_kw.max(0.0),
            round_trip_efficiency: round_trip_efficiency.clamp(0.0, 1.0),
        }
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    pub fn min_soc_kwh(&self) -> f64 {
        self.min_soc_kwh
    }

    pub fn soc_kwh(&self) -> f64 {
        self.soc_kwh
    }

    /// State of charge as a percentage of capacity; zero for an empty battery.
    pub fn soc_pct(&self) -> f64 {
        if self.capacity_kwh > 0.0 {
            self.soc_kwh / self.capacity_kwh * 100.0
        } else {
            0.0
        }
    }

    /// Energy that can still be discharged before hitting minimum SOC.
    pub fn available_kwh(&self) -> f64 {
        (self.soc_kwh - self.min_soc_kwh).max(0.0)
    }

    /// Room left before the battery is full.
    pub fn headroom_kwh(&self) -> f64 {
        (self.capacity_kwh - self.soc_kwh).max(0.0)
    }

    /// Absorbs up to `surplus_kw` and returns the accepted input power.
    ///
    /// Acceptance is limited by the power rating and by headroom grossed up
    /// for round-trip losses.
    pub fn charge(&mut self, surplus_kw: f64) -> f64 {
        if surplus_kw <= 0.0 || self.round_trip_efficiency <= 0.0 {
            return 0.0;
        }
        let accepted = surplus_kw
            .min(self.max_power_kw)
            .min(self.headroom_kwh() / self.round_trip_efficiency);
        self.soc_kwh += accepted * self.round_trip_efficiency;
        self.clamp_soc();
        accepted
    }

    /// Supplies up to `deficit_kw` and returns the delivered power.
    pub fn discharge(&mut self, deficit_kw: f64) -> f64 {
        if deficit_kw <= 0.0 {
            return 0.0;
        }
        let delivered = deficit_kw.min(self.max_power_kw).min(self.available_kwh());
        self.soc_kwh -= delivered;
        self.clamp_soc();
        delivered
    }

    fn clamp_soc(&mut self) {
        self.soc_kwh = self.soc_kwh.max(self.min_soc_kwh).min(self.capacity_kwh);
    }
}

//! Site demand profile.

use serde::Serialize;

/// Number of hourly entries in a daily load profile.
pub const HOURS_PER_DAY: usize = 24;

/// Hours in a non-leap year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Value substituted for a missing or unparseable hourly entry (kW).
pub const DEFAULT_HOURLY_KW: f64 = 500.0;

/// A representative 24-hour demand profile, already multiplied by its scale factor.
///
/// # Examples
///
/// ```
/// use microgrid_sizer::load::LoadProfile;
///
/// let profile = LoadProfile::new([500.0; 24], 2.0);
/// assert_eq!(profile.average_kw(), 1000.0);
/// assert_eq!(profile.load_factor(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadProfile {
    /// Unscaled hourly demand (kW).
    raw_kw: [f64; HOURS_PER_DAY],
    /// Multiplier applied to every hour.
    scale: f64,
    /// Scaled hourly demand (kW).
    hourly_kw: [f64; HOURS_PER_DAY],
}

impl LoadProfile {
    /// Creates a profile from raw hourly values and a scale factor.
    ///
    /// Negative or non-finite entries are replaced: non-finite with
    /// [`DEFAULT_HOURLY_KW`], negatives with zero.
    pub fn new(raw_kw: [f64; HOURS_PER_DAY], scale: f64) -> Self {
        let raw_kw = raw_kw.map(sanitize_kw);
        let hourly_kw = raw_kw.map(|v| v * scale);
        Self {
            raw_kw,
            scale,
            hourly_kw,
        }
    }

    /// Builds a profile from an arbitrary-length slice, padding with
    /// [`DEFAULT_HOURLY_KW`] and truncating beyond 24 entries.
    pub fn from_slice(values: &[f64], scale: f64) -> Self {
        let mut raw = [DEFAULT_HOURLY_KW; HOURS_PER_DAY];
        for (slot, v) in raw.iter_mut().zip(values) {
            *slot = *v;
        }
        Self::new(raw, scale)
    }

    pub fn raw_kw(&self) -> &[f64; HOURS_PER_DAY] {
        &self.raw_kw
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scaled demand at `hour` (wraps modulo 24).
    pub fn at(&self, hour: usize) -> f64 {
        self.hourly_kw[hour % HOURS_PER_DAY]
    }

    pub fn hourly_kw(&self) -> &[f64; HOURS_PER_DAY] {
        &self.hourly_kw
    }

    pub fn average_kw(&self) -> f64 {
        self.hourly_kw.iter().sum::<f64>() / HOURS_PER_DAY as f64
    }

    pub fn peak_kw(&self) -> f64 {
        self.hourly_kw.iter().copied().fold(0.0, f64::max)
    }

    pub fn min_kw(&self) -> f64 {
        self.hourly_kw.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Average over peak; zero for an all-zero profile.
    pub fn load_factor(&self) -> f64 {
        let peak = self.peak_kw();
        if peak > 0.0 { self.average_kw() / peak } else { 0.0 }
    }

    /// Daily energy (kWh).
    pub fn daily_kwh(&self) -> f64 {
        self.hourly_kw.iter().sum()
    }

    /// Annual energy assuming every day follows this profile (kWh).
    pub fn annual_kwh(&self) -> f64 {
        self.average_kw() * HOURS_PER_YEAR
    }

    /// Energy drawn over the hour window `[start, end)`, wrapping past midnight.
    pub fn window_kwh(&self, start: usize, end: usize) -> f64 {
        (start..end).map(|h| self.at(h)).sum()
    }
}

fn sanitize_kw(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { DEFAULT_HOURLY_KW }
}

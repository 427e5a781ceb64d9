//! Parametric solar resource model.
//!
//! Monthly peak-sun-hours come from a handful of reference curves matched by
//! latitude, with a generic latitude-attenuated curve everywhere else. The
//! hourly shape is a half-sine between sunrise and sunset.

use std::f64::consts::PI;

const PERTH_PSH: [f64; 12] = [7.4, 6.6, 5.9, 4.8, 3.9, 3.6, 3.8, 4.6, 5.7, 6.8, 7.5, 7.7];
const DARWIN_PSH: [f64; 12] = [5.8, 5.5, 5.9, 6.3, 6.0, 5.8, 6.2, 6.8, 7.2, 7.2, 6.8, 6.1];
const ALICE_SPRINGS_PSH: [f64; 12] = [7.2, 6.8, 6.5, 5.8, 5.0, 4.5, 5.0, 5.8, 6.8, 7.5, 7.6, 7.5];
/// Southern-hemisphere generic curve, January first.
const GENERIC_PSH: [f64; 12] = [5.5, 6.0, 5.5, 4.5, 3.5, 3.0, 3.2, 4.0, 5.0, 6.0, 6.5, 6.0];

/// Reference curves as `(latitude, tolerance, curve)`, checked in order.
const REFERENCE_CURVES: [(f64, f64, &[f64; 12]); 3] = [
    (-31.95, 1.0, &PERTH_PSH),
    (-12.46, 2.0, &DARWIN_PSH),
    (-23.70, 2.0, &ALICE_SPRINGS_PSH),
];

/// Fraction of the generic curve lost at the poles.
const POLAR_ATTENUATION: f64 = 0.4;

/// First hour with solar output.
pub const SUNRISE_HOUR: usize = 6;
/// Last hour with solar output (inclusive).
pub const SUNSET_HOUR: usize = 18;

/// Average daily peak-sun-hours for `month` (0 = January, wraps mod 12) at `latitude`.
///
/// Northern latitudes read the generic curve six months out of phase.
///
/// # Examples
///
/// ```
/// use microgrid_sizer::solar::peak_sun_hours;
///
/// assert_eq!(peak_sun_hours(0, -31.95), 7.4);
/// assert!(peak_sun_hours(6, 45.0) > peak_sun_hours(0, 45.0));
/// ```
pub fn peak_sun_hours(month: usize, latitude: f64) -> f64 {
    let m = month % 12;
    if let Some((_, _, curve)) = REFERENCE_CURVES
        .iter()
        .find(|(lat, tol, _)| (latitude - lat).abs() < *tol)
    {
        return curve[m];
    }
    let idx = if latitude < 0.0 { m } else { (m + 6) % 12 };
    let attenuation = 1.0 - latitude.abs().min(90.0) / 90.0 * POLAR_ATTENUATION;
    GENERIC_PSH[idx] * attenuation
}

/// Mean of the twelve monthly peak-sun-hour values.
pub fn annual_mean_peak_sun_hours(latitude: f64) -> f64 {
    (0..12).map(|m| peak_sun_hours(m, latitude)).sum::<f64>() / 12.0
}

/// Per-kWp output at `hour` for a day with `psh` peak-sun-hours, before
/// performance-ratio derating.
///
/// Half-sine between [`SUNRISE_HOUR`] and [`SUNSET_HOUR`] with amplitude
/// `psh × π / 24`; zero outside that window.
pub fn hourly_solar_fraction(hour: usize, psh: f64) -> f64 {
    let h = hour % 24;
    if !(SUNRISE_HOUR..=SUNSET_HOUR).contains(&h) {
        return 0.0;
    }
    let span = (SUNSET_HOUR - SUNRISE_HOUR) as f64;
    let phase = (h - SUNRISE_HOUR) as f64 / span * PI;
    (psh * PI / 24.0 * phase.sin()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_and_positive_for_every_latitude_and_month() {
        for lat_tenths in -900..=900 {
            let lat = f64::from(lat_tenths) / 10.0;
            for m in 0..12 {
                let psh = peak_sun_hours(m, lat);
                assert!(psh.is_finite() && psh > 0.0, "lat={lat} m={m} psh={psh}");
            }
        }
    }

    #[test]
    fn reference_sites_use_their_curves() {
        assert_eq!(peak_sun_hours(11, -31.5), 7.7);
        assert_eq!(peak_sun_hours(8, -12.0), 7.2);
        assert_eq!(peak_sun_hours(5, -23.0), 4.5);
    }

    #[test]
    fn perth_takes_priority_within_its_band() {
        // -30.96 is inside Perth's 1° band; Alice Springs' band ends at -25.7.
        assert_eq!(peak_sun_hours(0, -30.96), PERTH_PSH[0]);
    }

    #[test]
    fn generic_curve_is_attenuated_by_latitude() {
        let near_equator = peak_sun_hours(0, -5.0);
        let far_south = peak_sun_hours(0, -60.0);
        assert!(near_equator > far_south);
        let expected = GENERIC_PSH[0] * (1.0 - 60.0 / 90.0 * 0.4);
        assert!((far_south - expected).abs() < 1e-12);
    }

    #[test]
    fn northern_hemisphere_is_shifted_six_months() {
        let south_jan = GENERIC_PSH[0] * (1.0 - 40.0 / 90.0 * 0.4);
        assert!((peak_sun_hours(6, 40.0) - south_jan).abs() < 1e-12);
    }

    #[test]
    fn month_index_wraps() {
        assert_eq!(peak_sun_hours(12, -31.95), peak_sun_hours(0, -31.95));
    }

    #[test]
    fn hourly_fraction_is_zero_at_night() {
        for h in (0..SUNRISE_HOUR).chain(SUNSET_HOUR + 1..24) {
            assert_eq!(hourly_solar_fraction(h, 6.0), 0.0, "h={h}");
        }
    }

    #[test]
    fn hourly_fraction_peaks_at_noon_and_is_symmetric() {
        let noon = hourly_solar_fraction(12, 6.0);
        assert!((noon - 6.0 * PI / 24.0).abs() < 1e-12);
        assert!((hourly_solar_fraction(9, 6.0) - hourly_solar_fraction(15, 6.0)).abs() < 1e-12);
        assert!(hourly_solar_fraction(6, 6.0).abs() < 1e-12);
    }

    #[test]
    fn daily_integral_is_close_to_peak_sun_hours() {
        let total: f64 = (0..24).map(|h| hourly_solar_fraction(h, 5.0)).sum();
        // Hourly sampling of the half-sine undershoots the continuous integral slightly.
        assert!(total > 4.5 && total < 5.5, "total={total}");
    }
}

//! Calendar-life capacity fade model.
//!
//! Fleet vehicles cycle deep bands daily, so capacity is assumed to fade by a
//! fixed fraction per year. Temperature and depth-of-discharge effects are
//! out of scope.

use crate::battery::types::BatteryCapacityAtTime;
use crate::util::linspace;

/// Remaining capacity after `years` of service.
///
/// `remaining = initial * (1 - annual_degradation)^years`. Returns the
/// initial capacity unchanged at `years = 0`.
pub fn remaining_capacity(initial_capacity_kwh: f32, years: f32, annual_degradation: f32) -> f32 {
    initial_capacity_kwh * (1.0 - annual_degradation).powf(years)
}

/// Samples the degradation curve at `num_points` evenly spaced years over
/// `[0, horizon_years]`.
pub fn degradation_curve(
    initial_capacity_kwh: f32,
    horizon_years: f32,
    num_points: usize,
    annual_degradation: f32,
) -> Vec<BatteryCapacityAtTime> {
    linspace(0.0, horizon_years, num_points)
        .into_iter()
        .map(|year| BatteryCapacityAtTime {
            time_yr: year,
            capacity_kwh: remaining_capacity(initial_capacity_kwh, year, annual_degradation),
        })
        .collect()
}

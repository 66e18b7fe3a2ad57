//! Tariff cost model: rate sweeps and the flat vs. off-peak daily split.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::util::linspace;

/// Days per year used for annual cycle counts, leap years included.
const DAYS_PER_YEAR: f32 = 365.25;

/// Electricity tariff configuration.
///
/// The off-peak rate is derived from the flat rate rather than configured
/// directly; suppliers quote overnight tariffs as a discount.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tariff {
    /// Flat daytime rate (currency per kWh).
    pub flat_rate: f32,
    /// Off-peak rate as a fraction of the flat rate.
    pub off_peak_ratio: f32,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            flat_rate: 0.245,
            off_peak_ratio: 0.5,
        }
    }
}

impl Tariff {
    /// Overnight rate derived from the flat rate.
    pub fn off_peak_rate(&self) -> f32 {
        self.flat_rate * self.off_peak_ratio
    }
}

/// Charging cost at one sampled tariff rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeCostAtRate {
    /// Tariff rate (currency per kWh).
    pub rate: f32,
    /// Cost of the energy draw at this rate.
    pub cost: f32,
}

/// Cost of charging `energy_kwh` at `rate`. No rounding.
pub fn charge_cost(energy_kwh: f32, rate: f32) -> f32 {
    rate * energy_kwh
}

/// Samples the charging cost at `num_points` evenly spaced rates over the
/// closed interval `[min_rate, max_rate]`.
///
/// With `num_points <= 1` the sweep collapses to a single sample at
/// `min_rate`.
pub fn charge_cost_across_rates(
    energy_kwh: f32,
    min_rate: f32,
    max_rate: f32,
    num_points: usize,
) -> Vec<ChargeCostAtRate> {
    linspace(min_rate, max_rate, num_points)
        .into_iter()
        .map(|rate| ChargeCostAtRate {
            rate,
            cost: charge_cost(energy_kwh, rate),
        })
        .collect()
}

/// Number of full passes through the usable capacity band per day.
///
/// # Errors
///
/// Returns `NumericDegeneracy` when the usable capacity is zero (a DOD band
/// collapsed to a point).
pub fn discharge_cycles_per_day(
    daily_energy_kwh: f32,
    usable_capacity_kwh: f32,
) -> Result<f32, EngineError> {
    if usable_capacity_kwh <= 0.0 {
        return Err(EngineError::degenerate(
            "usable capacity is zero, the DOD band is collapsed",
        ));
    }
    Ok(daily_energy_kwh / usable_capacity_kwh)
}

/// Number of full passes through the usable capacity band per year.
pub fn discharge_cycles_per_year(
    daily_energy_kwh: f32,
    usable_capacity_kwh: f32,
) -> Result<f32, EngineError> {
    Ok(discharge_cycles_per_day(daily_energy_kwh, usable_capacity_kwh)? * DAYS_PER_YEAR)
}

/// Daily charging cost when one overnight off-peak charge is used before
/// falling back to flat-rate top-ups.
///
/// If the day's consumption fits in one pass through the usable band, the
/// whole draw is billed at the off-peak rate. Otherwise one full band is
/// billed off-peak and the remainder at the flat daytime rate.
///
/// # Errors
///
/// Returns `NumericDegeneracy` when the usable capacity is zero.
pub fn reduced_daily_cost(
    daily_energy_kwh: f32,
    usable_capacity_kwh: f32,
    tariff: &Tariff,
) -> Result<f32, EngineError> {
    let cycles_per_day = discharge_cycles_per_day(daily_energy_kwh, usable_capacity_kwh)?;
    if cycles_per_day < 1.0 {
        Ok(charge_cost(daily_energy_kwh, tariff.off_peak_rate()))
    } else {
        Ok(charge_cost(usable_capacity_kwh, tariff.off_peak_rate())
            + charge_cost(daily_energy_kwh - usable_capacity_kwh, tariff.flat_rate))
    }
}

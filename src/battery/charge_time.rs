//! Two-phase CC/CV charge-duration model.

use crate::error::EngineError;

/// SOC boundary between the constant-current and constant-voltage phases.
pub(crate) const CV_THRESHOLD: f32 = 0.8;

/// Computes the time in hours to charge a battery from `soc_start` to
/// `soc_end`.
///
/// Charging is split at the 80% SOC boundary:
/// 1. Constant-current phase (below 80%): capacity rises linearly with the
///    effective charge power.
/// 2. Constant-voltage phase (above 80%): exponential approach to 100%, with
///    the time constant tied to the constant-current duration so that
///    charging from 80% to 90% takes as long as charging from 0% to 80%.
///
/// # Errors
///
/// Returns `InvalidInput` for non-positive power/capacity, an efficiency
/// outside `(0, 1]`, or a reversed/out-of-range SOC pair, and
/// `NumericDegeneracy` when `soc_end >= 1.0` (the constant-voltage curve
/// never reaches 100%, so the duration diverges).
pub fn charge_time(
    soc_start: f32,
    soc_end: f32,
    capacity_kwh: f32,
    charge_power_kw: f32,
    charge_efficiency: f32,
) -> Result<f32, EngineError> {
    if charge_power_kw <= 0.0 {
        return Err(EngineError::invalid(
            "charge_power_kw",
            "must be > 0 to compute a charge time",
        ));
    }
    if capacity_kwh <= 0.0 {
        return Err(EngineError::invalid("battery_capacity_kwh", "must be > 0"));
    }
    if charge_efficiency <= 0.0 || charge_efficiency > 1.0 {
        return Err(EngineError::invalid(
            "charge_efficiency",
            "must be in (0.0, 1.0]",
        ));
    }
    if !(0.0..=1.0).contains(&soc_start) {
        return Err(EngineError::invalid("soc_start", "must be in [0.0, 1.0]"));
    }
    if soc_end < soc_start {
        return Err(EngineError::invalid("soc_end", "must be >= soc_start"));
    }
    if soc_end >= 1.0 {
        return Err(EngineError::degenerate(
            "charging to 100% SOC never completes under the constant-voltage model",
        ));
    }

    let mut time_hr = 0.0;

    // Constant-current phase: soc_start up to min(soc_end, 0.8).
    let cc_end = soc_end.min(CV_THRESHOLD);
    if soc_start < cc_end {
        time_hr += (cc_end - soc_start) * capacity_kwh / (charge_efficiency * charge_power_kw);
    }

    // Constant-voltage phase: max(soc_start, 0.8) up to soc_end.
    if soc_end > CV_THRESHOLD {
        let cv_start = soc_start.max(CV_THRESHOLD);
        let tau = cv_time_constant(capacity_kwh, charge_power_kw, charge_efficiency);
        time_hr += tau * ((1.0 - cv_start) / (1.0 - soc_end)).ln();
    }

    Ok(time_hr)
}

/// Time constant of the constant-voltage phase.
///
/// Derived from the full phase-1 duration: `tau = t_p1 / ln 2`, which makes
/// the 80% to 90% leg take as long as the 0% to 80% leg.
pub(crate) fn cv_time_constant(
    capacity_kwh: f32,
    charge_power_kw: f32,
    charge_efficiency: f32,
) -> f32 {
    let t_p1 = CV_THRESHOLD * capacity_kwh / (charge_efficiency * charge_power_kw);
    t_p1 / std::f32::consts::LN_2
}

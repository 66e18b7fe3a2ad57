//! Hour-stepped daily charge-profile simulation.

use crate::battery::charge_time::{CV_THRESHOLD, cv_time_constant};
use crate::battery::types::ChargeProfilePoint;
use crate::config::ChargingConfig;
use crate::error::EngineError;
use crate::report::FleetInput;

/// Default cruise speed while driving (mph).
pub const DEFAULT_SPEED_MPH: f32 = 40.0;
/// Default minimum allowable SOC.
pub const DEFAULT_SOC_MIN: f32 = 0.0;
/// Default maximum allowable SOC.
pub const DEFAULT_SOC_MAX: f32 = 0.99;
/// Default charging efficiency.
pub const DEFAULT_CHARGE_EFFICIENCY: f32 = 0.9;

/// Parameters for one daily charge-profile simulation.
///
/// `new` fills the operational defaults; the public fields allow callers to
/// override them before running [`simulate`].
#[derive(Debug, Clone)]
pub struct ProfileParams {
    /// Battery capacity (kWh).
    pub battery_capacity_kwh: f32,
    /// Charger power rating (kW).
    pub charge_power_kw: f32,
    /// Daily mileage target (mi).
    pub daily_mileage_mi: f32,
    /// Vehicle efficiency (mi/kWh).
    pub efficiency_mi_per_kwh: f32,
    /// First hour of the working day.
    pub start_hour: f32,
    /// Last hour of the working day (exclusive bound on simulated time).
    pub end_hour: f32,
    /// Average driving speed (mph).
    pub speed_mph: f32,
    /// Minimum allowable SOC (capacity floor as a fraction).
    pub soc_min: f32,
    /// Maximum allowable SOC; charging stops here.
    pub soc_max: f32,
    /// Charging efficiency (0..1.0).
    pub charge_efficiency: f32,
    /// Site-side cap on charge power (kW); 0 means uncapped.
    pub max_charge_power_kw: f32,
}

impl ProfileParams {
    /// Creates simulation parameters with default speed, SOC band,
    /// and charging efficiency.
    pub fn new(
        battery_capacity_kwh: f32,
        charge_power_kw: f32,
        daily_mileage_mi: f32,
        efficiency_mi_per_kwh: f32,
        start_hour: f32,
        end_hour: f32,
    ) -> Self {
        Self {
            battery_capacity_kwh,
            charge_power_kw,
            daily_mileage_mi,
            efficiency_mi_per_kwh,
            start_hour,
            end_hour,
            speed_mph: DEFAULT_SPEED_MPH,
            soc_min: DEFAULT_SOC_MIN,
            soc_max: DEFAULT_SOC_MAX,
            charge_efficiency: DEFAULT_CHARGE_EFFICIENCY,
            max_charge_power_kw: 0.0,
        }
    }

    /// Builds simulation parameters for one representative vehicle of a
    /// fleet, taking the operational knobs from the charging config.
    pub fn from_fleet(input: &FleetInput, charging: &ChargingConfig) -> Self {
        Self {
            battery_capacity_kwh: input.battery_capacity_kwh,
            charge_power_kw: input.charge_power_kw,
            daily_mileage_mi: input.daily_mileage_mi,
            efficiency_mi_per_kwh: input.efficiency_mi_per_kwh,
            start_hour: input.working_hours[0],
            end_hour: input.working_hours[1],
            speed_mph: charging.speed_mph,
            soc_min: charging.soc_min,
            soc_max: charging.soc_max,
            charge_efficiency: charging.charge_efficiency,
            max_charge_power_kw: charging.max_charge_power_kw,
        }
    }

    /// Validates everything [`simulate`] relies on for bounded, finite
    /// arithmetic. Zero charge power is allowed; the simulation loop is
    /// bounded by the working-hours window, not by SOC convergence.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.battery_capacity_kwh <= 0.0 {
            return Err(EngineError::invalid("battery_capacity_kwh", "must be > 0"));
        }
        if self.charge_power_kw < 0.0 {
            return Err(EngineError::invalid("charge_power_kw", "must be >= 0"));
        }
        if self.max_charge_power_kw < 0.0 {
            return Err(EngineError::invalid("max_charge_power_kw", "must be >= 0"));
        }
        if self.daily_mileage_mi < 0.0 {
            return Err(EngineError::invalid("daily_mileage_mi", "must be >= 0"));
        }
        if self.efficiency_mi_per_kwh <= 0.0 {
            return Err(EngineError::invalid("efficiency_mi_per_kwh", "must be > 0"));
        }
        if self.speed_mph <= 0.0 {
            return Err(EngineError::invalid("speed_mph", "must be > 0"));
        }
        if self.charge_efficiency <= 0.0 || self.charge_efficiency > 1.0 {
            return Err(EngineError::invalid(
                "charge_efficiency",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(0.0..=24.0).contains(&self.start_hour) || !(0.0..=24.0).contains(&self.end_hour) {
            return Err(EngineError::invalid(
                "working_hours",
                "hours must be in [0.0, 24.0]",
            ));
        }
        if self.start_hour >= self.end_hour {
            return Err(EngineError::invalid(
                "working_hours",
                "start hour must be < end hour",
            ));
        }
        if !(0.0..=1.0).contains(&self.soc_min) || self.soc_max > 1.0 {
            return Err(EngineError::invalid(
                "soc_min/soc_max",
                "SOC bounds must be in [0.0, 1.0]",
            ));
        }
        if self.soc_min >= self.soc_max {
            return Err(EngineError::invalid("soc_min", "must be < soc_max"));
        }
        Ok(())
    }

    /// Charge power after applying the optional site-side cap.
    fn effective_charge_power_kw(&self) -> f32 {
        if self.max_charge_power_kw != 0.0 {
            self.charge_power_kw.min(self.max_charge_power_kw)
        } else {
            self.charge_power_kw
        }
    }
}

/// Simulates one working day of driving and charging, one hour per step.
///
/// The vehicle starts at `soc_max` and alternates between two phases:
///
/// - **Driving**: each hour consumes `speed / efficiency` kWh and `speed`
///   miles, as long as the battery stays at or above the `soc_min` floor.
/// - **Charging**: entered when the next driving hour would under-run the
///   floor. Below 80% SOC capacity rises linearly by `efficiency * power`
///   per hour; above it the SOC follows `1 - 0.2 * exp(-hour / tau)`,
///   evaluated at the absolute simulated hour of day. The charting layer
///   was built against this absolute-hour curve, so it is kept as-is
///   rather than rebased to time-in-phase.
///
/// The run ends when the daily mileage is covered or the working window
/// closes, whichever comes first. Every iteration of the inner charging loop
/// re-checks the hour bound, so the run stays finite even with zero charge
/// power.
///
/// # Errors
///
/// Returns `InvalidInput` if the parameters fail [`ProfileParams::validate`].
pub fn simulate(params: &ProfileParams) -> Result<Vec<ChargeProfilePoint>, EngineError> {
    params.validate()?;

    let capacity_full = params.battery_capacity_kwh;
    let charge_power_kw = params.effective_charge_power_kw();
    let floor_kwh = capacity_full * params.soc_min;
    let tau = cv_time_constant(capacity_full, charge_power_kw, params.charge_efficiency);

    let mut capacity_kwh = capacity_full * params.soc_max;
    let mut mileage_mi = params.daily_mileage_mi;
    let mut hour = params.start_hour;
    let mut profile = Vec::new();

    while mileage_mi > 0.0 && hour < params.end_hour {
        let energy_next_hour_kwh = params.speed_mph / params.efficiency_mi_per_kwh;

        if capacity_kwh - energy_next_hour_kwh >= floor_kwh {
            // Driving phase.
            capacity_kwh = (capacity_kwh - energy_next_hour_kwh).max(floor_kwh);
            mileage_mi = (mileage_mi - params.speed_mph).max(0.0);
        } else {
            // Charging phase: hold until soc_max or the end of the window.
            let mut soc = capacity_kwh / capacity_full;
            while soc < params.soc_max && hour < params.end_hour {
                if soc < CV_THRESHOLD {
                    capacity_kwh = (capacity_kwh + params.charge_efficiency * charge_power_kw)
                        .min(capacity_full);
                } else {
                    let cv_soc = 1.0 - (1.0 - CV_THRESHOLD) * (-hour / tau).exp();
                    capacity_kwh = (cv_soc * capacity_full).min(capacity_full);
                }
                soc = capacity_kwh / capacity_full;

                profile.push(ChargeProfilePoint {
                    time_hr: hour,
                    capacity_kwh,
                    soc,
                    mileage_mi,
                });
                hour += 1.0;
            }
        }

        profile.push(ChargeProfilePoint {
            time_hr: hour,
            capacity_kwh,
            soc: capacity_kwh / capacity_full,
            mileage_mi,
        });
        hour += 1.0;
    }

    Ok(profile)
}

//! Battery model output types.

use serde::Serialize;

/// One sampled point of a simulated daily charge profile.
///
/// Points are emitted in non-decreasing `time_hr` order; one simulation run
/// produces one finite sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeProfilePoint {
    /// Hour of day.
    pub time_hr: f32,
    /// Remaining battery capacity (kWh).
    pub capacity_kwh: f32,
    /// State of charge as a fraction (0.0 to 1.0).
    pub soc: f32,
    /// Remaining daily mileage (mi).
    pub mileage_mi: f32,
}

/// Remaining battery capacity at a point in calendar time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryCapacityAtTime {
    /// Elapsed time (years).
    pub time_yr: f32,
    /// Remaining capacity (kWh).
    pub capacity_kwh: f32,
}

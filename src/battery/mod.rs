//! Battery charging, daily-profile, and degradation models.

/// Two-phase CC/CV charge-duration model.
pub mod charge_time;
/// Calendar-life capacity fade model.
pub mod degradation;
/// Hour-stepped daily charge-profile simulation.
pub mod profile;
pub mod types;

// Re-export the main items for convenience
pub use charge_time::charge_time;
pub use degradation::remaining_capacity;
pub use profile::ProfileParams;
pub use profile::simulate;
pub use types::BatteryCapacityAtTime;
pub use types::ChargeProfilePoint;

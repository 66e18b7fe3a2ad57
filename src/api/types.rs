//! API response and query types.

use serde::{Deserialize, Serialize};

/// Response to a successful report computation.
#[derive(Debug, Serialize)]
pub struct ReportCreated {
    /// Opaque identifier for later retrieval.
    pub report_id: String,
}

/// Optional sampling parameters for the cost-curve endpoint.
#[derive(Debug, Deserialize)]
pub struct CostCurveQuery {
    /// Lowest sampled rate (currency per kWh).
    pub min_rate: Option<f32>,
    /// Highest sampled rate (currency per kWh).
    pub max_rate: Option<f32>,
    /// Number of samples across the rate interval.
    pub points: Option<usize>,
}

/// Optional sampling parameters for the degradation endpoint.
#[derive(Debug, Deserialize)]
pub struct DegradationQuery {
    /// Projection horizon (years).
    pub horizon_years: Option<f32>,
    /// Number of samples across the horizon.
    pub points: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

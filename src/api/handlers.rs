//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{CostCurveQuery, DegradationQuery, ErrorResponse, ReportCreated};
use crate::battery::degradation::degradation_curve;
use crate::battery::profile::{ProfileParams, simulate};
use crate::battery::types::{BatteryCapacityAtTime, ChargeProfilePoint};
use crate::cost::{ChargeCostAtRate, charge_cost_across_rates};
use crate::error::EngineError;
use crate::report::{FleetInput, Report};
use crate::store::generate_report_id;

/// Default rate interval for the cost-vs-tariff chart.
const DEFAULT_MIN_RATE: f32 = 0.1;
const DEFAULT_MAX_RATE: f32 = 0.3;
/// Default number of samples for the cost chart.
const DEFAULT_COST_POINTS: usize = 5;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Computes a report from the posted fleet input and stores it.
///
/// `POST /report` → 200 + `{"report_id": …}`, or 400 on invalid input.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(input): Json<FleetInput>,
) -> Result<Json<ReportCreated>, ApiError> {
    let report = Report::from_input(
        &input,
        &state.config.tariff,
        state.config.charging.charge_efficiency,
    )
    .map_err(engine_error)?;

    let report_id = generate_report_id();
    state.store.put(&report_id, report);
    Ok(Json(ReportCreated { report_id }))
}

/// Returns a stored report.
///
/// `GET /report/{id}` → 200 + `Report` JSON, or 404.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let report = state.store.get(&id).ok_or_else(|| not_found(&id))?;
    Ok(Json(report))
}

/// Returns the daily charge profile for a stored report's fleet.
///
/// `GET /report/{id}/profile` → 200 + `Vec<ChargeProfilePoint>` JSON.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChargeProfilePoint>>, ApiError> {
    let report = state.store.get(&id).ok_or_else(|| not_found(&id))?;
    let params = ProfileParams::from_fleet(&report.input, &state.config.charging);
    let profile = simulate(&params).map_err(engine_error)?;
    Ok(Json(profile))
}

/// Returns the fleet-wide charging cost sampled across a tariff range.
///
/// `GET /report/{id}/costs?min_rate=&max_rate=&points=` →
/// 200 + `Vec<ChargeCostAtRate>` JSON, or 400 on a reversed range.
pub async fn get_costs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<CostCurveQuery>,
) -> Result<Json<Vec<ChargeCostAtRate>>, ApiError> {
    let report = state.store.get(&id).ok_or_else(|| not_found(&id))?;

    let min_rate = query.min_rate.unwrap_or(DEFAULT_MIN_RATE);
    let max_rate = query.max_rate.unwrap_or(DEFAULT_MAX_RATE);
    let points = query.points.unwrap_or(DEFAULT_COST_POINTS);
    if min_rate > max_rate {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`min_rate` ({min_rate}) must be <= `max_rate` ({max_rate})"),
            }),
        ));
    }

    let sweep = charge_cost_across_rates(
        report.total_fleet_energy_demand_kwh,
        min_rate,
        max_rate,
        points,
    );
    Ok(Json(sweep))
}

/// Returns the projected battery capacity over the configured horizon.
///
/// `GET /report/{id}/degradation?horizon_years=&points=` →
/// 200 + `Vec<BatteryCapacityAtTime>` JSON.
pub async fn get_degradation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DegradationQuery>,
) -> Result<Json<Vec<BatteryCapacityAtTime>>, ApiError> {
    let report = state.store.get(&id).ok_or_else(|| not_found(&id))?;

    let d = &state.config.degradation;
    let horizon = query.horizon_years.unwrap_or(d.horizon_years);
    let points = query.points.unwrap_or(d.sample_points);

    let curve = degradation_curve(
        report.input.battery_capacity_kwh,
        horizon,
        points,
        d.annual_rate,
    );
    Ok(Json(curve))
}

fn engine_error(e: EngineError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("report \"{id}\" not found"),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;
    use crate::store::InMemoryReportStore;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: ScenarioConfig::baseline(),
            store: Box::new(InMemoryReportStore::new()),
        })
    }

    fn baseline_input_json() -> String {
        serde_json::json!({
            "num_ev": 100,
            "daily_mileage_mi": 250.0,
            "battery_capacity_kwh": 60.0,
            "charge_power_kw": 50.0,
            "efficiency_mi_per_kwh": 4.5,
            "battery_dod": [10.0, 90.0],
            "working_hours": [7.0, 19.0],
        })
        .to_string()
    }

    async fn post_report(app: axum::Router, body: String) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/report")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn create_report_returns_id() {
        let state = make_test_state();
        let (status, json) = post_report(router(state), baseline_input_json()).await;
        assert_eq!(status, StatusCode::OK);
        let id = json["report_id"].as_str().unwrap();
        assert_eq!(id.len(), 9);
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let state = make_test_state();
        let (_, json) = post_report(router(state.clone()), baseline_input_json()).await;
        let id = json["report_id"].as_str().unwrap();

        let req = Request::builder()
            .uri(format!("/report/{id}"))
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report["num_ev"], 100);
        assert!(report.get("charge_time_per_ev_hr").is_some());
        assert!(report.get("reduced_charging_cost").is_some());
    }

    #[tokio::test]
    async fn invalid_input_returns_400() {
        let state = make_test_state();
        let body = serde_json::json!({
            "num_ev": 100,
            "daily_mileage_mi": 250.0,
            "battery_capacity_kwh": 60.0,
            "charge_power_kw": 50.0,
            "efficiency_mi_per_kwh": 4.5,
            "battery_dod": [90.0, 10.0],
            "working_hours": [7.0, 19.0],
        })
        .to_string();
        let (status, json) = post_report(router(state), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn unknown_report_returns_404() {
        let state = make_test_state();
        let req = Request::builder()
            .uri("/report/zzzzzzzzz")
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn profile_endpoint_returns_series() {
        let state = make_test_state();
        let (_, json) = post_report(router(state.clone()), baseline_input_json()).await;
        let id = json["report_id"].as_str().unwrap();

        let req = Request::builder()
            .uri(format!("/report/{id}/profile"))
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let points: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert!(!points.is_empty());
        assert!(points[0].get("time_hr").is_some());
        assert!(points[0].get("capacity_kwh").is_some());
    }

    #[tokio::test]
    async fn costs_endpoint_uses_defaults() {
        let state = make_test_state();
        let (_, json) = post_report(router(state.clone()), baseline_input_json()).await;
        let id = json["report_id"].as_str().unwrap();

        let req = Request::builder()
            .uri(format!("/report/{id}/costs"))
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let sweep: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(sweep.len(), 5);
        assert!((sweep[0]["rate"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!((sweep[4]["rate"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn costs_endpoint_rejects_reversed_range() {
        let state = make_test_state();
        let (_, json) = post_report(router(state.clone()), baseline_input_json()).await;
        let id = json["report_id"].as_str().unwrap();

        let req = Request::builder()
            .uri(format!("/report/{id}/costs?min_rate=0.5&max_rate=0.1"))
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn degradation_endpoint_returns_curve() {
        let state = make_test_state();
        let (_, json) = post_report(router(state.clone()), baseline_input_json()).await;
        let id = json["report_id"].as_str().unwrap();

        let req = Request::builder()
            .uri(format!("/report/{id}/degradation"))
            .body(Body::empty())
            .unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let curve: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(curve.len(), 5);
        assert!((curve[0]["capacity_kwh"].as_f64().unwrap() - 60.0).abs() < 1e-6);
    }
}

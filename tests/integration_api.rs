//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use retrofit_sim::api::{AppState, router};
use retrofit_sim::config::ReferenceData;
use retrofit_sim::engine::evaluate;
use retrofit_sim::params::HouseholdParameters;

fn build_api_state() -> Arc<AppState> {
    let params = HouseholdParameters::family();
    let evaluation = evaluate(&params, &ReferenceData::default())
        .expect("family preset should evaluate");
    Arc::new(AppState { params, evaluation })
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(build_api_state());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn scenarios_endpoint_returns_full_evaluation() {
    let (status, json) = get_json("/scenarios").await;
    assert_eq!(status, StatusCode::OK);

    let scenarios = json["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert_eq!(scenarios[0]["kind"], "pv-only");
    assert_eq!(scenarios[1]["kind"], "pv-battery");
    assert_eq!(scenarios[2]["kind"], "pv-battery-heatpump");
    // family preset carries a wallbox
    assert!(json["params"]["wallbox"].as_bool().unwrap());
    assert!(scenarios[0]["pv_kwp"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn year_series_covers_all_months_with_consistent_flows() {
    let (status, json) = get_json("/series/year?scenario=2").await;
    assert_eq!(status, StatusCode::OK);

    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 12);
    for p in points {
        let consumption = p["consumption_kwh"].as_f64().unwrap();
        let self_use = p["self_use_kwh"].as_f64().unwrap();
        let grid = p["grid_import_kwh"].as_f64().unwrap();
        assert!((grid + self_use - consumption).abs() < 0.1);
    }
}

#[tokio::test]
async fn day_series_honors_the_season_parameter() {
    let (status, winter) = get_json("/series/day?scenario=0&season=winter").await;
    assert_eq!(status, StatusCode::OK);
    let (_, summer) = get_json("/series/day?scenario=0&season=summer").await;

    let lit = |points: &serde_json::Value| {
        points
            .as_array()
            .unwrap()
            .iter()
            .filter(|p| p["pv_kwh"].as_f64().unwrap() > 0.0)
            .count()
    };
    assert!(lit(&summer) > lit(&winter));
}

#[tokio::test]
async fn bad_scenario_index_and_season_return_400() {
    let (status, json) = get_json("/series/year?scenario=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("out of range"));

    let (status, json) = get_json("/series/day?scenario=0&season=midsummer").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unknown season"));
}

//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{DaySeriesQuery, ErrorResponse, ScenariosResponse, YearSeriesQuery};
use crate::engine::types::Scenario;
use crate::series::{Season, simulate_day, simulate_year};

/// Returns the full evaluation: parameters, scenarios, and warnings.
///
/// `GET /scenarios` → 200 + `ScenariosResponse` JSON
pub async fn get_scenarios(State(state): State<Arc<AppState>>) -> Json<ScenariosResponse> {
    Json(ScenariosResponse {
        params: state.params.clone(),
        scenarios: state.evaluation.scenarios.clone(),
        warnings: state.evaluation.warnings.clone(),
    })
}

/// Returns the monthly series for one scenario.
///
/// `GET /series/year?scenario=N` → 200 + `Vec<MonthPoint>` JSON
/// `GET /series/year?scenario=9` → 400 + `ErrorResponse`
pub async fn get_year_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearSeriesQuery>,
) -> impl IntoResponse {
    let scenario = select_scenario(&state, query.scenario)?;
    Ok::<_, (StatusCode, Json<ErrorResponse>)>(Json(simulate_year(scenario)))
}

/// Returns the hourly series for one scenario and season.
///
/// `GET /series/day?scenario=N&season=summer` → 200 + `Vec<HourPoint>` JSON
/// Unknown season names or scenario indices → 400 + `ErrorResponse`
pub async fn get_day_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DaySeriesQuery>,
) -> impl IntoResponse {
    let scenario = select_scenario(&state, query.scenario)?;
    let season = match query.season.as_deref() {
        None => Season::Summer,
        Some(name) => name.parse::<Season>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: e }),
            )
        })?,
    };
    Ok::<_, (StatusCode, Json<ErrorResponse>)>(Json(simulate_day(scenario, season)))
}

/// Resolves a scenario index query against the evaluation, defaulting to
/// the first scenario.
fn select_scenario(
    state: &AppState,
    index: Option<usize>,
) -> Result<&Scenario, (StatusCode, Json<ErrorResponse>)> {
    let index = index.unwrap_or(0);
    state.evaluation.scenarios.get(index).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "scenario index {index} out of range, {} scenarios available",
                    state.evaluation.scenarios.len()
                ),
            }),
        )
    })
}

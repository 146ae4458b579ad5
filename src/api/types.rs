//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::engine::types::{EngineWarning, Scenario};
use crate::params::HouseholdParameters;

/// Response body for the scenarios endpoint.
#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    /// Household parameters the evaluation was computed from.
    pub params: HouseholdParameters,
    /// Scenario records in fixed engine order.
    pub scenarios: Vec<Scenario>,
    /// Non-fatal warnings collected during sizing.
    pub warnings: Vec<EngineWarning>,
}

/// Query parameters for the yearly series endpoint.
#[derive(Debug, Deserialize)]
pub struct YearSeriesQuery {
    /// Scenario index, 0 to 2.
    pub scenario: Option<usize>,
}

/// Query parameters for the daily series endpoint.
#[derive(Debug, Deserialize)]
pub struct DaySeriesQuery {
    /// Scenario index, 0 to 2.
    pub scenario: Option<usize>,
    /// Season name: winter, spring, summer, or autumn.
    pub season: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

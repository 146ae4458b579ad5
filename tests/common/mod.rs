//! Shared test fixtures for integration tests.

use retrofit_sim::config::ReferenceData;
use retrofit_sim::engine::evaluate;
use retrofit_sim::engine::types::Evaluation;
use retrofit_sim::params::HouseholdParameters;

/// Default reference data (built-in market snapshot).
pub fn default_reference() -> ReferenceData {
    ReferenceData::default()
}

/// Evaluates the starter preset against the default reference data.
pub fn starter_evaluation() -> Evaluation {
    evaluate(&HouseholdParameters::starter(), &default_reference())
        .expect("starter preset should evaluate")
}

/// Evaluates the family preset against the default reference data.
#[allow(dead_code)]
pub fn family_evaluation() -> Evaluation {
    evaluate(&HouseholdParameters::family(), &default_reference())
        .expect("family preset should evaluate")
}

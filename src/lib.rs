//! Household energy retrofit estimator.
//!
//! Turns a small set of household parameters (house type, floor area,
//! occupants, insulation, optional A/C / floor heating / EV charging) into
//! three fixed equipment scenarios (PV-only, PV+battery, and
//! PV+battery+heat-pump), each with sizing, costs, annual energy balance,
//! CO2 accounting, and investment payback. Monthly and hourly series for
//! chart rendering are produced separately by [`series`].
//!
//! This is a heuristic estimator, not a simulation-grade energy model.

#[cfg(feature = "api")]
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod io;
pub mod params;
pub mod series;

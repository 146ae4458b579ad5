//! Monthly and hourly chart series for a selected scenario.
//!
//! These simulators exist purely for visualization and use a deliberately
//! simpler self-consumption model than [`crate::engine::balance`]: a flat
//! share of generation (0.75 with storage, 0.35 without) applied to shaped
//! curves. The annual aggregates of the two models do not agree exactly and
//! are not meant to; the engine's numbers are authoritative.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::engine::types::Scenario;

/// Flat self-consumption share of generation with battery storage.
const SELF_USE_SHARE_WITH_STORAGE: f32 = 0.75;
/// Flat self-consumption share without storage.
const SELF_USE_SHARE_WITHOUT_STORAGE: f32 = 0.35;

/// Share of annual PV generation per month, January first. Sums to 1.
const MONTHLY_PV_SHARE: [f32; 12] = [
    0.03, 0.05, 0.08, 0.11, 0.12, 0.13, 0.13, 0.12, 0.09, 0.06, 0.04, 0.04,
];

/// Share of annual heating demand per month. Sums to 1.
const MONTHLY_HEATING_SHARE: [f32; 12] = [
    0.17, 0.15, 0.12, 0.07, 0.03, 0.01, 0.01, 0.01, 0.04, 0.09, 0.13, 0.17,
];

/// Share of annual A/C load per month. Sums to 1.
const MONTHLY_AIRCON_SHARE: [f32; 12] = [
    0.0, 0.0, 0.0, 0.05, 0.10, 0.20, 0.30, 0.25, 0.10, 0.0, 0.0, 0.0,
];

/// Share of daily household electricity per hour, midnight first, with
/// morning and evening peaks. Sums to 1.
const HOUSEHOLD_HOURLY_SHARE: [f32; 24] = [
    0.015, 0.012, 0.010, 0.010, 0.012, 0.020, 0.045, 0.060, 0.050, 0.040, 0.038, 0.040, 0.045,
    0.040, 0.038, 0.040, 0.050, 0.065, 0.080, 0.085, 0.075, 0.055, 0.040, 0.035,
];

/// Season selecting the solar window and typical-day demand of the daily
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Season; 4] = [
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
    ];

    /// Representative month (0-based) used to scale a typical day.
    fn representative_month(self) -> usize {
        match self {
            Season::Winter => 0,  // January
            Season::Spring => 3,  // April
            Season::Summer => 6,  // July
            Season::Autumn => 9,  // October
        }
    }

    /// Solar window as (sunrise, sunset) in whole hours.
    fn solar_window(self) -> (f32, f32) {
        match self {
            Season::Winter => (8.0, 16.0),
            Season::Spring => (6.0, 20.0),
            Season::Summer => (5.0, 21.0),
            Season::Autumn => (7.0, 19.0),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        };
        f.write_str(s)
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            _ => Err(format!("unknown season \"{s}\", expected winter, spring, summer, or autumn")),
        }
    }
}

/// One month of the yearly chart series, all energies in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthPoint {
    /// Month index, 0 (January) to 11 (December).
    pub month: u32,
    /// PV generation.
    pub pv_kwh: f32,
    /// Total consumption.
    pub consumption_kwh: f32,
    /// On-site consumed generation.
    pub self_use_kwh: f32,
    /// Grid import.
    pub grid_import_kwh: f32,
    /// Grid feed-in.
    pub feed_in_kwh: f32,
}

/// One hour of the daily chart series, all energies in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourPoint {
    /// Hour of day, 0 to 23.
    pub hour: u32,
    /// PV generation.
    pub pv_kwh: f32,
    /// Total consumption.
    pub consumption_kwh: f32,
    /// On-site consumed generation.
    pub self_use_kwh: f32,
    /// Grid import.
    pub grid_import_kwh: f32,
    /// Grid feed-in.
    pub feed_in_kwh: f32,
}

fn self_use_share(has_storage: bool) -> f32 {
    if has_storage {
        SELF_USE_SHARE_WITH_STORAGE
    } else {
        SELF_USE_SHARE_WITHOUT_STORAGE
    }
}

fn split_flows(pv: f32, consumption: f32, share: f32) -> (f32, f32, f32) {
    let self_use = (pv * share).min(consumption);
    let grid_import = (consumption - self_use).max(0.0);
    let feed_in = (pv - self_use).max(0.0);
    (self_use, grid_import, feed_in)
}

/// Simulates twelve shaped months for one scenario.
///
/// Household and EV loads spread evenly, heat pump and A/C loads follow
/// their seasonal share tables, PV follows the monthly yield shares.
pub fn simulate_year(scenario: &Scenario) -> Vec<MonthPoint> {
    let share = self_use_share(scenario.battery_kwh > 0.0);
    let flat_monthly = (scenario.household_kwh + scenario.ev_charge_kwh) / 12.0;

    (0..12)
        .map(|m| {
            let pv = scenario.pv_generation_kwh * MONTHLY_PV_SHARE[m];
            let consumption = flat_monthly
                + scenario.heatpump_electric_kwh * MONTHLY_HEATING_SHARE[m]
                + scenario.aircon_kwh * MONTHLY_AIRCON_SHARE[m];
            let (self_use, grid_import, feed_in) = split_flows(pv, consumption, share);
            MonthPoint {
                month: m as u32,
                pv_kwh: pv,
                consumption_kwh: consumption,
                self_use_kwh: self_use,
                grid_import_kwh: grid_import,
                feed_in_kwh: feed_in,
            }
        })
        .collect()
}

/// Simulates a typical 24-hour day for one scenario and season.
///
/// Solar generation follows a half-sine bell between the season's sunrise
/// and sunset; household load follows the fixed hourly shape; heat pump,
/// A/C, and EV loads spread evenly over the day at their seasonal daily
/// level.
pub fn simulate_day(scenario: &Scenario, season: Season) -> Vec<HourPoint> {
    let share = self_use_share(scenario.battery_kwh > 0.0);
    let month = season.representative_month();
    let (sunrise, sunset) = season.solar_window();

    // scale a representative month down to one day
    let days = 365.0 / 12.0;
    let daily_pv = scenario.pv_generation_kwh * MONTHLY_PV_SHARE[month] / days;
    let daily_household = scenario.household_kwh / 365.0;
    let daily_heatpump = scenario.heatpump_electric_kwh * MONTHLY_HEATING_SHARE[month] / days;
    let daily_aircon = scenario.aircon_kwh * MONTHLY_AIRCON_SHARE[month] / days;
    let daily_ev = scenario.ev_charge_kwh / 365.0;
    let flat_hourly = (daily_heatpump + daily_aircon + daily_ev) / 24.0;

    let solar_weights: Vec<f32> = (0..24)
        .map(|h| {
            let t = h as f32 + 0.5;
            if t <= sunrise || t >= sunset {
                0.0
            } else {
                (std::f32::consts::PI * (t - sunrise) / (sunset - sunrise)).sin()
            }
        })
        .collect();
    let weight_sum: f32 = solar_weights.iter().sum();

    (0..24)
        .map(|h| {
            let pv = if weight_sum > 0.0 {
                daily_pv * solar_weights[h] / weight_sum
            } else {
                0.0
            };
            let consumption = daily_household * HOUSEHOLD_HOURLY_SHARE[h] + flat_hourly;
            let (self_use, grid_import, feed_in) = split_flows(pv, consumption, share);
            HourPoint {
                hour: h as u32,
                pv_kwh: pv,
                consumption_kwh: consumption,
                self_use_kwh: self_use,
                grid_import_kwh: grid_import,
                feed_in_kwh: feed_in,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceData;
    use crate::engine::evaluate;
    use crate::params::HouseholdParameters;

    fn scenarios() -> Vec<Scenario> {
        evaluate(&HouseholdParameters::family(), &ReferenceData::default())
            .unwrap()
            .scenarios
    }

    #[test]
    fn share_tables_sum_to_one() {
        for table in [MONTHLY_PV_SHARE, MONTHLY_HEATING_SHARE, MONTHLY_AIRCON_SHARE] {
            let sum: f32 = table.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "table sums to {sum}");
        }
        let sum: f32 = HOUSEHOLD_HOURLY_SHARE.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "hourly shape sums to {sum}");
    }

    #[test]
    fn year_has_twelve_months_in_order() {
        let points = simulate_year(&scenarios()[0]);
        assert_eq!(points.len(), 12);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.month, i as u32);
        }
    }

    #[test]
    fn monthly_pv_sums_back_to_annual_generation() {
        let s = &scenarios()[1];
        let points = simulate_year(s);
        let total: f32 = points.iter().map(|p| p.pv_kwh).sum();
        assert!((total - s.pv_generation_kwh).abs() < 1.0);
    }

    #[test]
    fn summer_generates_more_than_winter() {
        let points = simulate_year(&scenarios()[0]);
        assert!(points[6].pv_kwh > points[0].pv_kwh * 2.0);
    }

    #[test]
    fn heatpump_load_peaks_in_winter() {
        let s = &scenarios()[2];
        let points = simulate_year(s);
        assert!(points[0].consumption_kwh > points[6].consumption_kwh);
    }

    #[test]
    fn monthly_flows_are_consistent() {
        for s in &scenarios() {
            for p in simulate_year(s) {
                assert!(
                    (p.grid_import_kwh + p.self_use_kwh - p.consumption_kwh).abs() < 1e-2
                );
                assert!((p.feed_in_kwh - (p.pv_kwh - p.self_use_kwh).max(0.0)).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn storage_raises_monthly_self_use() {
        let scenarios = scenarios();
        let without: f32 = simulate_year(&scenarios[0])
            .iter()
            .map(|p| p.self_use_kwh)
            .sum();
        // same generation share model, bigger flat share with storage
        let with: f32 = simulate_year(&scenarios[1])
            .iter()
            .map(|p| p.self_use_kwh)
            .sum();
        assert!(with > without);
    }

    #[test]
    fn day_has_twentyfour_hours_and_dark_night() {
        let s = &scenarios()[0];
        for season in Season::ALL {
            let points = simulate_day(s, season);
            assert_eq!(points.len(), 24);
            assert_eq!(points[0].pv_kwh, 0.0, "{season}: midnight must be dark");
            assert_eq!(points[23].pv_kwh, 0.0);
            let daylight: f32 = points.iter().map(|p| p.pv_kwh).sum();
            assert!(daylight > 0.0, "{season}: no generation at all");
        }
    }

    #[test]
    fn summer_window_is_wider_than_winter() {
        let s = &scenarios()[0];
        let summer = simulate_day(s, Season::Summer);
        let winter = simulate_day(s, Season::Winter);
        let lit = |points: &[HourPoint]| points.iter().filter(|p| p.pv_kwh > 0.0).count();
        assert!(lit(&summer) > lit(&winter));
        // winter sun must not shine before 08:00
        assert_eq!(winter[7].pv_kwh, 0.0);
        assert!(summer[6].pv_kwh > 0.0);
    }

    #[test]
    fn solar_bell_peaks_at_midday() {
        let s = &scenarios()[0];
        let points = simulate_day(s, Season::Summer);
        let peak_hour = points
            .iter()
            .max_by(|a, b| a.pv_kwh.total_cmp(&b.pv_kwh))
            .map(|p| p.hour)
            .unwrap_or(0);
        assert!((11..=14).contains(&peak_hour), "peak at {peak_hour}");
    }

    #[test]
    fn household_shape_has_evening_peak() {
        let s = &scenarios()[0];
        let points = simulate_day(s, Season::Winter);
        assert!(points[19].consumption_kwh > points[3].consumption_kwh);
    }

    #[test]
    fn season_parses_from_query_strings() {
        assert_eq!("summer".parse::<Season>().ok(), Some(Season::Summer));
        assert_eq!("winter".parse::<Season>().ok(), Some(Season::Winter));
        assert!("monsoon".parse::<Season>().is_err());
        assert_eq!(Season::Autumn.to_string(), "autumn");
    }
}

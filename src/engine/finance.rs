//! Financial projection: operating cost, savings against the status quo,
//! inflation-adjusted horizon savings, and break-even search.

use crate::config::ReferenceData;
use crate::engine::sizing::SizedScenario;
use crate::params::HouseholdParameters;

/// Energy prices after user overrides were applied.
#[derive(Debug, Clone, Copy)]
pub struct Prices {
    /// Grid electricity (EUR/kWh).
    pub electricity_eur_per_kwh: f32,
    /// Gas (EUR/kWh).
    pub gas_eur_per_kwh: f32,
    /// Feed-in compensation (EUR/kWh).
    pub feed_in_eur_per_kwh: f32,
}

/// Resolves prices from reference data and overrides.
pub fn resolve_prices(params: &HouseholdParameters, reference: &ReferenceData) -> Prices {
    Prices {
        electricity_eur_per_kwh: params
            .overrides
            .electricity_price
            .unwrap_or(reference.tariffs.electricity_eur_per_kwh),
        gas_eur_per_kwh: params
            .overrides
            .gas_price
            .unwrap_or(reference.tariffs.gas_eur_per_kwh),
        feed_in_eur_per_kwh: reference.tariffs.feed_in_eur_per_kwh,
    }
}

/// Annual status-quo cost before any retrofit: grid electricity for the
/// household (without EV or heat pump), gas heating, and the combustion car
/// fuel the wallbox would replace.
#[derive(Debug, Clone, Copy)]
pub struct BaselineCost {
    /// Grid electricity for household and A/C (EUR/a).
    pub electricity_eur: f32,
    /// Gas heating (EUR/a).
    pub gas_eur: f32,
    /// Combustion car fuel (EUR/a), 0 without a wallbox plan.
    pub fuel_eur: f32,
}

impl BaselineCost {
    /// Sum of all baseline components.
    pub fn total_eur(&self) -> f32 {
        self.electricity_eur + self.gas_eur + self.fuel_eur
    }
}

/// Computes the status-quo cost shared by all scenarios.
///
/// The baseline electric load is household plus A/C; the EV block is not
/// part of the status quo (the comparison car burns fuel) and heating runs
/// on gas.
pub fn baseline_cost(
    household_kwh: f32,
    aircon_kwh: f32,
    heating_kwh: f32,
    wallbox: bool,
    prices: Prices,
    reference: &ReferenceData,
) -> BaselineCost {
    BaselineCost {
        electricity_eur: (household_kwh + aircon_kwh) * prices.electricity_eur_per_kwh,
        gas_eur: heating_kwh * prices.gas_eur_per_kwh,
        fuel_eur: if wallbox {
            reference.vehicle.combustion_fuel_cost_eur
        } else {
            0.0
        },
    }
}

/// Financial projection for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct FinancialProjection {
    /// Annual operating cost after the retrofit (EUR/a).
    pub annual_operating_cost_eur: f32,
    /// First-year savings against the status quo (EUR/a).
    pub annual_savings_eur: f32,
    /// Savings over the projection horizon with per-carrier price inflation
    /// compounded (EUR).
    pub savings_horizon_eur: f32,
    /// First year cumulative savings cover the net investment, if reached
    /// within the cap.
    pub break_even_years: Option<u32>,
}

/// Projects one sized scenario against the status quo.
///
/// Savings are split per carrier so each compounds at its own inflation
/// rate: electricity savings (including feed-in revenue and avoided fuel)
/// at the electricity rate, gas savings at the gas rate. The break-even
/// search runs against the net investment (total minus equipment extras)
/// and stops at the configured cap.
pub fn project(
    scenario: &SizedScenario,
    baseline: &BaselineCost,
    prices: Prices,
    reference: &ReferenceData,
) -> FinancialProjection {
    let grid_cost = scenario.balance.grid_import_kwh * prices.electricity_eur_per_kwh;
    let feed_in_revenue = scenario.balance.feed_in_kwh * prices.feed_in_eur_per_kwh;
    let gas_cost = scenario.gas_load_kwh * prices.gas_eur_per_kwh;
    let annual_operating_cost_eur = grid_cost - feed_in_revenue + gas_cost;

    let electricity_savings =
        baseline.electricity_eur + baseline.fuel_eur - (grid_cost - feed_in_revenue);
    let gas_savings = baseline.gas_eur - gas_cost;
    let annual_savings_eur = electricity_savings + gas_savings;

    let horizon = reference.projection.horizon_years;
    let savings_horizon_eur = cumulative_savings(
        electricity_savings,
        gas_savings,
        reference.tariffs.electricity_inflation,
        reference.tariffs.gas_inflation,
        horizon,
    );

    let net_investment = scenario.costs.total_eur - scenario.costs.extras_eur;
    let break_even_years = break_even(
        net_investment,
        electricity_savings,
        gas_savings,
        reference.tariffs.electricity_inflation,
        reference.tariffs.gas_inflation,
        reference.projection.break_even_cap_years,
    );

    FinancialProjection {
        annual_operating_cost_eur,
        annual_savings_eur,
        savings_horizon_eur,
        break_even_years,
    }
}

/// Sums per-carrier savings over `years`, compounding each at its own rate.
/// Year 1 is uninflated.
fn cumulative_savings(
    electricity_savings: f32,
    gas_savings: f32,
    electricity_inflation: f32,
    gas_inflation: f32,
    years: u32,
) -> f32 {
    let mut total = 0.0;
    let mut el_factor = 1.0;
    let mut gas_factor = 1.0;
    for _ in 0..years {
        total += electricity_savings * el_factor + gas_savings * gas_factor;
        el_factor *= 1.0 + electricity_inflation;
        gas_factor *= 1.0 + gas_inflation;
    }
    total
}

/// Finds the first year cumulative inflated savings cover the net
/// investment.
///
/// Returns `Some(0)` for a non-positive net investment, `None` when first
/// year savings are non-positive or the cap is reached without covering the
/// investment.
fn break_even(
    net_investment: f32,
    electricity_savings: f32,
    gas_savings: f32,
    electricity_inflation: f32,
    gas_inflation: f32,
    cap_years: u32,
) -> Option<u32> {
    if net_investment <= 0.0 {
        return Some(0);
    }
    if electricity_savings + gas_savings <= 0.0 {
        return None;
    }
    let mut cumulative = 0.0;
    let mut el_factor = 1.0;
    let mut gas_factor = 1.0;
    for year in 1..=cap_years {
        cumulative += electricity_savings * el_factor + gas_savings * gas_factor;
        if cumulative >= net_investment {
            return Some(year);
        }
        el_factor *= 1.0 + electricity_inflation;
        gas_factor *= 1.0 + gas_inflation;
    }
    None
}

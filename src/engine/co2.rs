//! CO2 accounting: status-quo emissions, post-retrofit emissions, and
//! illustrative equivalents.

use crate::config::ReferenceData;
use crate::engine::sizing::SizedScenario;
use crate::engine::types::Co2Equivalents;

/// CO2 result for one scenario, all values in kg.
#[derive(Debug, Clone, Copy)]
pub struct Co2Account {
    /// Status-quo emissions per year.
    pub today_kg: f32,
    /// Emissions per year after the retrofit.
    pub after_kg: f32,
    /// Annual saving.
    pub saving_kg: f32,
    /// Saving over the projection horizon with annual growth compounded.
    pub saving_horizon_kg: f32,
    /// Illustrative equivalents of the horizon saving.
    pub equivalents: Co2Equivalents,
}

/// Accounts emissions for one sized scenario against the status quo.
///
/// The status quo runs the household on grid electricity, heating on gas,
/// and (for wallbox households) a combustion car. After the retrofit the
/// grid import splits into the EV share, charged at the public-mix factor,
/// and the rest at the grid factor; on-site PV consumption is emission
/// free.
pub fn account(
    scenario: &SizedScenario,
    household_kwh: f32,
    aircon_kwh: f32,
    heating_kwh: f32,
    ev_kwh: f32,
    wallbox: bool,
    reference: &ReferenceData,
) -> Co2Account {
    let co2 = &reference.co2;

    let today_kg = (household_kwh + aircon_kwh) * co2.electricity_factor
        + heating_kwh * co2.gas_factor
        + if wallbox {
            reference.vehicle.combustion_co2_kg
        } else {
            0.0
        };

    // The EV charges partly away from home; only the grid-imported part of
    // its load carries the mix factor here.
    let ev_grid_kwh = ev_kwh.min(scenario.balance.grid_import_kwh);
    let other_grid_kwh = scenario.balance.grid_import_kwh - ev_grid_kwh;
    let after_kg = ev_grid_kwh * co2.ev_mix_factor
        + other_grid_kwh * co2.electricity_factor
        + scenario.gas_load_kwh * co2.gas_factor;

    let saving_kg = (today_kg - after_kg).max(0.0);
    let saving_horizon_kg = horizon_saving(
        saving_kg,
        co2.annual_growth,
        reference.projection.horizon_years,
    );

    let equivalents = Co2Equivalents {
        trees: saving_horizon_kg / (co2.tree_kg_per_year * reference.projection.horizon_years as f32),
        flights: saving_horizon_kg / co2.flight_kg,
        car_km: saving_horizon_kg / co2.car_kg_per_1000km * 1000.0,
    };

    Co2Account {
        today_kg,
        after_kg,
        saving_kg,
        saving_horizon_kg,
        equivalents,
    }
}

/// Sums the annual saving over `years`, growing it by `growth` each year.
/// Year 1 is ungrown.
fn horizon_saving(annual_kg: f32, growth: f32, years: u32) -> f32 {
    let mut total = 0.0;
    let mut factor = 1.0;
    for _ in 0..years {
        total += annual_kg * factor;
        factor *= 1.0 + growth;
    }
    total
}

//! Scenario engine: sizing, energy balance, finance, and CO2 accounting
//! behind a single [`evaluate`] entry point.

pub mod balance;
pub mod co2;
pub mod finance;
pub mod sizing;
pub mod types;

use crate::config::ReferenceData;
use crate::engine::finance::{baseline_cost, project, resolve_prices};
use crate::engine::sizing::{build_scenarios, demand_blocks};
use crate::engine::types::{EngineWarning, Evaluation, Scenario};
use crate::params::{HouseholdParameters, InputError};

/// Below this annual grid import the aggregate model leaves its calibrated
/// range and results get a plausibility warning.
const MIN_PLAUSIBLE_GRID_IMPORT_KWH: f32 = 200.0;

/// Evaluates the three retrofit scenarios for one household.
///
/// Validates the parameters first and refuses to compute anything on
/// invalid input. The result always contains the three scenarios in fixed
/// order plus any non-fatal warnings collected along the way.
///
/// # Errors
///
/// Returns all validation errors when the parameters are out of range.
pub fn evaluate(
    params: &HouseholdParameters,
    reference: &ReferenceData,
) -> Result<Evaluation, Vec<InputError>> {
    let errors = params.validate();
    if !errors.is_empty() {
        return Err(errors);
    }

    let blocks = demand_blocks(params, reference);
    let prices = resolve_prices(params, reference);
    let baseline = baseline_cost(
        blocks.household_kwh,
        blocks.aircon_kwh,
        blocks.heating_kwh,
        params.wallbox,
        prices,
        reference,
    );

    let (sized, mut warnings) = build_scenarios(params, reference);
    let mut scenarios = Vec::with_capacity(sized.len());

    for s in sized {
        if s.balance.grid_import_kwh < MIN_PLAUSIBLE_GRID_IMPORT_KWH {
            warnings.push(EngineWarning {
                scenario: s.kind,
                message: format!(
                    "grid import of {:.0} kWh/a is below the plausible minimum of {:.0} kWh/a",
                    s.balance.grid_import_kwh, MIN_PLAUSIBLE_GRID_IMPORT_KWH
                ),
            });
        }

        let fin = project(&s, &baseline, prices, reference);
        let co2 = co2::account(
            &s,
            blocks.household_kwh,
            blocks.aircon_kwh,
            blocks.heating_kwh,
            blocks.ev_kwh,
            params.wallbox,
            reference,
        );

        scenarios.push(Scenario {
            kind: s.kind,
            pv_kwp: s.pv_kwp,
            battery_kwh: s.battery_kwh,
            heatpump_power_kw: s.heatpump_power_kw,
            heatpump_electric_kwh: s.heatpump_electric_kwh,
            household_kwh: blocks.household_kwh,
            aircon_kwh: blocks.aircon_kwh,
            ev_charge_kwh: blocks.ev_kwh,
            electric_load_kwh: s.electric_load_kwh,
            gas_load_kwh: s.gas_load_kwh,
            costs: s.costs,
            pv_generation_kwh: s.balance.pv_generation_kwh,
            self_use_kwh: s.balance.self_use_kwh,
            grid_import_kwh: s.balance.grid_import_kwh,
            feed_in_kwh: s.balance.feed_in_kwh,
            ev_from_battery_kwh: s.balance.ev_from_battery_kwh,
            autarky: s.autarky,
            annual_operating_cost_eur: fin.annual_operating_cost_eur,
            annual_savings_eur: fin.annual_savings_eur,
            savings_horizon_eur: fin.savings_horizon_eur,
            break_even_years: fin.break_even_years,
            co2_today_kg: co2.today_kg,
            co2_after_kg: co2.after_kg,
            co2_saving_kg: co2.saving_kg,
            co2_saving_horizon_kg: co2.saving_horizon_kg,
            co2_equivalents: co2.equivalents,
        });
    }

    Ok(Evaluation {
        scenarios,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::ScenarioKind;

    #[test]
    fn starter_evaluation_has_three_scenarios_in_order() {
        let result = evaluate(&HouseholdParameters::starter(), &ReferenceData::default());
        assert!(result.is_ok());
        let eval = result.unwrap();
        assert_eq!(eval.scenarios.len(), 3);
        assert_eq!(eval.scenarios[0].kind, ScenarioKind::PvOnly);
        assert_eq!(eval.scenarios[1].kind, ScenarioKind::PvBattery);
        assert_eq!(eval.scenarios[2].kind, ScenarioKind::PvBatteryHeatpump);
    }

    #[test]
    fn invalid_input_blocks_evaluation() {
        let mut params = HouseholdParameters::starter();
        params.area_sqm = 3.0;
        params.occupants = 0;
        let result = evaluate(&params, &ReferenceData::default());
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.len() >= 2);
    }

    #[test]
    fn autarky_rises_across_scenarios() {
        let eval = evaluate(&HouseholdParameters::starter(), &ReferenceData::default())
            .unwrap();
        let s = &eval.scenarios;
        assert!(s[0].autarky.electric_pct < s[1].autarky.electric_pct);
        // combined autarky rises with the heat pump removing gas demand
        assert!(s[1].autarky.combined_pct < s[2].autarky.combined_pct);
    }

    #[test]
    fn costs_rise_with_equipment() {
        let eval = evaluate(&HouseholdParameters::starter(), &ReferenceData::default())
            .unwrap();
        let s = &eval.scenarios;
        assert!(s[0].costs.total_eur < s[1].costs.total_eur);
        assert!(s[1].costs.total_eur < s[2].costs.total_eur);
    }

    #[test]
    fn starter_roof_warning_present() {
        let eval = evaluate(&HouseholdParameters::starter(), &ReferenceData::default())
            .unwrap();
        assert!(
            eval.warnings
                .iter()
                .any(|w| w.message.contains("roof")),
            "warnings: {:?}",
            eval.warnings
        );
    }

    #[test]
    fn low_grid_import_triggers_plausibility_warning() {
        let mut params = HouseholdParameters::starter();
        // tiny household against a large roof
        params.occupants = 1;
        params.area_sqm = 20.0;
        params.roof_area_sqm = 200.0;
        params.overrides.household_electric_kwh = Some(300.0);
        params.overrides.heating_demand_kwh = Some(500.0);
        let eval = evaluate(&params, &ReferenceData::default()).unwrap();
        assert!(
            eval.warnings
                .iter()
                .any(|w| w.message.contains("plausible minimum")),
            "warnings: {:?}",
            eval.warnings
        );
    }

    #[test]
    fn scenario_display_is_readable() {
        let eval = evaluate(&HouseholdParameters::starter(), &ReferenceData::default())
            .unwrap();
        let text = eval.scenarios[0].to_string();
        assert!(text.contains("PV only"));
        assert!(text.contains("kWp"));
        assert!(text.contains("EUR"));
    }
}

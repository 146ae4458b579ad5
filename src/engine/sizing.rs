//! Scenario sizing: demand blocks, heat pump COP, PV and battery
//! dimensioning, costs, and the autarky plausibility policy.

use crate::config::ReferenceData;
use crate::engine::balance::{EnergyBalance, estimate_balance};
use crate::engine::types::{Autarky, CostBreakdown, EngineWarning, ScenarioKind};
use crate::params::{HouseholdParameters, InsulationLevel};

/// Annual consumption blocks, kept separate so scenarios can combine them
/// independently.
#[derive(Debug, Clone, Copy)]
pub struct DemandBlocks {
    /// Household baseline electricity (kWh/a).
    pub household_kwh: f32,
    /// Heating demand (kWh/a, thermal).
    pub heating_kwh: f32,
    /// A/C extra electricity (kWh/a), 0 if not selected.
    pub aircon_kwh: f32,
    /// EV charging electricity (kWh/a), 0 without wallbox.
    pub ev_kwh: f32,
}

/// Computes the consumption blocks, honoring user overrides.
pub fn demand_blocks(params: &HouseholdParameters, reference: &ReferenceData) -> DemandBlocks {
    let o = &params.overrides;
    let household_kwh = o
        .household_electric_kwh
        .unwrap_or(params.occupants as f32 * reference.consumption.per_person_kwh);
    let heating_kwh = o.heating_demand_kwh.unwrap_or(
        params.area_sqm
            * reference
                .consumption
                .heating_per_sqm(params.house_type, params.insulation),
    );
    let aircon_kwh = if params.air_conditioning {
        reference.consumption.aircon_extra_kwh
    } else {
        0.0
    };
    let ev_kwh = if params.wallbox {
        let km = o.annual_km.unwrap_or(reference.vehicle.annual_km);
        let per_100 = o
            .ev_kwh_per_100km
            .unwrap_or(reference.vehicle.ev_kwh_per_100km);
        km / 100.0 * per_100
    } else {
        0.0
    };
    DemandBlocks {
        household_kwh,
        heating_kwh,
        aircon_kwh,
        ev_kwh,
    }
}

/// Heat pump COP adjusted for insulation and floor heating, clamped to the
/// plausible range from reference data so compounding multipliers cannot
/// produce unrealistic extremes.
pub fn adjusted_cop(params: &HouseholdParameters, reference: &ReferenceData) -> f32 {
    let hp = &reference.heatpump;
    let insulation_factor = match params.insulation {
        InsulationLevel::Good => hp.cop_factor_good_insulation,
        InsulationLevel::Normal => hp.cop_factor_normal_insulation,
        InsulationLevel::Poor => hp.cop_factor_poor_insulation,
    };
    let floor_factor = if params.floor_heating {
        hp.cop_factor_floor_heating
    } else {
        1.0
    };
    (hp.base_cop * insulation_factor * floor_factor).clamp(hp.cop_min, hp.cop_max)
}

/// Plausibility band for the electric autarky of one scenario kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutarkyBand {
    /// Lower bound (percent).
    pub min_pct: f32,
    /// Upper bound (percent).
    pub max_pct: f32,
}

/// Autarky plausibility bands per scenario kind.
///
/// The raw balance estimator can produce autarky values inconsistent with
/// typical real installations; results are clamped into these bands as a
/// deliberate modeling simplification, with self-use, grid import, and
/// feed-in re-derived from the clamped value.
pub const AUTARKY_BANDS: [(ScenarioKind, AutarkyBand); 3] = [
    (
        ScenarioKind::PvOnly,
        AutarkyBand {
            min_pct: 25.0,
            max_pct: 40.0,
        },
    ),
    (
        ScenarioKind::PvBattery,
        AutarkyBand {
            min_pct: 50.0,
            max_pct: 75.0,
        },
    ),
    (
        ScenarioKind::PvBatteryHeatpump,
        AutarkyBand {
            min_pct: 70.0,
            max_pct: 85.0,
        },
    ),
];

/// Looks up the autarky band for a scenario kind.
pub fn autarky_band(kind: ScenarioKind) -> AutarkyBand {
    AUTARKY_BANDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, band)| *band)
        .unwrap_or(AutarkyBand {
            min_pct: 0.0,
            max_pct: 100.0,
        })
}

/// One sized scenario before financial and CO2 post-processing.
#[derive(Debug, Clone)]
pub struct SizedScenario {
    /// Equipment configuration.
    pub kind: ScenarioKind,
    /// PV capacity (kWp), rounded to 0.1.
    pub pv_kwp: f32,
    /// Battery capacity (kWh), 0 without battery.
    pub battery_kwh: f32,
    /// Heat pump thermal output (kW).
    pub heatpump_power_kw: f32,
    /// Heat pump electricity draw (kWh/a).
    pub heatpump_electric_kwh: f32,
    /// Total annual electric load (kWh/a).
    pub electric_load_kwh: f32,
    /// Remaining gas heating demand (kWh/a).
    pub gas_load_kwh: f32,
    /// Investment cost breakdown.
    pub costs: CostBreakdown,
    /// Energy balance after the autarky band policy was applied.
    pub balance: EnergyBalance,
    /// Autarky percentages.
    pub autarky: Autarky,
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Sizes the PV system for one scenario.
///
/// Returns the chosen capacity and, when the ideal capacity had to be cut
/// by the roof area, a warning for the caller to attach.
fn size_pv(
    kind: ScenarioKind,
    total_load_kwh: f32,
    params: &HouseholdParameters,
    reference: &ReferenceData,
) -> (f32, Option<EngineWarning>) {
    let pv = &reference.pv;
    let divisor = match kind {
        ScenarioKind::PvOnly => pv.divisor_pv_only,
        ScenarioKind::PvBattery => pv.divisor_battery,
        ScenarioKind::PvBatteryHeatpump => pv.divisor_heatpump,
    };
    let minimum = match kind {
        ScenarioKind::PvOnly => 0.0,
        ScenarioKind::PvBattery => pv.min_kwp_battery,
        ScenarioKind::PvBatteryHeatpump => pv.min_kwp_heatpump,
    };
    let candidate = (total_load_kwh / divisor).max(minimum);

    let roof_cap = (params.roof_area_sqm / pv.sqm_per_kwp).floor().max(0.0);
    let house_cap = pv.house_cap_kwp(params.house_type);
    let chosen = round_tenth(candidate.min(roof_cap).min(house_cap));

    let warning = (candidate > roof_cap).then(|| EngineWarning {
        scenario: kind,
        message: format!(
            "PV capacity capped by roof area: ideal {candidate:.1} kWp, roof allows {roof_cap:.0} kWp"
        ),
    });
    (chosen, warning)
}

/// Recommends a battery capacity from daily load, clamped to the reference
/// range and capped at two average days of PV yield.
fn size_battery(total_load_kwh: f32, pv_kwp: f32, reference: &ReferenceData) -> f32 {
    let b = &reference.battery;
    let daily_load = total_load_kwh / 365.0;
    let recommended = (daily_load * b.daily_load_factor).clamp(b.min_kwh, b.max_kwh);
    let daily_pv = pv_kwp * reference.pv.yield_per_kwp / 365.0;
    recommended.min(daily_pv * 2.0)
}

/// Applies the autarky band policy to a raw balance.
///
/// When the band clamps the raw value, self-use is re-derived from the
/// clamped percentage and grid import and feed-in follow, preserving
/// `grid_import + self_use == load`.
fn apply_autarky_band(kind: ScenarioKind, load_kwh: f32, raw: EnergyBalance) -> EnergyBalance {
    let band = autarky_band(kind);
    let clamped_pct = raw.autarky_pct.clamp(band.min_pct, band.max_pct);
    if (clamped_pct - raw.autarky_pct).abs() < f32::EPSILON || load_kwh <= 0.0 {
        return raw;
    }
    let self_use = load_kwh * clamped_pct / 100.0;
    EnergyBalance {
        self_use_kwh: self_use,
        grid_import_kwh: (load_kwh - self_use).max(0.0),
        feed_in_kwh: (raw.pv_generation_kwh - self_use).max(0.0),
        autarky_pct: clamped_pct,
        ..raw
    }
}

/// Builds the three sized scenarios in fixed order.
///
/// Assumes validated parameters; see [`crate::engine::evaluate`] for the
/// validating entry point.
pub fn build_scenarios(
    params: &HouseholdParameters,
    reference: &ReferenceData,
) -> (Vec<SizedScenario>, Vec<EngineWarning>) {
    let blocks = demand_blocks(params, reference);
    let cop = adjusted_cop(params, reference);
    let mut scenarios = Vec::with_capacity(ScenarioKind::ALL.len());
    let mut warnings = Vec::new();

    for kind in ScenarioKind::ALL {
        let heatpump_electric_kwh = if kind.includes_heatpump() {
            blocks.heating_kwh / cop
        } else {
            0.0
        };
        let heatpump_power_kw = if kind.includes_heatpump() {
            blocks.heating_kwh / reference.heatpump.full_load_hours
        } else {
            0.0
        };
        let electric_load_kwh =
            blocks.household_kwh + blocks.aircon_kwh + blocks.ev_kwh + heatpump_electric_kwh;
        let gas_load_kwh = if kind.includes_heatpump() {
            0.0
        } else {
            blocks.heating_kwh
        };

        let (pv_kwp, warning) = size_pv(kind, electric_load_kwh, params, reference);
        if let Some(w) = warning {
            warnings.push(w);
        }
        let battery_kwh = if kind.includes_battery() {
            size_battery(electric_load_kwh, pv_kwp, reference)
        } else {
            0.0
        };

        let mut extras_eur = 0.0;
        if params.air_conditioning {
            extras_eur += reference.equipment.aircon_cost_eur;
        }
        if params.wallbox {
            extras_eur += reference.equipment.wallbox_cost_eur;
        }
        let pv_eur = pv_kwp * reference.pv.cost_per_kwp;
        let battery_eur = battery_kwh * reference.battery.cost_per_kwh;
        let heatpump_eur = heatpump_power_kw * reference.heatpump.cost_per_kw;
        let costs = CostBreakdown {
            pv_eur,
            battery_eur,
            heatpump_eur,
            extras_eur,
            total_eur: pv_eur + battery_eur + heatpump_eur + extras_eur,
        };

        let raw = estimate_balance(
            pv_kwp,
            battery_kwh,
            electric_load_kwh,
            reference.pv.yield_per_kwp,
            params.wallbox,
            blocks.ev_kwh,
        );
        let balance = apply_autarky_band(kind, electric_load_kwh, raw);

        let electric_pct = balance.autarky_pct;
        let heating_pct = if kind.includes_heatpump() {
            electric_pct
        } else {
            0.0
        };
        let total_need = electric_load_kwh + gas_load_kwh;
        let combined_pct = if total_need > 0.0 {
            balance.self_use_kwh / total_need * 100.0
        } else {
            0.0
        };

        scenarios.push(SizedScenario {
            kind,
            pv_kwp,
            battery_kwh,
            heatpump_power_kw,
            heatpump_electric_kwh,
            electric_load_kwh,
            gas_load_kwh,
            costs,
            balance,
            autarky: Autarky {
                electric_pct,
                heating_pct,
                combined_pct,
            },
        });
    }

    (scenarios, warnings)
}

//! Result types for the scenario engine.

use std::fmt;

use serde::Serialize;

/// One of the three fixed equipment configurations, always evaluated in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Photovoltaics without storage.
    PvOnly,
    /// Photovoltaics with battery storage.
    PvBattery,
    /// Photovoltaics, battery storage, and heat pump.
    PvBatteryHeatpump,
}

impl ScenarioKind {
    /// All kinds in their fixed evaluation order.
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::PvOnly,
        ScenarioKind::PvBattery,
        ScenarioKind::PvBatteryHeatpump,
    ];

    /// Whether this scenario includes battery storage.
    pub fn includes_battery(self) -> bool {
        !matches!(self, ScenarioKind::PvOnly)
    }

    /// Whether this scenario includes a heat pump.
    pub fn includes_heatpump(self) -> bool {
        matches!(self, ScenarioKind::PvBatteryHeatpump)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ScenarioKind::PvOnly => "PV only",
            ScenarioKind::PvBattery => "PV + battery",
            ScenarioKind::PvBatteryHeatpump => "PV + battery + heat pump",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Investment cost breakdown in EUR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    /// PV installation.
    pub pv_eur: f32,
    /// Battery storage.
    pub battery_eur: f32,
    /// Heat pump.
    pub heatpump_eur: f32,
    /// A/C and wallbox equipment; not part of the amortizable investment.
    pub extras_eur: f32,
    /// Sum of all components.
    pub total_eur: f32,
}

/// Autarky percentages per energy need.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Autarky {
    /// Share of electric load covered on-site (0 to 100).
    pub electric_pct: f32,
    /// Share of heating need covered on-site (0 without heat pump).
    pub heating_pct: f32,
    /// Share of total energy need (electric + gas) covered on-site.
    pub combined_pct: f32,
}

/// Illustrative CO2-saving equivalents over the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Co2Equivalents {
    /// Tree-years of CO2 uptake.
    pub trees: f32,
    /// Medium-haul flights.
    pub flights: f32,
    /// Combustion car kilometers.
    pub car_km: f32,
}

/// Complete result record for one equipment scenario.
///
/// Constructed fresh on every evaluation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    /// Equipment configuration.
    pub kind: ScenarioKind,
    /// Recommended PV capacity (kWp).
    pub pv_kwp: f32,
    /// Recommended battery capacity (kWh), 0 without battery.
    pub battery_kwh: f32,
    /// Heat pump thermal output (kW), 0 without heat pump.
    pub heatpump_power_kw: f32,
    /// Heat pump electricity draw (kWh/a), 0 without heat pump.
    pub heatpump_electric_kwh: f32,
    /// Household baseline electricity (kWh/a).
    pub household_kwh: f32,
    /// A/C extra electricity (kWh/a).
    pub aircon_kwh: f32,
    /// EV charging electricity (kWh/a).
    pub ev_charge_kwh: f32,
    /// Total annual electric load (kWh/a).
    pub electric_load_kwh: f32,
    /// Remaining gas heating demand (kWh/a), 0 with heat pump.
    pub gas_load_kwh: f32,
    /// Investment cost breakdown.
    pub costs: CostBreakdown,
    /// Annual PV generation (kWh/a).
    pub pv_generation_kwh: f32,
    /// On-site consumed generation (kWh/a).
    pub self_use_kwh: f32,
    /// Grid import (kWh/a).
    pub grid_import_kwh: f32,
    /// Grid feed-in (kWh/a).
    pub feed_in_kwh: f32,
    /// Diagnostic: EV charge covered from the battery (kWh/a).
    pub ev_from_battery_kwh: f32,
    /// Autarky percentages.
    pub autarky: Autarky,
    /// Annual operating cost after the retrofit (EUR/a).
    pub annual_operating_cost_eur: f32,
    /// Annual savings against the status quo (EUR/a).
    pub annual_savings_eur: f32,
    /// Inflation-adjusted savings over the projection horizon (EUR).
    pub savings_horizon_eur: f32,
    /// First year cumulative savings cover the net investment, if reachable.
    pub break_even_years: Option<u32>,
    /// Status-quo emissions (kg CO2/a).
    pub co2_today_kg: f32,
    /// Emissions after the retrofit (kg CO2/a).
    pub co2_after_kg: f32,
    /// Annual emission saving (kg CO2/a).
    pub co2_saving_kg: f32,
    /// Emission saving over the projection horizon (kg CO2).
    pub co2_saving_horizon_kg: f32,
    /// Illustrative equivalents of the horizon saving.
    pub co2_equivalents: Co2Equivalents,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.kind)?;
        writeln!(
            f,
            "PV {:>5.1} kWp ({:.0} kWh/a)  battery {:>4.1} kWh  heat pump {:>4.1} kW",
            self.pv_kwp, self.pv_generation_kwh, self.battery_kwh, self.heatpump_power_kw
        )?;
        writeln!(
            f,
            "load {:.0} kWh/a  self-use {:.0}  grid {:.0}  feed-in {:.0}  autarky {:.0}%",
            self.electric_load_kwh,
            self.self_use_kwh,
            self.grid_import_kwh,
            self.feed_in_kwh,
            self.autarky.electric_pct
        )?;
        writeln!(
            f,
            "invest {:.0} EUR  operating {:.0} EUR/a  savings {:.0} EUR/a",
            self.costs.total_eur, self.annual_operating_cost_eur, self.annual_savings_eur
        )?;
        match self.break_even_years {
            Some(y) => writeln!(f, "break-even after {y} years")?,
            None => writeln!(f, "break-even not reached")?,
        }
        write!(
            f,
            "CO2 {:.0} -> {:.0} kg/a (saves {:.0} kg/a)",
            self.co2_today_kg, self.co2_after_kg, self.co2_saving_kg
        )
    }
}

/// Non-fatal notice attached to an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineWarning {
    /// Scenario the warning refers to.
    pub scenario: ScenarioKind,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning [{}]: {}", self.scenario, self.message)
    }
}

/// Complete engine output: the three scenarios in fixed order plus
/// non-fatal warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Scenario records in fixed order: PV-only, PV+battery,
    /// PV+battery+heat-pump.
    pub scenarios: Vec<Scenario>,
    /// Non-fatal warnings collected during sizing.
    pub warnings: Vec<EngineWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_order_and_flags() {
        assert_eq!(ScenarioKind::ALL.len(), 3);
        assert!(!ScenarioKind::PvOnly.includes_battery());
        assert!(!ScenarioKind::PvOnly.includes_heatpump());
        assert!(ScenarioKind::PvBattery.includes_battery());
        assert!(!ScenarioKind::PvBattery.includes_heatpump());
        assert!(ScenarioKind::PvBatteryHeatpump.includes_battery());
        assert!(ScenarioKind::PvBatteryHeatpump.includes_heatpump());
    }

    #[test]
    fn warning_display_names_scenario() {
        let w = EngineWarning {
            scenario: ScenarioKind::PvBattery,
            message: "PV capped by roof area".into(),
        };
        let s = w.to_string();
        assert!(s.contains("PV + battery"));
        assert!(s.contains("roof area"));
    }
}

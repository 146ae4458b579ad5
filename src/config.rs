//! TOML-based reference data: tariffs, consumption coefficients, and
//! equipment cost/clamp factors.
//!
//! The engine never mutates this data; it is loaded once (built-in defaults
//! or a TOML file) and passed by reference into every calculation. A load
//! or validation failure is the "reference data unavailable" condition and
//! blocks all scenario computation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::{HouseType, InsulationLevel};

/// Top-level reference data parsed from TOML.
///
/// All fields have defaults representing a typical German single-family
/// retrofit market snapshot. Load from TOML with
/// [`ReferenceData::from_toml_file`] or use [`ReferenceData::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceData {
    /// Energy prices, feed-in tariff, and per-carrier inflation.
    #[serde(default)]
    pub tariffs: Tariffs,
    /// Household and heating consumption coefficients.
    #[serde(default)]
    pub consumption: Consumption,
    /// Heat pump COP model and cost factors.
    #[serde(default)]
    pub heatpump: Heatpump,
    /// PV yield, cost, and sizing factors.
    #[serde(default)]
    pub pv: Pv,
    /// Battery cost and sizing clamp factors.
    #[serde(default)]
    pub battery: Battery,
    /// EV-versus-combustion comparison assumptions.
    #[serde(default)]
    pub vehicle: Vehicle,
    /// CO2 emission factors and equivalent constants.
    #[serde(default)]
    pub co2: Co2,
    /// Fixed equipment extras not part of the energy investment.
    #[serde(default)]
    pub equipment: Equipment,
    /// Multi-year projection horizon and caps.
    #[serde(default)]
    pub projection: Projection,
}

/// Energy prices in EUR/kWh and annual price inflation rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tariffs {
    /// Grid electricity price (EUR/kWh).
    pub electricity_eur_per_kwh: f32,
    /// Gas price (EUR/kWh).
    pub gas_eur_per_kwh: f32,
    /// Feed-in compensation (EUR/kWh).
    pub feed_in_eur_per_kwh: f32,
    /// Annual electricity price inflation (fraction, e.g. 0.03).
    pub electricity_inflation: f32,
    /// Annual gas price inflation (fraction).
    pub gas_inflation: f32,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            electricity_eur_per_kwh: 0.35,
            gas_eur_per_kwh: 0.11,
            feed_in_eur_per_kwh: 0.082,
            electricity_inflation: 0.03,
            gas_inflation: 0.04,
        }
    }
}

/// Per-insulation-level heating demand coefficients (kWh per m² per year).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatingPerSqm {
    /// Good insulation (recent build or fully renovated).
    pub good: f32,
    /// Normal insulation.
    pub normal: f32,
    /// Poor insulation (unrenovated older building).
    pub poor: f32,
}

impl Default for HeatingPerSqm {
    fn default() -> Self {
        Self {
            good: 80.0,
            normal: 110.0,
            poor: 155.0,
        }
    }
}

/// Household and heating consumption coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Consumption {
    /// Household electricity per occupant (kWh per year).
    pub per_person_kwh: f32,
    /// Heating demand per m² for row houses, by insulation level.
    pub heating_row: HeatingPerSqm,
    /// Heating demand per m² for semi-detached houses, by insulation level.
    pub heating_semi_detached: HeatingPerSqm,
    /// Heating demand per m² for detached houses, by insulation level.
    pub heating_detached: HeatingPerSqm,
    /// Extra household electricity when air conditioning is installed (kWh/a).
    pub aircon_extra_kwh: f32,
}

impl Default for Consumption {
    fn default() -> Self {
        Self {
            per_person_kwh: 1400.0,
            heating_row: HeatingPerSqm {
                good: 70.0,
                normal: 100.0,
                poor: 140.0,
            },
            heating_semi_detached: HeatingPerSqm {
                good: 80.0,
                normal: 110.0,
                poor: 155.0,
            },
            heating_detached: HeatingPerSqm {
                good: 90.0,
                normal: 125.0,
                poor: 170.0,
            },
            aircon_extra_kwh: 450.0,
        }
    }
}

impl Consumption {
    /// Heating demand coefficient (kWh per m² per year) for a house type
    /// and insulation level.
    pub fn heating_per_sqm(&self, house: HouseType, insulation: InsulationLevel) -> f32 {
        let table = match house {
            HouseType::Row => &self.heating_row,
            HouseType::SemiDetached => &self.heating_semi_detached,
            HouseType::Detached => &self.heating_detached,
        };
        match insulation {
            InsulationLevel::Good => table.good,
            InsulationLevel::Normal => table.normal,
            InsulationLevel::Poor => table.poor,
        }
    }
}

/// Heat pump COP model and cost factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Heatpump {
    /// Base seasonal COP before adjustment factors.
    pub base_cop: f32,
    /// COP multiplier for good insulation.
    pub cop_factor_good_insulation: f32,
    /// COP multiplier for normal insulation.
    pub cop_factor_normal_insulation: f32,
    /// COP multiplier for poor insulation.
    pub cop_factor_poor_insulation: f32,
    /// COP multiplier with floor heating (low flow temperature).
    pub cop_factor_floor_heating: f32,
    /// Lower bound for the adjusted COP.
    pub cop_min: f32,
    /// Upper bound for the adjusted COP.
    pub cop_max: f32,
    /// Installed cost per kW of thermal output (EUR).
    pub cost_per_kw: f32,
    /// Annual full-load hours used to size thermal output from demand.
    pub full_load_hours: f32,
}

impl Default for Heatpump {
    fn default() -> Self {
        Self {
            base_cop: 3.0,
            cop_factor_good_insulation: 1.10,
            cop_factor_normal_insulation: 1.0,
            cop_factor_poor_insulation: 0.85,
            cop_factor_floor_heating: 1.15,
            cop_min: 2.5,
            cop_max: 3.5,
            cost_per_kw: 1500.0,
            full_load_hours: 1800.0,
        }
    }
}

/// PV yield, cost, and sizing factors.
///
/// Sizing divisors and minimums live here rather than as hard constants so
/// tests can exercise the clamping logic with synthetic values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pv {
    /// Specific annual yield (kWh per kWp).
    pub yield_per_kwp: f32,
    /// Installed cost per kWp (EUR).
    pub cost_per_kwp: f32,
    /// Roof area required per kWp (m²).
    pub sqm_per_kwp: f32,
    /// Sizing divisor for the PV-only scenario (kWh of load per kWp).
    pub divisor_pv_only: f32,
    /// Sizing divisor when a battery is included (lower: relatively more PV).
    pub divisor_battery: f32,
    /// Sizing divisor when a heat pump is included.
    pub divisor_heatpump: f32,
    /// Minimum capacity when a battery is included (kWp).
    pub min_kwp_battery: f32,
    /// Minimum capacity when a heat pump is included (kWp).
    pub min_kwp_heatpump: f32,
    /// Capacity ceiling for row houses (kWp).
    pub max_kwp_row: f32,
    /// Capacity ceiling for semi-detached houses (kWp).
    pub max_kwp_semi_detached: f32,
    /// Capacity ceiling for detached houses (kWp).
    pub max_kwp_detached: f32,
}

impl Default for Pv {
    fn default() -> Self {
        Self {
            yield_per_kwp: 950.0,
            cost_per_kwp: 1550.0,
            sqm_per_kwp: 7.0,
            divisor_pv_only: 1000.0,
            divisor_battery: 900.0,
            divisor_heatpump: 800.0,
            min_kwp_battery: 7.0,
            min_kwp_heatpump: 9.0,
            max_kwp_row: 12.0,
            max_kwp_semi_detached: 15.0,
            max_kwp_detached: 20.0,
        }
    }
}

impl Pv {
    /// House-type capacity ceiling in kWp.
    pub fn house_cap_kwp(&self, house: HouseType) -> f32 {
        match house {
            HouseType::Row => self.max_kwp_row,
            HouseType::SemiDetached => self.max_kwp_semi_detached,
            HouseType::Detached => self.max_kwp_detached,
        }
    }
}

/// Battery cost and sizing clamp factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Battery {
    /// Installed cost per kWh of capacity (EUR).
    pub cost_per_kwh: f32,
    /// Recommended capacity as a fraction of average daily load.
    pub daily_load_factor: f32,
    /// Minimum recommended capacity (kWh).
    pub min_kwh: f32,
    /// Maximum recommended capacity (kWh).
    pub max_kwh: f32,
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            cost_per_kwh: 600.0,
            daily_load_factor: 0.8,
            min_kwh: 5.0,
            max_kwh: 12.0,
        }
    }
}

/// EV-versus-combustion comparison assumptions for wallbox households.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Vehicle {
    /// Annual driving distance (km).
    pub annual_km: f32,
    /// EV consumption (kWh per 100 km).
    pub ev_kwh_per_100km: f32,
    /// Annual fuel cost of the replaced combustion car (EUR).
    pub combustion_fuel_cost_eur: f32,
    /// Annual CO2 emissions of the replaced combustion car (kg).
    pub combustion_co2_kg: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            annual_km: 15_000.0,
            ev_kwh_per_100km: 17.0,
            combustion_fuel_cost_eur: 1940.0,
            combustion_co2_kg: 2415.0,
        }
    }
}

/// CO2 emission factors (kg/kWh) and equivalent constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Co2 {
    /// Grid electricity emission factor (kg CO2 per kWh).
    pub electricity_factor: f32,
    /// Gas heating emission factor (kg CO2 per kWh).
    pub gas_factor: f32,
    /// EV charging mix emission factor (kg CO2 per kWh).
    pub ev_mix_factor: f32,
    /// Annual growth applied to avoided emissions in the projection.
    pub annual_growth: f32,
    /// CO2 bound per tree per year (kg).
    pub tree_kg_per_year: f32,
    /// CO2 per medium-haul flight (kg).
    pub flight_kg: f32,
    /// CO2 per 1000 km of combustion car driving (kg).
    pub car_kg_per_1000km: f32,
}

impl Default for Co2 {
    fn default() -> Self {
        Self {
            electricity_factor: 0.38,
            gas_factor: 0.20,
            ev_mix_factor: 0.35,
            annual_growth: 0.02,
            tree_kg_per_year: 12.5,
            flight_kg: 600.0,
            car_kg_per_1000km: 150.0,
        }
    }
}

/// Fixed equipment extras selected alongside the energy investment.
///
/// These are added to scenario total cost but excluded from the amortizable
/// net investment in the break-even search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Equipment {
    /// Air conditioning unit cost (EUR).
    pub aircon_cost_eur: f32,
    /// Wallbox installation cost (EUR).
    pub wallbox_cost_eur: f32,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            aircon_cost_eur: 3500.0,
            wallbox_cost_eur: 1800.0,
        }
    }
}

/// Multi-year projection horizon and caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Projection {
    /// Savings/CO2 projection horizon in years.
    pub horizon_years: u32,
    /// Hard cap on the break-even search (years).
    pub break_even_cap_years: u32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            horizon_years: 20,
            break_even_cap_years: 40,
        }
    }
}

/// Reference data error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"pv.yield_per_kwp"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reference data error: {}: {}", self.field, self.message)
    }
}

fn require_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f32) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError {
            field: field.to_string(),
            message: format!("must be a non-negative number, got {value}"),
        });
    }
}

fn require_positive(errors: &mut Vec<ConfigError>, field: &str, value: f32) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigError {
            field: field.to_string(),
            message: format!("must be > 0, got {value}"),
        });
    }
}

impl ReferenceData {
    /// Parses reference data from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "reference".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses reference data from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all factors and returns a list of errors.
    ///
    /// Returns an empty vector if the data is usable. All factors must be
    /// non-negative and the COP model must stay at or above 1.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let t = &self.tariffs;
        require_non_negative(
            &mut errors,
            "tariffs.electricity_eur_per_kwh",
            t.electricity_eur_per_kwh,
        );
        require_non_negative(&mut errors, "tariffs.gas_eur_per_kwh", t.gas_eur_per_kwh);
        require_non_negative(
            &mut errors,
            "tariffs.feed_in_eur_per_kwh",
            t.feed_in_eur_per_kwh,
        );
        for (field, rate) in [
            ("tariffs.electricity_inflation", t.electricity_inflation),
            ("tariffs.gas_inflation", t.gas_inflation),
        ] {
            if !rate.is_finite() || rate <= -1.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be a finite rate > -1.0".into(),
                });
            }
        }

        let c = &self.consumption;
        require_positive(&mut errors, "consumption.per_person_kwh", c.per_person_kwh);
        require_non_negative(&mut errors, "consumption.aircon_extra_kwh", c.aircon_extra_kwh);
        for (name, table) in [
            ("heating_row", &c.heating_row),
            ("heating_semi_detached", &c.heating_semi_detached),
            ("heating_detached", &c.heating_detached),
        ] {
            require_positive(&mut errors, &format!("consumption.{name}.good"), table.good);
            require_positive(
                &mut errors,
                &format!("consumption.{name}.normal"),
                table.normal,
            );
            require_positive(&mut errors, &format!("consumption.{name}.poor"), table.poor);
        }

        let hp = &self.heatpump;
        if !hp.base_cop.is_finite() || hp.base_cop < 1.0 {
            errors.push(ConfigError {
                field: "heatpump.base_cop".into(),
                message: format!("must be >= 1.0, got {}", hp.base_cop),
            });
        }
        if !hp.cop_min.is_finite() || hp.cop_min < 1.0 {
            errors.push(ConfigError {
                field: "heatpump.cop_min".into(),
                message: format!("must be >= 1.0, got {}", hp.cop_min),
            });
        }
        if hp.cop_min > hp.cop_max {
            errors.push(ConfigError {
                field: "heatpump.cop_min".into(),
                message: "must be <= heatpump.cop_max".into(),
            });
        }
        require_positive(
            &mut errors,
            "heatpump.cop_factor_good_insulation",
            hp.cop_factor_good_insulation,
        );
        require_positive(
            &mut errors,
            "heatpump.cop_factor_normal_insulation",
            hp.cop_factor_normal_insulation,
        );
        require_positive(
            &mut errors,
            "heatpump.cop_factor_poor_insulation",
            hp.cop_factor_poor_insulation,
        );
        require_positive(
            &mut errors,
            "heatpump.cop_factor_floor_heating",
            hp.cop_factor_floor_heating,
        );
        require_non_negative(&mut errors, "heatpump.cost_per_kw", hp.cost_per_kw);
        require_positive(&mut errors, "heatpump.full_load_hours", hp.full_load_hours);

        let pv = &self.pv;
        require_positive(&mut errors, "pv.yield_per_kwp", pv.yield_per_kwp);
        require_non_negative(&mut errors, "pv.cost_per_kwp", pv.cost_per_kwp);
        require_positive(&mut errors, "pv.sqm_per_kwp", pv.sqm_per_kwp);
        require_positive(&mut errors, "pv.divisor_pv_only", pv.divisor_pv_only);
        require_positive(&mut errors, "pv.divisor_battery", pv.divisor_battery);
        require_positive(&mut errors, "pv.divisor_heatpump", pv.divisor_heatpump);
        require_non_negative(&mut errors, "pv.min_kwp_battery", pv.min_kwp_battery);
        require_non_negative(&mut errors, "pv.min_kwp_heatpump", pv.min_kwp_heatpump);
        require_positive(&mut errors, "pv.max_kwp_row", pv.max_kwp_row);
        require_positive(
            &mut errors,
            "pv.max_kwp_semi_detached",
            pv.max_kwp_semi_detached,
        );
        require_positive(&mut errors, "pv.max_kwp_detached", pv.max_kwp_detached);

        let b = &self.battery;
        require_non_negative(&mut errors, "battery.cost_per_kwh", b.cost_per_kwh);
        require_positive(&mut errors, "battery.daily_load_factor", b.daily_load_factor);
        require_non_negative(&mut errors, "battery.min_kwh", b.min_kwh);
        if b.min_kwh > b.max_kwh {
            errors.push(ConfigError {
                field: "battery.min_kwh".into(),
                message: "must be <= battery.max_kwh".into(),
            });
        }

        let v = &self.vehicle;
        require_non_negative(&mut errors, "vehicle.annual_km", v.annual_km);
        require_positive(&mut errors, "vehicle.ev_kwh_per_100km", v.ev_kwh_per_100km);
        require_non_negative(
            &mut errors,
            "vehicle.combustion_fuel_cost_eur",
            v.combustion_fuel_cost_eur,
        );
        require_non_negative(&mut errors, "vehicle.combustion_co2_kg", v.combustion_co2_kg);

        let co2 = &self.co2;
        require_non_negative(&mut errors, "co2.electricity_factor", co2.electricity_factor);
        require_non_negative(&mut errors, "co2.gas_factor", co2.gas_factor);
        require_non_negative(&mut errors, "co2.ev_mix_factor", co2.ev_mix_factor);
        require_positive(&mut errors, "co2.tree_kg_per_year", co2.tree_kg_per_year);
        require_positive(&mut errors, "co2.flight_kg", co2.flight_kg);
        require_positive(&mut errors, "co2.car_kg_per_1000km", co2.car_kg_per_1000km);
        if !co2.annual_growth.is_finite() || co2.annual_growth <= -1.0 {
            errors.push(ConfigError {
                field: "co2.annual_growth".into(),
                message: "must be a finite rate > -1.0".into(),
            });
        }

        let eq = &self.equipment;
        require_non_negative(&mut errors, "equipment.aircon_cost_eur", eq.aircon_cost_eur);
        require_non_negative(&mut errors, "equipment.wallbox_cost_eur", eq.wallbox_cost_eur);

        let p = &self.projection;
        if p.horizon_years == 0 {
            errors.push(ConfigError {
                field: "projection.horizon_years".into(),
                message: "must be > 0".into(),
            });
        }
        if p.break_even_cap_years == 0 {
            errors.push(ConfigError {
                field: "projection.break_even_cap_years".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

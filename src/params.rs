//! Household input parameters, presets, and entry-point validation.
//!
//! Validation happens exactly once here; the engine and everything below it
//! assume finite, in-range inputs by contract and never re-validate.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// House construction type. Determines heating coefficients and the
/// house-type PV capacity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HouseType {
    /// Row house (terraced).
    Row,
    /// Semi-detached house.
    SemiDetached,
    /// Detached single-family house.
    Detached,
}

/// Insulation quality of the building shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsulationLevel {
    /// Recent build or fully renovated.
    Good,
    /// Average existing building.
    Normal,
    /// Unrenovated older building.
    Poor,
}

/// Optional user overrides.
///
/// Any override that is set takes precedence over the corresponding computed
/// default until reset to `None`; absence means the default is recomputed
/// from house type, area, occupants, and insulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Electricity price (EUR/kWh).
    pub electricity_price: Option<f32>,
    /// Gas price (EUR/kWh).
    pub gas_price: Option<f32>,
    /// Annual household electricity baseline (kWh).
    pub household_electric_kwh: Option<f32>,
    /// Annual heating demand baseline (kWh).
    pub heating_demand_kwh: Option<f32>,
    /// Annual driving distance (km).
    pub annual_km: Option<f32>,
    /// EV consumption (kWh per 100 km).
    pub ev_kwh_per_100km: Option<f32>,
}

/// Household parameters for one calculation, immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdParameters {
    /// House construction type.
    pub house_type: HouseType,
    /// Heated floor area (m²).
    pub area_sqm: f32,
    /// Number of occupants.
    pub occupants: u32,
    /// Insulation quality.
    pub insulation: InsulationLevel,
    /// Floor heating installed (raises heat pump COP).
    pub floor_heating: bool,
    /// Air conditioning selected.
    pub air_conditioning: bool,
    /// Wallbox EV charging selected (replaces a combustion car).
    pub wallbox: bool,
    /// Usable roof area for PV (m²).
    pub roof_area_sqm: f32,
    /// Region code (informational, e.g. federal state).
    pub region: String,
    /// Construction year of the house.
    pub build_year: u32,
    /// Optional user overrides.
    pub overrides: Overrides,
}

impl Default for HouseholdParameters {
    fn default() -> Self {
        Self::starter()
    }
}

/// Invalid input error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct InputError {
    /// Field path (e.g., `"area_sqm"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}: {}", self.field, self.message)
    }
}

fn check_range(errors: &mut Vec<InputError>, field: &str, value: f32, min: f32, max: f32) {
    if !value.is_finite() || value < min || value > max {
        errors.push(InputError {
            field: field.to_string(),
            message: format!("must be between {min} and {max}, got {value}"),
        });
    }
}

fn check_override(
    errors: &mut Vec<InputError>,
    field: &str,
    value: Option<f32>,
    min: f32,
    max: f32,
) {
    if let Some(v) = value {
        check_range(errors, field, v, min, max);
    }
}

impl HouseholdParameters {
    /// Returns the starter preset: small row house, two occupants, no
    /// optional equipment.
    pub fn starter() -> Self {
        Self {
            house_type: HouseType::Row,
            area_sqm: 100.0,
            occupants: 2,
            insulation: InsulationLevel::Normal,
            floor_heating: false,
            air_conditioning: false,
            wallbox: false,
            roof_area_sqm: 40.0,
            region: "DE-BW".to_string(),
            build_year: 1995,
            overrides: Overrides::default(),
        }
    }

    /// Returns the family preset: detached house with wallbox and A/C.
    pub fn family() -> Self {
        Self {
            house_type: HouseType::Detached,
            area_sqm: 160.0,
            occupants: 4,
            insulation: InsulationLevel::Normal,
            floor_heating: true,
            air_conditioning: true,
            wallbox: true,
            roof_area_sqm: 80.0,
            region: "DE-BY".to_string(),
            build_year: 2005,
            overrides: Overrides::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["starter", "family"];

    /// Loads parameters from a named preset.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, InputError> {
        match name {
            "starter" => Ok(Self::starter()),
            "family" => Ok(Self::family()),
            _ => Err(InputError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses parameters from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, InputError> {
        let content = fs::read_to_string(path).map_err(|e| InputError {
            field: "params".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses parameters from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, InputError> {
        toml::from_str(s).map_err(|e| InputError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields against realistic ranges and returns a list of
    /// errors, empty if the parameters are usable.
    ///
    /// Any error blocks scenario computation entirely; there are no
    /// partially computed results.
    pub fn validate(&self) -> Vec<InputError> {
        let mut errors = Vec::new();

        check_range(&mut errors, "area_sqm", self.area_sqm, 20.0, 1000.0);
        if self.occupants == 0 || self.occupants > 12 {
            errors.push(InputError {
                field: "occupants".into(),
                message: format!("must be between 1 and 12, got {}", self.occupants),
            });
        }
        check_range(&mut errors, "roof_area_sqm", self.roof_area_sqm, 0.0, 500.0);
        if self.build_year < 1850 || self.build_year > 2100 {
            errors.push(InputError {
                field: "build_year".into(),
                message: format!("must be between 1850 and 2100, got {}", self.build_year),
            });
        }

        let o = &self.overrides;
        check_override(
            &mut errors,
            "overrides.electricity_price",
            o.electricity_price,
            0.01,
            5.0,
        );
        check_override(&mut errors, "overrides.gas_price", o.gas_price, 0.01, 2.0);
        check_override(
            &mut errors,
            "overrides.household_electric_kwh",
            o.household_electric_kwh,
            0.0,
            30_000.0,
        );
        check_override(
            &mut errors,
            "overrides.heating_demand_kwh",
            o.heating_demand_kwh,
            0.0,
            100_000.0,
        );
        check_override(&mut errors, "overrides.annual_km", o.annual_km, 0.0, 100_000.0);
        check_override(
            &mut errors,
            "overrides.ev_kwh_per_100km",
            o.ev_kwh_per_100km,
            5.0,
            40.0,
        );

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for name in HouseholdParameters::PRESETS {
            let params = HouseholdParameters::from_preset(name);
            assert!(params.is_ok(), "preset \"{name}\" should load");
            let errors = params.as_ref().map(|p| p.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = HouseholdParameters::from_preset("mansion");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn toml_round_trip_with_enums() {
        let toml = r#"
house_type = "semi-detached"
area_sqm = 140.0
occupants = 3
insulation = "poor"
wallbox = true
roof_area_sqm = 60.0
"#;
        let params = HouseholdParameters::from_toml_str(toml);
        assert!(params.is_ok(), "valid TOML should parse: {:?}", params.err());
        let params = params.ok();
        assert_eq!(
            params.as_ref().map(|p| p.house_type),
            Some(HouseType::SemiDetached)
        );
        assert_eq!(
            params.as_ref().map(|p| p.insulation),
            Some(InsulationLevel::Poor)
        );
        assert_eq!(params.as_ref().map(|p| p.occupants), Some(3));
        // unset fields keep preset defaults
        assert_eq!(params.as_ref().map(|p| p.floor_heating), Some(false));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = "garage_count = 2\n";
        assert!(HouseholdParameters::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_tiny_area() {
        let mut params = HouseholdParameters::starter();
        params.area_sqm = 5.0;
        let errors = params.validate();
        assert!(errors.iter().any(|e| e.field == "area_sqm"));
    }

    #[test]
    fn validation_catches_zero_occupants() {
        let mut params = HouseholdParameters::starter();
        params.occupants = 0;
        let errors = params.validate();
        assert!(errors.iter().any(|e| e.field == "occupants"));
    }

    #[test]
    fn validation_catches_non_finite_roof() {
        let mut params = HouseholdParameters::starter();
        params.roof_area_sqm = f32::NAN;
        let errors = params.validate();
        assert!(errors.iter().any(|e| e.field == "roof_area_sqm"));
    }

    #[test]
    fn validation_catches_bad_override_but_accepts_unset() {
        let mut params = HouseholdParameters::starter();
        assert!(params.validate().is_empty());

        params.overrides.electricity_price = Some(-0.3);
        let errors = params.validate();
        assert!(errors.iter().any(|e| e.field == "overrides.electricity_price"));

        params.overrides.electricity_price = None;
        assert!(params.validate().is_empty());
    }

    #[test]
    fn validation_collects_multiple_errors() {
        let mut params = HouseholdParameters::starter();
        params.area_sqm = 0.0;
        params.occupants = 0;
        let errors = params.validate();
        assert!(errors.len() >= 2);
    }
}

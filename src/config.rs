//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::battery::profile::{
    DEFAULT_CHARGE_EFFICIENCY, DEFAULT_SOC_MAX, DEFAULT_SOC_MIN, DEFAULT_SPEED_MPH,
};
use crate::cost::Tariff;
use crate::report::FleetInput;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Fleet composition and duty cycle.
    #[serde(default)]
    pub fleet: FleetConfig,
    /// Electricity tariff parameters.
    #[serde(default)]
    pub tariff: Tariff,
    /// Charging behaviour parameters.
    #[serde(default)]
    pub charging: ChargingConfig,
    /// Battery degradation parameters.
    #[serde(default)]
    pub degradation: DegradationConfig,
}

/// Fleet composition and duty cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    /// Number of vehicles in the fleet (must be > 0).
    pub num_ev: u32,
    /// Daily mileage per vehicle (mi).
    pub daily_mileage_mi: f32,
    /// Battery capacity per vehicle (kWh).
    pub battery_capacity_kwh: f32,
    /// Charger power rating (kW).
    pub charge_power_kw: f32,
    /// Vehicle efficiency (mi/kWh).
    pub efficiency_mi_per_kwh: f32,
    /// Usable SOC band as percentages, ascending.
    pub battery_dod: [f32; 2],
    /// Daily operating window as hours of day, ascending.
    pub working_hours: [f32; 2],
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            num_ev: 100,
            daily_mileage_mi: 250.0,
            battery_capacity_kwh: 60.0,
            charge_power_kw: 50.0,
            efficiency_mi_per_kwh: 4.5,
            battery_dod: [10.0, 90.0],
            working_hours: [7.0, 19.0],
        }
    }
}

/// Charging behaviour parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargingConfig {
    /// Charging efficiency (0..1.0).
    pub charge_efficiency: f32,
    /// Average driving speed for the profile simulation (mph).
    pub speed_mph: f32,
    /// Minimum allowable SOC during the working day.
    pub soc_min: f32,
    /// Maximum allowable SOC; charging stops here.
    pub soc_max: f32,
    /// Site-side cap on charge power (kW); 0 means uncapped.
    pub max_charge_power_kw: f32,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            charge_efficiency: DEFAULT_CHARGE_EFFICIENCY,
            speed_mph: DEFAULT_SPEED_MPH,
            soc_min: DEFAULT_SOC_MIN,
            soc_max: DEFAULT_SOC_MAX,
            max_charge_power_kw: 0.0,
        }
    }
}

/// Battery degradation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DegradationConfig {
    /// Capacity lost per year as a fraction.
    pub annual_rate: f32,
    /// Projection horizon (years).
    pub horizon_years: f32,
    /// Number of samples across the horizon.
    pub sample_points: usize,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            annual_rate: 0.035,
            horizon_years: 5.0,
            sample_points: 5,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"fleet.num_ev"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a mid-size delivery fleet.
    pub fn baseline() -> Self {
        Self {
            fleet: FleetConfig::default(),
            tariff: Tariff::default(),
            charging: ChargingConfig::default(),
            degradation: DegradationConfig::default(),
        }
    }

    /// Returns the urban-delivery preset: short routes, small packs,
    /// AC charging.
    pub fn urban_delivery() -> Self {
        Self {
            fleet: FleetConfig {
                num_ev: 50,
                daily_mileage_mi: 120.0,
                battery_capacity_kwh: 40.0,
                charge_power_kw: 11.0,
                efficiency_mi_per_kwh: 3.5,
                battery_dod: [20.0, 90.0],
                working_hours: [8.0, 18.0],
            },
            ..Self::baseline()
        }
    }

    /// Returns the long-haul preset: large packs, DC fast charging,
    /// multiple discharge cycles per day.
    pub fn long_haul() -> Self {
        Self {
            fleet: FleetConfig {
                num_ev: 20,
                daily_mileage_mi: 400.0,
                battery_capacity_kwh: 300.0,
                charge_power_kw: 150.0,
                efficiency_mi_per_kwh: 0.9,
                battery_dod: [10.0, 90.0],
                working_hours: [5.0, 21.0],
            },
            charging: ChargingConfig {
                speed_mph: 50.0,
                ..ChargingConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "urban_delivery", "long_haul"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "urban_delivery" => Ok(Self::urban_delivery()),
            "long_haul" => Ok(Self::long_haul()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
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

    /// The fleet section as an engine input record.
    pub fn fleet_input(&self) -> FleetInput {
        let f = &self.fleet;
        FleetInput {
            num_ev: f.num_ev,
            daily_mileage_mi: f.daily_mileage_mi,
            battery_capacity_kwh: f.battery_capacity_kwh,
            charge_power_kw: f.charge_power_kw,
            efficiency_mi_per_kwh: f.efficiency_mi_per_kwh,
            battery_dod: f.battery_dod,
            working_hours: f.working_hours,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let f = &self.fleet;

        if f.num_ev == 0 {
            errors.push(ConfigError {
                field: "fleet.num_ev".into(),
                message: "must be > 0".into(),
            });
        }
        if f.daily_mileage_mi <= 0.0 {
            errors.push(ConfigError {
                field: "fleet.daily_mileage_mi".into(),
                message: "must be > 0".into(),
            });
        }
        if f.battery_capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "fleet.battery_capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if f.charge_power_kw < 0.0 {
            errors.push(ConfigError {
                field: "fleet.charge_power_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if f.efficiency_mi_per_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "fleet.efficiency_mi_per_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=100.0).contains(&f.battery_dod[0])
            || !(0.0..=100.0).contains(&f.battery_dod[1])
            || f.battery_dod[0] >= f.battery_dod[1]
        {
            errors.push(ConfigError {
                field: "fleet.battery_dod".into(),
                message: "must be an ascending pair in [0, 100]".into(),
            });
        }
        if !(0.0..=24.0).contains(&f.working_hours[0])
            || !(0.0..=24.0).contains(&f.working_hours[1])
            || f.working_hours[0] >= f.working_hours[1]
        {
            errors.push(ConfigError {
                field: "fleet.working_hours".into(),
                message: "must be an ascending pair in [0, 24]".into(),
            });
        }

        let t = &self.tariff;
        if t.flat_rate <= 0.0 {
            errors.push(ConfigError {
                field: "tariff.flat_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&t.off_peak_ratio) {
            errors.push(ConfigError {
                field: "tariff.off_peak_ratio".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        let c = &self.charging;
        if c.charge_efficiency <= 0.0 || c.charge_efficiency > 1.0 {
            errors.push(ConfigError {
                field: "charging.charge_efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if c.speed_mph <= 0.0 {
            errors.push(ConfigError {
                field: "charging.speed_mph".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&c.soc_min)
            || c.soc_max > 1.0
            || c.soc_min >= c.soc_max
        {
            errors.push(ConfigError {
                field: "charging.soc_min".into(),
                message: "SOC band must be ascending within [0.0, 1.0]".into(),
            });
        }
        if c.max_charge_power_kw < 0.0 {
            errors.push(ConfigError {
                field: "charging.max_charge_power_kw".into(),
                message: "must be >= 0".into(),
            });
        }

        let d = &self.degradation;
        if !(0.0..1.0).contains(&d.annual_rate) {
            errors.push(ConfigError {
                field: "degradation.annual_rate".into(),
                message: "must be in [0.0, 1.0)".into(),
            });
        }
        if d.horizon_years <= 0.0 {
            errors.push(ConfigError {
                field: "degradation.horizon_years".into(),
                message: "must be > 0".into(),
            });
        }
        if d.sample_points == 0 {
            errors.push(ConfigError {
                field: "degradation.sample_points".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[fleet]
num_ev = 40
daily_mileage_mi = 180.0
battery_capacity_kwh = 75.0
charge_power_kw = 22.0
efficiency_mi_per_kwh = 4.0
battery_dod = [15.0, 85.0]
working_hours = [6.0, 20.0]

[tariff]
flat_rate = 0.30
off_peak_ratio = 0.4

[charging]
charge_efficiency = 0.92
speed_mph = 35.0
soc_min = 0.05
soc_max = 0.95
max_charge_power_kw = 22.0

[degradation]
annual_rate = 0.03
horizon_years = 8.0
sample_points = 9
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.fleet.num_ev), Some(40));
        assert_eq!(cfg.as_ref().map(|c| c.tariff.flat_rate), Some(0.30));
        assert_eq!(cfg.as_ref().map(|c| c.degradation.sample_points), Some(9));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[fleet]
num_ev = 24
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[fleet]
num_ev = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.fleet.num_ev), Some(7));
        // Everything else keeps baseline defaults.
        assert_eq!(cfg.as_ref().map(|c| c.fleet.battery_capacity_kwh), Some(60.0));
        assert_eq!(cfg.as_ref().map(|c| c.tariff.flat_rate), Some(0.245));
    }

    #[test]
    fn validation_catches_zero_fleet() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.fleet.num_ev = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fleet.num_ev"));
    }

    #[test]
    fn validation_catches_reversed_dod() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.fleet.battery_dod = [90.0, 10.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fleet.battery_dod"));
    }

    #[test]
    fn validation_catches_reversed_hours() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.fleet.working_hours = [19.0, 7.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fleet.working_hours"));
    }

    #[test]
    fn validation_catches_bad_off_peak_ratio() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.tariff.off_peak_ratio = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.off_peak_ratio"));
    }

    #[test]
    fn validation_catches_bad_degradation_rate() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.degradation.annual_rate = 1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "degradation.annual_rate"));
    }

    #[test]
    fn fleet_input_mirrors_fleet_section() {
        let cfg = ScenarioConfig::urban_delivery();
        let input = cfg.fleet_input();
        assert_eq!(input.num_ev, 50);
        assert_eq!(input.battery_capacity_kwh, 40.0);
        assert_eq!(input.battery_dod, [20.0, 90.0]);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn long_haul_runs_multiple_cycles() {
        let cfg = ScenarioConfig::long_haul();
        let f = &cfg.fleet;
        let daily = f.daily_mileage_mi / f.efficiency_mi_per_kwh;
        let usable = (f.battery_dod[1] - f.battery_dod[0]) / 100.0 * f.battery_capacity_kwh;
        assert!(daily / usable > 1.0);
    }
}

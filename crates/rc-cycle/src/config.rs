//! Engine configuration.
//!
//! Loaded from YAML or JSON. Everything except the rated compressor point has
//! a default; the rated point is required because volumetric efficiency
//! cannot be derived without it.

use crate::error::{ConfigError, EngineResult};
use rc_fluids::Refrigerant;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Discharge pressure at or above which the compressor counts as running [psig].
    #[serde(default = "default_on_time_threshold")]
    pub on_time_pressure_threshold_psig: f64,

    #[serde(default = "default_refrigerant")]
    pub refrigerant: String,

    /// Rated compressor point used to calibrate volumetric efficiency.
    #[serde(default)]
    pub rated: Option<RatedPoint>,

    #[serde(default = "default_pressure_ratio_bounds")]
    pub pressure_ratio_bounds: (f64, f64),

    #[serde(default = "default_superheat_bounds")]
    pub superheat_bounds_f: (f64, f64),

    /// Acceptance band for any enthalpy entering the cycle [kJ/kg].
    #[serde(default = "default_enthalpy_band")]
    pub enthalpy_band_kj_kg: (f64, f64),

    /// Allowed relative divergence between refrigerant and water heat.
    #[serde(default = "default_heat_balance_tolerance")]
    pub heat_balance_tolerance: f64,

    /// Condenser water flow [GPM] when no flow-meter channel is logged.
    #[serde(default)]
    pub water_gpm: Option<f64>,

    #[serde(default)]
    pub components: ComponentIds,

    #[serde(default = "default_circuits")]
    pub circuits: Vec<CircuitConfig>,

    /// Extra channel names tried before the built-in names, keyed by field.
    #[serde(default)]
    pub channel_aliases: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub dome: DomeConfig,
}

/// Rated compressor point. Fields are optional so validation can name what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatedPoint {
    pub mass_flow_lb_hr: Option<f64>,
    pub compressor_hz: Option<f64>,
    pub displacement_in3: Option<f64>,
    /// Rated suction density [lb/ft³]. Takes precedence over the temperatures below.
    pub suction_density_lb_ft3: Option<f64>,
    /// Rated evaporating (saturation) temperature [°F].
    pub evaporating_temp_f: Option<f64>,
    /// Rated return-gas temperature [°F].
    pub return_gas_temp_f: Option<f64>,
}

/// How the rated suction density is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatedDensity {
    Direct { lb_ft3: f64 },
    FromTemperatures { evaporating_f: f64, return_gas_f: f64 },
}

/// Rated point after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedInputs {
    pub mass_flow_lb_hr: f64,
    pub compressor_hz: f64,
    pub displacement_in3: f64,
    pub density: RatedDensity,
}

/// Component ids used to build role keys (`Compressor.<id>.SP`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentIds {
    pub compressor: Option<String>,
    pub condenser: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitConfig {
    pub label: String,
    #[serde(default)]
    pub txv: Option<String>,
    #[serde(default)]
    pub evaporator: Option<String>,
    /// Evaporator `outlet_circuit_N` ports feeding this circuit's outlet point.
    #[serde(default)]
    pub outlet_taps: Vec<u32>,
}

impl CircuitConfig {
    pub fn labelled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            txv: None,
            evaporator: None,
            outlet_taps: Vec::new(),
        }
    }
}

/// Pressure range for the saturation dome [kPa].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DomeConfig {
    pub p_min_kpa: f64,
    pub p_max_kpa: f64,
    pub points: usize,
}

impl Default for DomeConfig {
    fn default() -> Self {
        Self {
            p_min_kpa: 100.0,
            p_max_kpa: 4500.0,
            points: 50,
        }
    }
}

fn default_on_time_threshold() -> f64 {
    85.0
}

fn default_refrigerant() -> String {
    "R290".to_string()
}

fn default_pressure_ratio_bounds() -> (f64, f64) {
    (1.5, 10.0)
}

fn default_superheat_bounds() -> (f64, f64) {
    (5.0, 30.0)
}

fn default_enthalpy_band() -> (f64, f64) {
    (200.0, 700.0)
}

fn default_heat_balance_tolerance() -> f64 {
    0.15
}

fn default_circuits() -> Vec<CircuitConfig> {
    ["LH", "CTR", "RH"]
        .into_iter()
        .map(CircuitConfig::labelled)
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            on_time_pressure_threshold_psig: default_on_time_threshold(),
            refrigerant: default_refrigerant(),
            rated: None,
            pressure_ratio_bounds: default_pressure_ratio_bounds(),
            superheat_bounds_f: default_superheat_bounds(),
            enthalpy_band_kj_kg: default_enthalpy_band(),
            heat_balance_tolerance: default_heat_balance_tolerance(),
            water_gpm: None,
            components: ComponentIds::default(),
            circuits: default_circuits(),
            channel_aliases: BTreeMap::new(),
            dome: DomeConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> EngineResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_yaml(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn load_json(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.json` is JSON, anything else is YAML.
    pub fn load(path: &Path) -> EngineResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::load_json(path),
            _ => Self::load_yaml(path),
        }
    }

    pub fn refrigerant(&self) -> Result<Refrigerant, ConfigError> {
        self.refrigerant
            .parse()
            .map_err(|_| ConfigError::UnknownRefrigerant {
                name: self.refrigerant.clone(),
            })
    }

    /// Validated rated point.
    pub fn rated_inputs(&self) -> Result<RatedInputs, ConfigError> {
        let rated = self
            .rated
            .as_ref()
            .ok_or_else(|| ConfigError::missing("rated"))?;
        let mass_flow_lb_hr = required_positive("rated.mass_flow_lb_hr", rated.mass_flow_lb_hr)?;
        let compressor_hz = required_positive("rated.compressor_hz", rated.compressor_hz)?;
        let displacement_in3 = required_positive("rated.displacement_in3", rated.displacement_in3)?;

        let density = match (
            rated.suction_density_lb_ft3,
            rated.evaporating_temp_f,
            rated.return_gas_temp_f,
        ) {
            (Some(d), _, _) => RatedDensity::Direct {
                lb_ft3: required_positive("rated.suction_density_lb_ft3", Some(d))?,
            },
            (None, Some(evap), Some(rg)) => {
                required_finite("rated.evaporating_temp_f", evap)?;
                required_finite("rated.return_gas_temp_f", rg)?;
                if rg < evap {
                    return Err(ConfigError::invalid(
                        "rated.return_gas_temp_f",
                        rg,
                        "must not be below the rated evaporating temperature",
                    ));
                }
                RatedDensity::FromTemperatures {
                    evaporating_f: evap,
                    return_gas_f: rg,
                }
            }
            (None, None, _) => return Err(ConfigError::missing("rated.suction_density_lb_ft3")),
            (None, Some(_), None) => return Err(ConfigError::missing("rated.return_gas_temp_f")),
        };

        Ok(RatedInputs {
            mass_flow_lb_hr,
            compressor_hz,
            displacement_in3,
            density,
        })
    }

    /// Check every parameter; the first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        required_finite(
            "on_time_pressure_threshold_psig",
            self.on_time_pressure_threshold_psig,
        )?;
        self.refrigerant()?;
        self.rated_inputs()?;

        ordered_bounds("pressure_ratio_bounds", self.pressure_ratio_bounds)?;
        ordered_bounds("superheat_bounds_f", self.superheat_bounds_f)?;
        ordered_bounds("enthalpy_band_kj_kg", self.enthalpy_band_kj_kg)?;
        required_positive("heat_balance_tolerance", Some(self.heat_balance_tolerance))?;
        if let Some(gpm) = self.water_gpm {
            required_positive("water_gpm", Some(gpm))?;
        }

        if self.circuits.is_empty() {
            return Err(ConfigError::missing("circuits"));
        }
        let mut labels = HashSet::new();
        for circuit in &self.circuits {
            if circuit.label.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "circuits.label",
                    "\"\"",
                    "label must not be empty",
                ));
            }
            if !labels.insert(circuit.label.as_str()) {
                return Err(ConfigError::invalid(
                    "circuits.label",
                    &circuit.label,
                    "duplicate circuit label",
                ));
            }
        }

        if self.dome.points < 2 {
            return Err(ConfigError::invalid(
                "dome.points",
                self.dome.points,
                "need at least 2 points",
            ));
        }
        required_positive("dome.p_min_kpa", Some(self.dome.p_min_kpa))?;
        ordered_bounds("dome", (self.dome.p_min_kpa, self.dome.p_max_kpa))?;
        Ok(())
    }
}

fn required_finite(parameter: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::invalid(parameter, value, "must be finite"))
    }
}

fn required_positive(parameter: &str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::missing(parameter))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(parameter, value, "must be positive"));
    }
    Ok(value)
}

fn ordered_bounds(parameter: &str, (low, high): (f64, f64)) -> Result<(), ConfigError> {
    if !low.is_finite() || !high.is_finite() || low >= high {
        return Err(ConfigError::invalid(
            parameter,
            format!("({low}, {high})"),
            "need finite low < high",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated() -> RatedPoint {
        RatedPoint {
            mass_flow_lb_hr: Some(211.0),
            compressor_hz: Some(75.0),
            displacement_in3: Some(2.82),
            suction_density_lb_ft3: Some(0.50031),
            ..RatedPoint::default()
        }
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.on_time_pressure_threshold_psig, 85.0);
        assert_eq!(config.refrigerant, "R290");
        assert_eq!(config.pressure_ratio_bounds, (1.5, 10.0));
        assert_eq!(config.superheat_bounds_f, (5.0, 30.0));
        let labels: Vec<_> = config.circuits.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["LH", "CTR", "RH"]);
    }

    #[test]
    fn missing_rated_block_is_named() {
        let err = EngineConfig::default().validate().unwrap_err();
        assert_eq!(err.parameter(), Some("rated"));
    }

    #[test]
    fn missing_displacement_is_named() {
        let config = EngineConfig {
            rated: Some(RatedPoint {
                displacement_in3: None,
                ..rated()
            }),
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.parameter(), Some("rated.displacement_in3"));
        assert!(err.to_string().contains("rated.displacement_in3"));
    }

    #[test]
    fn non_positive_rated_speed_rejected() {
        let config = EngineConfig {
            rated: Some(RatedPoint {
                compressor_hz: Some(0.0),
                ..rated()
            }),
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.parameter(), Some("rated.compressor_hz"));
    }

    #[test]
    fn density_from_temperatures() {
        let config = EngineConfig {
            rated: Some(RatedPoint {
                suction_density_lb_ft3: None,
                evaporating_temp_f: Some(20.0),
                return_gas_temp_f: Some(65.0),
                ..rated()
            }),
            ..EngineConfig::default()
        };
        let inputs = config.rated_inputs().unwrap();
        assert_eq!(
            inputs.density,
            RatedDensity::FromTemperatures {
                evaporating_f: 20.0,
                return_gas_f: 65.0
            }
        );
    }

    #[test]
    fn duplicate_circuit_labels_rejected() {
        let config = EngineConfig {
            rated: Some(rated()),
            circuits: vec![CircuitConfig::labelled("LH"), CircuitConfig::labelled("LH")],
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_refrigerant() {
        let config = EngineConfig {
            rated: Some(rated()),
            refrigerant: "R999".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownRefrigerant { .. })
        ));
    }

    #[test]
    fn yaml_with_defaults() {
        let yaml = r#"
refrigerant: R290
rated:
  mass_flow_lb_hr: 211
  compressor_hz: 75
  displacement_in3: 2.82
  suction_density_lb_ft3: 0.50031
water_gpm: 3.5
circuits:
  - label: LH
    txv: txv1
    evaporator: 3408df
    outlet_taps: [1, 2]
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.on_time_pressure_threshold_psig, 85.0);
        assert_eq!(config.water_gpm, Some(3.5));
        assert_eq!(config.circuits.len(), 1);
        assert_eq!(config.circuits[0].outlet_taps, vec![1, 2]);
    }

    #[test]
    fn json_rejects_unknown_field() {
        let json = r#"{"rated": {"mass_flow_lb_hr": 211}, "bogus": 1}"#;
        assert!(EngineConfig::from_json_str(json).is_err());
    }
}

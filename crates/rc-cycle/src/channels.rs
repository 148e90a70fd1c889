//! Logical fields and their channel fallback chains.
//!
//! Every field resolves through an ordered list of candidate channel names:
//! channels assigned by the role mapping, then configured aliases, then the
//! built-in names the rig software has used over time. The first candidate
//! with a finite reading wins.

use crate::config::EngineConfig;
use crate::mapping::SensorRoleMapping;
use crate::sample::SensorSample;
use rc_core::{Avail, Reason, finite_mean};

/// A logical quantity read from a sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SuctionPressure,
    DischargePressure,
    CompressorRpm,
    /// Compressor inlet temperature (point 2b).
    CompressorInletTemp,
    /// Compressor outlet temperature (point 3a).
    CompressorOutletTemp,
    /// Condenser inlet temperature (point 3b).
    CondenserInletTemp,
    /// Condenser outlet temperature (point 4a).
    CondenserOutletTemp,
    CompressorInletEnthalpy,
    CompressorOutletEnthalpy,
    CondenserInletEnthalpy,
    CondenserOutletEnthalpy,
    WaterInTemp,
    WaterOutTemp,
    WaterFlow,
    /// TXV inlet temperature for a circuit (point 4b).
    TxvInletTemp(String),
    TxvInletEnthalpy(String),
    /// Evaporator outlet temperature for a circuit (point 2a).
    EvapOutletTemp(String),
    EvapOutletEnthalpy(String),
}

impl Field {
    /// Key used for `channel_aliases` and in "missing" reasons.
    pub fn key(&self) -> String {
        match self {
            Field::SuctionPressure => "suction_pressure".into(),
            Field::DischargePressure => "discharge_pressure".into(),
            Field::CompressorRpm => "compressor_rpm".into(),
            Field::CompressorInletTemp => "compressor_inlet_temp".into(),
            Field::CompressorOutletTemp => "compressor_outlet_temp".into(),
            Field::CondenserInletTemp => "condenser_inlet_temp".into(),
            Field::CondenserOutletTemp => "condenser_outlet_temp".into(),
            Field::CompressorInletEnthalpy => "compressor_inlet_enthalpy".into(),
            Field::CompressorOutletEnthalpy => "compressor_outlet_enthalpy".into(),
            Field::CondenserInletEnthalpy => "condenser_inlet_enthalpy".into(),
            Field::CondenserOutletEnthalpy => "condenser_outlet_enthalpy".into(),
            Field::WaterInTemp => "water_in_temp".into(),
            Field::WaterOutTemp => "water_out_temp".into(),
            Field::WaterFlow => "water_flow".into(),
            Field::TxvInletTemp(c) => format!("txv_inlet_temp.{c}"),
            Field::TxvInletEnthalpy(c) => format!("txv_inlet_enthalpy.{c}"),
            Field::EvapOutletTemp(c) => format!("evap_outlet_temp.{c}"),
            Field::EvapOutletEnthalpy(c) => format!("evap_outlet_enthalpy.{c}"),
        }
    }

    /// Built-in channel names, most current first.
    pub fn builtin_names(&self) -> Vec<String> {
        let fixed = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        match self {
            Field::SuctionPressure => fixed(&["P_suc", "P_suction", "Press.suc"]),
            Field::DischargePressure => fixed(&["P_cond", "P_disch", "P_discharge", "Press disch"]),
            Field::CompressorRpm => fixed(&["Compressor RPM", "RPM"]),
            Field::CompressorInletTemp => fixed(&["T_2b", "Comp.in"]),
            Field::CompressorOutletTemp => fixed(&["T_3a", "T comp outlet"]),
            Field::CondenserInletTemp => fixed(&["T_3b", "T cond inlet"]),
            Field::CondenserOutletTemp => fixed(&["T_4a", "T cond. Outlet"]),
            Field::CompressorInletEnthalpy => fixed(&["h_2b"]),
            Field::CompressorOutletEnthalpy => fixed(&["h_3a"]),
            Field::CondenserInletEnthalpy => fixed(&["h_3b"]),
            Field::CondenserOutletEnthalpy => fixed(&["h_4a"]),
            Field::WaterInTemp => fixed(&["T_waterin", "Cond.water.in"]),
            Field::WaterOutTemp => fixed(&["T_waterout", "Cond.water.out"]),
            Field::WaterFlow => fixed(&["Total Water Flow Meter"]),
            Field::TxvInletTemp(c) => {
                let lc = c.to_lowercase();
                dedup(vec![
                    format!("T_4b-{lc}"),
                    format!("T_4b-{c}"),
                    format!("T_4b_{c}"),
                ])
            }
            Field::TxvInletEnthalpy(c) => {
                let lc = c.to_lowercase();
                dedup(vec![format!("h_4b_{c}"), format!("Enthalpy_txv_{lc}")])
            }
            Field::EvapOutletTemp(c) => {
                let lc = c.to_lowercase();
                dedup(vec![
                    format!("_avg_T_2a-{c}"),
                    format!("T_2a-{c}"),
                    format!("T_2a-{lc}"),
                    format!("T_2a_{c}"),
                ])
            }
            Field::EvapOutletEnthalpy(c) => {
                let lc = c.to_lowercase();
                dedup(vec![format!("h_2a_{c}"), format!("H_coil {lc}")])
            }
        }
    }
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Resolves fields against samples for one run.
#[derive(Debug, Clone, Copy)]
pub struct ChannelResolver<'a> {
    config: &'a EngineConfig,
    mapping: &'a SensorRoleMapping,
}

impl<'a> ChannelResolver<'a> {
    pub fn new(config: &'a EngineConfig, mapping: &'a SensorRoleMapping) -> Self {
        Self { config, mapping }
    }

    fn port(&self, component_type: &str, id: Option<&str>, port: &str) -> Option<&'a str> {
        let mapping: &'a SensorRoleMapping = self.mapping;
        id.and_then(|id| mapping.lookup(component_type, id, port))
    }

    /// Channels assigned to this field through the role mapping.
    pub fn role_channels(&self, field: &Field) -> Vec<&'a str> {
        let compressor = self.config.components.compressor.as_deref();
        let condenser = self.config.components.condenser.as_deref();
        let circuit = |label: &str| self.config.circuits.iter().find(|c| c.label == label);

        let channel = match field {
            Field::SuctionPressure => self.port("Compressor", compressor, "SP"),
            Field::DischargePressure => self.port("Compressor", compressor, "DP"),
            Field::CompressorRpm => self.port("Compressor", compressor, "RPM"),
            Field::CompressorInletTemp => self.port("Compressor", compressor, "inlet"),
            Field::CompressorOutletTemp => self.port("Compressor", compressor, "outlet"),
            Field::CondenserInletTemp => self.port("Condenser", condenser, "inlet"),
            Field::CondenserOutletTemp => self.port("Condenser", condenser, "outlet"),
            Field::WaterInTemp => self.port("Condenser", condenser, "water_in_temp"),
            Field::WaterOutTemp => self.port("Condenser", condenser, "water_out_temp"),
            Field::TxvInletTemp(label) => {
                circuit(label.as_str()).and_then(|c| self.port("TXV", c.txv.as_deref(), "inlet"))
            }
            Field::EvapOutletTemp(label) => {
                return circuit(label.as_str())
                    .map(|c| {
                        c.outlet_taps
                            .iter()
                            .filter_map(|n| {
                                self.port(
                                    "Evaporator",
                                    c.evaporator.as_deref(),
                                    &format!("outlet_circuit_{n}"),
                                )
                            })
                            .collect()
                    })
                    .unwrap_or_default();
            }
            Field::CompressorInletEnthalpy
            | Field::CompressorOutletEnthalpy
            | Field::CondenserInletEnthalpy
            | Field::CondenserOutletEnthalpy
            | Field::WaterFlow
            | Field::TxvInletEnthalpy(_)
            | Field::EvapOutletEnthalpy(_) => None,
        };
        channel.into_iter().collect()
    }

    /// Full ordered candidate list: role channels, aliases, built-ins.
    pub fn candidates(&self, field: &Field) -> Vec<String> {
        let mut names: Vec<String> = self
            .role_channels(field)
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(aliases) = self.config.channel_aliases.get(&field.key()) {
            names.extend(aliases.iter().cloned());
        }
        names.extend(field.builtin_names());
        dedup(names)
    }

    /// First candidate with a finite reading.
    pub fn read(&self, sample: &SensorSample, field: &Field) -> Avail<f64> {
        let value = self
            .candidates(field)
            .iter()
            .find_map(|name| sample.value(name));
        Avail::from_option(value, || Reason::missing(field.key()))
    }

    /// Mean of every role-mapped tap that has a reading; falls back to `read`
    /// when no mapped tap reports.
    pub fn read_mean(&self, sample: &SensorSample, field: &Field) -> Avail<f64> {
        let taps = self.role_channels(field);
        match finite_mean(taps.iter().filter_map(|c| sample.value(c))) {
            Some(mean) => Avail::Available(mean),
            None => self.read(sample, field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CircuitConfig;
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    fn sample() -> SensorSample {
        SensorSample::new(NaiveDateTime::default())
    }

    #[test]
    fn builtin_chain_order() {
        let config = EngineConfig::default();
        let mapping = SensorRoleMapping::empty();
        let resolver = ChannelResolver::new(&config, &mapping);

        let s = sample().with("Press.suc", 68.0).with("P_suction", 70.0);
        assert_eq!(resolver.read(&s, &Field::SuctionPressure).get(), Some(70.0));

        let s = sample().with("Press.suc", 68.0);
        assert_eq!(resolver.read(&s, &Field::SuctionPressure).get(), Some(68.0));

        let missing = resolver.read(&sample(), &Field::SuctionPressure);
        assert_eq!(
            missing.reason().map(|r| r.what()),
            Some("suction_pressure")
        );
    }

    #[test]
    fn nan_primary_falls_through() {
        let config = EngineConfig::default();
        let mapping = SensorRoleMapping::empty();
        let resolver = ChannelResolver::new(&config, &mapping);
        let s = sample().with("P_cond", f64::NAN).with("P_disch", 200.0);
        assert_eq!(
            resolver.read(&s, &Field::DischargePressure).get(),
            Some(200.0)
        );
    }

    #[test]
    fn circuit_names_cover_case_variants() {
        let names = Field::TxvInletTemp("LH".into()).builtin_names();
        assert_eq!(names, ["T_4b-lh", "T_4b-LH", "T_4b_LH"]);
        let names = Field::EvapOutletEnthalpy("CTR".into()).builtin_names();
        assert_eq!(names, ["h_2a_CTR", "H_coil ctr"]);
    }

    #[test]
    fn role_then_alias_then_builtin() {
        let config = EngineConfig {
            components: crate::config::ComponentIds {
                compressor: Some("a91fd4".into()),
                condenser: None,
            },
            channel_aliases: BTreeMap::from([(
                "suction_pressure".to_string(),
                vec!["Suction PT".to_string()],
            )]),
            ..EngineConfig::default()
        };
        let mapping = SensorRoleMapping::new(BTreeMap::from([(
            "Compressor.a91fd4.SP".to_string(),
            "PT-101".to_string(),
        )]))
        .unwrap();
        let resolver = ChannelResolver::new(&config, &mapping);
        assert_eq!(
            resolver.candidates(&Field::SuctionPressure),
            ["PT-101", "Suction PT", "P_suc", "P_suction", "Press.suc"]
        );
    }

    #[test]
    fn outlet_taps_are_averaged() {
        let config = EngineConfig {
            circuits: vec![CircuitConfig {
                label: "LH".into(),
                txv: None,
                evaporator: Some("3408df".into()),
                outlet_taps: vec![1, 2, 3],
            }],
            ..EngineConfig::default()
        };
        let mapping = SensorRoleMapping::new(BTreeMap::from([
            ("Evaporator.3408df.outlet_circuit_1".to_string(), "TC1".to_string()),
            ("Evaporator.3408df.outlet_circuit_2".to_string(), "TC2".to_string()),
            ("3408df.outlet_circuit_3".to_string(), "TC3".to_string()),
        ]))
        .unwrap();
        let resolver = ChannelResolver::new(&config, &mapping);
        let field = Field::EvapOutletTemp("LH".into());

        let s = sample().with("TC1", 40.0).with("TC2", 44.0).with("T_2a-LH", 99.0);
        assert_eq!(resolver.read_mean(&s, &field).get(), Some(42.0));

        // No tap reports: the ordinary chain takes over.
        let s = sample().with("T_2a-LH", 45.0);
        assert_eq!(resolver.read_mean(&s, &field).get(), Some(45.0));

        assert!(!resolver.read_mean(&sample(), &field).is_available());
    }
}

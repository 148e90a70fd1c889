//! Raw sensor samples.

use crate::error::EngineResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One time-stamped row of channel readings.
///
/// Units are whatever the rig logs: pressures in psig, temperatures in °F,
/// compressor speed in RPM, water flow in GPM, enthalpies in kJ/kg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub channels: BTreeMap<String, Option<f64>>,
}

impl SensorSample {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            channels: BTreeMap::new(),
        }
    }

    /// Builder-style channel insert.
    pub fn with(mut self, channel: &str, value: f64) -> Self {
        self.channels.insert(channel.to_string(), Some(value));
        self
    }

    /// Reading for `channel`; missing, null and non-finite readings are all `None`.
    pub fn value(&self, channel: &str) -> Option<f64> {
        self.channels
            .get(channel)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    pub fn has(&self, channel: &str) -> bool {
        self.value(channel).is_some()
    }
}

/// Read a JSON array of samples.
pub fn load_samples_json(path: &Path) -> EngineResult<Vec<SensorSample>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn non_finite_reads_as_missing() {
        let sample = SensorSample::new(ts())
            .with("P_suc", 70.0)
            .with("T_2b", f64::NAN);
        assert_eq!(sample.value("P_suc"), Some(70.0));
        assert_eq!(sample.value("T_2b"), None);
        assert_eq!(sample.value("absent"), None);
    }

    #[test]
    fn json_nulls_are_missing() {
        let json = r#"[{"timestamp": "2024-05-01T12:00:00", "channels": {"P_suc": 70.0, "T_2b": null}}]"#;
        let samples: Vec<SensorSample> = serde_json::from_str(json).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp, ts());
        assert!(samples[0].has("P_suc"));
        assert!(!samples[0].has("T_2b"));
    }
}

//! Anomaly classification.
//!
//! Each check is independent; several flags can apply to one sample. The
//! classifier never tries to decide which sensor is at fault.

use crate::config::EngineConfig;
use crate::metrics::DerivedMetrics;
use crate::point::ResolvedCycle;
use rc_core::Avail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    Ok,
    NegativeSubcooling,
    /// Total or per-circuit capacity below zero.
    NegativeCapacity,
    LowSuperheat,
    HighSuperheat,
    LowPressureRatio,
    HighPressureRatio,
    /// Compressor-inlet enthalpy below TXV-inlet enthalpy.
    EnthalpyInversion,
}

impl AnomalyFlag {
    /// Flags that cannot describe a real cycle state.
    pub fn is_impossible(&self) -> bool {
        matches!(
            self,
            AnomalyFlag::NegativeSubcooling
                | AnomalyFlag::NegativeCapacity
                | AnomalyFlag::EnthalpyInversion
        )
    }
}

/// Overall data quality of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBucket {
    Good,
    /// Only out-of-range superheat or pressure ratio.
    Suspect,
    /// At least one physically impossible flag.
    Invalid,
}

/// How far below zero a negative subcooling reading is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubcoolingSeverity {
    /// Above -5 °F
    Mild,
    /// -15 to -5 °F
    Moderate,
    /// -15 °F or below
    Severe,
}

impl SubcoolingSeverity {
    pub fn from_subcooling_f(subcooling_f: f64) -> Option<Self> {
        if subcooling_f >= 0.0 {
            None
        } else if subcooling_f > -5.0 {
            Some(SubcoolingSeverity::Mild)
        } else if subcooling_f > -15.0 {
            Some(SubcoolingSeverity::Moderate)
        } else {
            Some(SubcoolingSeverity::Severe)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Sorted; `[Ok]` when nothing applies.
    pub flags: Vec<AnomalyFlag>,
    pub quality: QualityBucket,
    pub subcooling_severity: Option<SubcoolingSeverity>,
    /// Circuits whose TXV-inlet enthalpy exceeds the compressor-inlet enthalpy.
    pub inverted_circuits: Vec<String>,
}

impl AnomalyReport {
    pub fn has(&self, flag: AnomalyFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Classify one resolved sample.
pub fn classify(
    cycle: &ResolvedCycle,
    metrics: &DerivedMetrics,
    config: &EngineConfig,
) -> AnomalyReport {
    let mut flags = Vec::new();

    let negative = |q: &Avail<f64>| q.get().is_some_and(|q| q < 0.0);
    if negative(&metrics.capacity_w) || metrics.circuits.iter().any(|c| negative(&c.capacity_w)) {
        flags.push(AnomalyFlag::NegativeCapacity);
    }

    let subcooling = metrics.subcooling_f.get();
    if subcooling.is_some_and(|sc| sc < 0.0) {
        flags.push(AnomalyFlag::NegativeSubcooling);
    }

    let (sh_low, sh_high) = config.superheat_bounds_f;
    if let Some(sh) = metrics.superheat_f.get() {
        if sh < sh_low {
            flags.push(AnomalyFlag::LowSuperheat);
        }
        if sh > sh_high {
            flags.push(AnomalyFlag::HighSuperheat);
        }
    }

    let (pr_low, pr_high) = config.pressure_ratio_bounds;
    if let Some(pr) = metrics.pressure_ratio.get() {
        if pr < pr_low {
            flags.push(AnomalyFlag::LowPressureRatio);
        }
        if pr > pr_high {
            flags.push(AnomalyFlag::HighPressureRatio);
        }
    }

    let inverted_circuits: Vec<String> = match cycle.common.p2b.get() {
        Some(p2b) => cycle
            .circuits
            .iter()
            .filter(|c| {
                c.p4b
                    .get()
                    .is_some_and(|p4b| p2b.enthalpy_kj_kg < p4b.enthalpy_kj_kg)
            })
            .map(|c| c.label.clone())
            .collect(),
        None => Vec::new(),
    };
    if !inverted_circuits.is_empty() {
        flags.push(AnomalyFlag::EnthalpyInversion);
    }

    flags.sort();
    let quality = if flags.is_empty() {
        QualityBucket::Good
    } else if flags.iter().any(AnomalyFlag::is_impossible) {
        QualityBucket::Invalid
    } else {
        QualityBucket::Suspect
    };
    if flags.is_empty() {
        flags.push(AnomalyFlag::Ok);
    }

    AnomalyReport {
        flags,
        quality,
        subcooling_severity: subcooling.and_then(SubcoolingSeverity::from_subcooling_f),
        inverted_circuits,
    }
}

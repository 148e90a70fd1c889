//! Cycle state points.

use rc_core::Avail;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical state-point identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointId {
    /// Evaporator inlet, after the TXV.
    #[serde(rename = "1")]
    P1,
    /// Evaporator outlet.
    #[serde(rename = "2a")]
    P2a,
    /// Compressor inlet.
    #[serde(rename = "2b")]
    P2b,
    /// Compressor outlet.
    #[serde(rename = "3a")]
    P3a,
    /// Condenser inlet.
    #[serde(rename = "3b")]
    P3b,
    /// Condenser outlet.
    #[serde(rename = "4a")]
    P4a,
    /// TXV inlet.
    #[serde(rename = "4b")]
    P4b,
}

impl PointId {
    pub fn label(&self) -> &'static str {
        match self {
            PointId::P1 => "1",
            PointId::P2a => "2a",
            PointId::P2b => "2b",
            PointId::P3a => "3a",
            PointId::P3b => "3b",
            PointId::P4a => "4a",
            PointId::P4b => "4b",
        }
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which loop a point belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitTag {
    Common,
    Circuit(String),
}

impl fmt::Display for CircuitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitTag::Common => f.write_str("common"),
            CircuitTag::Circuit(label) => f.write_str(label),
        }
    }
}

/// A single thermodynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefrigerantState {
    /// Absolute pressure [kPa]
    pub pressure_kpa: f64,
    /// Temperature [K], when measured or looked up.
    pub temperature_k: Option<f64>,
    /// Specific enthalpy [kJ/kg]
    pub enthalpy_kj_kg: f64,
    /// Vapor quality, inside the two-phase region only.
    pub quality: Option<f64>,
}

/// A named state on a specific loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePoint {
    pub id: PointId,
    pub circuit: CircuitTag,
    pub state: RefrigerantState,
}

/// Points shared by every circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonPoints {
    pub p2b: Avail<RefrigerantState>,
    pub p3a: Avail<RefrigerantState>,
    pub p3b: Avail<RefrigerantState>,
    pub p4a: Avail<RefrigerantState>,
}

/// Points of one evaporator circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitPoints {
    pub label: String,
    pub p4b: Avail<RefrigerantState>,
    pub p1: Avail<RefrigerantState>,
    pub p2a: Avail<RefrigerantState>,
}

/// Everything resolved from one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCycle {
    /// Suction pressure [kPa abs]
    pub suction_kpa: Avail<f64>,
    /// Discharge pressure [kPa abs]
    pub discharge_kpa: Avail<f64>,
    pub common: CommonPoints,
    pub circuits: Vec<CircuitPoints>,
}

/// One circuit's closed loop `3a → 3b → 4a → 4b → 1 → 2a → 2b`, available points only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitCycle {
    pub label: String,
    pub points: Vec<CyclePoint>,
}

impl ResolvedCycle {
    fn common_point(id: PointId, state: &Avail<RefrigerantState>) -> Option<CyclePoint> {
        state.get().map(|state| CyclePoint {
            id,
            circuit: CircuitTag::Common,
            state,
        })
    }

    fn circuit_point(
        label: &str,
        id: PointId,
        state: &Avail<RefrigerantState>,
    ) -> Option<CyclePoint> {
        state.get().map(|state| CyclePoint {
            id,
            circuit: CircuitTag::Circuit(label.to_string()),
            state,
        })
    }

    pub fn circuit(&self, label: &str) -> Option<&CircuitPoints> {
        self.circuits.iter().find(|c| c.label == label)
    }

    /// Every available point, common points first.
    pub fn points(&self) -> Vec<CyclePoint> {
        let c = &self.common;
        let mut points: Vec<CyclePoint> = [
            (PointId::P2b, &c.p2b),
            (PointId::P3a, &c.p3a),
            (PointId::P3b, &c.p3b),
            (PointId::P4a, &c.p4a),
        ]
        .into_iter()
        .filter_map(|(id, s)| Self::common_point(id, s))
        .collect();

        for circuit in &self.circuits {
            points.extend(
                [
                    (PointId::P4b, &circuit.p4b),
                    (PointId::P1, &circuit.p1),
                    (PointId::P2a, &circuit.p2a),
                ]
                .into_iter()
                .filter_map(|(id, s)| Self::circuit_point(&circuit.label, id, s)),
            );
        }
        points
    }

    /// The loop for one circuit, in flow order.
    pub fn circuit_cycle(&self, label: &str) -> Option<CircuitCycle> {
        let circuit = self.circuit(label)?;
        let c = &self.common;
        let points = [
            Self::common_point(PointId::P3a, &c.p3a),
            Self::common_point(PointId::P3b, &c.p3b),
            Self::common_point(PointId::P4a, &c.p4a),
            Self::circuit_point(label, PointId::P4b, &circuit.p4b),
            Self::circuit_point(label, PointId::P1, &circuit.p1),
            Self::circuit_point(label, PointId::P2a, &circuit.p2a),
            Self::common_point(PointId::P2b, &c.p2b),
        ]
        .into_iter()
        .flatten()
        .collect();
        Some(CircuitCycle {
            label: label.to_string(),
            points,
        })
    }

    /// Enthalpies of the available per-circuit points with id `id`.
    pub fn circuit_enthalpies(&self, id: PointId) -> Vec<f64> {
        self.circuits
            .iter()
            .filter_map(|c| match id {
                PointId::P4b => c.p4b.get(),
                PointId::P1 => c.p1.get(),
                PointId::P2a => c.p2a.get(),
                _ => None,
            })
            .map(|s| s.enthalpy_kj_kg)
            .collect()
    }
}

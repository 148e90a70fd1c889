//! Pressure-enthalpy paths for diagram rendering.
//!
//! Pure data: only successfully resolved points are included, and a path
//! with fewer than two points is emitted empty.

use crate::point::{CircuitTag, CyclePoint, PointId, ResolvedCycle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub id: PointId,
    pub enthalpy_kj_kg: f64,
    pub pressure_kpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// `3a → 3b → 4a → 4b → 1 → 2a → 2b`
    Loop,
    /// `2b → 3a`
    Compression,
    /// `2a → 2b`
    Mixing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePath {
    pub circuit: CircuitTag,
    pub segment: PathSegment,
    pub points: Vec<PathPoint>,
}

impl CyclePath {
    fn new(circuit: CircuitTag, segment: PathSegment, points: Vec<CyclePoint>) -> Self {
        let points = if points.len() < 2 {
            Vec::new()
        } else {
            points
                .into_iter()
                .map(|p| PathPoint {
                    id: p.id,
                    enthalpy_kj_kg: p.state.enthalpy_kj_kg,
                    pressure_kpa: p.state.pressure_kpa,
                })
                .collect()
        };
        Self {
            circuit,
            segment,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePaths {
    pub loops: Vec<CyclePath>,
    pub compression: CyclePath,
    pub mixing: Vec<CyclePath>,
}

pub fn build_paths(cycle: &ResolvedCycle) -> CyclePaths {
    let loops = cycle
        .circuits
        .iter()
        .filter_map(|c| cycle.circuit_cycle(&c.label))
        .map(|cc| {
            CyclePath::new(
                CircuitTag::Circuit(cc.label.clone()),
                PathSegment::Loop,
                cc.points,
            )
        })
        .collect();

    let compression = CyclePath::new(
        CircuitTag::Common,
        PathSegment::Compression,
        [
            (PointId::P2b, &cycle.common.p2b),
            (PointId::P3a, &cycle.common.p3a),
        ]
        .into_iter()
        .filter_map(|(id, state)| {
            state.get().map(|state| CyclePoint {
                id,
                circuit: CircuitTag::Common,
                state,
            })
        })
        .collect(),
    );

    let mixing = cycle
        .circuits
        .iter()
        .filter_map(|c| cycle.circuit_cycle(&c.label))
        .map(|cc| {
            let points = cc
                .points
                .iter()
                .filter(|p| matches!(p.id, PointId::P2a | PointId::P2b))
                .cloned()
                .collect();
            CyclePath::new(
                CircuitTag::Circuit(cc.label.clone()),
                PathSegment::Mixing,
                points,
            )
        })
        .collect();

    CyclePaths {
        loops,
        compression,
        mixing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{CircuitPoints, CommonPoints, RefrigerantState};
    use rc_core::Avail;

    fn state(p: f64, h: f64) -> Avail<RefrigerantState> {
        Avail::Available(RefrigerantState {
            pressure_kpa: p,
            temperature_k: None,
            enthalpy_kj_kg: h,
            quality: None,
        })
    }

    fn full_cycle() -> ResolvedCycle {
        ResolvedCycle {
            suction_kpa: Avail::Available(584.0),
            discharge_kpa: Avail::Available(1480.0),
            common: CommonPoints {
                p2b: state(584.0, 592.0),
                p3a: state(1480.0, 650.0),
                p3b: state(1480.0, 640.0),
                p4a: state(1480.0, 290.0),
            },
            circuits: vec![CircuitPoints {
                label: "LH".into(),
                p4b: state(1480.0, 280.0),
                p1: state(584.0, 280.0),
                p2a: state(584.0, 590.0),
            }],
        }
    }

    #[test]
    fn loop_follows_flow_order() {
        let paths = build_paths(&full_cycle());
        let ids: Vec<_> = paths.loops[0].points.iter().map(|p| p.id.label()).collect();
        assert_eq!(ids, ["3a", "3b", "4a", "4b", "1", "2a", "2b"]);
        let ids: Vec<_> = paths.compression.points.iter().map(|p| p.id).collect();
        assert_eq!(ids, [PointId::P2b, PointId::P3a]);
        assert_eq!(paths.mixing[0].points.len(), 2);
    }

    #[test]
    fn single_point_path_is_empty() {
        let mut cycle = full_cycle();
        cycle.common.p3a = Avail::missing("compressor_outlet_temp");
        cycle.circuits[0].p2a = Avail::missing("evap_outlet_temp.LH");
        let paths = build_paths(&cycle);
        assert!(paths.compression.is_empty());
        assert!(paths.mixing[0].is_empty());
        assert_eq!(paths.loops[0].points.len(), 5);
    }
}

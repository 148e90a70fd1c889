//! Per-sample derived metrics.

use crate::massflow::{VolumetricEfficiency, heat_rate_w};
use crate::point::{PointId, RefrigerantState, ResolvedCycle};
use crate::resolver::PropertyLookups;
use rc_core::convert::{
    delta_k_to_delta_f, lb_per_hr_from_g_per_s, pa_abs_to_psig, w_to_btu_per_hr,
};
use rc_core::{Avail, Reason, finite_mean};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    pub label: String,
    /// Evaporator-outlet superheat, `T(2a) - Tsat(suction)` [°F]
    pub superheat_f: Avail<f64>,
    /// TXV-inlet subcooling, `Tsat(discharge) - T(4b)` [°F]
    pub subcooling_f: Avail<f64>,
    /// `h(2a) - h(4b)` [kJ/kg]
    pub refrigeration_effect_kj_kg: Avail<f64>,
    /// Compressor mass flow times this circuit's refrigeration effect [W]
    pub capacity_w: Avail<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub suction_psig: Avail<f64>,
    pub discharge_psig: Avail<f64>,
    /// Absolute discharge over absolute suction pressure.
    pub pressure_ratio: Avail<f64>,
    pub t_sat_suction_k: Avail<f64>,
    pub t_sat_discharge_k: Avail<f64>,
    /// Total superheat at the compressor inlet, `T(2b) - Tsat(suction)` [°F]
    pub superheat_f: Avail<f64>,
    /// Condenser-outlet subcooling, `Tsat(discharge) - T(4a)` [°F]
    pub subcooling_f: Avail<f64>,
    pub compressor_rpm: Avail<f64>,
    pub suction_density_kg_m3: Avail<f64>,
    pub mass_flow_g_s: Avail<f64>,
    pub mass_flow_lb_hr: Avail<f64>,
    /// Evaporator exit minus TXV inlet enthalpy [kJ/kg]
    pub refrigeration_effect_kj_kg: Avail<f64>,
    pub capacity_w: Avail<f64>,
    pub capacity_btu_hr: Avail<f64>,
    /// `h(3a) - h(4a)` [kJ/kg]
    pub heat_rejection_effect_kj_kg: Avail<f64>,
    pub heat_rejection_w: Avail<f64>,
    pub circuits: Vec<CircuitMetrics>,
}

fn temperature(state: &Avail<RefrigerantState>, what: &str) -> Avail<f64> {
    state.as_ref().and_then(|s| {
        Avail::from_option(s.temperature_k, || {
            Reason::missing(format!("temperature at {what}"))
        })
    })
}

fn enthalpy(state: &Avail<RefrigerantState>) -> Avail<f64> {
    state.as_ref().map(|s| s.enthalpy_kj_kg)
}

/// `a - b` in kelvin, reported as a °F difference.
fn delta_f(a_k: &Avail<f64>, b_k: &Avail<f64>) -> Avail<f64> {
    a_k.as_ref()
        .zip(b_k.as_ref())
        .map(|(&a, &b)| delta_k_to_delta_f(a - b))
}

fn difference(a: &Avail<f64>, b: &Avail<f64>) -> Avail<f64> {
    a.as_ref().zip(b.as_ref()).map(|(&a, &b)| a - b)
}

impl DerivedMetrics {
    pub fn compute(
        cycle: &ResolvedCycle,
        lookups: &PropertyLookups,
        compressor_rpm: Avail<f64>,
        efficiency: &VolumetricEfficiency,
    ) -> Self {
        let to_psig = |kpa: &f64| pa_abs_to_psig(kpa * 1000.0);
        let suction_psig = cycle.suction_kpa.as_ref().map(to_psig);
        let discharge_psig = cycle.discharge_kpa.as_ref().map(to_psig);
        let pressure_ratio = cycle
            .discharge_kpa
            .as_ref()
            .zip(cycle.suction_kpa.as_ref())
            .and_then(|(&d, &s)| {
                if s > 0.0 {
                    Avail::Available(d / s)
                } else {
                    Avail::Unavailable(Reason::implausible("suction pressure", s))
                }
            });

        let common = &cycle.common;
        let superheat_f = delta_f(&temperature(&common.p2b, "2b"), &lookups.t_sat_suction_k);
        let subcooling_f = delta_f(&lookups.t_sat_discharge_k, &temperature(&common.p4a, "4a"));

        let mass_flow_g_s =
            efficiency.mass_flow_g_s(&lookups.suction_density_kg_m3, &compressor_rpm);
        let mass_flow_lb_hr = mass_flow_g_s.as_ref().map(|&m| lb_per_hr_from_g_per_s(m));

        // Evaporator exit: compressor inlet, else the mean of the circuit outlets.
        let evaporator_exit_h = enthalpy(&common.p2b).or(Avail::from_option(
            finite_mean(cycle.circuit_enthalpies(PointId::P2a)),
            || Reason::missing("2a"),
        ));
        let txv_inlet_h = Avail::from_option(
            finite_mean(cycle.circuit_enthalpies(PointId::P4b)),
            || Reason::missing("4b"),
        );
        let refrigeration_effect_kj_kg = difference(&evaporator_exit_h, &txv_inlet_h);
        let capacity_w = heat_rate_w(&mass_flow_g_s, &refrigeration_effect_kj_kg);
        let capacity_btu_hr = capacity_w.as_ref().map(|&w| w_to_btu_per_hr(w));

        let heat_rejection_effect_kj_kg =
            difference(&enthalpy(&common.p3a), &enthalpy(&common.p4a));
        let heat_rejection_w = heat_rate_w(&mass_flow_g_s, &heat_rejection_effect_kj_kg);

        let circuits = cycle
            .circuits
            .iter()
            .map(|c| {
                let refrigeration_effect_kj_kg = difference(&enthalpy(&c.p2a), &enthalpy(&c.p4b));
                CircuitMetrics {
                    label: c.label.clone(),
                    superheat_f: delta_f(
                        &temperature(&c.p2a, &format!("2a {}", c.label)),
                        &lookups.t_sat_suction_k,
                    ),
                    subcooling_f: delta_f(
                        &lookups.t_sat_discharge_k,
                        &temperature(&c.p4b, &format!("4b {}", c.label)),
                    ),
                    capacity_w: heat_rate_w(&mass_flow_g_s, &refrigeration_effect_kj_kg),
                    refrigeration_effect_kj_kg,
                }
            })
            .collect();

        Self {
            suction_psig,
            discharge_psig,
            pressure_ratio,
            t_sat_suction_k: lookups.t_sat_suction_k.clone(),
            t_sat_discharge_k: lookups.t_sat_discharge_k.clone(),
            superheat_f,
            subcooling_f,
            compressor_rpm,
            suction_density_kg_m3: lookups.suction_density_kg_m3.clone(),
            mass_flow_g_s,
            mass_flow_lb_hr,
            refrigeration_effect_kj_kg,
            capacity_w,
            capacity_btu_hr,
            heat_rejection_effect_kj_kg,
            heat_rejection_w,
            circuits,
        }
    }

    pub fn circuit(&self, label: &str) -> Option<&CircuitMetrics> {
        self.circuits.iter().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RatedDensity, RatedInputs};
    use crate::point::{CircuitPoints, CommonPoints};

    fn state(p: f64, t: Option<f64>, h: f64) -> Avail<RefrigerantState> {
        Avail::Available(RefrigerantState {
            pressure_kpa: p,
            temperature_k: t,
            enthalpy_kj_kg: h,
            quality: None,
        })
    }

    fn efficiency() -> VolumetricEfficiency {
        let rated = RatedInputs {
            mass_flow_lb_hr: 211.0,
            compressor_hz: 75.0,
            displacement_in3: 2.82,
            density: RatedDensity::Direct { lb_ft3: 0.50031 },
        };
        VolumetricEfficiency::from_rated(&rated, 8.0143).unwrap()
    }

    fn lookups() -> PropertyLookups {
        PropertyLookups {
            t_sat_suction_k: Avail::Available(280.0),
            t_sat_discharge_k: Avail::Available(316.0),
            suction_density_kg_m3: Avail::Available(10.8),
        }
    }

    fn cycle(p2b: Avail<RefrigerantState>) -> ResolvedCycle {
        ResolvedCycle {
            suction_kpa: Avail::Available(584.0),
            discharge_kpa: Avail::Available(1480.0),
            common: CommonPoints {
                p2b,
                p3a: state(1480.0, Some(350.0), 650.0),
                p3b: Avail::missing("condenser_inlet_temp"),
                p4a: state(1480.0, Some(310.0), 290.0),
            },
            circuits: vec![
                CircuitPoints {
                    label: "LH".into(),
                    p4b: state(1480.0, Some(305.0), 280.0),
                    p1: state(584.0, None, 280.0),
                    p2a: state(584.0, Some(285.0), 590.0),
                },
                CircuitPoints {
                    label: "RH".into(),
                    p4b: state(1480.0, Some(306.0), 284.0),
                    p1: state(584.0, None, 284.0),
                    p2a: state(584.0, Some(287.0), 594.0),
                },
            ],
        }
    }

    #[test]
    fn temperature_differences_in_fahrenheit() {
        let m = DerivedMetrics::compute(
            &cycle(state(584.0, Some(285.0), 592.0)),
            &lookups(),
            Avail::Available(3600.0),
            &efficiency(),
        );
        assert!((m.superheat_f.get().unwrap() - 9.0).abs() < 1e-9);
        assert!((m.subcooling_f.get().unwrap() - 10.8).abs() < 1e-9);
        assert!((m.circuit("RH").unwrap().superheat_f.get().unwrap() - 12.6).abs() < 1e-9);
        assert!((m.pressure_ratio.get().unwrap() - 1480.0 / 584.0).abs() < 1e-12);
    }

    #[test]
    fn capacity_uses_compressor_inlet_then_circuit_outlets() {
        let with_2b = DerivedMetrics::compute(
            &cycle(state(584.0, Some(285.0), 592.0)),
            &lookups(),
            Avail::Available(3600.0),
            &efficiency(),
        );
        // 592 - mean(280, 284)
        assert!((with_2b.refrigeration_effect_kj_kg.get().unwrap() - 310.0).abs() < 1e-9);

        let without_2b = DerivedMetrics::compute(
            &cycle(Avail::missing("compressor_inlet_temp")),
            &lookups(),
            Avail::Available(3600.0),
            &efficiency(),
        );
        // mean(590, 594) - mean(280, 284)
        assert!((without_2b.refrigeration_effect_kj_kg.get().unwrap() - 310.0).abs() < 1e-9);
        assert!(without_2b.capacity_w.is_available());
        assert!(!without_2b.superheat_f.is_available());
    }

    #[test]
    fn missing_speed_leaves_capacity_unavailable() {
        let m = DerivedMetrics::compute(
            &cycle(state(584.0, Some(285.0), 592.0)),
            &lookups(),
            Avail::missing("compressor_rpm"),
            &efficiency(),
        );
        assert!(!m.mass_flow_g_s.is_available());
        assert!(!m.capacity_w.is_available());
        assert!(!m.capacity_btu_hr.is_available());
        assert!(m.refrigeration_effect_kj_kg.is_available());
        assert!((m.heat_rejection_effect_kj_kg.get().unwrap() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn circuit_capacity_follows_its_own_effect() {
        let mut reversed = cycle(state(584.0, Some(285.0), 592.0));
        reversed.circuits[1].p2a = state(584.0, Some(270.0), 250.0);
        let m = DerivedMetrics::compute(
            &reversed,
            &lookups(),
            Avail::Available(3600.0),
            &efficiency(),
        );
        assert!(m.capacity_w.get().unwrap() > 0.0);
        assert!(m.circuit("LH").unwrap().capacity_w.get().unwrap() > 0.0);
        let rh = m.circuit("RH").unwrap();
        let expected = m.mass_flow_g_s.get().unwrap() * (250.0 - 284.0);
        assert!((rh.capacity_w.get().unwrap() - expected).abs() < 1e-9);
    }
}

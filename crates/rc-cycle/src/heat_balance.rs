//! Water-side heat balance.
//!
//! The condenser water picks up `Q = 500.4 * GPM * dT` BTU/hr. Comparing that
//! with the refrigerant-side heat rejection is a consistency check on the
//! sensors and the mass-flow model; a mismatch is reported, never corrected.

use rc_core::convert::{WATER_BTU_HR_PER_GPM_F, kj_per_kg_to_btu_per_lb, w_to_btu_per_hr};
use rc_core::{Avail, Reason};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatBalance {
    pub water_gpm: Avail<f64>,
    /// `T_water_out - T_water_in` [°F]
    pub water_delta_t_f: Avail<f64>,
    pub water_heat_btu_hr: Avail<f64>,
    pub refrigerant_heat_btu_hr: Avail<f64>,
    /// Refrigerant-side over water-side heat.
    pub ratio: Avail<f64>,
    /// `None` when the ratio could not be formed.
    pub within_tolerance: Option<bool>,
    /// Refrigerant flow implied by the water-side heat and the condenser enthalpy drop.
    pub water_side_mass_flow_lb_hr: Avail<f64>,
}

/// Water-side heat [BTU/hr].
pub fn water_heat_btu_hr(gpm: f64, delta_t_f: f64) -> f64 {
    WATER_BTU_HR_PER_GPM_F * gpm * delta_t_f
}

impl HeatBalance {
    pub fn compute(
        water_gpm: Avail<f64>,
        water_in_f: Avail<f64>,
        water_out_f: Avail<f64>,
        refrigerant_heat_w: &Avail<f64>,
        condenser_effect_kj_kg: &Avail<f64>,
        tolerance: f64,
    ) -> Self {
        let water_delta_t_f = water_out_f.zip(water_in_f).map(|(out, inlet)| out - inlet);
        let water_heat_btu_hr = water_gpm
            .as_ref()
            .zip(water_delta_t_f.as_ref())
            .map(|(&gpm, &dt)| water_heat_btu_hr(gpm, dt));
        let refrigerant_heat_btu_hr = refrigerant_heat_w.as_ref().map(|&w| w_to_btu_per_hr(w));

        let positive_water_heat = water_heat_btu_hr.as_ref().and_then(|&q| {
            if q > 0.0 {
                Avail::Available(q)
            } else {
                Avail::Unavailable(Reason::implausible("water_heat_btu_hr", q))
            }
        });

        let ratio = refrigerant_heat_btu_hr
            .as_ref()
            .zip(positive_water_heat.as_ref())
            .map(|(&r, &w)| r / w);
        let within_tolerance = ratio.get().map(|r| (r - 1.0).abs() <= tolerance);

        let water_side_mass_flow_lb_hr = positive_water_heat
            .zip(condenser_effect_kj_kg.clone())
            .and_then(|(q, dh)| {
                if dh > 0.0 {
                    Avail::Available(q / kj_per_kg_to_btu_per_lb(dh))
                } else {
                    Avail::Unavailable(Reason::implausible("condenser enthalpy drop", dh))
                }
            });

        Self {
            water_gpm,
            water_delta_t_f,
            water_heat_btu_hr,
            refrigerant_heat_btu_hr,
            ratio,
            within_tolerance,
            water_side_mass_flow_lb_hr,
        }
    }

    /// Both sides known and further apart than the tolerance.
    pub fn is_divergent(&self) -> bool {
        self.within_tolerance == Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::ReasonKind;

    #[test]
    fn water_heat_constant() {
        // 2 GPM heated 10 °F
        assert!((water_heat_btu_hr(2.0, 10.0) - 10_008.0).abs() < 1e-9);
    }

    #[test]
    fn balanced_within_tolerance() {
        let q_water = water_heat_btu_hr(2.0, 10.0);
        let refrigerant_w = rc_core::convert::btu_per_hr_to_w(q_water * 1.1);
        let hb = HeatBalance::compute(
            Avail::Available(2.0),
            Avail::Available(70.0),
            Avail::Available(80.0),
            &Avail::Available(refrigerant_w),
            &Avail::Available(350.0),
            0.15,
        );
        assert!((hb.ratio.get().unwrap() - 1.1).abs() < 1e-9);
        assert_eq!(hb.within_tolerance, Some(true));
        assert!(!hb.is_divergent());

        let expected = q_water / kj_per_kg_to_btu_per_lb(350.0);
        assert!((hb.water_side_mass_flow_lb_hr.get().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn divergence_is_flagged() {
        let q_water = water_heat_btu_hr(2.0, 10.0);
        let hb = HeatBalance::compute(
            Avail::Available(2.0),
            Avail::Available(70.0),
            Avail::Available(80.0),
            &Avail::Available(rc_core::convert::btu_per_hr_to_w(q_water * 1.5)),
            &Avail::Available(350.0),
            0.15,
        );
        assert!(hb.is_divergent());
    }

    #[test]
    fn no_flow_means_no_ratio() {
        let hb = HeatBalance::compute(
            Avail::missing("water_flow"),
            Avail::Available(70.0),
            Avail::Available(80.0),
            &Avail::Available(3000.0),
            &Avail::Available(350.0),
            0.15,
        );
        assert!(!hb.water_heat_btu_hr.is_available());
        assert!(!hb.ratio.is_available());
        assert_eq!(hb.within_tolerance, None);
    }

    #[test]
    fn reversed_water_temperatures_are_implausible() {
        let hb = HeatBalance::compute(
            Avail::Available(2.0),
            Avail::Available(80.0),
            Avail::Available(70.0),
            &Avail::Available(3000.0),
            &Avail::Available(350.0),
            0.15,
        );
        assert!(hb.water_heat_btu_hr.get().unwrap() < 0.0);
        assert_eq!(
            hb.ratio.reason().map(|r| r.kind()),
            Some(ReasonKind::Implausible)
        );
    }
}

//! Saturation dome for pressure-enthalpy diagrams.

use crate::provider::PropertyProvider;
use crate::refrigerant::Refrigerant;
use crate::state::StateInput;
use rc_core::units::kpa;
use tracing::debug;

/// One pressure level of the dome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomePoint {
    /// Pressure [kPa]
    pub pressure_kpa: f64,
    /// Saturated-liquid enthalpy [kJ/kg]
    pub h_liquid: f64,
    /// Saturated-vapor enthalpy [kJ/kg]
    pub h_vapor: f64,
}

/// Liquid and vapor saturation lines, ordered by ascending pressure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaturationDome {
    pub points: Vec<DomePoint>,
}

impl SaturationDome {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Trace the saturation dome over log-spaced pressures.
///
/// Pressure levels where either saturated state fails to evaluate are skipped.
pub fn saturation_dome<P: PropertyProvider + ?Sized>(
    provider: &P,
    refrigerant: Refrigerant,
    p_min_kpa: f64,
    p_max_kpa: f64,
    num_points: usize,
) -> SaturationDome {
    let points = log_space(p_min_kpa, p_max_kpa, num_points)
        .into_iter()
        .filter_map(|p_kpa| {
            let h_liquid = provider
                .enthalpy(refrigerant, StateInput::sat_liquid(kpa(p_kpa)))
                .ok()?;
            let h_vapor = provider
                .enthalpy(refrigerant, StateInput::sat_vapor(kpa(p_kpa)))
                .ok()?;
            Some(DomePoint {
                pressure_kpa: p_kpa,
                h_liquid,
                h_vapor,
            })
        })
        .collect::<Vec<_>>();

    debug!(
        refrigerant = %refrigerant,
        requested = num_points,
        traced = points.len(),
        "saturation dome traced"
    );
    SaturationDome { points }
}

fn log_space(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 || !start.is_finite() || !end.is_finite() || start <= 0.0 || end <= 0.0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let log_start = start.ln();
    let log_end = end.ln();
    (0..n)
        .map(|i| {
            let frac = i as f64 / (n - 1) as f64;
            (log_start + frac * (log_end - log_start)).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surrogate::SurrogateProvider;

    #[test]
    fn log_space_endpoints() {
        let pts = log_space(100.0, 4500.0, 50);
        assert_eq!(pts.len(), 50);
        assert!((pts[0] - 100.0).abs() < 1e-9);
        assert!((pts[49] - 4500.0).abs() < 1e-6);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn dome_skips_supercritical_levels() {
        let provider = SurrogateProvider::new();
        let dome = saturation_dome(&provider, Refrigerant::R290, 100.0, 4500.0, 50);
        // Levels above the ~4251 kPa critical pressure fail and are skipped.
        assert!(!dome.is_empty());
        assert!(dome.len() < 50);
        assert!(dome.points.iter().all(|p| p.pressure_kpa < 4251.2));
        assert!(dome.points.iter().all(|p| p.h_vapor >= p.h_liquid));
    }

    #[test]
    fn unsupported_refrigerant_gives_empty_dome() {
        let provider = SurrogateProvider::new();
        let dome = saturation_dome(&provider, Refrigerant::R744, 100.0, 4500.0, 10);
        assert!(dome.is_empty());
    }
}

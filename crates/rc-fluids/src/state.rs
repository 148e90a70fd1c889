//! Thermodynamic state inputs and outputs.

use crate::error::{FluidError, FluidResult};
use rc_core::ensure_finite;
use rc_core::units::{Pressure, SpecEnthalpy, Temperature};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

/// The two independent variables that fix a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature (single-phase only).
    PT { p: Pressure, t: Temperature },
    /// Pressure and vapor quality (saturated).
    PQ { p: Pressure, q: f64 },
    /// Pressure and specific enthalpy [kJ/kg].
    PH { p: Pressure, h: SpecEnthalpy },
    /// Temperature and vapor quality (saturated).
    TQ { t: Temperature, q: f64 },
}

impl StateInput {
    /// Saturated liquid at pressure `p`.
    pub fn sat_liquid(p: Pressure) -> Self {
        StateInput::PQ { p, q: 0.0 }
    }

    /// Saturated vapor at pressure `p`.
    pub fn sat_vapor(p: Pressure) -> Self {
        StateInput::PQ { p, q: 1.0 }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StateInput::PT { .. } => "P-T",
            StateInput::PQ { .. } => "P-Q",
            StateInput::PH { .. } => "P-h",
            StateInput::TQ { .. } => "T-Q",
        }
    }

    /// Reject NaN, non-positive pressures/temperatures and qualities outside [0, 1].
    pub fn validate(&self) -> FluidResult<()> {
        match *self {
            StateInput::PT { p, t } => {
                validate_pressure(p)?;
                validate_temperature(t)
            }
            StateInput::PQ { p, q } => {
                validate_pressure(p)?;
                validate_quality(q)
            }
            StateInput::PH { p, h } => {
                validate_pressure(p)?;
                ensure_finite(h, "enthalpy")?;
                Ok(())
            }
            StateInput::TQ { t, q } => {
                validate_temperature(t)?;
                validate_quality(q)
            }
        }
    }

    /// Hashable identity for memoization: pair tag plus exact bit patterns (SI values).
    pub(crate) fn key(&self) -> (u8, u64, u64) {
        match *self {
            StateInput::PT { p, t } => (
                0,
                p.get::<pascal>().to_bits(),
                t.get::<kelvin>().to_bits(),
            ),
            StateInput::PQ { p, q } => (1, p.get::<pascal>().to_bits(), q.to_bits()),
            StateInput::PH { p, h } => (2, p.get::<pascal>().to_bits(), h.to_bits()),
            StateInput::TQ { t, q } => (3, t.get::<kelvin>().to_bits(), q.to_bits()),
        }
    }
}

/// Property requested from a provider.
///
/// Output units: enthalpy kJ/kg, temperature K, pressure Pa, density kg/m³,
/// quality dimensionless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Enthalpy,
    Temperature,
    Pressure,
    Density,
    Quality,
}

fn validate_pressure(p: Pressure) -> FluidResult<()> {
    let v = p.get::<pascal>();
    if !v.is_finite() || v <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    Ok(())
}

fn validate_temperature(t: Temperature) -> FluidResult<()> {
    let v = t.get::<kelvin>();
    if !v.is_finite() || v <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    Ok(())
}

fn validate_quality(q: f64) -> FluidResult<()> {
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(FluidError::InvalidArg {
            what: "quality must be within [0, 1]",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::units::{k, pa};

    #[test]
    fn valid_inputs_pass() {
        assert!(StateInput::PT { p: pa(5e5), t: k(280.0) }.validate().is_ok());
        assert!(StateInput::sat_vapor(pa(5e5)).validate().is_ok());
        assert!(StateInput::PH { p: pa(5e5), h: 280.0 }.validate().is_ok());
        assert!(StateInput::TQ { t: k(270.0), q: 0.3 }.validate().is_ok());
    }

    #[test]
    fn reject_non_physical() {
        assert!(StateInput::PT { p: pa(-1.0), t: k(280.0) }.validate().is_err());
        assert!(StateInput::PT { p: pa(5e5), t: k(f64::NAN) }.validate().is_err());
        assert!(StateInput::PQ { p: pa(5e5), q: 1.5 }.validate().is_err());
        assert!(StateInput::PH { p: pa(5e5), h: f64::NAN }.validate().is_err());
    }

    #[test]
    fn keys_distinguish_pairs() {
        let a = StateInput::PQ { p: pa(5e5), q: 1.0 };
        let b = StateInput::PH { p: pa(5e5), h: 1.0 };
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), StateInput::sat_vapor(pa(5e5)).key());
    }
}

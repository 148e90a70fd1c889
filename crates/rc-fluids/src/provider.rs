//! The property-provider boundary.

use crate::error::FluidResult;
use crate::refrigerant::Refrigerant;
use crate::state::{Property, StateInput};
use rc_core::units::{Pressure, SpecEnthalpy, Temperature};

/// Refrigerant property backend.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can serve
/// a parallel batch. Failures are ordinary errors; callers decide whether a
/// failed lookup makes a point unavailable.
pub trait PropertyProvider: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Whether this backend can evaluate the given refrigerant.
    fn supports(&self, refrigerant: Refrigerant) -> bool;

    /// Evaluate one property at the state fixed by `input`.
    ///
    /// Units: enthalpy kJ/kg, temperature K, pressure Pa, density kg/m³.
    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64>;

    /// Specific enthalpy [kJ/kg].
    fn enthalpy(&self, refrigerant: Refrigerant, input: StateInput) -> FluidResult<SpecEnthalpy> {
        self.property(refrigerant, Property::Enthalpy, input)
    }

    /// Temperature [K].
    fn temperature(&self, refrigerant: Refrigerant, input: StateInput) -> FluidResult<f64> {
        self.property(refrigerant, Property::Temperature, input)
    }

    /// Density [kg/m³].
    fn density(&self, refrigerant: Refrigerant, input: StateInput) -> FluidResult<f64> {
        self.property(refrigerant, Property::Density, input)
    }

    /// Vapor quality. Only meaningful inside the two-phase region.
    fn quality(&self, refrigerant: Refrigerant, input: StateInput) -> FluidResult<f64> {
        self.property(refrigerant, Property::Quality, input)
    }

    /// Saturation temperature [K] at pressure `p`.
    fn saturation_temperature(&self, refrigerant: Refrigerant, p: Pressure) -> FluidResult<f64> {
        self.property(
            refrigerant,
            Property::Temperature,
            StateInput::sat_vapor(p),
        )
    }

    /// Saturation pressure [Pa] at temperature `t`.
    fn saturation_pressure(&self, refrigerant: Refrigerant, t: Temperature) -> FluidResult<f64> {
        self.property(
            refrigerant,
            Property::Pressure,
            StateInput::TQ { t, q: 1.0 },
        )
    }
}

impl<T: PropertyProvider + ?Sized> PropertyProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, refrigerant: Refrigerant) -> bool {
        (**self).supports(refrigerant)
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        (**self).property(refrigerant, output, input)
    }
}

impl<T: PropertyProvider + ?Sized> PropertyProvider for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, refrigerant: Refrigerant) -> bool {
        (**self).supports(refrigerant)
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        (**self).property(refrigerant, output, input)
    }
}

impl<T: PropertyProvider + ?Sized> PropertyProvider for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports(&self, refrigerant: Refrigerant) -> bool {
        (**self).supports(refrigerant)
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        (**self).property(refrigerant, output, input)
    }
}

//! CoolProp-based property provider.

use crate::error::{FluidError, FluidResult};
use crate::provider::PropertyProvider;
use crate::refrigerant::Refrigerant;
use crate::state::{Property, StateInput};
use rfluids::prelude::*;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

const J_PER_KJ: f64 = 1000.0;

/// CoolProp backend for refrigerant properties.
///
/// Pure refrigerants only. Thread-safe: a fresh rfluids `Fluid` is built per lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoolPropProvider {}

impl CoolPropProvider {
    pub fn new() -> Self {
        Self {}
    }

    fn fluid_at(&self, refrigerant: Refrigerant, input: StateInput) -> FluidResult<Fluid> {
        let pure = refrigerant.rfluids_pure();
        let (a, b) = match input {
            StateInput::PT { p, t } => (
                FluidInput::pressure(p.get::<pascal>()),
                FluidInput::temperature(t.get::<kelvin>()),
            ),
            StateInput::PQ { p, q } => (
                FluidInput::pressure(p.get::<pascal>()),
                FluidInput::quality(q),
            ),
            StateInput::PH { p, h } => (
                FluidInput::pressure(p.get::<pascal>()),
                FluidInput::enthalpy(h * J_PER_KJ),
            ),
            StateInput::TQ { t, q } => (
                FluidInput::temperature(t.get::<kelvin>()),
                FluidInput::quality(q),
            ),
        };
        Fluid::from(pure).in_state(a, b).map_err(|e| FluidError::Backend {
            message: format!(
                "rfluids error for {} at {} {:?}: {}",
                refrigerant,
                input.label(),
                input,
                e
            ),
        })
    }
}

impl PropertyProvider for CoolPropProvider {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports(&self, _refrigerant: Refrigerant) -> bool {
        true
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        input.validate()?;
        let mut fluid = self.fluid_at(refrigerant, input)?;

        let value = match output {
            Property::Enthalpy => fluid.enthalpy().map(|h| h / J_PER_KJ),
            Property::Temperature => fluid.temperature(),
            Property::Pressure => fluid.pressure(),
            Property::Density => fluid.density(),
            Property::Quality => fluid.quality(),
        }
        .map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting {:?} for {}: {}", output, refrigerant, e),
        })?;

        if !value.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "backend returned a non-finite value",
            });
        }
        if output == Property::Quality && !(0.0..=1.0).contains(&value) {
            return Err(FluidError::OutOfRange {
                what: "state is not two-phase",
            });
        }
        Ok(value)
    }
}

//! rc-fluids: refrigerant property lookups for the cycle engine.
//!
//! Provides:
//! - Refrigerant catalogue (R290, R600a, R134a, ...)
//! - State input pairs ({T,P}, {P,Q}, {P,H}, {T,Q})
//! - `PropertyProvider` trait, the narrow boundary the engine depends on
//! - CoolProp backend for real fluid properties
//! - Surrogate backend (saturation curve + constant heat capacities)
//! - Per-batch memoization of repeated lookups
//! - Saturation dome generation for P-h diagrams
//!
//! # Architecture
//!
//! The engine never talks to a backend directly. Everything goes through
//! `PropertyProvider`, so the equation of state can be swapped (CoolProp via
//! `rfluids`, the surrogate, or a test stub) without touching cycle logic.
//!
//! # Example
//!
//! ```no_run
//! use rc_fluids::{CoolPropProvider, PropertyProvider, Refrigerant, StateInput};
//! use rc_core::units::{k, kpa};
//!
//! let provider = CoolPropProvider::new();
//! let input = StateInput::PT {
//!     p: kpa(584.0),
//!     t: k(285.9),
//! };
//!
//! let h = provider.enthalpy(Refrigerant::R290, input).unwrap();
//! println!("Enthalpy: {h} kJ/kg");
//! ```

pub mod coolprop;
pub mod dome;
pub mod error;
pub mod memo;
pub mod provider;
pub mod refrigerant;
pub mod state;
pub mod surrogate;

// Re-exports for ergonomics
pub use coolprop::CoolPropProvider;
pub use dome::{DomePoint, SaturationDome, saturation_dome};
pub use error::{FluidError, FluidResult};
pub use memo::{CacheStats, MemoizedProvider};
pub use provider::PropertyProvider;
pub use refrigerant::Refrigerant;
pub use state::{Property, StateInput};
pub use surrogate::{SurrogateCoefficients, SurrogateProvider};

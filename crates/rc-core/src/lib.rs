//! rc-core: stable foundation for the refrigeration cycle engine.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - convert (rig unit conversions: psig, °F, lb/hr, BTU/hr, GPM)
//! - numeric (Real + tolerances + float helpers)
//! - avail (explicit available/unavailable values)
//! - error (shared error types)

pub mod avail;
pub mod convert;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use avail::{Avail, Reason, ReasonKind};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;

//! Float helpers shared by the property backends and the engine.

use crate::CoreError;

pub type Real = f64;

/// Closeness test: within `abs`, or within `rel` of the larger magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Rounding noise of a few float operations.
    pub const ROUNDING: Self = Self::new(1e-12, 1e-9);

    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }

    pub fn close(&self, a: Real, b: Real) -> bool {
        let diff = (a - b).abs();
        diff <= self.abs || diff <= self.rel * a.abs().max(b.abs())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::ROUNDING
    }
}

/// Pass finite values through; NaN and infinities become `CoreError::NonFinite`.
pub fn ensure_finite(value: Real, what: &'static str) -> Result<Real, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

/// Arithmetic mean of the finite values, `None` if there are none.
///
/// Used to fold several physical sensor taps into one logical reading.
pub fn finite_mean(values: impl IntoIterator<Item = Real>) -> Option<Real> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as Real)
    }
}

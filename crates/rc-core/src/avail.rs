//! Explicit "value or reason it is missing".
//!
//! Sensor channels drop out, property lookups fail outside the two-phase
//! envelope and some computed values are physically implausible. None of that
//! is fatal for a sample, so instead of errors or NaN every derived quantity is
//! an [`Avail`]: either the value, or a [`Reason`] saying why it is absent.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Category of an unavailable value, used for counting in run summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReasonKind {
    /// Channel or role mapping absent for this sample.
    Missing,
    /// Refrigerant property evaluation outside its valid domain.
    PropertyLookup,
    /// Computed, but outside a physically sane band and discarded.
    Implausible,
}

/// Why a value is unavailable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Reason {
    Missing { what: String },
    PropertyLookup { what: String, message: String },
    Implausible { what: String, value: f64 },
}

impl Reason {
    pub fn missing(what: impl Into<String>) -> Self {
        Reason::Missing { what: what.into() }
    }

    pub fn lookup(what: impl Into<String>, message: impl fmt::Display) -> Self {
        Reason::PropertyLookup {
            what: what.into(),
            message: message.to_string(),
        }
    }

    pub fn implausible(what: impl Into<String>, value: f64) -> Self {
        Reason::Implausible {
            what: what.into(),
            value,
        }
    }

    pub fn kind(&self) -> ReasonKind {
        match self {
            Reason::Missing { .. } => ReasonKind::Missing,
            Reason::PropertyLookup { .. } => ReasonKind::PropertyLookup,
            Reason::Implausible { .. } => ReasonKind::Implausible,
        }
    }

    pub fn what(&self) -> &str {
        match self {
            Reason::Missing { what }
            | Reason::PropertyLookup { what, .. }
            | Reason::Implausible { what, .. } => what,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Missing { what } => write!(f, "{what}: no data"),
            Reason::PropertyLookup { what, message } => {
                write!(f, "{what}: property lookup failed ({message})")
            }
            Reason::Implausible { what, value } => {
                write!(f, "{what}: implausible value {value}")
            }
        }
    }
}

/// A value that is either available or unavailable for a stated reason.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Avail<T> {
    Available(T),
    Unavailable(Reason),
}

impl<T> Avail<T> {
    pub fn missing(what: impl Into<String>) -> Self {
        Avail::Unavailable(Reason::missing(what))
    }

    /// Wrap an optional value, building the reason only when it is absent.
    pub fn from_option(value: Option<T>, reason: impl FnOnce() -> Reason) -> Self {
        match value {
            Some(v) => Avail::Available(v),
            None => Avail::Unavailable(reason()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Avail::Available(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Avail::Available(v) => Some(v),
            Avail::Unavailable(_) => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Avail::Available(v) => Some(v),
            Avail::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Avail::Available(_) => None,
            Avail::Unavailable(r) => Some(r),
        }
    }

    pub fn as_ref(&self) -> Avail<&T> {
        match self {
            Avail::Available(v) => Avail::Available(v),
            Avail::Unavailable(r) => Avail::Unavailable(r.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Avail<U> {
        match self {
            Avail::Available(v) => Avail::Available(f(v)),
            Avail::Unavailable(r) => Avail::Unavailable(r),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Avail<U>) -> Avail<U> {
        match self {
            Avail::Available(v) => f(v),
            Avail::Unavailable(r) => Avail::Unavailable(r),
        }
    }

    /// Both values, or the first reason encountered.
    pub fn zip<U>(self, other: Avail<U>) -> Avail<(T, U)> {
        match (self, other) {
            (Avail::Available(a), Avail::Available(b)) => Avail::Available((a, b)),
            (Avail::Unavailable(r), _) | (_, Avail::Unavailable(r)) => Avail::Unavailable(r),
        }
    }

    /// First available of `self` and `other`; keeps `self`'s reason if neither is.
    pub fn or(self, other: Avail<T>) -> Avail<T> {
        match (self, other) {
            (Avail::Available(v), _) => Avail::Available(v),
            (Avail::Unavailable(_), Avail::Available(v)) => Avail::Available(v),
            (Avail::Unavailable(r), Avail::Unavailable(_)) => Avail::Unavailable(r),
        }
    }
}

impl<T: Copy> Avail<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

impl<T, E: fmt::Display> From<(Result<T, E>, &str)> for Avail<T> {
    fn from((result, what): (Result<T, E>, &str)) -> Self {
        match result {
            Ok(v) => Avail::Available(v),
            Err(e) => Avail::Unavailable(Reason::lookup(what, e)),
        }
    }
}

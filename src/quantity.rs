//! Report Value Types - Sentinels and Provenance
//!
//! Infinite and unbounded results are valid outcomes, not errors.
//! They serialize as explicit strings so JSON never carries `inf` or `NaN`.

use serde::{Serialize, Serializer};

/// A distance that may legitimately be infinite (focus beyond hyperfocal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Finite(f64),
    Infinite,
}

impl Distance {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Distance::Infinite)
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            Distance::Finite(v) => Some(*v),
            Distance::Infinite => None,
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distance::Finite(v) => serializer.serialize_f64(*v),
            Distance::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

/// A limit that has no upper bound when its driving rate is zero
/// (zero object speed makes blur-limited exposure undefined).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounded<T> {
    Limited(T),
    Unbounded,
}

impl<T: Copy> Bounded<T> {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bounded::Unbounded)
    }

    pub fn limited(&self) -> Option<T> {
        match self {
            Bounded::Limited(v) => Some(*v),
            Bounded::Unbounded => None,
        }
    }
}

impl<T: Serialize> Serialize for Bounded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bounded::Limited(v) => v.serialize(serializer),
            Bounded::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Where a resolved value came from.
///
/// Keeps the datasheet-vs-heuristic decision in one place instead of
/// scattering `if provided` checks through every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Supplied in the input
    Provided,
    /// Computed from other fields or a documented heuristic
    Derived,
}

/// A value tagged with its [`ValueSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sourced<T> {
    Provided(T),
    Derived(T),
}

impl<T: Copy> Sourced<T> {
    pub fn value(&self) -> T {
        match self {
            Sourced::Provided(v) | Sourced::Derived(v) => *v,
        }
    }

    pub fn source(&self) -> ValueSource {
        match self {
            Sourced::Provided(_) => ValueSource::Provided,
            Sourced::Derived(_) => ValueSource::Derived,
        }
    }
}

/// Serializes as the bare value; reports carry the source in a sibling field.
impl<T: Serialize> Serialize for Sourced<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Sourced::Provided(v) | Sourced::Derived(v) => v.serialize(serializer),
        }
    }
}

//! Bound type for constraint boundaries

use std::fmt;

use crate::version::{Identifier, Version};

/// Represents a bound (lower or upper) of a version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// Below every version, inclusive
    Zero,
    /// A concrete version
    At { version: Version, is_inclusive: bool },
    /// Beyond every version, exclusive
    PositiveInfinity,
}

impl Bound {
    /// Create a new bound at a concrete version
    pub fn new(version: Version, is_inclusive: bool) -> Self {
        Bound::At {
            version,
            is_inclusive,
        }
    }

    /// Get the boundary version, `None` for the sentinels
    pub fn version(&self) -> Option<&Version> {
        match self {
            Bound::At { version, .. } => Some(version),
            Bound::Zero | Bound::PositiveInfinity => None,
        }
    }

    /// Check if the bound is inclusive
    pub fn is_inclusive(&self) -> bool {
        match self {
            Bound::Zero => true,
            Bound::At { is_inclusive, .. } => *is_inclusive,
            Bound::PositiveInfinity => false,
        }
    }

    /// Check if this is the zero bound
    pub fn is_zero(&self) -> bool {
        matches!(self, Bound::Zero)
    }

    /// Check if this is positive infinity
    pub fn is_positive_infinity(&self) -> bool {
        matches!(self, Bound::PositiveInfinity)
    }

    /// Create the zero bound
    pub fn zero() -> Self {
        Bound::Zero
    }

    /// Create positive infinity bound
    pub fn positive_infinity() -> Self {
        Bound::PositiveInfinity
    }

    /// The lowest version there is, `0.0.0-0`
    pub fn lowest_version() -> Version {
        Version::new(0, 0, 0).with_pre(vec![Identifier::Numeric(0)])
    }

    /// Used as a lower bound: does `version` lie at or above it?
    pub fn admits_from_above(&self, version: &Version) -> bool {
        match self {
            Bound::Zero => true,
            Bound::At {
                version: bound,
                is_inclusive: true,
            } => version >= bound,
            Bound::At { version: bound, .. } => version > bound,
            Bound::PositiveInfinity => false,
        }
    }

    /// Used as an upper bound: does `version` lie at or below it?
    pub fn admits_from_below(&self, version: &Version) -> bool {
        match self {
            Bound::Zero => false,
            Bound::At {
                version: bound,
                is_inclusive: true,
            } => version <= bound,
            Bound::At { version: bound, .. } => version < bound,
            Bound::PositiveInfinity => true,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Zero => write!(f, "zero [inclusive]"),
            Bound::PositiveInfinity => write!(f, "infinity [exclusive]"),
            Bound::At {
                version,
                is_inclusive,
            } => write!(
                f,
                "{} [{}]",
                version,
                if *is_inclusive { "inclusive" } else { "exclusive" }
            ),
        }
    }
}

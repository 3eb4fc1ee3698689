//! Single comparator clause

use std::fmt;
use thiserror::Error;

use super::{Bound, ConstraintInterface, Operator};
use crate::Version;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Cannot build the upper bound of \"{0}\": component overflow")]
    Overflow(String),
    #[error("Operator \"{0}\" cannot be used on its own")]
    StandaloneWildcard(Operator),
}

/// Version text of a comparator: possibly partial (`1.2`) or wildcarded (`1.x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    version: Version,
    precision: usize,
    wildcard: bool,
}

impl Pattern {
    /// `version` has its missing components filled with zeros, `precision`
    /// counts the numeric components actually written (0 to 3).
    pub fn new(version: Version, precision: usize, wildcard: bool) -> Self {
        Pattern {
            version,
            precision: precision.min(3),
            wildcard,
        }
    }

    /// A fully specified version
    pub fn exact(version: Version) -> Self {
        Self::new(version, 3, false)
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// `*` on its own, no component written
    fn is_any(&self) -> bool {
        self.wildcard && self.precision == 0
    }

    /// Lowest version the written components allow
    fn floor(&self) -> Version {
        if self.is_any() {
            Bound::lowest_version()
        } else {
            self.version.clone()
        }
    }

    /// Inclusive lower bound of the written components
    fn lower(&self) -> Bound {
        if self.is_any() {
            Bound::zero()
        } else {
            Bound::new(self.version.clone(), true)
        }
    }

    /// Exclusive upper bound spanning every value of the omitted components
    fn ceiling(&self) -> Result<Bound, ConstraintError> {
        if self.precision == 0 {
            return Ok(Bound::positive_infinity());
        }
        Ok(Bound::new(bump(&self.version, self.precision)?, false))
    }
}

/// Increment the component at `position` (1-based) and zero everything after it
fn bump(version: &Version, position: usize) -> Result<Version, ConstraintError> {
    let overflow = || ConstraintError::Overflow(version.to_string());
    let (major, minor, patch) = (version.major(), version.minor(), version.patch());

    let bumped = match position {
        1 => Version::new(major.checked_add(1).ok_or_else(overflow)?, 0, 0),
        2 => Version::new(major, minor.checked_add(1).ok_or_else(overflow)?, 0),
        _ => Version::new(major, minor, patch.checked_add(1).ok_or_else(overflow)?),
    };
    Ok(bumped)
}

/// A single comparator clause (e.g. `>= 1.0.0`, `~1.2`, `1.x`)
#[derive(Debug, Clone)]
pub struct Constraint {
    operator: Operator,
    pattern: Pattern,
    lower_bound: Bound,
    upper_bound: Bound,
    pretty_string: Option<String>,
}

impl Constraint {
    /// Create a new constraint against a fully specified version
    pub fn new(operator: Operator, version: Version) -> Result<Self, ConstraintError> {
        Self::with_pattern(operator, Pattern::exact(version))
    }

    /// Create a new constraint from a possibly partial pattern
    pub fn with_pattern(operator: Operator, pattern: Pattern) -> Result<Self, ConstraintError> {
        if operator == Operator::Wildcard && !pattern.is_wildcard() {
            return Err(ConstraintError::StandaloneWildcard(operator));
        }
        let (lower_bound, upper_bound) = extract_bounds(operator, &pattern)?;

        Ok(Constraint {
            operator,
            pattern,
            lower_bound,
            upper_bound,
            pretty_string: None,
        })
    }

    /// Get the operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Get the pattern version, missing components filled with zeros
    pub fn version(&self) -> &Version {
        self.pattern.version()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Lowest version admitted by the clause
    pub fn lower_bound(&self) -> Bound {
        if self.operator == Operator::NotEqual {
            return Bound::zero();
        }
        self.lower_bound.clone()
    }

    /// Highest version admitted by the clause
    pub fn upper_bound(&self) -> Bound {
        if self.operator == Operator::NotEqual {
            return Bound::positive_infinity();
        }
        self.upper_bound.clone()
    }

    /// Whether `version` lies inside the stored interval. For `!=` the
    /// interval is the excluded one.
    fn within(&self, version: &Version) -> bool {
        self.lower_bound.admits_from_above(version) && self.upper_bound.admits_from_below(version)
    }
}

/// Expand a clause into the interval it admits (or excludes, for `!=`)
fn extract_bounds(operator: Operator, pattern: &Pattern) -> Result<(Bound, Bound), ConstraintError> {
    let floor = pattern.lower();

    let bounds = match operator {
        Operator::Equal | Operator::NotEqual | Operator::Wildcard => {
            if pattern.is_wildcard() {
                (floor, pattern.ceiling()?)
            } else {
                (floor.clone(), floor)
            }
        }
        Operator::GreaterThan => {
            if pattern.is_wildcard() {
                let lower = match pattern.ceiling()? {
                    Bound::At { version, .. } => Bound::new(version, true),
                    sentinel => sentinel,
                };
                (lower, Bound::positive_infinity())
            } else {
                (Bound::new(pattern.floor(), false), Bound::positive_infinity())
            }
        }
        Operator::GreaterThanOrEqual => (floor, Bound::positive_infinity()),
        Operator::LessThan => (Bound::zero(), Bound::new(pattern.floor(), false)),
        Operator::LessThanOrEqual => {
            if pattern.is_wildcard() {
                (Bound::zero(), pattern.ceiling()?)
            } else {
                (Bound::zero(), floor)
            }
        }
        Operator::Tilde => {
            let upper = match pattern.precision() {
                0 => Bound::positive_infinity(),
                1 => Bound::new(bump(pattern.version(), 1)?, false),
                _ => Bound::new(bump(pattern.version(), 2)?, false),
            };
            (floor, upper)
        }
        Operator::Caret => {
            let version = pattern.version();
            let precision = pattern.precision();
            let upper = if precision == 0 {
                Bound::positive_infinity()
            } else {
                // The leftmost non-zero written component is locked
                let position = if version.major() != 0 || precision < 2 {
                    1
                } else if version.minor() != 0 || precision < 3 {
                    2
                } else {
                    3
                };
                Bound::new(bump(version, position)?, false)
            };
            (floor, upper)
        }
    };

    Ok(bounds)
}

impl ConstraintInterface for Constraint {
    fn matches(&self, version: &Version) -> bool {
        match self.operator {
            Operator::NotEqual => !self.within(version),
            _ => self.within(version),
        }
    }

    fn pretty_string(&self) -> String {
        self.pretty_string
            .clone()
            .unwrap_or_else(|| self.to_string())
    }

    fn set_pretty_string(&mut self, pretty: Option<String>) {
        self.pretty_string = pretty;
    }

    fn clone_box(&self) -> Box<dyn ConstraintInterface> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = &self.lower_bound;
        let upper = &self.upper_bound;
        let lower_op = if lower.is_inclusive() { ">=" } else { ">" };
        let upper_op = if upper.is_inclusive() { "<=" } else { "<" };

        if self.operator == Operator::NotEqual {
            return match (lower.version(), upper.version()) {
                (Some(low), Some(_)) if lower == upper => write!(f, "!= {}", low),
                (Some(low), Some(high)) => write!(f, "[< {} || >= {}]", low, high),
                (Some(low), None) => write!(f, "< {}", low),
                (None, Some(high)) => write!(f, ">= {}", high),
                (None, None) => write!(f, "!= *"),
            };
        }

        match (lower.version(), upper.version()) {
            (Some(low), Some(_)) if lower == upper => write!(f, "= {}", low),
            (Some(low), Some(high)) => write!(f, "[{} {} {} {}]", lower_op, low, upper_op, high),
            (Some(low), None) => write!(f, "{} {}", lower_op, low),
            (None, Some(high)) => write!(f, "{} {}", upper_op, high),
            // Admits nothing
            (None, None) if lower.is_positive_infinity() => write!(f, "> *"),
            (None, None) => write!(f, "*"),
        }
    }
}

//! MultiConstraint - compound constraint combining multiple constraints

use std::fmt;
use thiserror::Error;

use super::{ConstraintInterface, MatchAllConstraint};
use crate::Version;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultiConstraintError {
    #[error("Must provide at least two constraints for a MultiConstraint")]
    TooFewConstraints,
}

/// A constraint combining multiple constraints with AND (conjunctive) or OR (disjunctive) logic
#[derive(Debug, Clone)]
pub struct MultiConstraint {
    constraints: Vec<Box<dyn ConstraintInterface>>,
    conjunctive: bool,
    pretty_string: Option<String>,
}

impl MultiConstraint {
    /// Create a new MultiConstraint
    pub fn new(
        constraints: Vec<Box<dyn ConstraintInterface>>,
        conjunctive: bool,
    ) -> Result<Self, MultiConstraintError> {
        if constraints.len() < 2 {
            return Err(MultiConstraintError::TooFewConstraints);
        }

        Ok(MultiConstraint {
            constraints,
            conjunctive,
            pretty_string: None,
        })
    }

    /// Create a constraint from any number of parts, collapsing trivial cases
    pub fn create(
        mut constraints: Vec<Box<dyn ConstraintInterface>>,
        conjunctive: bool,
    ) -> Box<dyn ConstraintInterface> {
        match constraints.len() {
            0 => Box::new(MatchAllConstraint::new()),
            1 => constraints.remove(0),
            _ => Box::new(MultiConstraint {
                constraints,
                conjunctive,
                pretty_string: None,
            }),
        }
    }

    /// Get the constraints
    pub fn constraints(&self) -> &[Box<dyn ConstraintInterface>] {
        &self.constraints
    }

    /// Check if this is a conjunctive (AND) constraint
    pub fn is_conjunctive(&self) -> bool {
        self.conjunctive
    }

    /// Check if this is a disjunctive (OR) constraint
    pub fn is_disjunctive(&self) -> bool {
        !self.conjunctive
    }
}

impl ConstraintInterface for MultiConstraint {
    fn matches(&self, version: &Version) -> bool {
        if self.conjunctive {
            self.constraints.iter().all(|c| c.matches(version))
        } else {
            self.constraints.iter().any(|c| c.matches(version))
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

    fn as_multi_constraint(&self) -> Option<(&[Box<dyn ConstraintInterface>], bool)> {
        Some((&self.constraints, self.conjunctive))
    }
}

impl fmt::Display for MultiConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints_str: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();

        let separator = if self.conjunctive { " " } else { " || " };
        write!(f, "[{}]", constraints_str.join(separator))
    }
}

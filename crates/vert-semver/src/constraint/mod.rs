//! Constraint types for version matching

mod bound;
pub mod constraint;
mod constraint_interface;
mod match_all;
mod multi_constraint;
mod operator;

pub use bound::Bound;
pub use constraint::{Constraint, ConstraintError, Pattern};
pub use constraint_interface::ConstraintInterface;
pub use match_all::MatchAllConstraint;
pub use multi_constraint::{MultiConstraint, MultiConstraintError};
pub use operator::{InvalidOperatorError, Operator};

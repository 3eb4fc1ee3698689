//! Semantic versioning library for comparing versions against constraints
//!
//! This crate provides semantic version parsing, ordering, constraint matching
//! and the classification of candidate versions (optionally `git describe`
//! output) against a base constraint.

pub mod constraint;
mod comparator;
mod compare;
mod git;
mod semver;
mod version;
mod version_parser;

pub use comparator::Comparator;
pub use compare::{classify, CandidateError, Classification, ClassifyError, Comparison, Rejected};
pub use constraint::{Bound, Constraint, ConstraintInterface, MatchAllConstraint, MultiConstraint, Operator, Pattern};
pub use git::{from_git_describe, GitConversionError};
pub use semver::Semver;
pub use version::{Identifier, Version};
pub use version_parser::{ParsedConstraints, VersionParser, VersionParserError};

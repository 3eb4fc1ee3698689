//! Classification of candidate versions against a base constraint

use std::fmt;

use thiserror::Error;

use crate::git::{from_git_describe, GitConversionError};
use crate::{ParsedConstraints, Version, VersionParser, VersionParserError};

/// The base constraint could not be parsed. No candidate is evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Could not parse constraint {base}")]
    Constraint {
        base: String,
        #[source]
        source: VersionParserError,
    },
}

/// Why a single candidate could not be turned into a version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error(transparent)]
    Parse(#[from] VersionParserError),
    #[error(transparent)]
    Git(#[from] GitConversionError),
}

/// A candidate in the failed bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// Parsed, but outside the constraint
    Unsatisfied(Version),
    /// Never became a version
    Unparsable { input: String, error: CandidateError },
}

impl Rejected {
    /// The parsed version, if there is one
    pub fn version(&self) -> Option<&Version> {
        match self {
            Rejected::Unsatisfied(version) => Some(version),
            Rejected::Unparsable { .. } => None,
        }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::Unsatisfied(version) => write!(f, "{}", version),
            Rejected::Unparsable { input, .. } => f.write_str(input),
        }
    }
}

/// Outcome of a comparison. Both buckets keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub passed: Vec<Version>,
    pub failed: Vec<Rejected>,
}

impl Classification {
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Passed versions in ascending order
    pub fn sorted_passed(&self) -> Vec<Version> {
        let mut passed = self.passed.clone();
        passed.sort();
        passed
    }

    /// Failed entries in ascending order, unparsable ones last in input order
    pub fn sorted_failed(&self) -> Vec<Rejected> {
        let mut failed = self.failed.clone();
        failed.sort_by(|a, b| match (a.version(), b.version()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        failed
    }
}

/// A base constraint parsed once and applied to any number of candidates
#[derive(Debug, Clone)]
pub struct Comparison {
    base: ParsedConstraints,
    git: bool,
}

impl Comparison {
    /// Parse the base constraint. With `git` set, candidates are read as
    /// `git describe` output.
    pub fn new(base: &str, git: bool) -> Result<Self, ClassifyError> {
        let parsed = VersionParser::new()
            .parse_constraints_cached(base)
            .map_err(|source| ClassifyError::Constraint {
                base: base.to_string(),
                source,
            })?;

        Ok(Comparison { base: parsed, git })
    }

    pub fn constraints(&self) -> &ParsedConstraints {
        &self.base
    }

    pub fn is_git(&self) -> bool {
        self.git
    }

    fn read_candidate(&self, candidate: &str) -> Result<Version, CandidateError> {
        if self.git {
            Ok(from_git_describe(candidate)?)
        } else {
            Ok(VersionParser::new().parse(candidate)?)
        }
    }

    /// Bucket every candidate into passed or failed
    pub fn classify<S: AsRef<str>>(&self, candidates: &[S]) -> Classification {
        let mut result = Classification::default();

        for candidate in candidates {
            let candidate = candidate.as_ref();

            let version = match self.read_candidate(candidate) {
                Ok(version) => version,
                Err(error) => {
                    match &error {
                        CandidateError::Git(_) => log::warn!("Not a recognized git version: {}", candidate),
                        CandidateError::Parse(_) => log::warn!("Failed to parse {}", candidate),
                    }
                    log::debug!("{}", error);
                    result.failed.push(Rejected::Unparsable {
                        input: candidate.to_string(),
                        error,
                    });
                    continue;
                }
            };

            if self.base.matches(&version) {
                log::debug!("{} satisfies {}", version, self.base.pretty_string());
                result.passed.push(version);
            } else {
                log::debug!("{} does not satisfy {}", version, self.base.pretty_string());
                result.failed.push(Rejected::Unsatisfied(version));
            }
        }

        result
    }
}

/// Parse `base` and classify `candidates` against it
pub fn classify<S: AsRef<str>>(base: &str, candidates: &[S], git: bool) -> Result<Classification, ClassifyError> {
    Ok(Comparison::new(base, git)?.classify(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(versions: &[Version]) -> Vec<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    fn rejected(failed: &[Rejected]) -> Vec<String> {
        failed.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_classify_preserves_input_order() {
        let result = classify(">=1.0.0", &["1.0.0", "1.1.1", "1.2.3", "1.0.1", "0.9.0"], false).unwrap();
        assert_eq!(strings(&result.passed), vec!["1.0.0", "1.1.1", "1.2.3", "1.0.1"]);
        assert_eq!(rejected(&result.failed), vec!["0.9.0"]);
        assert_eq!(result.failure_count(), 1);
    }

    #[test]
    fn test_classify_all_failed() {
        let result = classify(">=1.0.0", &["0.1", "v0.9.0"], false).unwrap();
        assert!(result.passed.is_empty());
        assert_eq!(rejected(&result.failed), vec!["0.1.0", "0.9.0"]);
        assert_eq!(result.failure_count(), 2);
    }

    #[test]
    fn test_classify_fatal_constraint() {
        let err = classify("not-a-version", &["1.0.0"], false).unwrap_err();
        let ClassifyError::Constraint { base, .. } = &err;
        assert_eq!(base, "not-a-version");
        assert_eq!(err.to_string(), "Could not parse constraint not-a-version");
    }

    #[test]
    fn test_classify_git_mode() {
        let result = classify(">1", &["v1.10.0-123-g0239788"], true).unwrap();
        assert_eq!(strings(&result.passed), vec!["1.10.0+123.g0239788"]);
        assert_eq!(result.failure_count(), 0);
    }

    #[test]
    fn test_classify_git_mode_failure() {
        let result = classify(">1", &["fatal: No names found, cannot describe anything."], true).unwrap();
        assert!(result.passed.is_empty());
        assert_eq!(result.failure_count(), 1);
        match &result.failed[0] {
            Rejected::Unparsable { input, error } => {
                assert_eq!(input, "fatal: No names found, cannot describe anything.");
                assert!(matches!(error, CandidateError::Git(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_without_git_mode_rejects_describe_output() {
        // Without conversion the suffix reads as a pre-release
        let result = classify(">1", &["v1.10.0-123-g0239788"], false).unwrap();
        assert_eq!(strings(&result.passed), vec!["1.10.0-123.g0239788"]);

        let result = classify("1.10.0", &["v1.10.0-123-g0239788"], false).unwrap();
        assert_eq!(result.failure_count(), 1);
    }

    #[test]
    fn test_unparsable_candidate_does_not_abort() {
        let result = classify("^1.0", &["1.2.0", "garbage", "2.0.0", "1.9.9"], false).unwrap();
        assert_eq!(strings(&result.passed), vec!["1.2.0", "1.9.9"]);
        assert_eq!(rejected(&result.failed), vec!["garbage", "2.0.0"]);
        assert_eq!(result.failed[0].version(), None);
        match &result.failed[0] {
            Rejected::Unparsable { error, .. } => assert!(matches!(error, CandidateError::Parse(_))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_candidates() {
        let result = classify("*", &[] as &[&str], false).unwrap();
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_comparison_reuse() {
        let comparison = Comparison::new("~1.2", false).unwrap();
        assert!(!comparison.is_git());
        assert_eq!(comparison.classify(&["1.2.5"]).failure_count(), 0);
        assert_eq!(comparison.classify(&["1.3.0"]).failure_count(), 1);
        assert_eq!(comparison.constraints().pretty_string(), "~1.2");
    }

    #[test]
    fn test_sorted_buckets() {
        let candidates: Vec<String> = ["3.0.0", "x", "0.5.0", "2.0.0", "y", "1.5.0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = classify("^1", &candidates[..], false).unwrap();
        assert_eq!(strings(&result.sorted_passed()), vec!["1.5.0"]);
        assert_eq!(rejected(&result.sorted_failed()), vec!["0.5.0", "2.0.0", "3.0.0", "x", "y"]);
    }

    #[test]
    fn test_classify_below_max_version() {
        let max = "18446744073709551615.18446744073709551615.18446744073709551615";
        let result = classify(&format!("<{}", max), &[max, "1.0.0"], false).unwrap();
        assert_eq!(strings(&result.passed), vec!["1.0.0"]);
        assert_eq!(rejected(&result.failed), vec![max]);
        assert_eq!(result.failure_count(), 1);
    }
}

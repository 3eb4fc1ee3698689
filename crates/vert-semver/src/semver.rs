//! Semver facade providing high-level version operations

use crate::{ParsedConstraints, Version, VersionParser};

/// Main facade for semantic versioning operations
pub struct Semver;

impl Semver {
    /// Check if a version satisfies a constraint. Anything unparsable never does.
    pub fn satisfies(version: &str, constraints: &str) -> bool {
        let parser = VersionParser::new();

        let version = match parser.parse(version) {
            Ok(v) => v,
            Err(_) => return false,
        };

        match parser.parse_constraints(constraints) {
            Ok(c) => c.matches(&version),
            Err(_) => false,
        }
    }

    /// Return all versions that satisfy the given constraints, in input order
    pub fn satisfied_by(versions: &[&str], constraints: &str) -> Vec<String> {
        let parsed_constraints = match Self::parse_constraints(constraints) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        versions
            .iter()
            .filter(|v| parsed_constraints.satisfies(v))
            .map(|v| v.to_string())
            .collect()
    }

    /// Parse constraints and return a reusable representation.
    pub fn parse_constraints(constraints: &str) -> Result<ParsedConstraints, crate::VersionParserError> {
        let parser = VersionParser::new();
        parser.parse_constraints_cached(constraints)
    }

    /// Check a version against pre-parsed constraints.
    pub fn satisfies_parsed(version: &str, constraints: &ParsedConstraints) -> bool {
        constraints.satisfies(version)
    }

    /// Sort versions in ascending order, dropping unparsable ones
    pub fn sort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, true)
    }

    /// Sort versions in descending order (reverse sort)
    pub fn rsort(versions: &[&str]) -> Vec<String> {
        Self::usort(versions, false)
    }

    fn usort(versions: &[&str], ascending: bool) -> Vec<String> {
        let parser = VersionParser::new();

        let mut parsed: Vec<(Version, usize)> = versions
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((parser.parse(v).ok()?, i)))
            .collect();

        // Stable, so equal versions keep their input order
        parsed.sort_by(|(a, _), (b, _)| if ascending { a.cmp(b) } else { b.cmp(a) });

        // Return original versions in sorted order
        parsed.into_iter().map(|(_, i)| versions[i].to_string()).collect()
    }
}

//! Version and constraint parsing module

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::constraint::{
    Constraint, ConstraintInterface, InvalidOperatorError, MatchAllConstraint, MultiConstraint, Operator, Pattern,
};
use crate::version::{Identifier, Version};

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParserError {
    #[error("Version string is empty")]
    Empty,
    #[error("Invalid version string \"{0}\"")]
    InvalidVersion(String),
    #[error("Invalid version string \"{version}\": {reason}")]
    InvalidVersionWithContext { version: String, reason: String },
    #[error("Invalid operator \"{0}\"")]
    InvalidOperator(String),
    #[error("Could not parse version constraint {constraint}: {reason}")]
    ConstraintParseError { constraint: String, reason: String },
    #[error("{0}")]
    ConstraintError(String),
}

impl From<crate::constraint::ConstraintError> for VersionParserError {
    fn from(err: crate::constraint::ConstraintError) -> Self {
        VersionParserError::ConstraintError(err.to_string())
    }
}

impl From<InvalidOperatorError> for VersionParserError {
    fn from(err: InvalidOperatorError) -> Self {
        VersionParserError::InvalidOperator(err.0)
    }
}

lazy_static! {
    // MAJOR[.MINOR[.PATCH]][-PRERELEASE][+BUILD], components may be wildcards
    static ref PATTERN_RE: Regex = Regex::new(
        r"^v?([0-9]+|[xX*])(?:\.([0-9]+|[xX*]))?(?:\.([0-9]+|[xX*]))?(?:-([^+]*))?(?:\+(.*))?$"
    ).unwrap();

    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[0-9A-Za-z-]+$").unwrap();

    // Constraint regexes
    static ref WILDCARD_RE: Regex = Regex::new(r"^[xX*](?:\.[xX*]){0,2}$").unwrap();

    // OR constraint splitter
    static ref OR_CONSTRAINT_RE: Regex = Regex::new(r"\s*\|\|\s*").unwrap();

    // Hyphen Range
    static ref HYPHEN_RE: Regex = Regex::new(r"^(?P<from>\S+)\s+-\s+(?P<to>\S+)$").unwrap();

    // Basic comparator: operator characters followed by the version pattern
    static ref BASIC_COMPARATOR_RE: Regex = Regex::new(r"^([=!<>~^]*)\s*(.*)$").unwrap();
}

fn is_wildcard(component: &str) -> bool {
    matches!(component, "x" | "X" | "*")
}

fn invalid(version: &str, reason: impl Into<String>) -> VersionParserError {
    VersionParserError::InvalidVersionWithContext {
        version: version.to_string(),
        reason: reason.into(),
    }
}

/// Parse a numeric core component: digits only, no leading zeros except `0` itself
fn parse_numeric(version: &str, component: &str) -> Result<u64, VersionParserError> {
    if component.len() > 1 && component.starts_with('0') {
        return Err(invalid(version, format!("leading zero in numeric component \"{}\"", component)));
    }
    component
        .parse()
        .map_err(|_| invalid(version, format!("numeric component \"{}\" is too large", component)))
}

/// Split a dot-separated identifier list, rejecting empty or malformed identifiers
fn parse_identifiers<'a>(version: &str, what: &str, raw: &'a str) -> Result<Vec<&'a str>, VersionParserError> {
    raw.split('.')
        .map(|ident| {
            if IDENTIFIER_RE.is_match(ident) {
                Ok(ident)
            } else {
                Err(invalid(version, format!("invalid {} identifier \"{}\"", what, ident)))
            }
        })
        .collect()
}

/// Classify pre-release identifiers. Numeric ones must fit in a `u64`.
fn parse_prerelease(version: &str, raw: &str) -> Result<Vec<Identifier>, VersionParserError> {
    parse_identifiers(version, "pre-release", raw)?
        .into_iter()
        .map(|ident| match Identifier::from_raw(ident) {
            Identifier::AlphaNumeric(_)
                if ident.bytes().all(|b| b.is_ascii_digit()) && !(ident.len() > 1 && ident.starts_with('0')) =>
            {
                Err(invalid(version, format!("numeric pre-release identifier \"{}\" is too large", ident)))
            }
            identifier => Ok(identifier),
        })
        .collect()
}

/// Parser for versions and version constraints
#[derive(Debug, Clone, Copy)]
pub struct VersionParser;

impl VersionParser {
    pub fn new() -> Self {
        VersionParser
    }

    /// Check whether a string is a valid version
    pub fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }

    /// Parse a version string: optional `v`, `MAJOR[.MINOR[.PATCH]]`, then an
    /// optional `-PRERELEASE` and `+BUILD`. Missing components default to zero.
    pub fn parse(&self, version: &str) -> Result<Version, VersionParserError> {
        let pattern = self.parse_pattern(version)?;
        if pattern.is_wildcard() {
            return Err(invalid(version, "wildcards are only allowed in constraints"));
        }
        Ok(pattern.version().clone())
    }

    /// Parse the version part of a comparator, which may be partial or wildcarded
    pub fn parse_pattern(&self, version: &str) -> Result<Pattern, VersionParserError> {
        if version.is_empty() {
            return Err(VersionParserError::Empty);
        }

        let caps = PATTERN_RE
            .captures(version)
            .ok_or_else(|| VersionParserError::InvalidVersion(version.to_string()))?;

        let mut numbers = [0u64; 3];
        let mut precision = 0;
        let mut wildcard = false;

        for (i, component) in (1..=3).filter_map(|i| caps.get(i).map(|m| (i - 1, m.as_str()))) {
            if is_wildcard(component) {
                wildcard = true;
            } else if wildcard {
                return Err(invalid(version, "numeric component after a wildcard"));
            } else {
                numbers[i] = parse_numeric(version, component)?;
                precision += 1;
            }
        }

        let pre = match caps.get(4) {
            Some(m) => parse_prerelease(version, m.as_str())?,
            None => Vec::new(),
        };
        let build = match caps.get(5) {
            Some(m) => parse_identifiers(version, "build metadata", m.as_str())?
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        if wildcard && !pre.is_empty() {
            return Err(invalid(version, "a wildcard cannot carry a pre-release"));
        }

        let parsed = Version::new(numbers[0], numbers[1], numbers[2])
            .with_pre(pre)
            .with_build(build);

        Ok(Pattern::new(parsed, precision, wildcard))
    }

    /// Parse a constraint string into constraint objects.
    ///
    /// `||` separates alternative groups, `,` separates comparators that
    /// must all hold within a group.
    pub fn parse_constraints(&self, constraints: &str) -> Result<Box<dyn ConstraintInterface>, VersionParserError> {
        let pretty_constraint = constraints.to_string();
        let constraints = constraints.trim();

        if constraints.is_empty() {
            return Err(VersionParserError::Empty);
        }

        let or_constraints: Vec<&str> = OR_CONSTRAINT_RE.split(constraints).collect();

        if or_constraints.first().map_or(false, |s| s.is_empty()) {
            return Err(VersionParserError::ConstraintParseError {
                constraint: constraints.to_string(),
                reason: "leading operator".to_string(),
            });
        }
        if or_constraints.last().map_or(false, |s| s.is_empty()) {
            return Err(VersionParserError::ConstraintParseError {
                constraint: constraints.to_string(),
                reason: "trailing operator".to_string(),
            });
        }

        let mut or_groups: Vec<Box<dyn ConstraintInterface>> = Vec::with_capacity(or_constraints.len());

        for or_constraint in or_constraints {
            let mut constraint_objects: Vec<Box<dyn ConstraintInterface>> = Vec::new();

            for and_constraint in or_constraint.split(',') {
                let and_constraint = and_constraint.trim();
                if and_constraint.is_empty() {
                    return Err(VersionParserError::ConstraintParseError {
                        constraint: constraints.to_string(),
                        reason: "empty comparator".to_string(),
                    });
                }
                constraint_objects.extend(self.parse_constraint(and_constraint)?);
            }

            or_groups.push(MultiConstraint::create(constraint_objects, true));
        }

        let mut parsed_constraint = MultiConstraint::create(or_groups, false);
        log::debug!("Parsed constraint \"{}\" as {}", constraints, parsed_constraint);
        parsed_constraint.set_pretty_string(Some(pretty_constraint));

        Ok(parsed_constraint)
    }

    fn parse_constraint(&self, constraint: &str) -> Result<Vec<Box<dyn ConstraintInterface>>, VersionParserError> {
        // Match any
        if WILDCARD_RE.is_match(constraint) {
            let mut match_all = MatchAllConstraint::new();
            match_all.set_pretty_string(Some(constraint.to_string()));
            return Ok(vec![Box::new(match_all)]);
        }

        // Hyphen Range
        if let Some(caps) = HYPHEN_RE.captures(constraint) {
            let from = self.parse_embedded(constraint, &caps["from"])?;
            let to = self.parse_embedded(constraint, &caps["to"])?;
            return Ok(vec![
                Box::new(Constraint::with_pattern(Operator::GreaterThanOrEqual, from)?),
                Box::new(Constraint::with_pattern(Operator::LessThanOrEqual, to)?),
            ]);
        }

        // Basic comparators, tilde and caret ranges
        if let Some(caps) = BASIC_COMPARATOR_RE.captures(constraint) {
            let operator = caps.get(1).map_or("", |m| m.as_str());
            let version_str = caps.get(2).map_or("", |m| m.as_str()).trim();

            if version_str.is_empty() {
                return Err(VersionParserError::ConstraintParseError {
                    constraint: constraint.to_string(),
                    reason: "empty version".to_string(),
                });
            }

            let op: Operator = operator.parse()?;
            let pattern = self.parse_embedded(constraint, version_str)?;
            let op = if op == Operator::Equal && pattern.is_wildcard() {
                Operator::Wildcard
            } else {
                op
            };

            let mut parsed = Constraint::with_pattern(op, pattern)?;
            parsed.set_pretty_string(Some(constraint.to_string()));
            return Ok(vec![Box::new(parsed)]);
        }

        Err(VersionParserError::ConstraintParseError {
            constraint: constraint.to_string(),
            reason: "Could not parse constraint".to_string(),
        })
    }

    /// Parse the version of a comparator. Build metadata has no precedence
    /// and is dropped.
    fn parse_embedded(&self, constraint: &str, version: &str) -> Result<Pattern, VersionParserError> {
        let pattern = self
            .parse_pattern(version)
            .map_err(|err| VersionParserError::ConstraintParseError {
                constraint: constraint.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Pattern::new(
            pattern.version().clone().with_build(Vec::new()),
            pattern.precision(),
            pattern.is_wildcard(),
        ))
    }

    /// Parse constraints and return a reusable, pre-parsed representation.
    pub fn parse_constraints_cached(&self, constraints: &str) -> Result<ParsedConstraints, VersionParserError> {
        let parsed = self.parse_constraints(constraints)?;
        Ok(ParsedConstraints { constraints: parsed })
    }
}

impl Default for VersionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reusable, pre-parsed constraints for repeated checks.
#[derive(Debug, Clone)]
pub struct ParsedConstraints {
    constraints: Box<dyn ConstraintInterface>,
}

impl ParsedConstraints {
    /// Check a parsed version against the constraints.
    pub fn matches(&self, version: &Version) -> bool {
        self.constraints.matches(version)
    }

    /// Parse the version and check against the constraints.
    pub fn satisfies(&self, version: &str) -> bool {
        match VersionParser::new().parse(version) {
            Ok(v) => self.matches(&v),
            Err(_) => false,
        }
    }

    pub fn constraints(&self) -> &dyn ConstraintInterface {
        self.constraints.as_ref()
    }

    /// The text the constraints were parsed from
    pub fn pretty_string(&self) -> String {
        self.constraints.pretty_string()
    }
}

impl FromStr for ParsedConstraints {
    type Err = VersionParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionParser::new().parse_constraints_cached(s)
    }
}

impl fmt::Display for ParsedConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraints)
    }
}

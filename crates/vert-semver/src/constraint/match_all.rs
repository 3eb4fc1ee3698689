//! MatchAllConstraint - matches any version

use std::fmt;

use super::ConstraintInterface;
use crate::Version;

/// A constraint that matches any version (`*`, `x`)
#[derive(Debug, Clone)]
pub struct MatchAllConstraint {
    pretty_string: Option<String>,
}

impl MatchAllConstraint {
    /// Create a new MatchAllConstraint
    pub fn new() -> Self {
        MatchAllConstraint {
            pretty_string: None,
        }
    }
}

impl Default for MatchAllConstraint {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintInterface for MatchAllConstraint {
    fn matches(&self, _version: &Version) -> bool {
        true
    }

    fn pretty_string(&self) -> String {
        self.pretty_string.clone().unwrap_or_else(|| "*".to_string())
    }

    fn set_pretty_string(&mut self, pretty: Option<String>) {
        self.pretty_string = pretty;
    }

    fn clone_box(&self) -> Box<dyn ConstraintInterface> {
        Box::new(self.clone())
    }

    fn is_match_all(&self) -> bool {
        true
    }
}

impl fmt::Display for MatchAllConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_all_matches_everything() {
        let match_all = MatchAllConstraint::new();
        for version in ["0.0.0", "1.0.0-alpha", "99.99.99+build"] {
            assert!(match_all.matches(&Version::parse(version).unwrap()));
        }
    }

    #[test]
    fn test_match_all_display() {
        let mut match_all = MatchAllConstraint::new();
        assert_eq!(match_all.to_string(), "*");
        assert_eq!(match_all.pretty_string(), "*");
        match_all.set_pretty_string(Some("x".to_string()));
        assert_eq!(match_all.pretty_string(), "x");
        assert!(match_all.is_match_all());
    }
}

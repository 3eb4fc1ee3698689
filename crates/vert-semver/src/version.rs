//! Parsed semantic version value

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{VersionParser, VersionParserError};

/// A single dot-separated pre-release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Digits only, without leading zeros
    Numeric(u64),
    /// Anything else made of `[0-9A-Za-z-]`
    AlphaNumeric(String),
}

impl Identifier {
    /// Classify a raw identifier. The caller guarantees the character set.
    pub(crate) fn from_raw(raw: &str) -> Self {
        let numeric = raw.bytes().all(|b| b.is_ascii_digit()) && !(raw.len() > 1 && raw.starts_with('0'));
        if numeric {
            if let Ok(n) = raw.parse() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::AlphaNumeric(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Identifier::Numeric(_))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// A semantic version: `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
///
/// Equality, ordering and hashing follow version precedence, so build
/// metadata never takes part in them. Use [`Version::build`] to inspect it.
#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<Identifier>,
    build: Vec<String>,
}

impl Version {
    /// Create a release version with no pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Parse a version string, see [`VersionParser::parse`]
    pub fn parse(version: &str) -> Result<Self, VersionParserError> {
        VersionParser::new().parse(version)
    }

    pub fn with_pre(mut self, pre: Vec<Identifier>) -> Self {
        self.pre = pre;
        self
    }

    pub fn with_build(mut self, build: Vec<String>) -> Self {
        self.build = build;
        self
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Pre-release identifiers, empty for a release
    pub fn pre(&self) -> &[Identifier] {
        &self.pre
    }

    /// Build metadata identifiers
    pub fn build(&self) -> &[String] {
        &self.build
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Same numeric core, no pre-release and no build metadata
    pub fn to_release(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_prerelease(&self.pre, &other.pre))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A release sorts after any pre-release of the same core. Otherwise the
/// identifiers are compared pairwise and a strict prefix sorts first.
fn compare_prerelease(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            for (x, y) in a.iter().zip(b) {
                match x.cmp(y) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            a.len().cmp(&b.len())
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            let pre: Vec<String> = self.pre.iter().map(|i| i.to_string()).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_identifier_classification() {
        assert_eq!(Identifier::from_raw("12"), Identifier::Numeric(12));
        assert_eq!(Identifier::from_raw("0"), Identifier::Numeric(0));
        assert_eq!(Identifier::from_raw("alpha"), Identifier::AlphaNumeric("alpha".to_string()));
        assert_eq!(Identifier::from_raw("01"), Identifier::AlphaNumeric("01".to_string()));
        assert_eq!(Identifier::from_raw("x-1"), Identifier::AlphaNumeric("x-1".to_string()));
    }

    #[test]
    fn test_identifier_ordering() {
        assert!(Identifier::Numeric(2) < Identifier::Numeric(11));
        assert!(Identifier::Numeric(999) < Identifier::AlphaNumeric("a".to_string()));
        assert!(Identifier::AlphaNumeric("Beta".to_string()) < Identifier::AlphaNumeric("alpha".to_string()));
        assert!(Identifier::AlphaNumeric("alpha".to_string()) < Identifier::AlphaNumeric("beta".to_string()));
    }

    #[test]
    fn test_precedence_chain() {
        // Ordering example from the semantic versioning document
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
            assert!(v(pair[1]) > v(pair[0]), "{} > {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_numeric_identifiers_sort_first() {
        assert!(v("1.0.0-18446744073709551615") < v("1.0.0-0a"));
        assert!(v("1.0.0-alpha.18446744073709551615") < v("1.0.0-alpha.a"));
        assert!(Version::parse("1.0.0-99999999999999999999").is_err());
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.0.0+build1"), v("1.0.0+build2"));
        assert_eq!(v("1.0.0+build1").cmp(&v("1.0.0")), Ordering::Equal);
        assert_eq!(v("1.0.0-rc.1+a"), v("1.0.0-rc.1+b"));
    }

    #[test]
    fn test_display() {
        assert_eq!(v("v1.2.3").to_string(), "1.2.3");
        assert_eq!(v("1").to_string(), "1.0.0");
        assert_eq!(v("0.1").to_string(), "0.1.0");
        assert_eq!(v("1.2.3-alpha.1+10212015").to_string(), "1.2.3-alpha.1+10212015");
        assert_eq!(v("1.2.3+exp.sha.5114f85").to_string(), "1.2.3+exp.sha.5114f85");
    }

    #[test]
    fn test_round_trip() {
        for s in [
            "0.0.0",
            "1.2.3",
            "10.20.30",
            "1.0.0-alpha",
            "1.0.0-0.3.7",
            "1.0.0-x.7.z.92",
            "1.0.0-x-y-z.--",
            "1.0.0-alpha+001",
            "1.0.0+20130313144700",
            "1.0.0-beta+exp.sha.5114f85",
            "1.0.0-01",
        ] {
            let parsed = v(s);
            let reparsed = v(&parsed.to_string());
            assert_eq!(parsed, reparsed);
            assert_eq!(parsed.to_string(), s);
            assert_eq!(parsed.build(), reparsed.build());
        }
    }

    #[test]
    fn test_accessors() {
        let version = v("3.4.5-rc.2+b7");
        assert_eq!(version.major(), 3);
        assert_eq!(version.minor(), 4);
        assert_eq!(version.patch(), 5);
        assert!(version.is_prerelease());
        assert_eq!(version.pre(), &[Identifier::AlphaNumeric("rc".to_string()), Identifier::Numeric(2)]);
        assert_eq!(version.build(), &["b7".to_string()]);
        assert_eq!(version.to_release().to_string(), "3.4.5");
    }

    #[test]
    fn test_hash_matches_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(v("1.0.0+a"));
        assert!(set.contains(&v("1.0.0+b")));
        assert!(!set.contains(&v("1.0.0-a")));
    }
}

//! Operator types for version constraints

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of a single comparator clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Patch-level range (~)
    Tilde,
    /// Compatible range (^)
    Caret,
    /// Bare pattern with a `*`/`x` component
    Wildcard,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid operator: {0}")]
pub struct InvalidOperatorError(pub String);

impl Operator {
    /// Get the canonical string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Tilde => "~",
            Operator::Caret => "^",
            Operator::Wildcard => "*",
        }
    }

    /// Get all accepted operator tokens, aliases included
    pub fn supported_operators() -> &'static [&'static str] {
        &["=", "==", "!=", ">", ">=", "=>", "<", "<=", "=<", "~", "~>", "^"]
    }

    /// Whether the operator expands to a lower/upper bound pair
    pub fn is_range(&self) -> bool {
        matches!(self, Operator::Tilde | Operator::Caret | Operator::Wildcard)
    }
}

impl FromStr for Operator {
    type Err = InvalidOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "=" | "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            ">" => Ok(Operator::GreaterThan),
            ">=" | "=>" => Ok(Operator::GreaterThanOrEqual),
            "<" => Ok(Operator::LessThan),
            "<=" | "=<" => Ok(Operator::LessThanOrEqual),
            "~" | "~>" => Ok(Operator::Tilde),
            "^" => Ok(Operator::Caret),
            _ => Err(InvalidOperatorError(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

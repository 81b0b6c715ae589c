//! Attribute values.
//!
//! Every attribute line carries an untyped value. Values that parse as a
//! decimal integer are stored as [`Value::Int`]; everything else is kept
//! verbatim as [`Value::String`].

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An attribute value.
///
/// Cloning is O(1): strings are reference counted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// Any value that did not parse as an integer.
    String(Arc<str>),
}

impl Value {
    /// Parses a raw value, preferring an integer interpretation.
    ///
    /// Accepts an optional sign followed by decimal digits. Anything else,
    /// including surrounding whitespace and digit separators such as
    /// `1_000`, stays a string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::String(Arc::from(raw)),
        }
    }

    /// Creates a string value without attempting an integer parse.
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    /// Attempts to extract a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns true unless the value is `0` or the empty string.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::String(s) => !s.is_empty(),
        }
    }

    /// Returns true if the value is the integer zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self, Self::Int(0))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

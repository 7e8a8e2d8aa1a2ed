//! Nominal 64-bit identifier and version counter.
//!
//! Both wrap an `i64` but are never interchangeable with plain integers, so a
//! zero in a 32-bit wire slot can stand for "absent" without ambiguity.

use std::{fmt, num::ParseIntError, str::FromStr};

/// Entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(i64);

impl Id {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Low 32 bits, as written on the binary wire.
    pub const fn int_value(self) -> i32 {
        self.0 as i32
    }

    /// Zero is the primitive encoding of "no id".
    pub const fn from_primitive(value: i64) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn to_primitive(id: Option<Self>) -> i64 {
        id.map_or(0, Self::value)
    }

    /// Lenient parse: empty input, `"0"` and unparsable text all yield `None`.
    pub fn parse_nullable(text: &str) -> Option<Self> {
        text.parse::<i64>().ok().and_then(Self::from_primitive)
    }

    pub fn parse_hex(text: &str) -> Option<Self> {
        i64::from_str_radix(text, 16).ok().map(Self)
    }

    /// Parse a separator-delimited list, skipping blank entries.
    pub fn parse_list(text: &str, separator: &str) -> Result<Vec<Self>, ParseIntError> {
        text.split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map(Self))
            .collect()
    }

    pub fn to_hex_string(self) -> String {
        format!("{:x}", self.0)
    }

    pub fn is_set(id: Option<Self>) -> bool {
        id.is_some_and(|id| id.0 > 0)
    }

    /// Wraps on overflow.
    pub const fn next(self, delta: i64) -> Self {
        Self(self.0.wrapping_add(delta))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Optimistic-locking version counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(i64);

impl Version {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn initial() -> Self {
        Self(1)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub const fn int_value(self) -> i32 {
        self.0 as i32
    }

    /// Wraps on overflow.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

//! Query vocabulary shared by the resolver and the HTTP boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a range lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every stored snapshot in the range.
    #[default]
    Hourly,
    /// At most one snapshot per calendar day, the earliest of that day.
    Daily,
}

impl Frequency {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
        }
    }

    /// Permissive interpretation: only the exact string `"daily"` selects
    /// daily sampling, everything else (missing, empty, unknown) is hourly.
    pub fn lenient(value: Option<&str>) -> Self {
        match value {
            Some("daily") => Frequency::Daily,
            _ => Frequency::Hourly,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<&str>> for Frequency {
    fn from(value: Option<&str>) -> Self {
        Frequency::lenient(value)
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        Frequency::lenient(Some(value))
    }
}

/// Error returned by the strict [`FromStr`] parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(pub String);

/// Strict parsing, for boundaries that want to reject unknown values.
impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            other => Err(ParseFrequencyError(other.to_string())),
        }
    }
}

/// Extra equality term conjoined with a temporal predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    KioskId(u32),
    Name(String),
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::KioskId(id) => write!(f, "kioskId: {id}"),
            Filter::Name(name) => write!(f, "name: {name}"),
        }
    }
}

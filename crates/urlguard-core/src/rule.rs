//! Rule data model.
//!
//! A rule pairs a path pattern with a whitespace-separated list of exempt
//! principals. Rules have no identity beyond their position in a sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One URL-blocking rule as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Regex matched against the whole request path.
    pub pattern: String,
    /// Whitespace-separated principal names or principal regexes.
    #[serde(default)]
    pub exclusions: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, exclusions: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            exclusions: exclusions.into(),
        }
    }

    /// Exclusion tokens in order. Never yields empty tokens.
    pub fn exclusion_tokens(&self) -> impl Iterator<Item = &str> {
        self.exclusions.split_whitespace()
    }
}

/// Which part of a rule a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternField {
    Path,
    Exclusion,
}

impl fmt::Display for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternField::Path => f.write_str("path"),
            PatternField::Exclusion => f.write_str("exclusion"),
        }
    }
}

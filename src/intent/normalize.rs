//! Lexical normalizer.

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Lowercased question text with whitespace runs collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the literal `phrase` appears anywhere in the text.
    pub fn contains(&self, phrase: &str) -> bool {
        self.0.contains(phrase)
    }
}

impl Deref for NormalizedQuery {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize raw input: trim, lowercase, collapse whitespace.
pub fn normalize(raw: &str) -> NormalizedQuery {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    NormalizedQuery(collapsed.to_lowercase())
}

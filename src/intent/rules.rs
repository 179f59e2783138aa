//! Ordered pattern tables for the intent extractors.
//!
//! Every table is scanned top to bottom and the first matching rule wins.
//! Patterns run against normalized (lowercase, single-spaced) text.

use std::sync::LazyLock;

use regex::Regex;

use super::{Dimension, Grain, Metric, Region, Segment};

/// A compiled pattern and the canonical value it resolves to.
#[derive(Debug)]
pub struct Rule<T> {
    pub pattern: Regex,
    pub value: T,
}

impl<T: Copy> Rule<T> {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn compile<T: Copy>(table: &[(&str, T)]) -> Vec<Rule<T>> {
    table
        .iter()
        .map(|(pattern, value)| Rule {
            pattern: Regex::new(pattern).unwrap(),
            value: *value,
        })
        .collect()
}

/// First rule in `rules` matching `text`.
pub fn first_match<T: Copy>(rules: &[Rule<T>], text: &str) -> Option<T> {
    rules.iter().find(|r| r.matches(text)).map(|r| r.value)
}

// =============================================================================
// Metric
// =============================================================================

/// Two-word phrases, matched as plain substrings before any single word.
pub const METRIC_PHRASES: &[(&str, Metric)] = &[
    ("profit margin", Metric::ProfitMargin),
    ("profit %", Metric::ProfitMargin),
];

/// Single-word aliases, whole-word.
pub static METRIC_RULES: LazyLock<Vec<Rule<Metric>>> = LazyLock::new(|| {
    compile(&[
        (r"\bsales\b", Metric::Sales),
        (r"\brevenue\b", Metric::Sales),
        (r"\bprofit\b", Metric::Profit),
        (r"\bquantity\b", Metric::Quantity),
        (r"\bqty\b", Metric::Quantity),
        (r"\bdiscount\b", Metric::Discount),
        (r"\bmargin\b", Metric::ProfitMargin),
    ])
});

/// Phrases asking for sales and profit side by side.
pub const MULTI_METRIC_PHRASES: &[&str] = &["sales and profit", "profit and sales"];

// =============================================================================
// Grain
// =============================================================================

pub static GRAIN_RULES: LazyLock<Vec<Rule<Grain>>> = LazyLock::new(|| {
    compile(&[
        (r"\bby month\b", Grain::Month),
        (r"\bby quarter\b", Grain::Quarter),
        (r"\bby year\b", Grain::Year),
    ])
});

// =============================================================================
// Dimension
// =============================================================================

pub static DIMENSION_RULES: LazyLock<Vec<Rule<Dimension>>> = LazyLock::new(|| {
    compile(&[
        (r"\bcustomer(s)?( name(s)?)?\b", Dimension::CustomerName),
        (r"\bproduct(s)?( name(s)?)?\b", Dimension::ProductName),
        (r"\bcategory\b", Dimension::Category),
        (r"\bsubcategory\b", Dimension::Subcategory),
        (r"\bregion(s)?\b", Dimension::Region),
        (r"\bsegment(s)?\b", Dimension::Segment),
        (r"\bstate(s)?\b", Dimension::State),
        (r"\bcit(y|ies)\b", Dimension::City),
        (r"\bship[ _]?mode(s)?\b", Dimension::ShipMode),
    ])
});

/// `by <phrase>` ending at a terminator word, a digit, or end of text.
pub static BY_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bby ([a-z ]+?)\b($| in | last |[0-9]| top | and | with )").unwrap()
});

// =============================================================================
// Top-N
// =============================================================================

pub static TOP_N: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\btop\s+([0-9]+)\b").unwrap());

/// Dimension assumed for a top-N question with no dimension of its own.
///
/// Both words are already dimension keywords, so this only matters if the
/// dimension table stops recognizing them.
pub static TOP_N_FALLBACK: LazyLock<Vec<Rule<Dimension>>> = LazyLock::new(|| {
    compile(&[
        (r"\bproducts?\b", Dimension::ProductName),
        (r"\bcustomers?\b", Dimension::CustomerName),
    ])
});

// =============================================================================
// Filters
// =============================================================================

pub static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+(20[0-9]{2}|19[0-9]{2})\b").unwrap());

pub static LAST_MONTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blast\s+([0-9]+)\s+months?\b").unwrap());

pub static REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+(west|east|central|south)\b").unwrap());

pub const REGION_VALUES: &[(&str, Region)] = &[
    ("west", Region::West),
    ("east", Region::East),
    ("central", Region::Central),
    ("south", Region::South),
];

/// Grouping by segment suppresses the segment filter.
pub static SEGMENT_GROUPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bby\s+segment(s)?\b").unwrap());

pub static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bsegment(s)?\s+(consumer|corporate|home[ _]?office)s?\b").unwrap()
});

/// Keyed by the captured value with spaces and underscores removed.
pub const SEGMENT_VALUES: &[(&str, Segment)] = &[
    ("consumer", Segment::Consumer),
    ("corporate", Segment::Corporate),
    ("homeoffice", Segment::HomeOffice),
];

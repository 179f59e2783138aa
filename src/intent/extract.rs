//! Intent extractors.
//!
//! Each extractor is a pure function over the normalized text and knows
//! nothing about the others.

use super::normalize::NormalizedQuery;
use super::rules::{self, first_match};
use super::{Dimension, Filter, Grain, Metric, Region, Segment};

/// Metric named in the text, `sales` when none is.
///
/// Two-word phrases win over single words, so "profit margin" never reads
/// as plain profit.
pub fn extract_metric(q: &NormalizedQuery) -> Metric {
    if let Some((_, metric)) = rules::METRIC_PHRASES
        .iter()
        .find(|(phrase, _)| q.contains(phrase))
    {
        return *metric;
    }
    first_match(&rules::METRIC_RULES, q).unwrap_or_default()
}

pub fn extract_grain(q: &NormalizedQuery) -> Option<Grain> {
    first_match(&rules::GRAIN_RULES, q)
}

/// Dimension from an explicit `by <phrase>` span, else from anywhere in the text.
pub fn extract_dimension(q: &NormalizedQuery) -> Option<Dimension> {
    let from_span = rules::BY_SPAN
        .captures(q)
        .and_then(|caps| caps.get(1))
        .and_then(|span| first_match(&rules::DIMENSION_RULES, span.as_str().trim()));

    from_span.or_else(|| first_match(&rules::DIMENSION_RULES, q))
}

/// Largest count the warehouse accepts as a `LIMIT` or `add_months` argument.
pub const MAX_COUNT: u32 = i32::MAX as u32;

/// Parse a captured ASCII digit run, saturating at [`MAX_COUNT`].
fn parse_count(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(n) if n <= MAX_COUNT => n,
        _ => {
            tracing::debug!(digits, max = MAX_COUNT, "count clamped");
            MAX_COUNT
        }
    }
}

/// `top <n>`; zero reads as absent, oversized counts saturate.
pub fn extract_top_n(q: &NormalizedQuery) -> Option<u32> {
    rules::TOP_N
        .captures(q)
        .map(|caps| parse_count(&caps[1]))
        .filter(|n| *n > 0)
}

/// Four-digit year after `in` (19xx or 20xx).
pub fn extract_year(q: &NormalizedQuery) -> Option<i32> {
    rules::YEAR
        .captures(q)
        .and_then(|caps| caps[1].parse::<i32>().ok())
}

/// Month count of a `last <n> months` window.
pub fn extract_last_months(q: &NormalizedQuery) -> Option<u32> {
    rules::LAST_MONTHS
        .captures(q)
        .map(|caps| parse_count(&caps[1]))
}

pub fn extract_region(q: &NormalizedQuery) -> Option<Region> {
    let caps = rules::REGION.captures(q)?;
    rules::REGION_VALUES
        .iter()
        .find(|(key, _)| *key == &caps[1])
        .map(|(_, region)| *region)
}

/// Segment filter, suppressed when the text groups by segment.
pub fn extract_segment(q: &NormalizedQuery) -> Option<Segment> {
    if rules::SEGMENT_GROUPING.is_match(q) {
        return None;
    }
    let caps = rules::SEGMENT.captures(q)?;
    let key: String = caps[2].chars().filter(|c| *c != ' ' && *c != '_').collect();
    rules::SEGMENT_VALUES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, segment)| *segment)
}

/// All filters in WHERE order: year, rolling window, region, segment.
pub fn extract_filters(q: &NormalizedQuery) -> Vec<Filter> {
    [
        extract_year(q).map(Filter::Year),
        extract_last_months(q).map(Filter::LastMonths),
        extract_region(q).map(Filter::Region),
        extract_segment(q).map(Filter::Segment),
    ]
    .into_iter()
    .flatten()
    .collect()
}

//! Intent assembler.

use super::extract::{
    extract_dimension, extract_filters, extract_grain, extract_metric, extract_top_n,
};
use super::normalize::NormalizedQuery;
use super::rules::{self, first_match};
use super::Intent;

/// Run every extractor over `q` and merge the results.
///
/// A top-N question with no dimension of its own defaults to products, then
/// customers, when the text mentions them.
pub fn assemble(q: &NormalizedQuery) -> Intent {
    let top_n = extract_top_n(q);
    let mut dimension = extract_dimension(q);
    if top_n.is_some() && dimension.is_none() {
        dimension = first_match(&rules::TOP_N_FALLBACK, q);
    }

    let intent = Intent {
        metric: extract_metric(q),
        grain: extract_grain(q),
        dimension,
        top_n,
        filters: extract_filters(q),
        wants_multi_metric: rules::MULTI_METRIC_PHRASES
            .iter()
            .any(|phrase| q.contains(phrase)),
    };

    tracing::debug!(query = %q, ?intent, "assembled intent");
    intent
}

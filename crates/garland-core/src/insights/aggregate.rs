//! Insight aggregation
//!
//! Folds collected historical samples into a single expected-change estimate
//! with ranked category deltas and a human-readable explanation, or into an
//! insufficient-data placeholder when the evidence is too thin.

use std::collections::BTreeMap;

use crate::models::{CategoryDelta, Confidence, InsightStatus};

use super::confidence::estimate_confidence;
use super::history::HistoricalSamples;

/// Minimum valid samples required for a substantive insight
pub const MIN_VALID_SAMPLES: usize = 2;
/// Minimum expense transactions across examined event windows
pub const MIN_EXAMINED_TRANSACTIONS: i64 = 5;
/// Number of category deltas surfaced to the caller
pub const MAX_TOP_CATEGORIES: usize = 3;

const INSUFFICIENT_DATA_EXPLANATION: &str = "We don't have enough history around this holiday \
yet. Add more transactions to unlock personalized insights.";

/// A fully aggregated insight, ready to cache and return
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedInsight {
    pub baseline_spend_avg: f64,
    pub holiday_spend_avg: f64,
    pub pct_change_avg: f64,
    pub confidence: Confidence,
    pub top_categories: Vec<CategoryDelta>,
    pub explanation: String,
    pub status: InsightStatus,
}

/// Whether the samples clear the minimum-evidence gate
pub fn has_sufficient_history(samples: &HistoricalSamples) -> bool {
    samples.valid_count() >= MIN_VALID_SAMPLES
        && samples.transactions_examined >= MIN_EXAMINED_TRANSACTIONS
}

/// Placeholder insight for users without enough history
pub fn insufficient_insight() -> AggregatedInsight {
    AggregatedInsight {
        baseline_spend_avg: 0.0,
        holiday_spend_avg: 0.0,
        pct_change_avg: 0.0,
        confidence: Confidence::Low,
        top_categories: Vec::new(),
        explanation: INSUFFICIENT_DATA_EXPLANATION.to_string(),
        status: InsightStatus::InsufficientData,
    }
}

/// Aggregate valid samples into a substantive insight
///
/// Callers must check `has_sufficient_history` first; this averages over
/// whatever samples it is given.
pub fn aggregate_samples(samples: &HistoricalSamples, event_name: &str) -> AggregatedInsight {
    let valid_count = samples.valid_count();
    let n = valid_count as f64;

    let baseline_spend_avg = samples.baseline_spend.iter().sum::<f64>() / n;
    let holiday_spend_avg = samples.holiday_spend.iter().sum::<f64>() / n;
    let pct_change_avg = if baseline_spend_avg > 0.0 {
        (holiday_spend_avg - baseline_spend_avg) / baseline_spend_avg
    } else {
        0.0
    };

    let confidence = estimate_confidence(valid_count, &samples.pct_changes);
    let top_categories = top_category_deltas(&samples.category_deltas, valid_count);
    let explanation = build_explanation(
        event_name,
        valid_count,
        pct_change_avg,
        holiday_spend_avg - baseline_spend_avg,
        &top_categories,
    );

    AggregatedInsight {
        baseline_spend_avg,
        holiday_spend_avg,
        pct_change_avg,
        confidence,
        top_categories,
        explanation,
        status: InsightStatus::Ok,
    }
}

/// Rank averaged category deltas, keeping the strictly positive top few
///
/// Input deltas are sums across valid samples; each is divided by the valid
/// sample count before ranking. The stable sort over the BTreeMap's
/// alphabetical order makes equal deltas come out in name order.
pub fn top_category_deltas(
    category_deltas: &BTreeMap<String, f64>,
    valid_count: usize,
) -> Vec<CategoryDelta> {
    let n = valid_count as f64;
    let mut averaged: Vec<(&String, f64)> = category_deltas
        .iter()
        .map(|(category, total)| (category, total / n))
        .collect();

    averaged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    averaged
        .into_iter()
        .take(MAX_TOP_CATEGORIES)
        .filter(|(_, delta)| *delta > 0.0)
        .map(|(category, delta)| CategoryDelta {
            category: category.clone(),
            delta: round2(delta),
        })
        .collect()
}

/// Deterministic one-line explanation of the expected change
fn build_explanation(
    event_name: &str,
    sample_count: usize,
    pct_change: f64,
    delta: f64,
    top_categories: &[CategoryDelta],
) -> String {
    let change_pct = round1(pct_change * 100.0);
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    let categories = if top_categories.is_empty() {
        "your usual categories".to_string()
    } else {
        top_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Based on your last {} {} periods, spending changed {}{:.1}% (~${:.0}), mostly in {}.",
        sample_count,
        event_name,
        sign,
        change_pct,
        delta.abs(),
        categories
    )
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

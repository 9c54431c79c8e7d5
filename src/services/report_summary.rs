use serde::Serialize;

use crate::db::models::ReportResult;

/// Totals shown under an individual report. Averages are over every result row,
/// with a missing score counted as zero, and rendered with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ReportTotals {
    pub(crate) total_indicators: usize,
    pub(crate) total_self_score: f64,
    pub(crate) total_evaluator_score: f64,
    pub(crate) total_weight: f64,
    pub(crate) avg_self_score: String,
    pub(crate) avg_evaluator_score: String,
}

pub(crate) fn summarize(results: &[ReportResult]) -> ReportTotals {
    let total_self_score: f64 = results.iter().filter_map(|row| row.self_score).sum();
    let total_evaluator_score: f64 = results.iter().filter_map(|row| row.evaluator_score).sum();
    let total_weight: f64 = results.iter().filter_map(|row| row.indicator_weight).sum();
    let count = results.len();

    ReportTotals {
        total_indicators: count,
        total_self_score,
        total_evaluator_score,
        total_weight,
        avg_self_score: average(total_self_score, count),
        avg_evaluator_score: average(total_evaluator_score, count),
    }
}

pub(crate) fn format_two_decimals(value: f64) -> String {
    format!("{value:.2}")
}

fn average(total: f64, count: usize) -> String {
    if count == 0 {
        return format_two_decimals(0.0);
    }
    format_two_decimals(total / count as f64)
}

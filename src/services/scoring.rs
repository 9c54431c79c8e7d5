use serde::Serialize;

use crate::db::models::{ScoreRange, WeightedScore};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct FinalScore {
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) final_score: f64,
    pub(crate) total_weight: f64,
}

/// Weighted mean over rows that carry both a score and a weight. The evaluator's
/// score wins over the self score; no qualifying rows yield zero for both fields.
pub(crate) fn calculate_final(
    evaluatee_id: i64,
    period_id: i64,
    rows: &[WeightedScore],
) -> FinalScore {
    let (weighted_total, total_weight) = rows
        .iter()
        .filter_map(|row| {
            let score = row.evaluator_score.or(row.self_score)?;
            let weight = row.weight?;
            Some((score * weight, weight))
        })
        .fold((0.0, 0.0), |(sum, weights), (value, weight)| (sum + value, weights + weight));

    let final_score = if total_weight > 0.0 { weighted_total / total_weight } else { 0.0 };

    FinalScore { evaluatee_id, period_id, final_score, total_weight }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScoreRejection {
    UnknownIndicator(i64),
    OutOfRange { indicator_id: i64, score: f64, min: f64, max: f64 },
}

impl std::fmt::Display for ScoreRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIndicator(id) => write!(f, "Indicator {id} not found"),
            Self::OutOfRange { indicator_id, score, min, max } => write!(
                f,
                "Score {score} for indicator {indicator_id} must be between {min} and {max}"
            ),
        }
    }
}

/// Checks each `(indicator_id, score)` against the stored bounds of its indicator.
pub(crate) fn check_scores(
    scores: &[(i64, f64)],
    ranges: &[ScoreRange],
) -> Result<(), ScoreRejection> {
    for &(indicator_id, score) in scores {
        let range = ranges
            .iter()
            .find(|range| range.id == indicator_id)
            .ok_or(ScoreRejection::UnknownIndicator(indicator_id))?;

        if !score.is_finite() || score < range.min_score || score > range.max_score {
            return Err(ScoreRejection::OutOfRange {
                indicator_id,
                score,
                min: range.min_score,
                max: range.max_score,
            });
        }
    }
    Ok(())
}

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::EvaluationResult;
use crate::db::types::ResultStatus;

/// One score write. `evaluatee_id` is ignored for self scores.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreSave {
    #[serde(default)]
    pub(crate) evaluatee_id: Option<i64>,
    #[serde(default)]
    pub(crate) indicator_id: Option<i64>,
    #[serde(default)]
    pub(crate) period_id: Option<i64>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkScoreItem {
    #[serde(default)]
    pub(crate) indicator_id: Option<i64>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkScoreSave {
    #[serde(default)]
    pub(crate) evaluatee_id: Option<i64>,
    #[serde(default)]
    pub(crate) period_id: Option<i64>,
    #[serde(default)]
    pub(crate) items: Option<Vec<BulkScoreItem>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) period_id: i64,
    pub(crate) self_score: Option<f64>,
    pub(crate) evaluator_score: Option<f64>,
    pub(crate) evaluator_id: Option<i64>,
    pub(crate) status: ResultStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ResultResponse {
    pub(crate) fn from_db(result: EvaluationResult) -> Self {
        Self {
            id: result.id,
            evaluatee_id: result.evaluatee_id,
            indicator_id: result.indicator_id,
            period_id: result.period_id,
            self_score: result.self_score,
            evaluator_score: result.evaluator_score,
            evaluator_id: result.evaluator_id,
            status: result.status,
            created_at: format_primitive(result.created_at),
            updated_at: format_primitive(result.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkSaveResponse {
    pub(crate) saved: usize,
}

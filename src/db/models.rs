use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{ResultStatus, UserRole};

#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) department_id: Option<i64>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Department {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct EvaluationPeriod {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) start_date: Date,
    pub(crate) end_date: Date,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Topic {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) weight: f64,
    pub(crate) active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Indicator {
    pub(crate) id: i64,
    pub(crate) topic_id: i64,
    pub(crate) topic_name: Option<String>,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    #[sqlx(rename = "type")]
    pub(crate) indicator_type: String,
    pub(crate) weight: f64,
    pub(crate) min_score: f64,
    pub(crate) max_score: f64,
    pub(crate) active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Assignment row with the display names of both parties and its period.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) period_name: Option<String>,
    pub(crate) period_start_date: Option<Date>,
    pub(crate) period_end_date: Option<Date>,
    pub(crate) period_is_active: Option<bool>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct EvaluationResult {
    pub(crate) id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) period_id: i64,
    pub(crate) self_score: Option<f64>,
    pub(crate) evaluator_score: Option<f64>,
    pub(crate) evaluator_id: Option<i64>,
    pub(crate) status: ResultStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Signature {
    pub(crate) id: i64,
    pub(crate) result_id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) signature_data: String,
    pub(crate) signature_hash: String,
    pub(crate) signed_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) comment_text: String,
    pub(crate) comment_type: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) period_name: Option<String>,
}

/// A result row's scores paired with its indicator weight.
#[derive(Debug, Clone, Copy, FromRow)]
pub(crate) struct WeightedScore {
    pub(crate) self_score: Option<f64>,
    pub(crate) evaluator_score: Option<f64>,
    pub(crate) weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub(crate) struct ScoreRange {
    pub(crate) id: i64,
    pub(crate) min_score: f64,
    pub(crate) max_score: f64,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReportEvaluatee {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) department_id: Option<i64>,
    pub(crate) department_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReportResult {
    pub(crate) id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) self_score: Option<f64>,
    pub(crate) evaluator_score: Option<f64>,
    pub(crate) evaluator_id: Option<i64>,
    pub(crate) status: ResultStatus,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) indicator_name: Option<String>,
    pub(crate) indicator_type: Option<String>,
    pub(crate) indicator_weight: Option<f64>,
    pub(crate) topic_name: Option<String>,
    pub(crate) topic_weight: Option<f64>,
    pub(crate) evaluator_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct ReportSignature {
    pub(crate) id: i64,
    pub(crate) result_id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) signature_hash: String,
    pub(crate) signed_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct EvaluateeSummary {
    pub(crate) evaluatee_id: i64,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) department_name: Option<String>,
    pub(crate) total_indicators: i64,
    pub(crate) avg_self_score: Option<f64>,
    pub(crate) avg_evaluator_score: Option<f64>,
    pub(crate) total_weight: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct TopicSummary {
    pub(crate) topic_id: Option<i64>,
    pub(crate) topic_name: Option<String>,
    pub(crate) topic_weight: Option<f64>,
    pub(crate) total_results: i64,
    pub(crate) avg_self_score: Option<f64>,
    pub(crate) avg_evaluator_score: Option<f64>,
}

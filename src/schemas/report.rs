use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{
    EvaluateeSummary, ReportEvaluatee, ReportResult, ReportSignature, TopicSummary,
};
use crate::db::types::ResultStatus;
use crate::schemas::comment::CommentResponse;
use crate::schemas::period::PeriodResponse;
use crate::services::report_summary::{format_two_decimals, ReportTotals};
use crate::services::scoring::FinalScore;

#[derive(Debug, Serialize)]
pub(crate) struct IndividualReport {
    pub(crate) evaluatee: ReportEvaluateeResponse,
    pub(crate) period: Option<PeriodResponse>,
    pub(crate) results: Vec<ReportResultResponse>,
    pub(crate) comments: Vec<CommentResponse>,
    pub(crate) signatures: Vec<ReportSignatureResponse>,
    pub(crate) summary: ReportTotals,
    #[serde(rename = "final")]
    pub(crate) final_score: FinalScore,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportEvaluateeResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) department_id: Option<i64>,
    pub(crate) department_name: Option<String>,
}

impl ReportEvaluateeResponse {
    pub(crate) fn from_db(row: ReportEvaluatee) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            department_id: row.department_id,
            department_name: row.department_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResultResponse {
    pub(crate) id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) indicator_name: Option<String>,
    pub(crate) indicator_type: Option<String>,
    pub(crate) indicator_weight: Option<f64>,
    pub(crate) topic_name: Option<String>,
    pub(crate) topic_weight: Option<f64>,
    pub(crate) self_score: Option<f64>,
    pub(crate) evaluator_score: Option<f64>,
    pub(crate) evaluator_id: Option<i64>,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) status: ResultStatus,
    pub(crate) updated_at: String,
}

impl ReportResultResponse {
    pub(crate) fn from_db(row: ReportResult) -> Self {
        Self {
            id: row.id,
            indicator_id: row.indicator_id,
            indicator_name: row.indicator_name,
            indicator_type: row.indicator_type,
            indicator_weight: row.indicator_weight,
            topic_name: row.topic_name,
            topic_weight: row.topic_weight,
            self_score: row.self_score,
            evaluator_score: row.evaluator_score,
            evaluator_id: row.evaluator_id,
            evaluator_name: row.evaluator_name,
            status: row.status,
            updated_at: format_primitive(row.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportSignatureResponse {
    pub(crate) id: i64,
    pub(crate) result_id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) signature_hash: String,
    pub(crate) signed_at: String,
}

impl ReportSignatureResponse {
    pub(crate) fn from_db(row: ReportSignature) -> Self {
        Self {
            id: row.id,
            result_id: row.result_id,
            indicator_id: row.indicator_id,
            evaluator_id: row.evaluator_id,
            evaluator_name: row.evaluator_name,
            signature_hash: row.signature_hash,
            signed_at: format_primitive(row.signed_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateeSummaryResponse {
    pub(crate) evaluatee_id: i64,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) department_name: Option<String>,
    pub(crate) total_indicators: i64,
    pub(crate) avg_self_score: Option<String>,
    pub(crate) avg_evaluator_score: Option<String>,
    pub(crate) total_weight: f64,
}

impl EvaluateeSummaryResponse {
    pub(crate) fn from_db(row: EvaluateeSummary) -> Self {
        Self {
            evaluatee_id: row.evaluatee_id,
            evaluatee_name: row.evaluatee_name,
            email: row.email,
            department_name: row.department_name,
            total_indicators: row.total_indicators,
            avg_self_score: row.avg_self_score.map(format_two_decimals),
            avg_evaluator_score: row.avg_evaluator_score.map(format_two_decimals),
            total_weight: row.total_weight.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicSummaryResponse {
    pub(crate) topic_id: Option<i64>,
    pub(crate) topic_name: Option<String>,
    pub(crate) topic_weight: Option<f64>,
    pub(crate) total_results: i64,
    pub(crate) avg_self_score: Option<String>,
    pub(crate) avg_evaluator_score: Option<String>,
}

impl TopicSummaryResponse {
    pub(crate) fn from_db(row: TopicSummary) -> Self {
        Self {
            topic_id: row.topic_id,
            topic_name: row.topic_name,
            topic_weight: row.topic_weight,
            total_results: row.total_results,
            avg_self_score: row.avg_self_score.map(format_two_decimals),
            avg_evaluator_score: row.avg_evaluator_score.map(format_two_decimals),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::core::time::{format_date, format_primitive};
use crate::db::models::Assignment;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AssignmentCreate {
    #[serde(default)]
    pub(crate) evaluator_id: Option<i64>,
    #[serde(default)]
    pub(crate) evaluatee_id: Option<i64>,
    #[serde(default)]
    pub(crate) period_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentBulkCreate {
    #[serde(default, alias = "assignments")]
    pub(crate) items: Option<Vec<AssignmentCreate>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceivedQuery {
    #[serde(default)]
    pub(crate) period_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) period_name: Option<String>,
    pub(crate) period_start_date: Option<String>,
    pub(crate) period_end_date: Option<String>,
    pub(crate) period_is_active: Option<bool>,
    pub(crate) created_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            evaluator_id: assignment.evaluator_id,
            evaluatee_id: assignment.evaluatee_id,
            period_id: assignment.period_id,
            evaluator_name: assignment.evaluator_name,
            evaluatee_name: assignment.evaluatee_name,
            period_name: assignment.period_name,
            period_start_date: assignment.period_start_date.map(format_date),
            period_end_date: assignment.period_end_date.map(format_date),
            period_is_active: assignment.period_is_active,
            created_at: format_primitive(assignment.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkCreateResponse {
    pub(crate) created: usize,
    pub(crate) ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletedCountResponse {
    pub(crate) deleted: u64,
}

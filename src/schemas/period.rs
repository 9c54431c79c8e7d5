use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::EvaluationPeriod;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PeriodCreate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) end_date: Option<String>,
    #[serde(default)]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PeriodUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) start_date: Option<String>,
    #[serde(default)]
    pub(crate) end_date: Option<String>,
    #[serde(default)]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeedQuery {
    #[serde(default)]
    pub(crate) evaluatee_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PeriodResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PeriodResponse {
    pub(crate) fn from_db(period: EvaluationPeriod) -> Self {
        Self {
            id: period.id,
            name: period.name,
            start_date: format_date(period.start_date),
            end_date: format_date(period.end_date),
            is_active: period.is_active,
            created_at: format_primitive(period.created_at),
            updated_at: format_primitive(period.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SeedResponse {
    pub(crate) period_id: i64,
    pub(crate) created: u64,
    pub(crate) candidates: i64,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Indicator;

pub(crate) const DEFAULT_INDICATOR_TYPE: &str = "score_1_4";

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct IndicatorCreate {
    #[serde(default)]
    pub(crate) topic_id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "name must be 1-300 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, max = 50, message = "type must be 1-50 characters"))]
    pub(crate) indicator_type: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "weight must be non-negative"))]
    pub(crate) weight: Option<f64>,
    #[serde(default)]
    pub(crate) min_score: Option<f64>,
    #[serde(default)]
    pub(crate) max_score: Option<f64>,
    #[serde(default = "default_true")]
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct IndicatorUpdate {
    #[serde(default)]
    pub(crate) topic_id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "name must be 1-300 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) indicator_type: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "weight must be non-negative"))]
    pub(crate) weight: Option<f64>,
    #[serde(default)]
    pub(crate) min_score: Option<f64>,
    #[serde(default)]
    pub(crate) max_score: Option<f64>,
    #[serde(default)]
    pub(crate) active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IndicatorResponse {
    pub(crate) id: i64,
    pub(crate) topic_id: i64,
    pub(crate) topic_name: Option<String>,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    #[serde(rename = "type")]
    pub(crate) indicator_type: String,
    pub(crate) weight: f64,
    pub(crate) min_score: f64,
    pub(crate) max_score: f64,
    pub(crate) active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl IndicatorResponse {
    pub(crate) fn from_db(indicator: Indicator) -> Self {
        Self {
            id: indicator.id,
            topic_id: indicator.topic_id,
            topic_name: indicator.topic_name,
            code: indicator.code,
            name: indicator.name,
            description: indicator.description,
            indicator_type: indicator.indicator_type,
            weight: indicator.weight,
            min_score: indicator.min_score,
            max_score: indicator.max_score,
            active: indicator.active,
            created_at: format_primitive(indicator.created_at),
            updated_at: format_primitive(indicator.updated_at),
        }
    }
}

fn default_true() -> bool {
    true
}

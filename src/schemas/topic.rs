use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Topic;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TopicCreate {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "title must be 1-300 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default = "default_weight")]
    #[validate(range(min = 0.0, message = "weight must be non-negative"))]
    pub(crate) weight: f64,
    #[serde(default = "default_true")]
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TopicUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "title must be 1-300 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "weight must be non-negative"))]
    pub(crate) weight: Option<f64>,
    #[serde(default)]
    pub(crate) active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) weight: f64,
    pub(crate) active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl TopicResponse {
    pub(crate) fn from_db(topic: Topic) -> Self {
        Self {
            id: topic.id,
            code: topic.code,
            title: topic.title,
            description: topic.description,
            weight: topic.weight,
            active: topic.active,
            created_at: format_primitive(topic.created_at),
            updated_at: format_primitive(topic.updated_at),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

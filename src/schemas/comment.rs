use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Comment;

pub(crate) const DEFAULT_COMMENT_TYPE: &str = "general";

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CommentCreate {
    #[serde(default)]
    pub(crate) evaluatee_id: Option<i64>,
    #[serde(default)]
    pub(crate) period_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 10000, message = "comment_text must be at most 10000 characters"))]
    pub(crate) comment_text: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "comment_type must be 1-50 characters"))]
    pub(crate) comment_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CommentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 10000, message = "comment_text must be 1-10000 characters"))]
    pub(crate) comment_text: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "comment_type must be 1-50 characters"))]
    pub(crate) comment_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentResponse {
    pub(crate) id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) comment_text: String,
    pub(crate) comment_type: String,
    pub(crate) evaluator_name: Option<String>,
    pub(crate) evaluatee_name: Option<String>,
    pub(crate) period_name: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CommentResponse {
    pub(crate) fn from_db(comment: Comment) -> Self {
        Self {
            id: comment.id,
            evaluator_id: comment.evaluator_id,
            evaluatee_id: comment.evaluatee_id,
            period_id: comment.period_id,
            comment_text: comment.comment_text,
            comment_type: comment.comment_type,
            evaluator_name: comment.evaluator_name,
            evaluatee_name: comment.evaluatee_name,
            period_name: comment.period_name,
            created_at: format_primitive(comment.created_at),
            updated_at: format_primitive(comment.updated_at),
        }
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Department, User};
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserCreate {
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default = "default_user_role")]
    pub(crate) role: UserRole,
    #[serde(default)]
    pub(crate) department_id: Option<i64>,
    #[serde(default = "default_true")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserListQuery {
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) department_id: Option<i64>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            department_id: user.department_id,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct DepartmentCreate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DepartmentResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

impl DepartmentResponse {
    pub(crate) fn from_db(department: Department) -> Self {
        Self {
            id: department.id,
            name: department.name,
            created_at: format_primitive(department.created_at),
        }
    }
}

fn default_user_role() -> UserRole {
    UserRole::Evaluatee
}

fn default_true() -> bool {
    true
}

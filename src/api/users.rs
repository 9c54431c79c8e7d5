use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::api::guards::CurrentAdmin;
use crate::api::validation::{required, required_text, validate_payload};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{UserCreate, UserListQuery, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user)).route("/:id", get(get_user))
}

async fn list_users(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let users = repositories::users::list(state.db(), params.role)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(envelope::list(users.into_iter().map(UserResponse::from_db).collect()))
}

async fn get_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let user = repositories::users::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(envelope::data(UserResponse::from_db(user)))
}

async fn create_user(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let email = required_text(payload.email.as_deref(), "email")?.to_lowercase();
    let name = required_text(payload.name.as_deref(), "name")?;
    let password = required(payload.password.clone(), "password")?;
    validate_payload(&payload)?;

    let password_hash = security::hash_password(&password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            email: &email,
            password_hash,
            name: &name,
            role: payload.role,
            department_id: payload.department_id,
            is_active: payload.is_active,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("User with this email already exists".to_string())
        } else if is_foreign_key_violation(&e) {
            ApiError::BadRequest("Department not found".to_string())
        } else {
            ApiError::internal(e, "Failed to create user")
        }
    })?;

    tracing::info!(
        admin_id = admin.id,
        user_id = user.id,
        role = user.role.as_str(),
        action = "user_create",
        "Admin created user"
    );

    Ok((StatusCode::CREATED, envelope::data(UserResponse::from_db(user))))
}

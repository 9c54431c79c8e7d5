use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::api::envelope;
use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::validation::{required_text, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{DepartmentCreate, DepartmentResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_departments).post(create_department))
}

async fn list_departments(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let departments = repositories::departments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list departments"))?;

    Ok(envelope::list(departments.into_iter().map(DepartmentResponse::from_db).collect()))
}

async fn create_department(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<DepartmentCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let name = required_text(payload.name.as_deref(), "name")?;
    validate_payload(&payload)?;

    let department = repositories::departments::create(state.db(), &name, primitive_now_utc())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Department already exists".to_string())
            } else {
                ApiError::internal(e, "Failed to create department")
            }
        })?;

    tracing::info!(
        admin_id = admin.id,
        department_id = department.id,
        action = "department_create",
        "Admin created department"
    );

    Ok((StatusCode::CREATED, envelope::data(DepartmentResponse::from_db(department))))
}

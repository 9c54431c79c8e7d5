use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::required_text;
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, TokenResponse};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/login", post(login)).route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = required_text(payload.email.as_deref(), "email")?.to_lowercase();
    let password = payload
        .password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::required("password"))?;

    let auth = state.settings().auth();
    let rate_key = format!("rl:login:{email}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, auth.login_attempts, auth.login_window_seconds)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Login rate limit check failed; allowing attempt");
            true
        });
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let user = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or(ApiError::Unauthorized("Incorrect email or password"))?;

    let verified = security::verify_password(&password, &user.password_hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect email or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let access_token = security::create_access_token(user.id, user.role, auth, None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    tracing::info!(user_id = user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(TokenResponse {
        success: true,
        access_token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    }))
}

async fn me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(envelope::data(UserResponse::from_db(user)))
}

#[cfg(test)]
mod tests;

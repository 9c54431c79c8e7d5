use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::types::UserRole;

/// Identity carried by the bearer token. No per-request user lookup is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AuthUser {
    pub(crate) id: i64,
    pub(crate) role: UserRole,
}

impl AuthUser {
    pub(crate) fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Evaluators and admins.
    pub(crate) fn is_staff(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Evaluator)
    }
}

pub(crate) struct CurrentUser(pub(crate) AuthUser);
pub(crate) struct CurrentAdmin(pub(crate) AuthUser);
pub(crate) struct CurrentEvaluator(pub(crate) AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized("Missing token"))?;

        let claims = security::verify_token(token, state.settings().auth())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token"))?;
        let id = claims.user_id().ok_or(ApiError::Unauthorized("Invalid or expired token"))?;

        Ok(CurrentUser(AuthUser { id, role: claims.role }))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.is_admin() {
            Ok(CurrentAdmin(user))
        } else {
            Err(ApiError::Forbidden("Forbidden"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentEvaluator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.is_staff() {
            Ok(CurrentEvaluator(user))
        } else {
            Err(ApiError::Forbidden("Forbidden"))
        }
    }
}

/// Evaluatees may only see their own data; evaluators and admins see anyone's.
pub(crate) fn require_self_or_staff(user: &AuthUser, evaluatee_id: i64) -> Result<(), ApiError> {
    if user.is_staff() || user.id == evaluatee_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Forbidden"))
    }
}

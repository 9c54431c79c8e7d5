use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::api::envelope;
use crate::api::errors::ApiError;
use crate::api::guards::{require_self_or_staff, CurrentEvaluator, CurrentUser};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::comment::CommentResponse;
use crate::schemas::period::PeriodResponse;
use crate::schemas::report::{
    EvaluateeSummaryResponse, IndividualReport, ReportEvaluateeResponse, ReportResultResponse,
    ReportSignatureResponse, TopicSummaryResponse,
};
use crate::services::{report_summary, scoring};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/individual/:evaluatee_id/:period_id", get(individual))
        .route("/overall/:period_id", get(overall))
        .route("/department/:department_id/:period_id", get(department))
        .route("/topics/:period_id", get(topics))
}

async fn individual(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((evaluatee_id, period_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    require_self_or_staff(&user, evaluatee_id)?;
    let db = state.db();

    let evaluatee = repositories::reports::find_evaluatee(db, evaluatee_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch evaluatee"))?
        .ok_or_else(|| ApiError::NotFound("Evaluatee not found".to_string()))?;

    let period = repositories::periods::find_by_id(db, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch period"))?;

    let results = repositories::reports::individual_results(db, evaluatee_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load report results"))?;

    let comments = repositories::comments::list_by_evaluatee_period(db, evaluatee_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load report comments"))?;

    let signatures = repositories::reports::individual_signatures(db, evaluatee_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load report signatures"))?;

    let weighted = repositories::results::weighted_scores(db, evaluatee_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load scores"))?;

    let summary = report_summary::summarize(&results);
    let final_score = scoring::calculate_final(evaluatee_id, period_id, &weighted);

    Ok(envelope::data(IndividualReport {
        evaluatee: ReportEvaluateeResponse::from_db(evaluatee),
        period: period.map(PeriodResponse::from_db),
        results: results.into_iter().map(ReportResultResponse::from_db).collect(),
        comments: comments.into_iter().map(CommentResponse::from_db).collect(),
        signatures: signatures.into_iter().map(ReportSignatureResponse::from_db).collect(),
        summary,
        final_score,
    }))
}

async fn overall(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let rows = repositories::reports::overall(state.db(), period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to build overall report"))?;
    Ok(envelope::list(rows.into_iter().map(EvaluateeSummaryResponse::from_db).collect()))
}

async fn department(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path((department_id, period_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    repositories::departments::find_by_id(state.db(), department_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch department"))?
        .ok_or_else(|| ApiError::NotFound("Department not found".to_string()))?;

    let rows = repositories::reports::by_department(state.db(), department_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to build department report"))?;
    Ok(envelope::list(rows.into_iter().map(EvaluateeSummaryResponse::from_db).collect()))
}

async fn topics(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let rows = repositories::reports::by_topic(state.db(), period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to build topic report"))?;
    Ok(envelope::list(rows.into_iter().map(TopicSummaryResponse::from_db).collect()))
}

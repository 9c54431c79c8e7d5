use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::envelope::{self, DataEnvelope};
use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::guards::{
    require_self_or_staff, AuthUser, CurrentAdmin, CurrentEvaluator, CurrentUser,
};
use crate::api::validation::required;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::ScoreKind;
use crate::repositories;
use crate::repositories::results::ScoreWrite;
use crate::schemas::result::{
    BulkSaveResponse, BulkScoreItem, BulkScoreSave, ResultResponse, ScoreSave,
};
use crate::services::scoring::{self, ScoreRejection};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_results))
        .route("/me/:period_id", get(list_my_results))
        .route("/evaluatee/:evaluatee_id/:period_id", get(list_for_evaluatee))
        .route("/summary/:evaluatee_id/:period_id", get(summary))
        .route("/self", post(save_self))
        .route("/self/bulk", post(save_self_bulk))
        .route("/evaluate", post(evaluate))
        .route("/evaluate/bulk", post(evaluate_bulk))
        .route("/:id", get(get_result).delete(delete_result))
}

async fn list_results(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::results::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(envelope::list(items.into_iter().map(ResultResponse::from_db).collect()))
}

async fn get_result(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let result = repositories::results::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    require_self_or_staff(&user, result.evaluatee_id)?;
    Ok(envelope::data(ResultResponse::from_db(result)))
}

async fn list_my_results(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::results::list_by_evaluatee_period(state.db(), user.id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(envelope::list(items.into_iter().map(ResultResponse::from_db).collect()))
}

async fn list_for_evaluatee(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((evaluatee_id, period_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    require_self_or_staff(&user, evaluatee_id)?;

    let items =
        repositories::results::list_by_evaluatee_period(state.db(), evaluatee_id, period_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list results"))?;
    Ok(envelope::list(items.into_iter().map(ResultResponse::from_db).collect()))
}

async fn summary(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((evaluatee_id, period_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    require_self_or_staff(&user, evaluatee_id)?;

    let rows = repositories::results::weighted_scores(state.db(), evaluatee_id, period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load scores"))?;

    Ok(envelope::data(scoring::calculate_final(evaluatee_id, period_id, &rows)))
}

async fn save_self(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ScoreSave>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicator_id = required(payload.indicator_id, "indicator_id")?;
    let period_id = required(payload.period_id, "period_id")?;
    let score = required(payload.score, "score")?;

    check_score_ranges(&state, &[(indicator_id, score)]).await?;

    let write =
        ScoreWrite { evaluatee_id: user.id, indicator_id, period_id, score, evaluator_id: None };
    let result = repositories::results::save_score(
        state.db(),
        ScoreKind::SelfScore,
        write,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| map_save_error(e, "Failed to save self score"))?;

    metrics::record_scores_saved(ScoreKind::SelfScore.as_str(), 1);
    Ok(envelope::data(ResultResponse::from_db(result)))
}

async fn save_self_bulk(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<BulkScoreSave>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let period_id = required(payload.period_id, "period_id")?;
    let items =
        payload.items.ok_or_else(|| ApiError::BadRequest("items array required".to_string()))?;

    let writes = collect_writes(&items, user.id, period_id, None)?;
    save_bulk(&state, ScoreKind::SelfScore, &writes).await
}

async fn evaluate(
    CurrentEvaluator(user): CurrentEvaluator,
    State(state): State<AppState>,
    Json(payload): Json<ScoreSave>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let evaluatee_id = required(payload.evaluatee_id, "evaluatee_id")?;
    let indicator_id = required(payload.indicator_id, "indicator_id")?;
    let period_id = required(payload.period_id, "period_id")?;
    let score = required(payload.score, "score")?;

    ensure_assigned(&state, &user, period_id, evaluatee_id).await?;
    check_score_ranges(&state, &[(indicator_id, score)]).await?;

    let write =
        ScoreWrite { evaluatee_id, indicator_id, period_id, score, evaluator_id: Some(user.id) };
    let result = repositories::results::save_score(
        state.db(),
        ScoreKind::EvaluatorScore,
        write,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| map_save_error(e, "Failed to save evaluator score"))?;

    metrics::record_scores_saved(ScoreKind::EvaluatorScore.as_str(), 1);
    tracing::info!(
        evaluator_id = user.id,
        evaluatee_id,
        indicator_id,
        period_id,
        action = "result_evaluate",
        "Evaluator score saved"
    );

    Ok(envelope::data(ResultResponse::from_db(result)))
}

async fn evaluate_bulk(
    CurrentEvaluator(user): CurrentEvaluator,
    State(state): State<AppState>,
    Json(payload): Json<BulkScoreSave>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let evaluatee_id = required(payload.evaluatee_id, "evaluatee_id")?;
    let period_id = required(payload.period_id, "period_id")?;
    let items =
        payload.items.ok_or_else(|| ApiError::BadRequest("items array required".to_string()))?;

    let writes = collect_writes(&items, evaluatee_id, period_id, Some(user.id))?;
    ensure_assigned(&state, &user, period_id, evaluatee_id).await?;

    let response = save_bulk(&state, ScoreKind::EvaluatorScore, &writes).await?;
    tracing::info!(
        evaluator_id = user.id,
        evaluatee_id,
        period_id,
        count = writes.len(),
        action = "result_evaluate_bulk",
        "Evaluator scores saved in bulk"
    );
    Ok(response)
}

async fn delete_result(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted = repositories::results::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete result"))?;

    if !deleted {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        result_id = id,
        action = "result_delete",
        "Admin deleted result"
    );
    Ok(envelope::message("Deleted"))
}

fn collect_writes(
    items: &[BulkScoreItem],
    evaluatee_id: i64,
    period_id: i64,
    evaluator_id: Option<i64>,
) -> Result<Vec<ScoreWrite>, ApiError> {
    items
        .iter()
        .map(|item| {
            Ok(ScoreWrite {
                evaluatee_id,
                indicator_id: required(item.indicator_id, "indicator_id")?,
                period_id,
                score: required(item.score, "score")?,
                evaluator_id,
            })
        })
        .collect()
}

async fn save_bulk(
    state: &AppState,
    kind: ScoreKind,
    writes: &[ScoreWrite],
) -> Result<Json<DataEnvelope<BulkSaveResponse>>, ApiError> {
    let scores = writes.iter().map(|write| (write.indicator_id, write.score)).collect::<Vec<_>>();
    check_score_ranges(state, &scores).await?;

    let saved = repositories::results::save_bulk(state.db(), kind, writes, primitive_now_utc())
        .await
        .map_err(|e| map_save_error(e, "Failed to save scores"))?;

    metrics::record_scores_saved(kind.as_str(), saved);
    Ok(envelope::data(BulkSaveResponse { saved }))
}

/// Admins may score anyone; evaluators only the evaluatees assigned to them for the period.
async fn ensure_assigned(
    state: &AppState,
    user: &AuthUser,
    period_id: i64,
    evaluatee_id: i64,
) -> Result<(), ApiError> {
    if user.is_admin() {
        return Ok(());
    }

    let assigned = repositories::assignments::exists(state.db(), period_id, user.id, evaluatee_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check assignment"))?;

    if assigned {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not assigned to this evaluatee for the period"))
    }
}

async fn check_score_ranges(state: &AppState, scores: &[(i64, f64)]) -> Result<(), ApiError> {
    let mut ids = scores.iter().map(|(id, _)| *id).collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();

    let ranges = repositories::indicators::score_ranges(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load indicator bounds"))?;

    scoring::check_scores(scores, &ranges).map_err(|rejection| match rejection {
        ScoreRejection::UnknownIndicator(_) => ApiError::NotFound(rejection.to_string()),
        ScoreRejection::OutOfRange { .. } => ApiError::BadRequest(rejection.to_string()),
    })
}

fn map_save_error(error: sqlx::Error, context: &str) -> ApiError {
    if is_foreign_key_violation(&error) {
        ApiError::NotFound("Evaluatee or period not found".to_string())
    } else {
        ApiError::internal(error, context)
    }
}

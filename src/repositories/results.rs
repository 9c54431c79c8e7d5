use sqlx::{PgConnection, PgPool};

use crate::db::models::{EvaluationResult, WeightedScore};
use crate::db::types::{ResultStatus, ScoreKind};

const COLUMNS: &str = "\
    id, evaluatee_id, indicator_id, period_id, self_score, evaluator_score, evaluator_id, \
    status, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<EvaluationResult>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationResult>(&format!(
        "SELECT {COLUMNS} FROM evaluation_results ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<EvaluationResult>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationResult>(&format!(
        "SELECT {COLUMNS} FROM evaluation_results WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_evaluatee_period(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: i64,
) -> Result<Vec<EvaluationResult>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationResult>(&format!(
        "SELECT {COLUMNS}
         FROM evaluation_results
         WHERE evaluatee_id = $1 AND period_id = $2
         ORDER BY indicator_id ASC"
    ))
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScoreWrite {
    pub(crate) evaluatee_id: i64,
    pub(crate) indicator_id: i64,
    pub(crate) period_id: i64,
    pub(crate) score: f64,
    /// Recorded only for evaluator scores.
    pub(crate) evaluator_id: Option<i64>,
}

fn upsert_sql(kind: ScoreKind) -> String {
    match kind {
        ScoreKind::SelfScore => format!(
            "INSERT INTO evaluation_results (
                evaluatee_id, indicator_id, period_id, self_score, status, created_at, updated_at
             ) VALUES ($1,$2,$3,$4,'submitted',$5,$5)
             ON CONFLICT (evaluatee_id, indicator_id, period_id) DO UPDATE SET
                self_score = EXCLUDED.self_score,
                status = CASE
                    WHEN evaluation_results.status = 'evaluated' THEN evaluation_results.status
                    ELSE 'submitted'::resultstatus
                END,
                updated_at = EXCLUDED.updated_at
             RETURNING {COLUMNS}"
        ),
        ScoreKind::EvaluatorScore => format!(
            "INSERT INTO evaluation_results (
                evaluatee_id, indicator_id, period_id, evaluator_score, evaluator_id, status,
                created_at, updated_at
             ) VALUES ($1,$2,$3,$4,$5,'evaluated',$6,$6)
             ON CONFLICT (evaluatee_id, indicator_id, period_id) DO UPDATE SET
                evaluator_score = EXCLUDED.evaluator_score,
                evaluator_id = EXCLUDED.evaluator_id,
                status = 'evaluated'::resultstatus,
                updated_at = EXCLUDED.updated_at
             RETURNING {COLUMNS}"
        ),
    }
}

async fn upsert_score(
    conn: &mut PgConnection,
    kind: ScoreKind,
    write: ScoreWrite,
    now: time::PrimitiveDateTime,
) -> Result<EvaluationResult, sqlx::Error> {
    let sql = upsert_sql(kind);
    let query = sqlx::query_as::<_, EvaluationResult>(&sql)
        .bind(write.evaluatee_id)
        .bind(write.indicator_id)
        .bind(write.period_id)
        .bind(write.score);
    let query = match kind {
        ScoreKind::SelfScore => query,
        ScoreKind::EvaluatorScore => query.bind(write.evaluator_id),
    };
    query.bind(now).fetch_one(conn).await
}

/// Insert-or-update of one score in a single statement keyed on the result triple.
pub(crate) async fn save_score(
    pool: &PgPool,
    kind: ScoreKind,
    write: ScoreWrite,
    now: time::PrimitiveDateTime,
) -> Result<EvaluationResult, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    upsert_score(&mut *conn, kind, write, now).await
}

/// Saves every write in one transaction and returns how many rows were written.
pub(crate) async fn save_bulk(
    pool: &PgPool,
    kind: ScoreKind,
    writes: &[ScoreWrite],
    now: time::PrimitiveDateTime,
) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;
    for write in writes {
        upsert_score(&mut *tx, kind, *write, now).await?;
    }
    tx.commit().await?;
    Ok(writes.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedOutcome {
    pub(crate) created: u64,
    pub(crate) candidates: i64,
}

/// Creates a `draft` row for every active evaluatee and active indicator pair that lacks one.
pub(crate) async fn init_for_period(
    pool: &PgPool,
    period_id: i64,
    evaluatee_id: Option<i64>,
    now: time::PrimitiveDateTime,
) -> Result<SeedOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let candidates = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)
         FROM users u
         CROSS JOIN indicators i
         WHERE u.role = 'evaluatee' AND u.is_active AND i.active
           AND ($1::BIGINT IS NULL OR u.id = $1)",
    )
    .bind(evaluatee_id)
    .fetch_one(&mut *tx)
    .await?;

    let inserted = sqlx::query(
        "INSERT INTO evaluation_results (
            evaluatee_id, indicator_id, period_id, status, created_at, updated_at
         )
         SELECT u.id, i.id, $1, $2, $3, $3
         FROM users u
         CROSS JOIN indicators i
         WHERE u.role = 'evaluatee' AND u.is_active AND i.active
           AND ($4::BIGINT IS NULL OR u.id = $4)
         ON CONFLICT (evaluatee_id, indicator_id, period_id) DO NOTHING",
    )
    .bind(period_id)
    .bind(ResultStatus::Draft)
    .bind(now)
    .bind(evaluatee_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(SeedOutcome { created: inserted.rows_affected(), candidates })
}

pub(crate) async fn weighted_scores(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: i64,
) -> Result<Vec<WeightedScore>, sqlx::Error> {
    sqlx::query_as::<_, WeightedScore>(
        "SELECT r.self_score, r.evaluator_score, i.weight
         FROM evaluation_results r
         LEFT JOIN indicators i ON i.id = r.indicator_id
         WHERE r.evaluatee_id = $1 AND r.period_id = $2",
    )
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM evaluation_results WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

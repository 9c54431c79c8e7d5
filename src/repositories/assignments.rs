use sqlx::PgPool;

use crate::db::models::Assignment;

const SELECT: &str = "\
    SELECT a.id, a.evaluator_id, a.evaluatee_id, a.period_id, a.created_at, \
           ev.name AS evaluator_name, ee.name AS evaluatee_name, p.name AS period_name, \
           p.start_date AS period_start_date, p.end_date AS period_end_date, \
           p.is_active AS period_is_active \
    FROM assignments a \
    LEFT JOIN users ev ON ev.id = a.evaluator_id \
    LEFT JOIN users ee ON ee.id = a.evaluatee_id \
    LEFT JOIN evaluation_periods p ON p.id = a.period_id";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("{SELECT} ORDER BY a.period_id DESC, a.id ASC"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("{SELECT} WHERE a.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_evaluator(
    pool: &PgPool,
    evaluator_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "{SELECT} WHERE a.evaluator_id = $1 ORDER BY a.period_id DESC, ee.name ASC"
    ))
    .bind(evaluator_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_evaluatee(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: Option<i64>,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "{SELECT}
         WHERE a.evaluatee_id = $1 AND ($2::BIGINT IS NULL OR a.period_id = $2)
         ORDER BY p.start_date DESC, ev.name ASC"
    ))
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_period(
    pool: &PgPool,
    period_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "{SELECT} WHERE a.period_id = $1 ORDER BY ev.name ASC, ee.name ASC"
    ))
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    period_id: i64,
    evaluator_id: i64,
    evaluatee_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM assignments
            WHERE period_id = $1 AND evaluator_id = $2 AND evaluatee_id = $3
        )",
    )
    .bind(period_id)
    .bind(evaluator_id)
    .bind(evaluatee_id)
    .fetch_one(pool)
    .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NewAssignment {
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
}

/// Single insert; a duplicate triple surfaces as a unique violation.
pub(crate) async fn create(
    pool: &PgPool,
    item: NewAssignment,
    created_at: time::PrimitiveDateTime,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO assignments (evaluator_id, evaluatee_id, period_id, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING id",
    )
    .bind(item.evaluator_id)
    .bind(item.evaluatee_id)
    .bind(item.period_id)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

/// Inserts every item in one transaction. Any failure rolls back the whole batch.
pub(crate) async fn create_bulk(
    pool: &PgPool,
    items: &[NewAssignment],
    created_at: time::PrimitiveDateTime,
) -> Result<Vec<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(items.len());

    for item in items {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO assignments (evaluator_id, evaluatee_id, period_id, created_at)
             VALUES ($1,$2,$3,$4)
             RETURNING id",
        )
        .bind(item.evaluator_id)
        .bind(item.evaluatee_id)
        .bind(item.period_id)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await?;
        ids.push(id);
    }

    tx.commit().await?;
    Ok(ids)
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete_by_period(pool: &PgPool, period_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE period_id = $1")
        .bind(period_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

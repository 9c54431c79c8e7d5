use sqlx::PgPool;
use time::Date;

use crate::db::models::EvaluationPeriod;

const COLUMNS: &str = "id, name, start_date, end_date, is_active, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<EvaluationPeriod>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationPeriod>(&format!(
        "SELECT {COLUMNS} FROM evaluation_periods ORDER BY start_date DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_active(pool: &PgPool) -> Result<Vec<EvaluationPeriod>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationPeriod>(&format!(
        "SELECT {COLUMNS} FROM evaluation_periods WHERE is_active ORDER BY start_date DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: i64,
) -> Result<Option<EvaluationPeriod>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationPeriod>(&format!(
        "SELECT {COLUMNS} FROM evaluation_periods WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreatePeriod<'a> {
    pub(crate) name: &'a str,
    pub(crate) start_date: Date,
    pub(crate) end_date: Date,
    pub(crate) is_active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreatePeriod<'_>,
) -> Result<EvaluationPeriod, sqlx::Error> {
    sqlx::query_as::<_, EvaluationPeriod>(&format!(
        "INSERT INTO evaluation_periods (name, start_date, end_date, is_active, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.name)
    .bind(params.start_date)
    .bind(params.end_date)
    .bind(params.is_active)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdatePeriod {
    pub(crate) name: Option<String>,
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) is_active: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    params: UpdatePeriod,
) -> Result<Option<EvaluationPeriod>, sqlx::Error> {
    sqlx::query_as::<_, EvaluationPeriod>(&format!(
        "UPDATE evaluation_periods SET
            name = COALESCE($1, name),
            start_date = COALESCE($2, start_date),
            end_date = COALESCE($3, end_date),
            is_active = COALESCE($4, is_active),
            updated_at = $5
         WHERE id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(params.name)
    .bind(params.start_date)
    .bind(params.end_date)
    .bind(params.is_active)
    .bind(params.updated_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM evaluation_periods WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

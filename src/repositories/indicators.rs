use sqlx::PgPool;

use crate::db::models::{Indicator, ScoreRange};

const SELECT: &str = "\
    SELECT i.id, i.topic_id, t.title AS topic_name, i.code, i.name, i.description, i.type, \
           i.weight, i.min_score, i.max_score, i.active, i.created_at, i.updated_at \
    FROM indicators i \
    LEFT JOIN evaluation_topics t ON t.id = i.topic_id";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Indicator>, sqlx::Error> {
    sqlx::query_as::<_, Indicator>(&format!("{SELECT} ORDER BY i.topic_id ASC, i.id ASC"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Indicator>, sqlx::Error> {
    sqlx::query_as::<_, Indicator>(&format!("{SELECT} WHERE i.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_topic(
    pool: &PgPool,
    topic_id: i64,
) -> Result<Vec<Indicator>, sqlx::Error> {
    sqlx::query_as::<_, Indicator>(&format!("{SELECT} WHERE i.topic_id = $1 ORDER BY i.id ASC"))
        .bind(topic_id)
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_by_type(
    pool: &PgPool,
    indicator_type: &str,
) -> Result<Vec<Indicator>, sqlx::Error> {
    sqlx::query_as::<_, Indicator>(&format!(
        "{SELECT} WHERE i.type = $1 ORDER BY i.topic_id ASC, i.id ASC"
    ))
    .bind(indicator_type)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateIndicator<'a> {
    pub(crate) topic_id: i64,
    pub(crate) code: &'a str,
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) indicator_type: &'a str,
    pub(crate) weight: f64,
    pub(crate) min_score: f64,
    pub(crate) max_score: f64,
    pub(crate) active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateIndicator<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO indicators (
            topic_id, code, name, description, type, weight, min_score, max_score, active,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$10)
        RETURNING id",
    )
    .bind(params.topic_id)
    .bind(params.code)
    .bind(params.name)
    .bind(params.description)
    .bind(params.indicator_type)
    .bind(params.weight)
    .bind(params.min_score)
    .bind(params.max_score)
    .bind(params.active)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateIndicator {
    pub(crate) topic_id: Option<i64>,
    pub(crate) code: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) indicator_type: Option<String>,
    pub(crate) weight: Option<f64>,
    pub(crate) min_score: Option<f64>,
    pub(crate) max_score: Option<f64>,
    pub(crate) active: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

/// Applies the non-null fields; returns `false` when the row does not exist.
pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    params: UpdateIndicator,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE indicators SET
            topic_id = COALESCE($1, topic_id),
            code = COALESCE($2, code),
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            type = COALESCE($5, type),
            weight = COALESCE($6, weight),
            min_score = COALESCE($7, min_score),
            max_score = COALESCE($8, max_score),
            active = COALESCE($9, active),
            updated_at = $10
         WHERE id = $11",
    )
    .bind(params.topic_id)
    .bind(params.code)
    .bind(params.name)
    .bind(params.description)
    .bind(params.indicator_type)
    .bind(params.weight)
    .bind(params.min_score)
    .bind(params.max_score)
    .bind(params.active)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM indicators WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Score bounds for the given indicator ids; unknown ids are simply absent.
pub(crate) async fn score_ranges(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<ScoreRange>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ScoreRange>(
        "SELECT id, min_score, max_score FROM indicators WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

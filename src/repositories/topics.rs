use sqlx::PgPool;

use crate::db::models::Topic;

const COLUMNS: &str = "id, code, title, description, weight, active, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!("SELECT {COLUMNS} FROM evaluation_topics ORDER BY id ASC"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn list_active(pool: &PgPool) -> Result<Vec<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "SELECT {COLUMNS} FROM evaluation_topics WHERE active ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!("SELECT {COLUMNS} FROM evaluation_topics WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateTopic<'a> {
    pub(crate) code: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) weight: f64,
    pub(crate) active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateTopic<'_>) -> Result<Topic, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "INSERT INTO evaluation_topics (code, title, description, weight, active, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.code)
    .bind(params.title)
    .bind(params.description)
    .bind(params.weight)
    .bind(params.active)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateTopic {
    pub(crate) code: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) weight: Option<f64>,
    pub(crate) active: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    params: UpdateTopic,
) -> Result<Option<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "UPDATE evaluation_topics SET
            code = COALESCE($1, code),
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            weight = COALESCE($4, weight),
            active = COALESCE($5, active),
            updated_at = $6
         WHERE id = $7
         RETURNING {COLUMNS}"
    ))
    .bind(params.code)
    .bind(params.title)
    .bind(params.description)
    .bind(params.weight)
    .bind(params.active)
    .bind(params.updated_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn count_indicators(pool: &PgPool, topic_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM indicators WHERE topic_id = $1")
        .bind(topic_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM evaluation_topics WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

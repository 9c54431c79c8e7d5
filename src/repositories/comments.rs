use sqlx::PgPool;

use crate::db::models::Comment;

const SELECT: &str = "\
    SELECT c.id, c.evaluator_id, c.evaluatee_id, c.period_id, c.comment_text, c.comment_type, \
           c.created_at, c.updated_at, ev.name AS evaluator_name, ee.name AS evaluatee_name, \
           p.name AS period_name \
    FROM evaluator_comments c \
    LEFT JOIN users ev ON ev.id = c.evaluator_id \
    LEFT JOIN users ee ON ee.id = c.evaluatee_id \
    LEFT JOIN evaluation_periods p ON p.id = c.period_id";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("{SELECT} ORDER BY c.created_at DESC, c.id DESC"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!("{SELECT} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_evaluatee_period(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "{SELECT}
         WHERE c.evaluatee_id = $1 AND c.period_id = $2
         ORDER BY c.created_at DESC"
    ))
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_evaluator(
    pool: &PgPool,
    evaluator_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "{SELECT} WHERE c.evaluator_id = $1 ORDER BY c.created_at DESC"
    ))
    .bind(evaluator_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_period(
    pool: &PgPool,
    period_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(&format!(
        "{SELECT} WHERE c.period_id = $1 ORDER BY ee.name ASC, c.created_at DESC"
    ))
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateComment<'a> {
    pub(crate) evaluator_id: i64,
    pub(crate) evaluatee_id: i64,
    pub(crate) period_id: i64,
    pub(crate) comment_text: &'a str,
    pub(crate) comment_type: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateComment<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO evaluator_comments (
            evaluator_id, evaluatee_id, period_id, comment_text, comment_type, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$6)
         RETURNING id",
    )
    .bind(params.evaluator_id)
    .bind(params.evaluatee_id)
    .bind(params.period_id)
    .bind(params.comment_text)
    .bind(params.comment_type)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    comment_text: Option<&str>,
    comment_type: Option<&str>,
    updated_at: time::PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE evaluator_comments SET
            comment_text = COALESCE($1, comment_text),
            comment_type = COALESCE($2, comment_type),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(comment_text)
    .bind(comment_type)
    .bind(updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM evaluator_comments WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

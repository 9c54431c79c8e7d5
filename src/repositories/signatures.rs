use sqlx::PgPool;

use crate::db::models::Signature;

const SELECT: &str = "\
    SELECT s.id, s.result_id, s.evaluator_id, u.name AS evaluator_name, s.signature_data, \
           s.signature_hash, s.signed_at \
    FROM signatures s \
    LEFT JOIN users u ON u.id = s.evaluator_id";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Signature>, sqlx::Error> {
    sqlx::query_as::<_, Signature>(&format!("{SELECT} ORDER BY s.signed_at DESC, s.id DESC"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Signature>, sqlx::Error> {
    sqlx::query_as::<_, Signature>(&format!("{SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_result(
    pool: &PgPool,
    result_id: i64,
) -> Result<Vec<Signature>, sqlx::Error> {
    sqlx::query_as::<_, Signature>(&format!(
        "{SELECT} WHERE s.result_id = $1 ORDER BY s.signed_at ASC"
    ))
    .bind(result_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_evaluator(
    pool: &PgPool,
    evaluator_id: i64,
) -> Result<Vec<Signature>, sqlx::Error> {
    sqlx::query_as::<_, Signature>(&format!(
        "{SELECT} WHERE s.evaluator_id = $1 ORDER BY s.signed_at DESC"
    ))
    .bind(evaluator_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateSignature<'a> {
    pub(crate) result_id: i64,
    pub(crate) evaluator_id: i64,
    pub(crate) signature_data: &'a str,
    pub(crate) signature_hash: &'a str,
    pub(crate) signed_at: time::PrimitiveDateTime,
}

/// A second signature by the same evaluator on a result surfaces as a unique violation.
pub(crate) async fn create(pool: &PgPool, params: CreateSignature<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO signatures (result_id, evaluator_id, signature_data, signature_hash, signed_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING id",
    )
    .bind(params.result_id)
    .bind(params.evaluator_id)
    .bind(params.signature_data)
    .bind(params.signature_hash)
    .bind(params.signed_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM signatures WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

use sqlx::PgPool;

use crate::db::models::Department;

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(
        "SELECT id, name, created_at FROM departments ORDER BY name ASC",
    )
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    pool: &PgPool,
    name: &str,
    created_at: time::PrimitiveDateTime,
) -> Result<Department, sqlx::Error> {
    sqlx::query_as::<_, Department>(
        "INSERT INTO departments (name, created_at) VALUES ($1, $2)
         RETURNING id, name, created_at",
    )
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

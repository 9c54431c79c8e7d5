use sqlx::Row;

fn database_url() -> String {
    dotenvy::dotenv().ok();

    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }

    let server = std::env::var("POSTGRES_SERVER").unwrap_or_else(|_| "localhost".into());
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "staff_eval".into());
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "staff_eval".into());

    format!("postgresql://{user}:{password}@{server}:{port}/{db}")
}

#[tokio::test]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let pool =
        sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&database_url()).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let tables = [
        "departments",
        "users",
        "evaluation_periods",
        "evaluation_topics",
        "indicators",
        "assignments",
        "evaluation_results",
        "signatures",
        "evaluator_comments",
    ];

    for table in tables {
        let row = sqlx::query("SELECT to_regclass($1)::text").bind(table).fetch_one(&pool).await?;
        let regclass: Option<String> = row.try_get(0)?;
        assert!(regclass.is_some(), "expected table {table} to exist after migrations");
    }

    let constraint: Option<String> = sqlx::query_scalar(
        "SELECT conname::text FROM pg_constraint WHERE conname = 'evaluation_results_triple_key'",
    )
    .fetch_optional(&pool)
    .await?;
    assert!(constraint.is_some(), "results must be unique per evaluatee, indicator and period");

    Ok(())
}

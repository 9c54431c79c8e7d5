use sqlx::PgPool;

use crate::db::models::{
    EvaluateeSummary, ReportEvaluatee, ReportResult, ReportSignature, TopicSummary,
};

pub(crate) async fn find_evaluatee(
    pool: &PgPool,
    evaluatee_id: i64,
) -> Result<Option<ReportEvaluatee>, sqlx::Error> {
    sqlx::query_as::<_, ReportEvaluatee>(
        "SELECT u.id, u.name, u.email, u.department_id, d.name AS department_name
         FROM users u
         LEFT JOIN departments d ON d.id = u.department_id
         WHERE u.id = $1",
    )
    .bind(evaluatee_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn individual_results(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: i64,
) -> Result<Vec<ReportResult>, sqlx::Error> {
    sqlx::query_as::<_, ReportResult>(
        "SELECT r.id, r.indicator_id, r.self_score, r.evaluator_score, r.evaluator_id, r.status,
                r.updated_at, i.name AS indicator_name, i.type AS indicator_type,
                i.weight AS indicator_weight, t.title AS topic_name, t.weight AS topic_weight,
                ev.name AS evaluator_name
         FROM evaluation_results r
         LEFT JOIN indicators i ON i.id = r.indicator_id
         LEFT JOIN evaluation_topics t ON t.id = i.topic_id
         LEFT JOIN users ev ON ev.id = r.evaluator_id
         WHERE r.evaluatee_id = $1 AND r.period_id = $2
         ORDER BY t.id ASC, i.id ASC",
    )
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn individual_signatures(
    pool: &PgPool,
    evaluatee_id: i64,
    period_id: i64,
) -> Result<Vec<ReportSignature>, sqlx::Error> {
    sqlx::query_as::<_, ReportSignature>(
        "SELECT s.id, s.result_id, r.indicator_id, s.evaluator_id, u.name AS evaluator_name,
                s.signature_hash, s.signed_at
         FROM signatures s
         JOIN evaluation_results r ON r.id = s.result_id
         LEFT JOIN users u ON u.id = s.evaluator_id
         WHERE r.evaluatee_id = $1 AND r.period_id = $2
         ORDER BY s.signed_at ASC, s.id ASC",
    )
    .bind(evaluatee_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn overall(
    pool: &PgPool,
    period_id: i64,
) -> Result<Vec<EvaluateeSummary>, sqlx::Error> {
    sqlx::query_as::<_, EvaluateeSummary>(
        "SELECT u.id AS evaluatee_id, u.name AS evaluatee_name, u.email,
                d.name AS department_name,
                COUNT(r.id) AS total_indicators,
                AVG(r.self_score) AS avg_self_score,
                AVG(r.evaluator_score) AS avg_evaluator_score,
                SUM(i.weight) AS total_weight
         FROM evaluation_results r
         JOIN users u ON u.id = r.evaluatee_id
         LEFT JOIN departments d ON d.id = u.department_id
         LEFT JOIN indicators i ON i.id = r.indicator_id
         WHERE r.period_id = $1
         GROUP BY u.id, u.name, u.email, d.name
         ORDER BY u.name ASC",
    )
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn by_department(
    pool: &PgPool,
    department_id: i64,
    period_id: i64,
) -> Result<Vec<EvaluateeSummary>, sqlx::Error> {
    sqlx::query_as::<_, EvaluateeSummary>(
        "SELECT u.id AS evaluatee_id, u.name AS evaluatee_name, u.email,
                d.name AS department_name,
                COUNT(r.id) AS total_indicators,
                AVG(r.self_score) AS avg_self_score,
                AVG(r.evaluator_score) AS avg_evaluator_score,
                SUM(i.weight) AS total_weight
         FROM evaluation_results r
         JOIN users u ON u.id = r.evaluatee_id
         LEFT JOIN departments d ON d.id = u.department_id
         LEFT JOIN indicators i ON i.id = r.indicator_id
         WHERE u.department_id = $1 AND r.period_id = $2
         GROUP BY u.id, u.name, u.email, d.name
         ORDER BY u.name ASC",
    )
    .bind(department_id)
    .bind(period_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn by_topic(
    pool: &PgPool,
    period_id: i64,
) -> Result<Vec<TopicSummary>, sqlx::Error> {
    sqlx::query_as::<_, TopicSummary>(
        "SELECT t.id AS topic_id, t.title AS topic_name, t.weight AS topic_weight,
                COUNT(r.id) AS total_results,
                AVG(r.self_score) AS avg_self_score,
                AVG(r.evaluator_score) AS avg_evaluator_score
         FROM evaluation_results r
         LEFT JOIN indicators i ON i.id = r.indicator_id
         LEFT JOIN evaluation_topics t ON t.id = i.topic_id
         WHERE r.period_id = $1
         GROUP BY t.id, t.title, t.weight
         ORDER BY t.id ASC",
    )
    .bind(period_id)
    .fetch_all(pool)
    .await
}

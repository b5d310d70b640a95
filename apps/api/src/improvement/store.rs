use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::improvement::schema::ResumeImprovement;
use crate::models::improvement::{ImprovementSummaryRow, ResumeImprovementRow};

pub const HISTORY_LIMIT: i64 = 20;

/// Persists a normalized analysis.
pub async fn insert_improvement(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Option<Uuid>,
    jd_text: &str,
    improvement: &ResumeImprovement,
) -> Result<ResumeImprovementRow, AppError> {
    let analysis = serde_json::to_value(&improvement.analysis).map_err(anyhow::Error::from)?;
    let jd_match = serde_json::to_value(&improvement.jd_match).map_err(anyhow::Error::from)?;
    let improved_resume =
        serde_json::to_value(&improvement.improved_resume).map_err(anyhow::Error::from)?;

    let row = sqlx::query_as(
        r#"
        INSERT INTO resume_improvements
            (id, user_id, resume_id, jd_text, analysis, jd_match, improved_resume, improved_merged)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(resume_id)
    .bind(jd_text)
    .bind(analysis)
    .bind(jd_match)
    .bind(improved_resume)
    .bind(&improvement.improved_merged)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// The user's most recent analyses, newest first.
pub async fn list_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ImprovementSummaryRow>, AppError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, analysis, created_at
        FROM resume_improvements
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(HISTORY_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_improvement(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<ResumeImprovementRow, AppError> {
    let row: Option<ResumeImprovementRow> =
        sqlx::query_as("SELECT * FROM resume_improvements WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
}

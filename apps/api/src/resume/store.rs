use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;

/// Inserts a resume with its extracted profile and returns the stored row.
pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    resume_text: &str,
    jd_text: &str,
    parsed_data: &Value,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, resume_text, jd_text, parsed_data)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(resume_text)
    .bind(jd_text)
    .bind(parsed_data)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// A user's resumes, newest first.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    let rows = sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetches one resume owned by `user_id`; `NotFound` otherwise.
pub async fn get_resume(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ResumeRow, AppError> {
    let row: Option<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

pub async fn latest_resume(pool: &PgPool, user_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
    let row = sqlx::query_as(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete_resume(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(())
}

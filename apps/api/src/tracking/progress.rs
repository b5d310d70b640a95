use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::progress::UserProgressRow;

#[derive(Debug, Deserialize)]
pub struct MarkProgressRequest {
    pub user_id: Uuid,
    pub skill_name: String,
    /// Absent when the whole skill is being marked.
    pub resource_link: Option<String>,
    pub is_completed: bool,
    pub skill_total: Option<i32>,
}

impl MarkProgressRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.skill_name.trim().is_empty() {
            return Err(AppError::Validation("skill_name is required".into()));
        }
        if self.skill_total.is_some_and(|total| total < 0) {
            return Err(AppError::Validation("skill_total must be >= 0".into()));
        }
        Ok(())
    }

    /// Empty links count as skill-level marks.
    pub fn link(&self) -> Option<&str> {
        self.resource_link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Upserts the (user, skill, resource) row and, when a total is given, copies it onto
/// every row of the same skill.
pub async fn mark_progress(
    pool: &PgPool,
    req: &MarkProgressRequest,
) -> Result<UserProgressRow, AppError> {
    let skill_name = req.skill_name.trim();
    let mut tx = pool.begin().await?;

    let row: UserProgressRow = sqlx::query_as(
        r#"
        INSERT INTO user_progress
            (id, user_id, skill_name, resource_link, skill_total, is_completed,
             completed_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6 THEN NOW() ELSE NULL END, NOW())
        ON CONFLICT (user_id, skill_name, (COALESCE(resource_link, '')))
        DO UPDATE SET
            is_completed = EXCLUDED.is_completed,
            completed_at = EXCLUDED.completed_at,
            skill_total  = COALESCE(EXCLUDED.skill_total, user_progress.skill_total),
            updated_at   = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(skill_name)
    .bind(req.link())
    .bind(req.skill_total)
    .bind(req.is_completed)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(total) = req.skill_total {
        sqlx::query(
            "UPDATE user_progress SET skill_total = $3 WHERE user_id = $1 AND skill_name = $2",
        )
        .bind(req.user_id)
        .bind(skill_name)
        .bind(total)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(row)
}

pub async fn list_progress(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserProgressRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM user_progress WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

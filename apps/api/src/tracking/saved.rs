use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::progress::SavedResourceRow;

#[derive(Debug, Deserialize)]
pub struct SaveResourceRequest {
    pub user_id: Uuid,
    pub title: String,
    pub link: String,
    pub description: String,
}

impl SaveResourceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".into()));
        }
        let link = self.link.trim();
        if !(link.starts_with("http://") || link.starts_with("https://")) || link.contains(' ') {
            return Err(AppError::Validation("Valid link is required".into()));
        }
        Ok(())
    }
}

/// Saves once per (user, link); saving again returns the stored row untouched.
pub async fn save_resource(
    pool: &PgPool,
    req: &SaveResourceRequest,
) -> Result<SavedResourceRow, AppError> {
    let link = req.link.trim();
    sqlx::query(
        r#"
        INSERT INTO saved_resources (id, user_id, title, link, description)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, link) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(req.title.trim())
    .bind(link)
    .bind(req.description.trim())
    .execute(pool)
    .await?;

    let row = sqlx::query_as("SELECT * FROM saved_resources WHERE user_id = $1 AND link = $2")
        .bind(req.user_id)
        .bind(link)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn list_saved(pool: &PgPool, user_id: Uuid) -> Result<Vec<SavedResourceRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM saved_resources WHERE user_id = $1 ORDER BY saved_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_saved(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM saved_resources WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Saved resource {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(link: &str) -> SaveResourceRequest {
        SaveResourceRequest {
            user_id: Uuid::nil(),
            title: "The Book".into(),
            link: link.into(),
            description: "Rust book".into(),
        }
    }

    #[test]
    fn test_validate_link() {
        assert!(request("https://doc.rust-lang.org/book/").validate().is_ok());
        assert!(request("ftp://example.com").validate().is_err());
        assert!(request("not a url").validate().is_err());
    }

    #[test]
    fn test_validate_requires_title() {
        let mut req = request("https://example.com");
        req.title = " ".into();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeImprovementRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub jd_text: String,
    pub analysis: Value,
    pub jd_match: Value,
    pub improved_resume: Value,
    pub improved_merged: String,
    pub created_at: DateTime<Utc>,
}

/// Slim projection used by the history listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImprovementSummaryRow {
    pub id: Uuid,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}

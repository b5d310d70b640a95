use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyChallengeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_type: String,
    pub difficulty: String,
    pub question: String,
    pub answer: String,
    pub status: String,
    pub generated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

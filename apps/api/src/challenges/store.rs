use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::challenges::generator::ChallengeDraft;
use crate::errors::AppError;
use crate::models::challenge::DailyChallengeRow;

pub const HISTORY_MAX_ROWS: i64 = 200;
pub const HISTORY_DEFAULT_DAYS: i64 = 7;

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// History window in days: default 7, clamped to [1, 90].
pub fn clamp_days(days: Option<i64>) -> i64 {
    days.filter(|d| *d != 0)
        .unwrap_or(HISTORY_DEFAULT_DAYS)
        .clamp(1, 90)
}

/// Status a submission moves a challenge to; anything but "skipped" completes it.
pub fn submitted_status(requested: Option<&str>) -> &'static str {
    match requested {
        Some(s) if s.trim().eq_ignore_ascii_case("skipped") => "skipped",
        _ => "completed",
    }
}

/// Latest challenge generated since midnight UTC.
pub async fn find_today(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<DailyChallengeRow>, AppError> {
    let row = sqlx::query_as(
        r#"
        SELECT * FROM daily_challenges
        WHERE user_id = $1 AND generated_at >= $2
        ORDER BY generated_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(start_of_day(now))
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_challenge(
    pool: &PgPool,
    user_id: Uuid,
    draft: &ChallengeDraft,
) -> Result<DailyChallengeRow, AppError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO daily_challenges
            (id, user_id, challenge_type, difficulty, question, answer, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&draft.challenge_type)
    .bind(&draft.difficulty)
    .bind(&draft.question)
    .bind(&draft.answer)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Sets the status of a user's challenge; `completed_at` is stamped on completion.
pub async fn submit_challenge(
    pool: &PgPool,
    user_id: Uuid,
    challenge_id: Uuid,
    status: &str,
) -> Result<DailyChallengeRow, AppError> {
    let row: Option<DailyChallengeRow> = sqlx::query_as(
        r#"
        UPDATE daily_challenges
        SET status = $3,
            completed_at = CASE WHEN $3 = 'completed' THEN NOW() ELSE completed_at END
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(challenge_id)
    .bind(user_id)
    .bind(status)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| AppError::NotFound(format!("Challenge {challenge_id} not found")))
}

pub async fn list_history(
    pool: &PgPool,
    user_id: Uuid,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<DailyChallengeRow>, AppError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM daily_challenges
        WHERE user_id = $1 AND generated_at >= $2
        ORDER BY generated_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(now - Duration::days(days))
    .bind(HISTORY_MAX_ROWS)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

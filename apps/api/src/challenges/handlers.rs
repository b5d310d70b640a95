use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::challenges::generator::{generate_challenge, ChallengeProfile};
use crate::challenges::store;
use crate::errors::AppError;
use crate::models::challenge::DailyChallengeRow;
use crate::resume::store::latest_resume;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct UserIdBody {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub challenge: DailyChallengeRow,
}

async fn create_for_user(state: &AppState, user_id: Uuid) -> Result<DailyChallengeRow, AppError> {
    let resume = latest_resume(&state.db, user_id).await?;
    let profile = ChallengeProfile::from_resume(resume.as_ref());
    let draft = generate_challenge(state, user_id, &profile, Utc::now().date_naive()).await;
    store::insert_challenge(&state.db, user_id, &draft).await
}

/// GET /api/v1/challenges/today
pub async fn handle_today(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let challenge = match store::find_today(&state.db, params.user_id, Utc::now()).await? {
        Some(existing) => existing,
        None => create_for_user(&state, params.user_id).await?,
    };
    Ok(Json(ChallengeResponse { challenge }))
}

/// POST /api/v1/challenges/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    Json(req): Json<UserIdBody>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let challenge = create_for_user(&state, req.user_id).await?;
    Ok(Json(ChallengeResponse { challenge }))
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub user_id: Uuid,
    pub challenge_id: Uuid,
    pub status: Option<String>,
}

/// POST /api/v1/challenges/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let status = store::submitted_status(req.status.as_deref());
    let challenge =
        store::submit_challenge(&state.db, req.user_id, req.challenge_id, status).await?;
    Ok(Json(ChallengeResponse { challenge }))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: Uuid,
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<DailyChallengeRow>,
}

/// GET /api/v1/challenges/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let days = store::clamp_days(params.days);
    let history = store::list_history(&state.db, params.user_id, days, Utc::now()).await?;
    Ok(Json(HistoryResponse { history }))
}

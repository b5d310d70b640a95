use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::analyzer::{generate_insights, InsightKind};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProgressInsightsRequest {
    pub user_id: Uuid,
    /// Whatever metrics the dashboard sends alongside `user_id`.
    #[serde(flatten)]
    pub metrics: Map<String, Value>,
}

#[derive(Serialize)]
pub struct ProgressInsightsResponse {
    pub insights: Vec<String>,
    pub processing_time_ms: u64,
}

#[derive(Deserialize)]
pub struct ProfileInsightsRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub profile: Value,
}

#[derive(Serialize)]
pub struct ProfileInsightsResponse {
    pub suggestions: Vec<String>,
    pub processing_time_ms: u64,
}

/// POST /api/v1/insights/progress
pub async fn handle_progress_insights(
    State(state): State<AppState>,
    Json(req): Json<ProgressInsightsRequest>,
) -> Result<Json<ProgressInsightsResponse>, AppError> {
    let metrics = Value::Object(req.metrics);
    let outcome = generate_insights(&state, req.user_id, InsightKind::Progress, &metrics).await;
    Ok(Json(ProgressInsightsResponse {
        insights: outcome.items,
        processing_time_ms: outcome.processing_time_ms,
    }))
}

/// POST /api/v1/insights/profile
pub async fn handle_profile_insights(
    State(state): State<AppState>,
    Json(req): Json<ProfileInsightsRequest>,
) -> Result<Json<ProfileInsightsResponse>, AppError> {
    let profile = if req.profile.is_null() {
        Value::Object(Map::new())
    } else {
        req.profile
    };
    let outcome = generate_insights(&state, req.user_id, InsightKind::Profile, &profile).await;
    Ok(Json(ProfileInsightsResponse {
        suggestions: outcome.items,
        processing_time_ms: outcome.processing_time_ms,
    }))
}

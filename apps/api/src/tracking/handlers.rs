use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::progress::{SavedResourceRow, UserProgressRow};
use crate::state::AppState;
use crate::tracking::progress::{list_progress, mark_progress, MarkProgressRequest};
use crate::tracking::saved::{delete_saved, list_saved, save_resource, SaveResourceRequest};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct MarkProgressResponse {
    pub progress: UserProgressRow,
}

#[derive(Serialize)]
pub struct ProgressListResponse {
    pub progress: Vec<UserProgressRow>,
}

#[derive(Serialize)]
pub struct SavedResourceResponse {
    pub resource: SavedResourceRow,
}

#[derive(Serialize)]
pub struct SavedResourceListResponse {
    pub items: Vec<SavedResourceRow>,
}

/// POST /api/v1/progress/mark
pub async fn handle_mark_progress(
    State(state): State<AppState>,
    Json(req): Json<MarkProgressRequest>,
) -> Result<Json<MarkProgressResponse>, AppError> {
    req.validate()?;
    let progress = mark_progress(&state.db, &req).await?;
    Ok(Json(MarkProgressResponse { progress }))
}

/// GET /api/v1/progress
pub async fn handle_list_progress(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProgressListResponse>, AppError> {
    let progress = list_progress(&state.db, params.user_id).await?;
    Ok(Json(ProgressListResponse { progress }))
}

/// POST /api/v1/saved-resources
pub async fn handle_save_resource(
    State(state): State<AppState>,
    Json(req): Json<SaveResourceRequest>,
) -> Result<Json<SavedResourceResponse>, AppError> {
    req.validate()?;
    let resource = save_resource(&state.db, &req).await?;
    Ok(Json(SavedResourceResponse { resource }))
}

/// GET /api/v1/saved-resources
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SavedResourceListResponse>, AppError> {
    let items = list_saved(&state.db, params.user_id).await?;
    Ok(Json(SavedResourceListResponse { items }))
}

/// DELETE /api/v1/saved-resources/:id
pub async fn handle_delete_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_saved(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

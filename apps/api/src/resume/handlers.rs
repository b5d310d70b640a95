use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_log::{generate_logged, record, LogContext};
use crate::models::resume::ResumeRow;
use crate::resume::parser::{resume_parse_request, ParsedResume};
use crate::resume::store;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Serialize)]
pub struct CreateResumeResponse {
    pub resume: ResumeRow,
    pub parsed: ParsedResume,
    pub request_id: String,
    pub processing_time_ms: u64,
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<CreateResumeResponse>), AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".into()));
    }
    if req.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".into()));
    }

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/resumes",
        prompt_type: "resume_parse",
        request_data: json!({
            "resume_text": req.resume_text,
            "jd_len": req.jd_text.len(),
        }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &resume_parse_request(&req.resume_text),
        &context,
    )
    .await?;

    let parsed = ParsedResume::normalize(&response.value);
    let parsed_value = serde_json::to_value(&parsed).map_err(anyhow::Error::from)?;
    let resume = store::insert_resume(
        &state.db,
        req.user_id,
        &req.resume_text,
        &req.jd_text,
        &parsed_value,
    )
    .await?;
    record(&state.db, context.success(parsed_value, &response.generation)).await;

    tracing::info!(resume_id = %resume.id, user_id = %req.user_id, "Resume stored");
    Ok((
        StatusCode::CREATED,
        Json(CreateResumeResponse {
            resume,
            parsed,
            request_id: response.generation.request_id,
            processing_time_ms: response.generation.processing_time_ms,
        }),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(store::list_resumes(&state.db, params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(store::get_resume(&state.db, params.user_id, id).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    store::delete_resume(&state.db, params.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

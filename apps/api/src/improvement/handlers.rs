use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::improvement::analyzer::{improvement_request, usable_resume_text};
use crate::improvement::report::render_report_md;
use crate::improvement::schema::{Analysis, ResumeImprovement};
use crate::improvement::store;
use crate::llm_log::{generate_logged, record, LogContext};
use crate::models::improvement::ImprovementSummaryRow;
use crate::resume::store::{get_resume, latest_resume};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub resume_text: Option<String>,
    pub jd_text: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub record_id: Uuid,
    #[serde(flatten)]
    pub improvement: ResumeImprovement,
    pub attempts: u32,
    pub processing_time_ms: u64,
}

/// POST /api/v1/resume-improver/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_text = req.resume_text.filter(|t| !t.trim().is_empty());
    let mut jd_text = req.jd_text.filter(|t| !t.trim().is_empty());

    // An explicit resume_id wins; with neither id nor text, the latest resume is used.
    let stored = match req.resume_id {
        Some(id) => Some(get_resume(&state.db, req.user_id, id).await?),
        None if resume_text.is_none() => Some(
            latest_resume(&state.db, req.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("No resume found for this user".into()))?,
        ),
        None => None,
    };
    let resume_id = stored.as_ref().map(|resume| resume.id);
    if let Some(resume) = stored {
        if resume_text.is_none() {
            resume_text = Some(usable_resume_text(&resume));
        }
        jd_text.get_or_insert(resume.jd_text);
    }

    let (Some(resume_text), Some(jd_text)) = (
        resume_text.filter(|t| !t.trim().is_empty()),
        jd_text.filter(|t| !t.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Resume or JD not found. Please upload both.".into(),
        ));
    };

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/resume-improver/analyze",
        prompt_type: "resume_improver",
        request_data: json!({ "resume_id": resume_id, "jd_len": jd_text.len() }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &improvement_request(&resume_text, &jd_text),
        &context,
    )
    .await?;

    let improvement = ResumeImprovement::normalize(&response.value);
    let row = store::insert_improvement(&state.db, req.user_id, resume_id, &jd_text, &improvement)
        .await?;

    let logged = json!({
        "analysis": improvement.analysis,
        "improved_resume": improvement.improved_resume,
    });
    record(&state.db, context.success(logged, &response.generation)).await;

    tracing::info!(
        record_id = %row.id,
        overall_score = improvement.analysis.overall_score,
        attempts = response.attempts,
        "Resume analysis stored"
    );

    Ok(Json(AnalyzeResponse {
        record_id: row.id,
        improvement,
        attempts: response.attempts,
        processing_time_ms: response.generation.processing_time_ms,
    }))
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub items: Vec<ImprovementSummaryRow>,
}

/// GET /api/v1/resume-improver/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let items = store::list_history(&state.db, params.user_id).await?;
    Ok(Json(HistoryResponse { items }))
}

/// GET /api/v1/resume-improver/report/:id
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    let row = store::get_improvement(&state.db, params.user_id, id).await?;
    let analysis: Analysis = serde_json::from_value(row.analysis)
        .map_err(|e| anyhow::anyhow!("stored analysis {id} is not decodable: {e}"))?;
    let md = render_report_md(&analysis, row.created_at);
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], md))
}

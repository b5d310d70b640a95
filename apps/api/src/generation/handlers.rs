use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::company::{
    cache_key, company_archive_request, read_cached, write_cache, CompanyArchive,
};
use crate::generation::questions::{
    normalize_questions, questions_request, save_question_set, InterviewQuestion,
};
use crate::generation::resources::{normalize_resources, resources_request, SkillResources};
use crate::generation::suggestions::{suggestions_request, ResumeSuggestions};
use crate::llm_log::{generate_logged, record, LogContext};
use crate::normalize::MalformedResponse;
use crate::resume::parser::{resume_parse_request, ParsedResume};
use crate::resume::store::get_resume;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResumeInputRequest {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub resume_text: Option<String>,
    pub jd_text: Option<String>,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<InterviewQuestion>,
    pub question_set_id: Option<Uuid>,
    pub request_id: String,
    pub processing_time_ms: u64,
}

/// POST /api/v1/generate/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<ResumeInputRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let (profile, jd_text) = match req.resume_id {
        Some(resume_id) => {
            let resume = get_resume(&state.db, req.user_id, resume_id).await?;
            (resume.parsed_data, resume.jd_text)
        }
        None => {
            let (Some(resume_text), Some(jd_text)) =
                (non_empty(req.resume_text), non_empty(req.jd_text))
            else {
                return Err(AppError::Validation(
                    "Either resume_id or both resume_text and jd_text are required".into(),
                ));
            };
            let context = LogContext {
                user_id: req.user_id,
                endpoint: "/api/v1/generate/questions",
                prompt_type: "resume_parse",
                request_data: json!({ "resume_text": resume_text }),
            };
            let parsed = generate_logged(
                &state.db,
                state.llm.as_ref(),
                &resume_parse_request(&resume_text),
                &context,
            )
            .await?;
            let profile = serde_json::to_value(ParsedResume::normalize(&parsed.value))
                .map_err(anyhow::Error::from)?;
            (profile, jd_text)
        }
    };

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/generate/questions",
        prompt_type: "question_generation",
        request_data: json!({ "resume_id": req.resume_id, "jd_len": jd_text.len() }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &questions_request(&profile, &jd_text),
        &context,
    )
    .await?;

    let questions = normalize_questions(&response.value);
    if questions.is_empty() {
        let err = MalformedResponse::new(&response.generation.text, "no usable questions in answer");
        record(&state.db, context.failure(err.to_string())).await;
        return Err(err.into());
    }

    let questions_value = serde_json::to_value(&questions).map_err(anyhow::Error::from)?;
    record(&state.db, context.success(questions_value, &response.generation)).await;

    let question_set_id = match req.resume_id {
        Some(resume_id) => Some(
            save_question_set(&state.db, req.user_id, resume_id, &questions, &response.generation)
                .await?
                .id,
        ),
        None => None,
    };

    Ok(Json(QuestionsResponse {
        questions,
        question_set_id,
        request_id: response.generation.request_id,
        processing_time_ms: response.generation.processing_time_ms,
    }))
}

#[derive(Deserialize)]
pub struct CompanyArchiveRequest {
    pub user_id: Uuid,
    pub company_name: String,
}

#[derive(Serialize)]
pub struct CompanyArchiveResponse {
    #[serde(flatten)]
    pub archive: CompanyArchive,
    pub cached: bool,
    pub processing_time_ms: u64,
}

/// POST /api/v1/generate/company-archive
pub async fn handle_company_archive(
    State(state): State<AppState>,
    Json(req): Json<CompanyArchiveRequest>,
) -> Result<Json<CompanyArchiveResponse>, AppError> {
    let company = req.company_name.trim();
    if company.is_empty() {
        return Err(AppError::Validation("company_name cannot be empty".into()));
    }

    let key = cache_key(company);
    if let Some(archive) = read_cached(&state.redis, &key).await {
        return Ok(Json(CompanyArchiveResponse {
            archive,
            cached: true,
            processing_time_ms: 0,
        }));
    }

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/generate/company-archive",
        prompt_type: "company_archive",
        request_data: json!({ "company_name": company }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &company_archive_request(company),
        &context,
    )
    .await?;

    let archive = CompanyArchive::normalize(&response.value, company);
    let archive_value = serde_json::to_value(&archive).map_err(anyhow::Error::from)?;
    record(&state.db, context.success(archive_value, &response.generation)).await;
    write_cache(
        &state.redis,
        &key,
        &archive,
        state.config.company_archive_ttl_secs,
    )
    .await;

    Ok(Json(CompanyArchiveResponse {
        archive,
        cached: false,
        processing_time_ms: response.generation.processing_time_ms,
    }))
}

#[derive(Deserialize)]
pub struct ResourcesRequest {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub jd_text: Option<String>,
}

#[derive(Serialize)]
pub struct ResourcesResponse {
    pub skills: Vec<SkillResources>,
    pub processing_time_ms: u64,
}

/// POST /api/v1/generate/resources
pub async fn handle_generate_resources(
    State(state): State<AppState>,
    Json(req): Json<ResourcesRequest>,
) -> Result<Json<ResourcesResponse>, AppError> {
    let jd_text = match (non_empty(req.jd_text), req.resume_id) {
        (Some(jd_text), _) => jd_text,
        (None, Some(resume_id)) => get_resume(&state.db, req.user_id, resume_id).await?.jd_text,
        (None, None) => {
            return Err(AppError::Validation("jd_text or resume_id is required".into()))
        }
    };

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/generate/resources",
        prompt_type: "resource_generation",
        request_data: json!({ "jd_len": jd_text.len() }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &resources_request(&jd_text),
        &context,
    )
    .await?;

    let skills = normalize_resources(&response.value);
    let skills_value: Value = serde_json::to_value(&skills).map_err(anyhow::Error::from)?;
    record(&state.db, context.success(skills_value, &response.generation)).await;

    Ok(Json(ResourcesResponse {
        skills,
        processing_time_ms: response.generation.processing_time_ms,
    }))
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: ResumeSuggestions,
    pub processing_time_ms: u64,
}

/// POST /api/v1/generate/resume-suggestions
pub async fn handle_resume_suggestions(
    State(state): State<AppState>,
    Json(req): Json<ResumeInputRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let mut resume_text = non_empty(req.resume_text);
    let mut jd_text = non_empty(req.jd_text);
    if let (Some(resume_id), true) = (req.resume_id, resume_text.is_none() || jd_text.is_none()) {
        let resume = get_resume(&state.db, req.user_id, resume_id).await?;
        resume_text.get_or_insert(resume.resume_text);
        jd_text.get_or_insert(resume.jd_text);
    }
    let (Some(resume_text), Some(jd_text)) = (resume_text, jd_text) else {
        return Err(AppError::Validation(
            "resume_text and jd_text are required (or provide resume_id)".into(),
        ));
    };

    let context = LogContext {
        user_id: req.user_id,
        endpoint: "/api/v1/generate/resume-suggestions",
        prompt_type: "resume_suggestions",
        request_data: json!({ "has_resume_id": req.resume_id.is_some(), "jd_len": jd_text.len() }),
    };
    let response = generate_logged(
        &state.db,
        state.llm.as_ref(),
        &suggestions_request(&resume_text, &jd_text),
        &context,
    )
    .await?;

    let suggestions = ResumeSuggestions::normalize(&response.value);
    let suggestions_value = serde_json::to_value(&suggestions).map_err(anyhow::Error::from)?;
    record(&state.db, context.success(suggestions_value, &response.generation)).await;

    Ok(Json(SuggestionsResponse {
        suggestions,
        processing_time_ms: response.generation.processing_time_ms,
    }))
}

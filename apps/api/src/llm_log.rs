//! Append-only audit log of generative interactions (`llm_logs`).
//!
//! Writing the log never fails the request: errors are reported at `warn` and dropped.

use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::llm_client::{Generation, GenerativeModel};
use crate::normalize::retry::{
    generate_structured, StructuredError, StructuredRequest, StructuredResponse,
};

const RESUME_TEXT_LOG_CHARS: usize = 200;

/// One interaction to record.
#[derive(Debug, Clone)]
pub struct LlmLogEntry<'a> {
    pub user_id: Option<Uuid>,
    pub endpoint: &'a str,
    pub prompt_type: &'a str,
    pub request_data: Value,
    pub response_data: Value,
    pub processing_time_ms: u64,
    pub success: bool,
    pub error_message: Option<String>,
    pub request_id: Option<String>,
}

impl<'a> LlmLogEntry<'a> {
    pub fn success(
        user_id: Uuid,
        endpoint: &'a str,
        prompt_type: &'a str,
        request_data: Value,
        response_data: Value,
        generation: &Generation,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            endpoint,
            prompt_type,
            request_data,
            response_data,
            processing_time_ms: generation.processing_time_ms,
            success: true,
            error_message: None,
            request_id: Some(generation.request_id.clone()),
        }
    }

    pub fn failure(
        user_id: Uuid,
        endpoint: &'a str,
        prompt_type: &'a str,
        request_data: Value,
        error_message: String,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            endpoint,
            prompt_type,
            request_data,
            response_data: Value::Null,
            processing_time_ms: 0,
            success: false,
            error_message: Some(error_message),
            request_id: None,
        }
    }
}

/// Who asked for a structured generation, recorded with its outcome.
#[derive(Debug, Clone)]
pub struct LogContext<'a> {
    pub user_id: Uuid,
    pub endpoint: &'a str,
    pub prompt_type: &'a str,
    pub request_data: Value,
}

impl LogContext<'_> {
    pub fn success(&self, response_data: Value, generation: &Generation) -> LlmLogEntry<'_> {
        LlmLogEntry::success(
            self.user_id,
            self.endpoint,
            self.prompt_type,
            self.request_data.clone(),
            response_data,
            generation,
        )
    }

    pub fn failure(&self, error_message: String) -> LlmLogEntry<'_> {
        LlmLogEntry::failure(
            self.user_id,
            self.endpoint,
            self.prompt_type,
            self.request_data.clone(),
            error_message,
        )
    }
}

/// Runs `request` through the retry policy, recording a failed entry before the error
/// propagates. Successful calls are recorded by the caller with the normalized output.
pub async fn generate_logged(
    pool: &PgPool,
    model: &dyn GenerativeModel,
    request: &StructuredRequest,
    context: &LogContext<'_>,
) -> Result<StructuredResponse, StructuredError> {
    let result = generate_structured(model, request).await;
    if let Err(e) = &result {
        record(pool, context.failure(e.to_string())).await;
    }
    result
}

/// Removes credentials and shortens resume text before a payload is logged.
pub fn sanitize_for_logging(data: &Value) -> Value {
    let mut sanitized = data.clone();
    if let Some(map) = sanitized.as_object_mut() {
        map.remove("password");
        if let Some(Value::String(text)) = map.get_mut("resume_text") {
            *text = format!(
                "{}...",
                text.chars().take(RESUME_TEXT_LOG_CHARS).collect::<String>()
            );
        }
    }
    sanitized
}

/// Persists `entry`. Failures are logged and swallowed.
pub async fn record(pool: &PgPool, entry: LlmLogEntry<'_>) {
    let result = sqlx::query(
        r#"
        INSERT INTO llm_logs
            (id, user_id, endpoint, prompt_type, request_data, response_data,
             processing_time_ms, success, error_message, request_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.user_id)
    .bind(entry.endpoint)
    .bind(entry.prompt_type)
    .bind(sanitize_for_logging(&entry.request_data))
    .bind(&entry.response_data)
    .bind(entry.processing_time_ms as i64)
    .bind(entry.success)
    .bind(&entry.error_message)
    .bind(&entry.request_id)
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!(endpoint = entry.endpoint, "Failed to write LLM log: {e}");
    }
}

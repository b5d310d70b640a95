//! Retry Policy: one stricter re-ask when the model's answer does not parse.
//!
//! At most two outbound calls per structured request. Upstream failures are returned
//! as-is and never retried here.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::llm_client::prompts::{STRICT_JSON_SYSTEM, STRICT_TEMPERATURE};
use crate::llm_client::{Generation, GenerationRequest, GenerativeModel, LlmError};
use crate::normalize::extractor::strip_fences;
use crate::normalize::lenient::parse_lenient;
use crate::normalize::{MalformedResponse, Shape};

/// A prompt whose answer must be JSON of a given shape, plus the stricter fallback.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub primary: GenerationRequest,
    pub strict: GenerationRequest,
    pub shape: Shape,
}

impl StructuredRequest {
    /// Derives the strict variant from the primary prompt: same user prompt, the strict
    /// JSON instruction prepended to the system prompt, lower temperature.
    pub fn new(primary: GenerationRequest, shape: Shape) -> Self {
        let strict = GenerationRequest {
            system: format!(
                "{STRICT_JSON_SYSTEM} The answer must be a single JSON {}.\n\n{}",
                shape.name(),
                primary.system
            ),
            temperature: STRICT_TEMPERATURE,
            ..primary.clone()
        };
        Self {
            primary,
            strict,
            shape,
        }
    }

    /// Uses a caller-supplied strict prompt instead of the derived one.
    pub fn with_strict(mut self, strict: GenerationRequest) -> Self {
        self.strict = strict;
        self
    }
}

/// A parsed answer and the generation that produced it.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    pub value: Value,
    pub generation: Generation,
    /// 1 when the primary answer parsed, 2 when the strict retry was needed.
    pub attempts: u32,
}

#[derive(Debug, Error)]
pub enum StructuredError {
    #[error("upstream failure: {0}")]
    Upstream(#[from] LlmError),

    #[error("{source} (after {attempts} attempts)")]
    Malformed {
        source: MalformedResponse,
        attempts: u32,
    },
}

/// Extracts and parses one raw answer.
pub fn parse_generation(text: &str, shape: Shape) -> Result<Value, MalformedResponse> {
    parse_lenient(&strip_fences(text), shape)
}

/// Runs the primary prompt and, if its answer is malformed, the strict prompt once.
pub async fn generate_structured(
    model: &dyn GenerativeModel,
    request: &StructuredRequest,
) -> Result<StructuredResponse, StructuredError> {
    let generation = model.generate(&request.primary).await?;

    let first_failure = match parse_generation(&generation.text, request.shape) {
        Ok(value) => {
            return Ok(StructuredResponse {
                value,
                generation,
                attempts: 1,
            })
        }
        Err(e) => e,
    };

    warn!(
        reason = %first_failure.reason,
        excerpt = %first_failure.excerpt,
        request_id = %generation.request_id,
        "First parse failed, retrying with strict prompt"
    );

    let retry = model.generate(&request.strict).await?;

    match parse_generation(&retry.text, request.shape) {
        Ok(value) => Ok(StructuredResponse {
            value,
            generation: retry,
            attempts: 2,
        }),
        Err(source) => {
            error!(
                reason = %source.reason,
                excerpt = %source.excerpt,
                request_id = %retry.request_id,
                "Strict retry returned malformed JSON"
            );
            Err(StructuredError::Malformed {
                source,
                attempts: 2,
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use serde_json::json;

    fn object_request() -> StructuredRequest {
        StructuredRequest::new(
            GenerationRequest::new("analyze this", "Return JSON."),
            Shape::Object,
        )
    }

    #[tokio::test]
    async fn test_first_answer_parses_single_call() {
        let model = ScriptedModel::answering(&["```json\n{\"score\": 80}\n```"]);
        let response = generate_structured(&model, &object_request()).await.unwrap();
        assert_eq!(response.value, json!({"score": 80}));
        assert_eq!(response.attempts, 1);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_then_valid_uses_strict_prompt() {
        let model = ScriptedModel::answering(&["I think the score is high.", "{\"score\": 65}"]);
        let response = generate_structured(&model, &object_request()).await.unwrap();
        assert_eq!(response.value, json!({"score": 65}));
        assert_eq!(response.attempts, 2);
        assert_eq!(response.generation.request_id, "req_test_2");

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].system.starts_with(STRICT_JSON_SYSTEM));
        assert!(requests[1].system.ends_with("Return JSON."));
        assert_eq!(requests[1].prompt, requests[0].prompt);
        assert!(requests[1].temperature < requests[0].temperature);
    }

    #[tokio::test]
    async fn test_two_malformed_answers_is_terminal_after_two_calls() {
        let model = ScriptedModel::answering(&["nope", "[1, 2]", "{\"never\": \"asked\"}"]);
        let err = generate_structured(&model, &object_request())
            .await
            .unwrap_err();
        match err {
            StructuredError::Malformed { attempts, source } => {
                assert_eq!(attempts, 2);
                assert_eq!(source.excerpt, "[1, 2]");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_retried() {
        let model = ScriptedModel::new(vec![
            Err(LlmError::RateLimited),
            Ok("{\"unused\": true}".to_string()),
        ]);
        let err = generate_structured(&model, &object_request())
            .await
            .unwrap_err();
        assert!(matches!(err, StructuredError::Upstream(LlmError::RateLimited)));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_on_retry_is_reported() {
        let model = ScriptedModel::new(vec![
            Ok("garbage".to_string()),
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".into(),
            }),
        ]);
        let err = generate_structured(&model, &object_request())
            .await
            .unwrap_err();
        assert!(matches!(err, StructuredError::Upstream(LlmError::Api { status: 503, .. })));
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_custom_strict_prompt_is_used() {
        let model = ScriptedModel::answering(&["bad", "[]"]);
        let request = StructuredRequest::new(GenerationRequest::new("p", "s"), Shape::Array)
            .with_strict(GenerationRequest::new("strict p", "strict s"));
        let response = generate_structured(&model, &request).await.unwrap();
        assert_eq!(response.value, json!([]));
        assert_eq!(model.requests.lock().unwrap()[1].prompt, "strict p");
    }
}

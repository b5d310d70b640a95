//! Insight generation. A single model call with no strict retry: anything that does not
//! parse is split into lines, and an empty result falls back to fixed advice.

use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::insights::prompts::{
    PROFILE_PROMPT_TEMPLATE, PROFILE_SYSTEM, PROGRESS_PROMPT_TEMPLATE, PROGRESS_SYSTEM,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::llm_log::{record, LogContext};
use crate::normalize::extractor::strip_fences;
use crate::normalize::fields::{lookup, KeyPath};
use crate::normalize::retry::parse_generation;
use crate::normalize::Shape;
use crate::state::AppState;

pub const MAX_INSIGHTS: usize = 3;

const INSIGHTS: &[KeyPath] = &[&["insights"], &["Insights"], &["items"]];
const SUGGESTIONS: &[KeyPath] = &[&["suggestions"], &["Suggestions"], &["items"]];

const PROGRESS_DEFAULTS: [&str; 3] = [
    "You have a consistent upward trend. Keep reinforcing weaker skills.",
    "Resume alignment is improving. Add concrete metrics to experience.",
    "Maintain daily practice to extend your streak and retention.",
];

const PROFILE_DEFAULTS: [&str; 3] = [
    "Add STAR-format bullets to projects with metrics.",
    "Target 2 trending frameworks aligned to your goal.",
    "Refine LinkedIn headline to your target role.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    /// Performance metrics in, `insights` out.
    Progress,
    /// Student profile in, `suggestions` out.
    Profile,
}

impl InsightKind {
    fn candidates(self) -> &'static [KeyPath] {
        match self {
            Self::Progress => INSIGHTS,
            Self::Profile => SUGGESTIONS,
        }
    }

    fn defaults(self) -> Vec<String> {
        let defaults = match self {
            Self::Progress => PROGRESS_DEFAULTS,
            Self::Profile => PROFILE_DEFAULTS,
        };
        defaults.iter().map(|s| s.to_string()).collect()
    }

    pub fn list_key(self) -> &'static str {
        match self {
            Self::Progress => "insights",
            Self::Profile => "suggestions",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Self::Progress => "/api/v1/insights/progress",
            Self::Profile => "/api/v1/insights/profile",
        }
    }

    fn prompt_type(self) -> &'static str {
        match self {
            Self::Progress => "progress_insights",
            Self::Profile => "profile_insights",
        }
    }
}

pub fn insight_request(kind: InsightKind, payload: &Value) -> GenerationRequest {
    let payload = payload.to_string();
    match kind {
        InsightKind::Progress => GenerationRequest::new(
            fill_template(PROGRESS_PROMPT_TEMPLATE, &[("metrics", payload.as_str())]),
            PROGRESS_SYSTEM,
        ),
        InsightKind::Profile => GenerationRequest::new(
            fill_template(PROFILE_PROMPT_TEMPLATE, &[("profile", payload.as_str())]),
            PROFILE_SYSTEM,
        ),
    }
    .with_max_output_tokens(1024)
}

/// Reads up to three items out of a raw answer, never returning an empty list.
///
/// The answer may be the expected object or a bare array of strings.
pub fn extract_insights(raw: &str, kind: InsightKind) -> Vec<String> {
    let shape = if strip_fences(raw).starts_with('[') {
        Shape::Array
    } else {
        Shape::Object
    };
    let items = match parse_generation(raw, shape) {
        Ok(value) => list_items(&value, kind),
        Err(_) => split_lines(raw),
    };
    let items: Vec<String> = items.into_iter().take(MAX_INSIGHTS).collect();
    if items.is_empty() {
        kind.defaults()
    } else {
        items
    }
}

/// Items are sentences, so a string-valued list splits on lines only, never on commas.
fn list_items(value: &Value, kind: InsightKind) -> Vec<String> {
    let list = match value {
        Value::Array(_) => Some(value),
        _ => kind
            .candidates()
            .iter()
            .find_map(|path| lookup(value, path)),
    };
    match list {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(text)) => split_lines(text),
        _ => Vec::new(),
    }
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '\u{2022}']).trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct InsightOutcome {
    pub items: Vec<String>,
    pub processing_time_ms: u64,
}

/// Never fails: an upstream error yields the fixed defaults.
pub async fn generate_insights(
    state: &AppState,
    user_id: Uuid,
    kind: InsightKind,
    payload: &Value,
) -> InsightOutcome {
    let context = LogContext {
        user_id,
        endpoint: kind.endpoint(),
        prompt_type: kind.prompt_type(),
        request_data: payload.clone(),
    };

    match state.llm.generate(&insight_request(kind, payload)).await {
        Ok(generation) => {
            let items = extract_insights(&generation.text, kind);
            record(
                &state.db,
                context.success(json!({ kind.list_key(): &items }), &generation),
            )
            .await;
            InsightOutcome {
                items,
                processing_time_ms: generation.processing_time_ms,
            }
        }
        Err(e) => {
            warn!(%user_id, kind = kind.list_key(), "Insight generation failed, using defaults: {e}");
            record(&state.db, context.failure(e.to_string())).await;
            InsightOutcome {
                items: kind.defaults(),
                processing_time_ms: 0,
            }
        }
    }
}

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Company-archive cache. Reconnects on its own after a dropped connection.
    pub redis: ConnectionManager,
    /// The generative model. Default: `LlmClient` (Gemini).
    pub llm: Arc<dyn GenerativeModel>,
    pub config: Config,
}

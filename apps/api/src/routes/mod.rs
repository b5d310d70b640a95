pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::challenges::handlers as challenges;
use crate::generation::handlers as generation;
use crate::improvement::handlers as improvement;
use crate::insights::handlers as insights;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::tracking::handlers as tracking;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resume::handle_create_resume).get(resume::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resume::handle_get_resume).delete(resume::handle_delete_resume),
        )
        // Generation
        .route(
            "/api/v1/generate/questions",
            post(generation::handle_generate_questions),
        )
        .route(
            "/api/v1/generate/company-archive",
            post(generation::handle_company_archive),
        )
        .route(
            "/api/v1/generate/resources",
            post(generation::handle_generate_resources),
        )
        .route(
            "/api/v1/generate/resume-suggestions",
            post(generation::handle_resume_suggestions),
        )
        // Resume improver
        .route(
            "/api/v1/resume-improver/analyze",
            post(improvement::handle_analyze),
        )
        .route(
            "/api/v1/resume-improver/history",
            get(improvement::handle_history),
        )
        .route(
            "/api/v1/resume-improver/report/:id",
            get(improvement::handle_report),
        )
        // Daily challenges
        .route("/api/v1/challenges/today", get(challenges::handle_today))
        .route("/api/v1/challenges/refresh", post(challenges::handle_refresh))
        .route("/api/v1/challenges/submit", post(challenges::handle_submit))
        .route("/api/v1/challenges/history", get(challenges::handle_history))
        // Progress and saved resources
        .route("/api/v1/progress", get(tracking::handle_list_progress))
        .route("/api/v1/progress/mark", post(tracking::handle_mark_progress))
        .route(
            "/api/v1/saved-resources",
            post(tracking::handle_save_resource).get(tracking::handle_list_saved),
        )
        .route(
            "/api/v1/saved-resources/:id",
            delete(tracking::handle_delete_saved),
        )
        // Insights
        .route(
            "/api/v1/insights/progress",
            post(insights::handle_progress_insights),
        )
        .route(
            "/api/v1/insights/profile",
            post(insights::handle_profile_insights),
        )
        .with_state(state)
}

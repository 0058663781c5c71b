pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tailored documents
        .route("/api/v1/resume/base", get(handlers::handle_base_resume))
        .route("/api/v1/resume", post(handlers::handle_resume))
        .route("/api/v1/cover-letter", post(handlers::handle_cover_letter))
        .route("/api/v1/ats-check", post(handlers::handle_ats_check))
        .route("/api/v1/base-score", post(handlers::handle_base_score))
        // Recruiter correspondence
        .route(
            "/api/v1/responses/message",
            post(handlers::handle_message_response),
        )
        .route("/api/v1/responses/apply", post(handlers::handle_apply_email))
        // Profile copy
        .route("/api/v1/profile/interview", post(handlers::handle_interview))
        .route(
            "/api/v1/profile/linkedin/connection",
            post(handlers::handle_linkedin_connection),
        )
        .route(
            "/api/v1/profile/linkedin/about",
            post(handlers::handle_linkedin_about),
        )
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}

//! Axum route handlers for the generation API.
//! Each handler maps its JSON body one-to-one onto a resolver operation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub job_description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct AtsCheckRequest {
    pub job_description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    pub resume: String,
}

#[derive(Debug, Deserialize)]
pub struct BaseScoreRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyEmailRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub resume: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub role: String,
    pub job_description: String,
    pub resume: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionRequest {
    #[serde(default)]
    pub job_description: String,
    pub resume: String,
}

#[derive(Debug, Deserialize)]
pub struct AboutMeRequest {
    pub resume: String,
}

/// Generated markdown for one artifact.
#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

impl From<String> for TextResponse {
    fn from(text: String) -> Self {
        Self { text }
    }
}

#[derive(Debug, Serialize)]
pub struct BaseResumeResponse {
    pub base_resume: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resume/base
pub async fn handle_base_resume(State(state): State<AppState>) -> Json<BaseResumeResponse> {
    Json(BaseResumeResponse {
        base_resume: state.resolvers.resume.base_resume().to_string(),
    })
}

/// POST /api/v1/resume
pub async fn handle_resume(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .resume
        .generate(&req.job_description, &req.company, &req.role, &req.context)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .cover_letter
        .generate(&req.job_description, &req.company, &req.role, &req.context)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/ats-check
pub async fn handle_ats_check(
    State(state): State<AppState>,
    Json(req): Json<AtsCheckRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .ats
        .check(&req.job_description, &req.company, &req.role, &req.resume)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/base-score
pub async fn handle_base_score(
    State(state): State<AppState>,
    Json(req): Json<BaseScoreRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .base_score()?
        .check(&req.job_description)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/responses/message
pub async fn handle_message_response(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state.resolvers.email.respond(&req.message).await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/responses/apply
pub async fn handle_apply_email(
    State(state): State<AppState>,
    Json(req): Json<ApplyEmailRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .email
        .apply_email(&req.role, &req.company, &req.resume, &req.job_description)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/profile/interview
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(req): Json<InterviewRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .profile
        .interview(&req.role, &req.job_description, &req.resume)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/profile/linkedin/connection
pub async fn handle_linkedin_connection(
    State(state): State<AppState>,
    Json(req): Json<ConnectionRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state
        .resolvers
        .profile
        .linkedin_connection(&req.job_description, &req.resume)
        .await?;
    Ok(Json(text.into()))
}

/// POST /api/v1/profile/linkedin/about
pub async fn handle_linkedin_about(
    State(state): State<AppState>,
    Json(req): Json<AboutMeRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let text = state.resolvers.profile.linkedin_about_me(&req.resume).await?;
    Ok(Json(text.into()))
}

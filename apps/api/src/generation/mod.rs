// Template resolvers: one per job-application artifact.
// Each resolver binds a configured template to the shared LlmClient; none of them talk HTTP.

pub mod ats;
pub mod base_score;
pub mod email_response;
pub mod handlers;
pub mod profile;
pub mod resume;
pub mod template;

use tracing::{info, warn};

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

use ats::AtsCheck;
use base_score::BaseScore;
use email_response::EmailResponse;
use profile::Profile;
use resume::ResumeResolver;

pub const RESUME_SECTION: &str = "prompts.resume";
pub const COVER_LETTER_SECTION: &str = "prompts.coverLetter";
pub const ATS_SECTION: &str = "prompts.ats";
pub const BASE_SCORE_SECTION: &str = "prompts.baseScore";
pub const RESPONSES_SECTION: &str = "prompts.responses";
pub const PROFILE_SECTION: &str = "prompts.profile";

/// Every resolver the service exposes, built once at startup.
pub struct Resolvers {
    pub resume: ResumeResolver,
    pub cover_letter: ResumeResolver,
    pub ats: AtsCheck,
    /// Optional: older configurations have no `prompts.baseScore` section.
    pub base_score: Option<BaseScore>,
    pub email: EmailResponse,
    pub profile: Profile,
}

impl Resolvers {
    pub fn from_config(store: &ConfigStore, llm: &LlmClient) -> Result<Self, AppError> {
        let base_score = if store.contains(BASE_SCORE_SECTION) {
            Some(BaseScore::from_config(store, BASE_SCORE_SECTION, llm.clone())?)
        } else {
            warn!("{BASE_SCORE_SECTION} not configured; base resume scoring disabled");
            None
        };

        let resolvers = Self {
            resume: ResumeResolver::from_config(store, RESUME_SECTION, llm.clone())?,
            cover_letter: ResumeResolver::from_config(store, COVER_LETTER_SECTION, llm.clone())?,
            ats: AtsCheck::from_config(store, ATS_SECTION, llm.clone())?,
            base_score,
            email: EmailResponse::from_config(store, RESPONSES_SECTION, llm.clone())?,
            profile: Profile::from_config(store, PROFILE_SECTION, llm.clone())?,
        };
        info!("All template resolvers initialized");
        Ok(resolvers)
    }

    pub fn base_score(&self) -> Result<&BaseScore, AppError> {
        self.base_score
            .as_ref()
            .ok_or_else(|| AppError::ConfigKeyMissing(BASE_SCORE_SECTION.to_string()))
    }
}

/// Rejects blank user input before any template or backend work happens.
pub(crate) fn require_input(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{name} cannot be empty")));
    }
    Ok(())
}

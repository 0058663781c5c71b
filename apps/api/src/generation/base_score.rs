//! Base resume score: how well the untailored base resume fits a job description.

use tracing::info;

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::require_input;
use crate::generation::template::{read_source, Template};
use crate::llm_client::LlmClient;

const BASE_SCORE_FIELDS: &[&str] = &["job_description", "base_resume"];

pub struct BaseScore {
    template: Template,
    model: String,
    base_resume: String,
    llm: LlmClient,
}

impl BaseScore {
    pub fn from_config(store: &ConfigStore, path: &str, llm: LlmClient) -> Result<Self, AppError> {
        let section = store.section(path)?;
        let template = Template::load(section.get_str("prompt")?)?;
        template.require_fields(BASE_SCORE_FIELDS)?;

        Ok(Self {
            template,
            model: section.get_optional_str("model")?.unwrap_or_default().to_string(),
            base_resume: read_source(section.get_str("input.baseResume")?)?,
            llm,
        })
    }

    pub async fn check(&self, job_description: &str) -> Result<String, AppError> {
        require_input("job_description", job_description)?;

        let prompt = self.template.render(&[
            ("job_description", job_description),
            ("base_resume", self.base_resume.as_str()),
        ])?;

        info!("Scoring base resume against job description");
        self.llm.generate(&prompt, &self.model).await
    }
}

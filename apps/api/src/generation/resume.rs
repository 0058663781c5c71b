//! Resume resolver: tailors the candidate's base resume to a job description.
//!
//! The same resolver backs cover letters: only the configuration section differs.
//! When an `analysis` template is configured, generation runs in two stages: the
//! job description is analysed first and the analysis is substituted into the
//! main prompt as `{jd_analysis}`.

use tracing::info;

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::template::{read_source, Template};
use crate::generation::require_input;
use crate::llm_client::LlmClient;

/// Fields every resume/cover-letter template may reference.
const RESUME_FIELDS: &[&str] = &["job_title", "company", "job_description", "base_resume"];
/// Extra field available when the analysis stage is configured.
const ANALYSIS_FIELD: &str = "jd_analysis";
const ANALYSIS_FIELDS: &[&str] = &["job_title", "company", "job_description"];

#[derive(Debug, Clone)]
struct AnalysisStage {
    template: Template,
    model: String,
}

pub struct ResumeResolver {
    kind: String,
    template: Template,
    model: String,
    base_resume: String,
    analysis: Option<AnalysisStage>,
    llm: LlmClient,
}

impl ResumeResolver {
    /// Builds the resolver from the section at `path` (e.g. `prompts.resume`).
    ///
    /// The template and base resume are read once here and cached for the
    /// resolver's lifetime.
    pub fn from_config(store: &ConfigStore, path: &str, llm: LlmClient) -> Result<Self, AppError> {
        let section = store.section(path)?;

        let template = Template::load(section.get_str("prompt")?)?;
        let model = section.get_optional_str("model")?.unwrap_or_default().to_string();
        let base_resume = read_source(section.get_str("input.baseResume")?)?;

        let analysis = match section.get_optional_str("analysis.prompt")? {
            Some(source) => {
                let template = Template::load(source)?;
                template.require_fields(ANALYSIS_FIELDS)?;
                let model = section
                    .get_optional_str("analysis.model")?
                    .map(str::to_string)
                    .unwrap_or_else(|| model.clone());
                Some(AnalysisStage { template, model })
            }
            None => None,
        };

        let mut supplied = RESUME_FIELDS.to_vec();
        if analysis.is_some() {
            supplied.push(ANALYSIS_FIELD);
        }
        template.require_fields(&supplied)?;

        info!(
            "{path} resolver ready (base resume: {} chars, analysis stage: {})",
            base_resume.len(),
            analysis.is_some()
        );

        Ok(Self {
            kind: path.rsplit('.').next().unwrap_or(path).to_string(),
            template,
            model,
            base_resume,
            analysis,
            llm,
        })
    }

    /// Generates a tailored document for `job_title` at `company`.
    /// A non-empty `context` is appended to the rendered prompt.
    pub async fn generate(
        &self,
        job_description: &str,
        company: &str,
        job_title: &str,
        context: &str,
    ) -> Result<String, AppError> {
        require_input("job_description", job_description)?;

        let base_fields = [
            ("job_title", job_title),
            ("company", company),
            ("job_description", job_description),
            ("base_resume", self.base_resume.as_str()),
        ];

        let analysis_text = match &self.analysis {
            Some(stage) => {
                let analysis_prompt = stage.template.render(&base_fields)?;
                info!("Running job description analysis for {}", self.kind);
                Some(self.llm.generate(&analysis_prompt, &stage.model).await?)
            }
            None => None,
        };

        let mut fields = base_fields.to_vec();
        if let Some(analysis) = &analysis_text {
            fields.push((ANALYSIS_FIELD, analysis.as_str()));
        }

        let mut prompt = self.template.render(&fields)?;
        if !context.trim().is_empty() {
            prompt.push(' ');
            prompt.push_str(context);
        }

        info!("Generating {} for {job_title} at {company}", self.kind);
        self.llm.generate(&prompt, &self.model).await
    }

    pub fn base_resume(&self) -> &str {
        &self.base_resume
    }
}

//! ATS check: asks the model for an applicant-tracking-system flaw report on a
//! generated resume against the job description.

use tracing::info;

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::require_input;
use crate::generation::template::Template;
use crate::llm_client::LlmClient;

const ATS_FIELDS: &[&str] = &["title", "company", "job_description", "resume"];

pub struct AtsCheck {
    template: Template,
    model: String,
    llm: LlmClient,
}

impl AtsCheck {
    pub fn from_config(store: &ConfigStore, path: &str, llm: LlmClient) -> Result<Self, AppError> {
        let section = store.section(path)?;
        let template = Template::load(section.get_str("prompt")?)?;
        template.require_fields(ATS_FIELDS)?;

        Ok(Self {
            template,
            model: section.get_optional_str("model")?.unwrap_or_default().to_string(),
            llm,
        })
    }

    pub async fn check(
        &self,
        job_description: &str,
        company: &str,
        title: &str,
        resume: &str,
    ) -> Result<String, AppError> {
        require_input("job_description", job_description)?;
        require_input("resume", resume)?;

        let prompt = self.template.render(&[
            ("title", title),
            ("company", company),
            ("job_description", job_description),
            ("resume", resume),
        ])?;

        info!("Running ATS check for {title} at {company}");
        self.llm.generate(&prompt, &self.model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::scripted_client;
    use serde_json::json;

    #[tokio::test]
    async fn test_check_renders_all_fields() {
        let store = ConfigStore::from_value(json!({
            "prompts": { "ats": {
                "prompt": "{title}@{company}\n{job_description}\n---\n{resume}",
                "model": "ats-model"
            }}
        }));
        let (llm, backend) = scripted_client(["## Flaws"]);
        let ats = AtsCheck::from_config(&store, "prompts.ats", llm).unwrap();

        let report = ats.check("JD", "Acme", "SRE", "# Resume").await.unwrap();

        assert_eq!(report, "## Flaws");
        assert_eq!(
            backend.calls()[0],
            ("SRE@Acme\nJD\n---\n# Resume".to_string(), "ats-model".to_string())
        );
    }

    #[tokio::test]
    async fn test_check_requires_resume() {
        let store = ConfigStore::from_value(json!({
            "prompts": { "ats": { "prompt": "{resume}" } }
        }));
        let (llm, backend) = scripted_client(["unused"]);
        let ats = AtsCheck::from_config(&store, "prompts.ats", llm).unwrap();

        let result = ats.check("JD", "Acme", "SRE", "").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_unknown_field_rejected_at_construction() {
        let store = ConfigStore::from_value(json!({
            "prompts": { "ats": { "prompt": "{job_title}" } }
        }));
        let (llm, _) = scripted_client(Vec::<String>::new());
        assert!(matches!(
            AtsCheck::from_config(&store, "prompts.ats", llm),
            Err(AppError::TemplateFieldMissing { field }) if field == "job_title"
        ));
    }
}

//! Recruiter correspondence: replies to a recruiter's message and drafts the
//! e-mail that accompanies an application.

use tracing::info;

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::require_input;
use crate::generation::template::Template;
use crate::llm_client::LlmClient;

const RESPONSE_FIELDS: &[&str] = &["message"];
const APPLY_FIELDS: &[&str] = &["title", "company", "resume", "job_description"];

pub struct EmailResponse {
    response: Template,
    apply: Option<Template>,
    apply_path: String,
    model: String,
    llm: LlmClient,
}

impl EmailResponse {
    pub fn from_config(store: &ConfigStore, path: &str, llm: LlmClient) -> Result<Self, AppError> {
        let section = store.section(path)?;

        let response = Template::load(section.get_str("prompt")?)?;
        response.require_fields(RESPONSE_FIELDS)?;

        let apply = section
            .get_optional_str("applyEmail")?
            .map(Template::load)
            .transpose()?;
        if let Some(template) = &apply {
            template.require_fields(APPLY_FIELDS)?;
        }

        Ok(Self {
            response,
            apply,
            apply_path: section.path("applyEmail"),
            model: section.get_optional_str("model")?.unwrap_or_default().to_string(),
            llm,
        })
    }

    /// Drafts a reply to a recruiter's message.
    pub async fn respond(&self, message: &str) -> Result<String, AppError> {
        require_input("message", message)?;

        let prompt = self.response.render(&[("message", message)])?;
        info!("Drafting recruiter response ({} chars)", message.len());
        self.llm.generate(&prompt, &self.model).await
    }

    /// Drafts the e-mail sent with an application.
    pub async fn apply_email(
        &self,
        title: &str,
        company: &str,
        resume: &str,
        job_description: &str,
    ) -> Result<String, AppError> {
        let template = self
            .apply
            .as_ref()
            .ok_or_else(|| AppError::ConfigKeyMissing(self.apply_path.clone()))?;
        require_input("job_description", job_description)?;

        let prompt = template.render(&[
            ("title", title),
            ("company", company),
            ("resume", resume),
            ("job_description", job_description),
        ])?;
        info!("Drafting application e-mail for {title} at {company}");
        self.llm.generate(&prompt, &self.model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::scripted_client;
    use serde_json::json;

    fn store(section: serde_json::Value) -> ConfigStore {
        ConfigStore::from_value(json!({ "prompts": { "responses": section } }))
    }

    #[tokio::test]
    async fn test_respond_substitutes_message() {
        let store = store(json!({ "prompt": "Reply politely to: {message}", "model": "m" }));
        let (llm, backend) = scripted_client(["Thanks!"]);
        let email = EmailResponse::from_config(&store, "prompts.responses", llm).unwrap();

        assert_eq!(email.respond("Are you open to roles?").await.unwrap(), "Thanks!");
        assert_eq!(backend.calls()[0].0, "Reply politely to: Are you open to roles?");
    }

    #[tokio::test]
    async fn test_apply_email_renders_fields() {
        let store = store(json!({
            "prompt": "{message}",
            "applyEmail": "Apply to {company} as {title} using {resume} for {job_description}"
        }));
        let (llm, backend) = scripted_client(["Dear hiring team"]);
        let email = EmailResponse::from_config(&store, "prompts.responses", llm).unwrap();

        let text = email.apply_email("SRE", "Acme", "R", "JD").await.unwrap();
        assert_eq!(text, "Dear hiring team");
        assert_eq!(backend.calls()[0].0, "Apply to Acme as SRE using R for JD");
    }

    #[tokio::test]
    async fn test_apply_email_without_template_is_config_key_missing() {
        let store = store(json!({ "prompt": "{message}" }));
        let (llm, backend) = scripted_client(["unused"]);
        let email = EmailResponse::from_config(&store, "prompts.responses", llm).unwrap();

        let result = email.apply_email("SRE", "Acme", "R", "JD").await;
        assert!(matches!(
            result,
            Err(AppError::ConfigKeyMissing(path)) if path == "prompts.responses.applyEmail"
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let store = store(json!({ "prompt": "{message}" }));
        let (llm, _) = scripted_client(["unused"]);
        let email = EmailResponse::from_config(&store, "prompts.responses", llm).unwrap();

        assert!(matches!(
            email.respond("\n").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}

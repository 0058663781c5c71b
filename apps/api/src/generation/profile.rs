//! Profile copy: mock interview prep and LinkedIn text built from the candidate's resume.

use tracing::info;

use crate::config_store::ConfigStore;
use crate::errors::AppError;
use crate::generation::require_input;
use crate::generation::template::Template;
use crate::llm_client::LlmClient;

const INTERVIEW_FIELDS: &[&str] = &["role", "job_description", "resume"];
const CONNECTION_FIELDS: &[&str] = &["job_description", "resume"];
const ABOUT_ME_FIELDS: &[&str] = &["resume"];

pub struct Profile {
    interview: Template,
    connection_request: Template,
    about_me: Template,
    model: String,
    llm: LlmClient,
}

impl Profile {
    pub fn from_config(store: &ConfigStore, path: &str, llm: LlmClient) -> Result<Self, AppError> {
        let section = store.section(path)?;

        let interview = Template::load(section.get_str("interview")?)?;
        interview.require_fields(INTERVIEW_FIELDS)?;
        let connection_request = Template::load(section.get_str("inConnectionRequest")?)?;
        connection_request.require_fields(CONNECTION_FIELDS)?;
        let about_me = Template::load(section.get_str("inAboutMe")?)?;
        about_me.require_fields(ABOUT_ME_FIELDS)?;

        Ok(Self {
            interview,
            connection_request,
            about_me,
            model: section.get_optional_str("model")?.unwrap_or_default().to_string(),
            llm,
        })
    }

    /// Mock interview questions and answers for `role`.
    pub async fn interview(
        &self,
        role: &str,
        job_description: &str,
        resume: &str,
    ) -> Result<String, AppError> {
        require_input("job_description", job_description)?;
        require_input("resume", resume)?;

        let prompt = self.interview.render(&[
            ("role", role),
            ("job_description", job_description),
            ("resume", resume),
        ])?;
        info!("Preparing mock interview for {role}");
        self.llm.generate(&prompt, &self.model).await
    }

    /// A short LinkedIn connection-request note.
    pub async fn linkedin_connection(
        &self,
        job_description: &str,
        resume: &str,
    ) -> Result<String, AppError> {
        require_input("resume", resume)?;

        let prompt = self.connection_request.render(&[
            ("job_description", job_description),
            ("resume", resume),
        ])?;
        self.llm.generate(&prompt, &self.model).await
    }

    /// The LinkedIn "About" section.
    pub async fn linkedin_about_me(&self, resume: &str) -> Result<String, AppError> {
        require_input("resume", resume)?;

        let prompt = self.about_me.render(&[("resume", resume)])?;
        self.llm.generate(&prompt, &self.model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::scripted_client;
    use serde_json::json;

    fn store() -> ConfigStore {
        ConfigStore::from_value(json!({
            "prompts": { "profile": {
                "model": "profile-model",
                "interview": "Interview for {role}: {job_description} / {resume}",
                "inConnectionRequest": "Connect re {job_description} with {resume}",
                "inAboutMe": "About: {resume}"
            }}
        }))
    }

    #[tokio::test]
    async fn test_each_operation_uses_its_template() {
        let (llm, backend) = scripted_client(["q&a", "note", "about"]);
        let profile = Profile::from_config(&store(), "prompts.profile", llm).unwrap();

        assert_eq!(profile.interview("SRE", "JD", "R").await.unwrap(), "q&a");
        assert_eq!(profile.linkedin_connection("JD", "R").await.unwrap(), "note");
        assert_eq!(profile.linkedin_about_me("R").await.unwrap(), "about");

        let prompts: Vec<String> = backend.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            prompts,
            vec![
                "Interview for SRE: JD / R".to_string(),
                "Connect re JD with R".to_string(),
                "About: R".to_string(),
            ]
        );
        assert!(backend.calls().iter().all(|(_, m)| m == "profile-model"));
    }

    #[tokio::test]
    async fn test_about_me_requires_resume() {
        let (llm, backend) = scripted_client(["unused"]);
        let profile = Profile::from_config(&store(), "prompts.profile", llm).unwrap();

        assert!(matches!(
            profile.linkedin_about_me("").await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_missing_template_key() {
        let store = ConfigStore::from_value(json!({
            "prompts": { "profile": { "interview": "{role}", "inAboutMe": "{resume}" } }
        }));
        let (llm, _) = scripted_client(Vec::<String>::new());
        assert!(matches!(
            Profile::from_config(&store, "prompts.profile", llm),
            Err(AppError::ConfigKeyMissing(path)) if path == "prompts.profile.inConnectionRequest"
        ));
    }
}

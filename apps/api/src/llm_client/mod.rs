/// LLM Client: the single point of entry for all text generation in Career Genie.
///
/// Resolvers never talk HTTP themselves. They hold an `LlmClient`, which wraps
/// whichever `GenerationBackend` the configuration selected at startup.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config_store::ConfigStore;
use crate::errors::AppError;

pub mod backends;
#[cfg(test)]
pub mod testing;

pub use backends::{LocalBackend, RemoteBackend};

/// Profile name that selects the local backend.
pub const LOCAL_PROFILE: &str = "local";
const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

/// A text-generation service: one prompt in, one completion out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

/// The generation client shared by every resolver.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn GenerationBackend>,
    default_model: Option<String>,
}

impl LlmClient {
    pub fn new(backend: Arc<dyn GenerationBackend>, default_model: Option<String>) -> Self {
        Self {
            backend,
            default_model,
        }
    }

    /// Selects and builds the backend named by `llm.use`.
    ///
    /// `local` (or no `llm.use` at all) picks the local backend; any other value
    /// names a remote profile under `llm.<profile>` that must carry `url` and `apiKey`.
    pub fn from_config(store: &ConfigStore) -> Result<Self, AppError> {
        store.get("llm")?;

        let profile = store
            .get_optional_str("llm.use")?
            .unwrap_or(LOCAL_PROFILE)
            .to_string();
        let http = build_http_client(read_timeout(store)?)?;

        let client = if profile == LOCAL_PROFILE {
            let url = store
                .get_optional_str("llm.local.url")?
                .unwrap_or(DEFAULT_LOCAL_URL)
                .to_string();
            let model = store.get_optional_str("llm.local.model")?.map(str::to_string);
            Self::new(Arc::new(LocalBackend::new(http, url)), model)
        } else {
            let url = store.get_str(&format!("llm.{profile}.url"))?.to_string();
            let api_key = store.get_str(&format!("llm.{profile}.apiKey"))?.to_string();
            let model = store
                .get_optional_str(&format!("llm.{profile}.model"))?
                .map(str::to_string);
            Self::new(Arc::new(RemoteBackend::new(http, url, api_key)), model)
        };

        info!(
            "LLM client initialized (profile: {profile}, backend: {})",
            client.backend.name()
        );
        Ok(client)
    }

    /// Generates a completion for `prompt`. An empty `model` falls back to the
    /// profile's default model.
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<String, AppError> {
        let model = if model.trim().is_empty() {
            self.default_model
                .as_deref()
                .ok_or_else(|| AppError::ConfigKeyMissing("llm.<profile>.model".to_string()))?
        } else {
            model
        };

        debug!(
            "Generating with {} (model: {model}, prompt: {} chars)",
            self.backend.name(),
            prompt.len()
        );
        let text = self.backend.generate(prompt, model).await?;
        debug!("Generation returned {} chars", text.len());
        Ok(text)
    }
}

fn read_timeout(store: &ConfigStore) -> Result<Duration, AppError> {
    let invalid = || AppError::ConfigType {
        path: "llm.timeoutSeconds".to_string(),
        expected: "a positive integer",
    };
    let secs: u64 = match store.get("llm.timeoutSeconds") {
        Err(_) => DEFAULT_TIMEOUT_SECS,
        Ok(Value::Number(n)) => n.as_u64().ok_or_else(invalid)?,
        // overrides from the .env file always arrive as strings
        Ok(Value::String(s)) => s.trim().parse().map_err(|_| invalid())?,
        Ok(_) => return Err(invalid()),
    };
    // a zero reqwest timeout fails every request
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))
}

//! Concrete generation backends.
//!
//! `LocalBackend` speaks the Ollama-style `/api/generate` protocol.
//! `RemoteBackend` speaks the OpenAI-style chat completions protocol with a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{GenerationBackend, LlmError};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

// ────────────────────────────────────────────────────────────────────────────
// Local
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct LocalRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct LocalResponse {
    response: String,
}

pub struct LocalBackend {
    client: Client,
    url: String,
}

impl LocalBackend {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl GenerationBackend for LocalBackend {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let request = LocalRequest {
            model,
            prompt,
            stream: false,
        };
        let response = self.client.post(&self.url).json(&request).send().await?;
        let body = read_success_body(response).await?;

        let parsed: LocalResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("expected {{response}}: {e}")))?;
        Ok(parsed.response)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Remote
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct RemoteBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RemoteBackend {
    /// `url` may be a provider base URL (`https://api.groq.com/openai/v1`) or the
    /// full chat completions endpoint.
    pub fn new(client: Client, url: String, api_key: String) -> Self {
        Self {
            client,
            endpoint: chat_endpoint(&url),
            api_key,
        }
    }
}

#[async_trait]
impl GenerationBackend for RemoteBackend {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response).await?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::MalformedResponse(format!("expected {{choices[].message.content}}: {e}"))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("choices array is empty".to_string()))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

fn chat_endpoint(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    if trimmed.ends_with(CHAT_COMPLETIONS_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{CHAT_COMPLETIONS_PATH}")
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!("Generation backend returned {status}: {body}");
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{serve, unreachable_url};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn test_chat_endpoint_appends_path_to_base_url() {
        assert_eq!(
            chat_endpoint("https://api.groq.com/openai/v1/"),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("https://openrouter.ai/api/v1/chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_local_backend_posts_prompt_and_reads_response() {
        let router = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "llama3");
                assert_eq!(body["stream"], false);
                Json(json!({ "response": format!("echo: {}", body["prompt"].as_str().unwrap()) }))
            }),
        );
        let base = serve(router).await;
        let backend = LocalBackend::new(Client::new(), format!("{base}/api/generate"));

        let text = backend.generate("hello", "llama3").await.unwrap();
        assert_eq!(text, "echo: hello");
    }

    #[tokio::test]
    async fn test_local_backend_missing_field_is_malformed() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "text": "wrong field" })) }),
        );
        let base = serve(router).await;
        let backend = LocalBackend::new(Client::new(), format!("{base}/api/generate"));

        let result = backend.generate("hello", "llama3").await;
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_remote_backend_sends_bearer_and_chat_payload() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer secret-key");
                assert_eq!(body["messages"][0]["role"], "user");
                assert_eq!(body["messages"][0]["content"], "write a resume");
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "# Resume" } }]
                }))
            }),
        );
        let base = serve(router).await;
        let backend = RemoteBackend::new(
            Client::new(),
            format!("{base}/v1"),
            "secret-key".to_string(),
        );

        let text = backend.generate("write a resume", "gpt").await.unwrap();
        assert_eq!(text, "# Resume");
    }

    #[tokio::test]
    async fn test_remote_backend_empty_choices_is_malformed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = serve(router).await;
        let backend = RemoteBackend::new(Client::new(), base, "k".to_string());

        let result = backend.generate("p", "m").await;
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let base = serve(router).await;
        let backend = RemoteBackend::new(Client::new(), base, "k".to_string());

        match backend.generate("p", "m").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let url = unreachable_url().await;
        let backend = LocalBackend::new(Client::new(), url);

        let result = backend.generate("p", "m").await;
        assert!(matches!(result, Err(LlmError::Http(_))));
    }
}

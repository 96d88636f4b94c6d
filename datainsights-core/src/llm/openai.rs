//! OpenAI chat-completions client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::LlmClient;
use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Blocking client for an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The HTTP call is async; the client drives it on its own current-thread
/// runtime so callers stay synchronous.
pub struct OpenAiClient {
    model: String,
    url: String,
    max_tokens: u32,
    sender_role: String,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            Error::Config("llm.api_key (or OPENAI_API_KEY) is required".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| Error::Config(format!("invalid api_key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Llm(format!("failed to build tokio runtime: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            url: format!("{}/v1/chat/completions", config.endpoint.trim_end_matches('/')),
            max_tokens: config.max_tokens,
            sender_role: config.sender_role.clone(),
            runtime,
            http,
        })
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: &self.sender_role,
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let body = self.runtime.block_on(async {
            let resp = self
                .http
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::Llm(format!("openai request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Llm(format!("openai read body failed: {e}")))?;
            if !status.is_success() {
                return Err(Error::Llm(format!(
                    "openai returned {}: {}",
                    status.as_u16(),
                    body
                )));
            }
            Ok(body)
        })?;

        let content = extract_content(&body)?;
        tracing::info!(model = %self.model, reply_chars = content.len(), "Received completion");
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response body.
fn extract_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Llm("openai response missing choices[0].message.content".to_string()))
}

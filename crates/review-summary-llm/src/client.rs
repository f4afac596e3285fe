//! Chat-completions client implementing the generation backend

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use review_summary_core::{Result, SummaryError, SummaryGenerator};

use crate::config::OpenAiConfig;
use crate::prompt::render_prompt;

const SYSTEM_PROMPT: &str =
    "You summarize product reviews for shoppers. Output only the summary text.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Generation backend backed by an OpenAI-compatible chat-completions API
///
/// One HTTP request per `generate` call, no retries.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    /// Create a generator, building an HTTP client with the configured timeout
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SummaryError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Shorthand for `OpenAiGenerator::new(OpenAiConfig::from_env()?)`
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SummaryError {
        if err.is_timeout() {
            SummaryError::GenerationTimeout(self.config.request_timeout)
        } else {
            SummaryError::Generation(err.to_string())
        }
    }
}

/// Pull the first choice's text out of a chat-completions response
fn extract_summary(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| SummaryError::Generation("response contained no choices".to_string()))
}

#[async_trait]
impl SummaryGenerator for OpenAiGenerator {
    async fn generate(&self, text: &str) -> Result<String> {
        let prompt = render_prompt(&self.config.template, text);
        let request = self.build_request(&prompt);

        debug!(
            target: "review_summary",
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "requesting summary"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "review_summary", %status, "generation backend rejected request");
            return Err(SummaryError::Generation(format!("upstream returned {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        extract_summary(parsed)
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::prompts::{bilingual_prompt, default_system_prompt, two_stage_prompt};
use super::{LlmOutput, TwoStageRequest, TwoStageSummarizer};
use crate::item::Lang;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Summarizer backed by an OpenAI-compatible chat-completions API
pub struct RemoteSummarizer {
    default_timeout: Duration,
    default_max_tokens: usize,
    default_temperature: f32,
    client: reqwest::Client,
}

impl Default for RemoteSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSummarizer {
    pub fn new() -> Self {
        Self {
            default_timeout: Duration::from_secs(60),
            default_max_tokens: 800,
            default_temperature: 0.3,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_defaults(mut self, timeout_secs: u64, max_tokens: usize, temperature: f32) -> Self {
        self.default_timeout = Duration::from_secs(timeout_secs);
        self.default_max_tokens = max_tokens;
        self.default_temperature = temperature;
        self
    }

    /// Send one chat completion and parse the JSON object in the reply.
    async fn complete(
        &self,
        request: &TwoStageRequest<'_>,
        prompt_lang: Lang,
        user_prompt: String,
    ) -> Result<LlmOutput> {
        let endpoint = chat_completions_url(request.base_url)?;
        let model = if request.model.is_empty() {
            DEFAULT_MODEL
        } else {
            request.model
        };
        let system_prompt = if request.system_prompt.is_empty() {
            default_system_prompt(prompt_lang)
        } else {
            request.system_prompt
        };

        let req_body = OpenAiRequest {
            model: model.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            max_tokens: Some(self.default_max_tokens),
            temperature: Some(self.default_temperature),
        };

        debug!(endpoint = %endpoint, model, "sending summarization request");

        let response = tokio::time::timeout(
            self.default_timeout,
            self.client
                .post(endpoint)
                .bearer_auth(request.api_key)
                .json(&req_body)
                .send(),
        )
        .await
        .context("LLM request timed out")?
        .context("LLM HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error {}: {}", status, body);
        }

        let resp_body: OpenAiResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        let choice = resp_body
            .choices
            .first()
            .context("LLM response has no choices")?;

        let cleaned_json = super::extract_json_from_text(&choice.message.content)
            .context("No valid JSON found in LLM summary response")?;

        serde_json::from_str::<LlmOutput>(&cleaned_json).with_context(|| {
            format!("Failed to parse LLM summary as JSON. Input was: {}", cleaned_json)
        })
    }
}

#[async_trait::async_trait]
impl TwoStageSummarizer for RemoteSummarizer {
    async fn two_stage(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        let prompt = two_stage_prompt(request.item, request.lang, request.scope);
        let mut out = self.complete(&request, request.lang, prompt).await?;

        let scoped = out.two_stage().scoped(request.scope);
        out.tldr = scoped.tldr;
        out.full_md = scoped.full_md;
        Ok(out)
    }

    async fn bilingual(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        let prompt = bilingual_prompt(request.item);
        self.complete(&request, request.lang, prompt).await
    }
}

/// Resolve the chat-completions endpoint from a configured base URL.
///
/// Empty means the OpenAI default; a URL already ending in
/// `/chat/completions` is used verbatim.
pub fn chat_completions_url(base_url: &str) -> Result<Url> {
    let base = base_url.trim();
    let base = if base.is_empty() { DEFAULT_BASE_URL } else { base };
    let base = base.trim_end_matches('/');

    let full = if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    };

    Url::parse(&full).with_context(|| format!("Invalid LLM base_url: {}", base_url))
}

// OpenAI API request/response structures
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

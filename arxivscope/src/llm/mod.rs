use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::item::{Digest, Item, Lang, Scope, TwoStage};

/// External summarization backend (remote API or a test double).
///
/// Credentials and prompts travel with each request, so one instance can
/// serve differently configured callers.
#[async_trait::async_trait]
pub trait TwoStageSummarizer: Send + Sync {
    /// TL;DR and method card for one paper
    async fn two_stage(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput>;

    /// English + Chinese digests for one paper
    async fn bilingual(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput>;
}

/// Everything the backend needs for one call
#[derive(Debug, Clone)]
pub struct TwoStageRequest<'a> {
    pub item: &'a Item,
    pub lang: Lang,
    pub scope: Scope,
    pub base_url: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
    pub system_prompt: &'a str,
}

/// Fields a backend may return; anything it leaves out is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmOutput {
    pub tldr: String,
    pub full_md: String,
    pub digest_en: String,
    pub digest_zh: String,
}

impl LlmOutput {
    pub fn two_stage(&self) -> TwoStage {
        TwoStage {
            tldr: self.tldr.clone(),
            full_md: self.full_md.clone(),
        }
    }

    pub fn digest(&self) -> Digest {
        Digest {
            digest_en: self.digest_en.clone(),
            digest_zh: self.digest_zh.clone(),
        }
    }
}

pub mod prompts;
pub mod remote;

/// Helper to extract JSON from text that might contain markdown backticks or preamble
pub fn extract_json_from_text(text: &str) -> Option<String> {
    // 1. Try to find content between ```json and ```
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim().to_string());
        }
    }

    // 2. Try to find content between ``` and ```
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim().to_string());
        }
    }

    // 3. Try to find the first '{' and last '}'
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(text[start..=end].to_string()),
        _ => None,
    }
}

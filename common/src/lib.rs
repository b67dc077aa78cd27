/*!
common/src/lib.rs

Shared configuration types for arxivscope.

This file provides:
- Config data structures (deserialized from TOML)
- Async loaders for a single TOML file or a default + override pair
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable consulted for the API key when `llm.api_key_env` is unset.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// LLM backend settings (`[llm]` section).
///
/// Every field is optional. The key itself should normally come from the
/// environment; `api_key` exists for local testing only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Name of the environment variable holding the key (default `OPENAI_API_KEY`)
    pub api_key_env: Option<String>,
    /// OpenAI-compatible endpoint, e.g. "https://api.openai.com/v1"
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt_en: Option<String>,
    pub system_prompt_zh: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
}

impl LlmConfig {
    /// Name of the environment variable the API key is read from.
    pub fn api_key_env_name(&self) -> &str {
        match self.api_key_env.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_API_KEY_ENV,
        }
    }

    /// System prompt for the given language code; empty when not configured.
    pub fn system_prompt_for(&self, lang: &str) -> &str {
        let prompt = if lang == "zh" {
            &self.system_prompt_zh
        } else {
            &self.system_prompt_en
        };
        prompt.as_deref().unwrap_or("")
    }
}

/// Digest generation defaults (`[summary]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// "llm" or "heuristic"
    pub mode: Option<String>,
    /// "zh" or "en"
    pub lang: Option<String>,
    /// "tldr", "full" or "both"
    pub scope: Option<String>,
}

impl SummaryConfig {
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("heuristic")
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or("zh")
    }

    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("both")
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub llm: Option<LlmConfig>,
    pub summary: Option<SummaryConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// `[llm]` section, or all defaults.
    pub fn llm_or_default(&self) -> LlmConfig {
        self.llm.clone().unwrap_or_default()
    }

    /// `[summary]` section, or all defaults.
    pub fn summary_or_default(&self) -> SummaryConfig {
        self.summary.clone().unwrap_or_default()
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn config_from_string() {
        let toml = r#"
            [llm]
            api_key_env = "DEEPSEEK_API_KEY"
            base_url = "https://api.deepseek.com/v1"
            model = "deepseek-chat"
            system_prompt_zh = "你是论文速读助手"

            [summary]
            mode = "llm"
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        let llm = cfg.llm_or_default();
        assert_eq!(llm.api_key_env_name(), "DEEPSEEK_API_KEY");
        assert_eq!(llm.system_prompt_for("zh"), "你是论文速读助手");
        assert_eq!(llm.system_prompt_for("en"), "");

        let summary = cfg.summary_or_default();
        assert_eq!(summary.mode(), "llm");
        assert_eq!(summary.lang(), "zh");
        assert_eq!(summary.scope(), "both");
    }

    #[test]
    fn empty_api_key_env_uses_default_name() {
        let llm = LlmConfig {
            api_key_env: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(llm.api_key_env_name(), DEFAULT_API_KEY_ENV);
        assert_eq!(LlmConfig::default().api_key_env_name(), "OPENAI_API_KEY");
    }

    #[tokio::test]
    async fn override_file_wins_per_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");

        fs::write(
            &default_path,
            "[llm]\nmodel = \"gpt-4o-mini\"\nbase_url = \"https://api.openai.com/v1\"\n\n[summary]\nmode = \"heuristic\"\n",
        )
        .expect("write default");
        fs::write(&override_path, "[llm]\nmodel = \"qwen-plus\"\n").expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load config");
        let llm = cfg.llm_or_default();
        assert_eq!(llm.model.as_deref(), Some("qwen-plus"));
        assert_eq!(llm.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(cfg.summary_or_default().mode(), "heuristic");
    }

    #[tokio::test]
    async fn missing_files_yield_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");

        let cfg = Config::load_with_defaults(Some(&missing), None)
            .await
            .expect("load config");
        assert!(cfg.llm.is_none());
        assert!(cfg.summary.is_none());
    }

    #[tokio::test]
    async fn from_file_reports_path_on_error() {
        let err = Config::from_file("/definitely/not/here.toml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}

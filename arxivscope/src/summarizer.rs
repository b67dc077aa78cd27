// Summary orchestration: LLM path with heuristic fallback
use common::LlmConfig;
use tracing::{debug, info, warn};

use crate::error::SummarizeError;
use crate::heuristic::heuristic_digest;
use crate::item::{Item, Lang, Mode, Scope, SummaryRecord};
use crate::llm::{LlmOutput, TwoStageRequest, TwoStageSummarizer};

/// API key from `llm.api_key`, else from the configured environment variable
/// as returned by `lookup`. Empty values count as missing.
pub fn resolve_api_key_with<F>(cfg: &LlmConfig, lookup: F) -> Option<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    match cfg.api_key.as_deref() {
        Some(key) if !key.is_empty() => Some(key.to_string()),
        _ => lookup(cfg.api_key_env_name()).filter(|key| !key.is_empty()),
    }
}

/// [`resolve_api_key_with`] against the process environment.
pub fn resolve_api_key(cfg: &LlmConfig) -> Option<String> {
    resolve_api_key_with(cfg, |name| std::env::var(name).ok())
}

/// Like [`resolve_api_key_with`] but a missing key is an error naming the
/// environment variable to set.
pub fn require_api_key_with<F>(cfg: &LlmConfig, lookup: F) -> Result<String, SummarizeError>
where
    F: FnOnce(&str) -> Option<String>,
{
    resolve_api_key_with(cfg, lookup).ok_or_else(|| SummarizeError::MissingApiKey {
        env: cfg.api_key_env_name().to_string(),
    })
}

fn request<'a>(
    item: &'a Item,
    lang: Lang,
    scope: Scope,
    cfg: &'a LlmConfig,
    api_key: &'a str,
) -> TwoStageRequest<'a> {
    TwoStageRequest {
        item,
        lang,
        scope,
        base_url: cfg.base_url.as_deref().unwrap_or(""),
        model: cfg.model.as_deref().unwrap_or(""),
        api_key,
        system_prompt: cfg.system_prompt_for(lang.as_str()),
    }
}

/// TL;DR and method card from the LLM backend.
///
/// Fails with [`SummarizeError::MissingApiKey`] when no key resolves; backend
/// errors come back as [`SummarizeError::External`]. The backend's output is
/// returned as is.
pub async fn llm_two_stage<S>(
    summarizer: &S,
    item: &Item,
    lang: Lang,
    scope: Scope,
    cfg: &LlmConfig,
) -> Result<LlmOutput, SummarizeError>
where
    S: TwoStageSummarizer + ?Sized,
{
    let api_key = require_api_key_with(cfg, |name| std::env::var(name).ok())?;
    summarizer
        .two_stage(request(item, lang, scope, cfg, &api_key))
        .await
        .map_err(SummarizeError::External)
}

/// Digest record for one paper, never failing.
///
/// With `Mode::Llm` and a resolvable key the backend's bilingual digest is
/// used; a missing key or any backend error falls back to the heuristic
/// digest. `tldr` and `full_md` are always empty so templates skip the card.
/// `lang` and `scope` are accepted for call-site compatibility; the digest
/// is always requested in Chinese with both parts.
pub async fn build_two_stage_summary<S>(
    summarizer: &S,
    item: &Item,
    mode: Mode,
    lang: Lang,
    scope: Scope,
    llm_cfg: Option<&LlmConfig>,
) -> SummaryRecord
where
    S: TwoStageSummarizer + ?Sized,
{
    build_two_stage_summary_with(summarizer, item, mode, lang, scope, llm_cfg, |name| {
        std::env::var(name).ok()
    })
    .await
}

/// [`build_two_stage_summary`] with an explicit environment lookup.
pub async fn build_two_stage_summary_with<S, F>(
    summarizer: &S,
    item: &Item,
    mode: Mode,
    lang: Lang,
    scope: Scope,
    llm_cfg: Option<&LlmConfig>,
    env_lookup: F,
) -> SummaryRecord
where
    S: TwoStageSummarizer + ?Sized,
    F: FnOnce(&str) -> Option<String>,
{
    debug!(?mode, %lang, %scope, title = item.title(), "building digest");

    if mode == Mode::Llm {
        let default_cfg = LlmConfig::default();
        let cfg = llm_cfg.unwrap_or(&default_cfg);

        match resolve_api_key_with(cfg, env_lookup) {
            Some(api_key) => {
                let req = request(item, Lang::Zh, Scope::Both, cfg, &api_key);
                match summarizer.bilingual(req).await {
                    Ok(out) => return SummaryRecord::from(out.digest()),
                    Err(e) => warn!(
                        "LLM digest failed: {:#}, falling back to heuristic digest",
                        e
                    ),
                }
            }
            None => info!(
                env = cfg.api_key_env_name(),
                "no LLM API key configured, using heuristic digest"
            ),
        }
    }

    SummaryRecord::from(heuristic_digest(item))
}

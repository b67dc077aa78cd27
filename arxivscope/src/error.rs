use thiserror::Error;

/// Failures of the standalone LLM entry point
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No API key in the config and none in the environment
    #[error("no LLM API key found: set the environment variable {env}, or llm.api_key in config.toml (local testing only)")]
    MissingApiKey { env: String },

    /// The external summarizer failed; the original error is kept as the source
    #[error("LLM summarization failed: {0:#}")]
    External(#[source] anyhow::Error),
}

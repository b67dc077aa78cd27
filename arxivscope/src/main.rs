/*
arxivscope - CLI entry point
Reads paper metadata as JSON and prints digest records or method cards as JSON.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::Config;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use arxivscope::llm::remote::RemoteSummarizer;
use arxivscope::{
    build_two_stage_summary, heuristic_two_stage, llm_two_stage, Item, Lang, Mode, Scope, TwoStage,
};

#[derive(Parser, Debug)]
#[command(name = "arxivscope", about = "Digest and method-card summaries for arXiv papers")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Short digest per paper (LLM with heuristic fallback)
    Digest {
        /// JSON array of items, or "-" for stdin
        #[arg(long, value_name = "FILE")]
        input: String,

        /// "llm" or "heuristic" (default from config)
        #[arg(long)]
        mode: Option<String>,
    },
    /// TL;DR and method card per paper
    Card {
        /// JSON array of items, or "-" for stdin
        #[arg(long, value_name = "FILE")]
        input: String,

        #[arg(long)]
        mode: Option<String>,

        /// "zh" or "en"
        #[arg(long)]
        lang: Option<String>,

        /// "tldr", "full" or "both"
        #[arg(long)]
        scope: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only JSON
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = load_config(args.config.as_deref()).await?;
    let llm_cfg = config.llm_or_default();
    let defaults = config.summary_or_default();

    let summarizer = RemoteSummarizer::new().with_defaults(
        llm_cfg.timeout_seconds.unwrap_or(60),
        llm_cfg.max_tokens.unwrap_or(800),
        0.3,
    );

    match args.command {
        Command::Digest { input, mode } => {
            let items = read_items(&input).await?;
            let mode: Mode = mode.as_deref().unwrap_or(defaults.mode()).parse()?;
            let lang: Lang = defaults.lang().parse()?;
            let scope: Scope = defaults.scope().parse()?;
            info!(count = items.len(), ?mode, "building digests");

            let mut records = Vec::with_capacity(items.len());
            for item in &items {
                records.push(
                    build_two_stage_summary(&summarizer, item, mode, lang, scope, Some(&llm_cfg))
                        .await,
                );
            }
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Card {
            input,
            mode,
            lang,
            scope,
        } => {
            let items = read_items(&input).await?;
            let mode: Mode = mode.as_deref().unwrap_or(defaults.mode()).parse()?;
            let lang: Lang = lang.as_deref().unwrap_or(defaults.lang()).parse()?;
            let scope: Scope = scope.as_deref().unwrap_or(defaults.scope()).parse()?;
            info!(count = items.len(), ?mode, %lang, %scope, "building method cards");

            let mut cards: Vec<TwoStage> = Vec::with_capacity(items.len());
            for item in &items {
                let card = match mode {
                    Mode::Llm => llm_two_stage(&summarizer, item, lang, scope, &llm_cfg)
                        .await
                        .with_context(|| format!("method card failed for '{}'", item.title()))?
                        .two_stage(),
                    Mode::Heuristic => heuristic_two_stage(item, lang, scope),
                };
                cards.push(card);
            }
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
    }

    Ok(())
}

/// `config.default.toml` merged with `--config FILE` or `./config.toml`.
async fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let default_path = PathBuf::from("config.default.toml");

    let override_path = match explicit {
        Some(p) => {
            if !p.exists() {
                error!(path = ?p, "specified config file not found");
                anyhow::bail!("Config file not found: {}", p.display());
            }
            Some(p.to_path_buf())
        }
        None => {
            let p = PathBuf::from("config.toml");
            p.exists().then_some(p)
        }
    };

    let config = Config::load_with_defaults(
        default_path.exists().then_some(default_path.as_path()),
        override_path.as_deref(),
    )
    .await?;
    info!(default = ?default_path, override = ?override_path, "configuration loaded");
    Ok(config)
}

async fn read_items(input: &str) -> Result<Vec<Item>> {
    let data = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read items from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read items file: {}", input))?
    };

    serde_json::from_str(&data).context("Items must be a JSON array of paper objects")
}

use anyhow::Result;
use std::sync::Mutex;

use arxivscope::heuristic::heuristic_digest;
use arxivscope::llm::{LlmOutput, TwoStageRequest, TwoStageSummarizer};
use arxivscope::summarizer::build_two_stage_summary_with;
use arxivscope::{
    build_two_stage_summary, llm_two_stage, Item, Lang, Mode, Scope, SummarizeError, SummaryRecord,
};
use common::LlmConfig;

/// Environment variable no test machine sets
const UNSET_ENV: &str = "ARXIVSCOPE_TEST_SURELY_UNSET_API_KEY";

#[derive(Debug, Clone, PartialEq)]
struct SeenRequest {
    lang: Lang,
    scope: Scope,
    base_url: String,
    model: String,
    api_key: String,
    system_prompt: String,
}

/// Records requests and replies with a canned output
#[derive(Default)]
struct FakeSummarizer {
    reply: LlmOutput,
    seen: Mutex<Vec<(&'static str, SeenRequest)>>,
}

impl FakeSummarizer {
    fn replying(reply: LlmOutput) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &'static str, req: &TwoStageRequest<'_>) {
        self.seen.lock().unwrap().push((
            call,
            SeenRequest {
                lang: req.lang,
                scope: req.scope,
                base_url: req.base_url.to_string(),
                model: req.model.to_string(),
                api_key: req.api_key.to_string(),
                system_prompt: req.system_prompt.to_string(),
            },
        ));
    }

    fn calls(&self) -> Vec<(&'static str, SeenRequest)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TwoStageSummarizer for FakeSummarizer {
    async fn two_stage(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        self.record("two_stage", &request);
        Ok(self.reply.clone())
    }

    async fn bilingual(&self, request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        self.record("bilingual", &request);
        Ok(self.reply.clone())
    }
}

/// Backend that is always down
struct FailingSummarizer;

#[async_trait::async_trait]
impl TwoStageSummarizer for FailingSummarizer {
    async fn two_stage(&self, _request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        anyhow::bail!("connection refused")
    }

    async fn bilingual(&self, _request: TwoStageRequest<'_>) -> Result<LlmOutput> {
        anyhow::bail!("connection refused")
    }
}

fn paper() -> Item {
    serde_json::from_str(
        r#"{
            "title": "Segment Anything in 3D",
            "summary": "We lift SAM to 3D scenes.  Experiments on ScanNet show gains.",
            "comments": "Project page available",
            "venue_inferred": null,
            "journal_ref": "ECCV 2024",
            "code_urls": ["https://github.com/example/sam3d"],
            "project_urls": null
        }"#,
    )
    .expect("parse item")
}

fn llm_cfg() -> LlmConfig {
    LlmConfig {
        api_key: Some("sk-test".into()),
        base_url: Some("https://llm.example.com/v1".into()),
        model: Some("qwen-plus".into()),
        system_prompt_en: Some("en prompt".into()),
        system_prompt_zh: Some("zh prompt".into()),
        ..Default::default()
    }
}

fn heuristic_record(item: &Item) -> SummaryRecord {
    SummaryRecord::from(heuristic_digest(item))
}

#[tokio::test]
async fn heuristic_mode_never_calls_backend() {
    let fake = FakeSummarizer::default();
    let item = paper();

    let record =
        build_two_stage_summary(&fake, &item, Mode::Heuristic, Lang::Zh, Scope::Both, Some(&llm_cfg()))
            .await;

    assert_eq!(record.digest_en, "We lift SAM to 3D scenes.");
    assert_eq!(record.digest_zh, "");
    assert_eq!(record.tldr, "");
    assert_eq!(record.full_md, "");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn llm_mode_uses_bilingual_digest_in_chinese() {
    let fake = FakeSummarizer::replying(LlmOutput {
        digest_en: "Lifts SAM to 3D.".into(),
        digest_zh: "将 SAM 提升到三维。".into(),
        tldr: "ignored".into(),
        full_md: "ignored".into(),
    });
    let item = paper();

    let record =
        build_two_stage_summary(&fake, &item, Mode::Llm, Lang::En, Scope::Tldr, Some(&llm_cfg()))
            .await;

    assert_eq!(
        record,
        SummaryRecord {
            digest_en: "Lifts SAM to 3D.".into(),
            digest_zh: "将 SAM 提升到三维。".into(),
            tldr: String::new(),
            full_md: String::new(),
        }
    );

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    let (call, seen) = &calls[0];
    assert_eq!(*call, "bilingual");
    assert_eq!(seen.lang, Lang::Zh);
    assert_eq!(seen.scope, Scope::Both);
    assert_eq!(seen.base_url, "https://llm.example.com/v1");
    assert_eq!(seen.model, "qwen-plus");
    assert_eq!(seen.api_key, "sk-test");
    assert_eq!(seen.system_prompt, "zh prompt");
}

#[tokio::test]
async fn llm_mode_without_key_matches_heuristic_mode() {
    let fake = FakeSummarizer::default();
    let item = paper();

    let llm = build_two_stage_summary_with(
        &fake,
        &item,
        Mode::Llm,
        Lang::Zh,
        Scope::Both,
        None,
        |_| None,
    )
    .await;
    let heuristic =
        build_two_stage_summary(&fake, &item, Mode::Heuristic, Lang::Zh, Scope::Both, None).await;

    assert_eq!(llm, heuristic);
    assert_eq!(llm, heuristic_record(&item));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn llm_mode_reads_key_from_configured_environment_variable() {
    let fake = FakeSummarizer::replying(LlmOutput {
        digest_en: "from llm".into(),
        ..Default::default()
    });
    let cfg = LlmConfig {
        api_key_env: Some("ZHIPU_API_KEY".into()),
        ..Default::default()
    };

    let record = build_two_stage_summary_with(
        &fake,
        &paper(),
        Mode::Llm,
        Lang::Zh,
        Scope::Both,
        Some(&cfg),
        |name| (name == "ZHIPU_API_KEY").then(|| "sk-zhipu".to_string()),
    )
    .await;

    assert_eq!(record.digest_en, "from llm");
    assert_eq!(fake.calls()[0].1.api_key, "sk-zhipu");
}

#[tokio::test]
async fn llm_mode_falls_back_when_backend_fails() {
    let item = paper();

    let record =
        build_two_stage_summary(&FailingSummarizer, &item, Mode::Llm, Lang::Zh, Scope::Both, Some(&llm_cfg()))
            .await;

    assert_eq!(record, heuristic_record(&item));
}

#[tokio::test]
async fn record_shape_is_stable_for_empty_item() {
    let item = Item::default();
    for mode in [Mode::Llm, Mode::Heuristic] {
        let record =
            build_two_stage_summary(&FailingSummarizer, &item, mode, Lang::En, Scope::Full, Some(&llm_cfg()))
                .await;
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for key in ["digest_en", "digest_zh", "tldr", "full_md"] {
            assert_eq!(obj[key], "");
        }
    }
}

#[tokio::test]
async fn standalone_llm_call_requires_a_key() {
    let fake = FakeSummarizer::default();
    let cfg = LlmConfig {
        api_key_env: Some(UNSET_ENV.into()),
        ..Default::default()
    };

    let err = llm_two_stage(&fake, &paper(), Lang::En, Scope::Both, &cfg)
        .await
        .unwrap_err();

    assert!(matches!(err, SummarizeError::MissingApiKey { ref env } if env == UNSET_ENV));
    assert!(err.to_string().contains(UNSET_ENV));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn standalone_llm_call_selects_prompt_and_passes_output_through() {
    let reply = LlmOutput {
        tldr: "Lifts SAM to 3D.".into(),
        full_md: "- **Core Idea**: lift".into(),
        ..Default::default()
    };
    let fake = FakeSummarizer::replying(reply.clone());
    let item = paper();

    let out = llm_two_stage(&fake, &item, Lang::En, Scope::Full, &llm_cfg())
        .await
        .expect("llm two-stage");
    assert_eq!(out, reply);

    let out = llm_two_stage(&fake, &item, Lang::Zh, Scope::Tldr, &llm_cfg())
        .await
        .expect("llm two-stage");
    assert_eq!(out, reply);

    let calls = fake.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "two_stage");
    assert_eq!(calls[0].1.system_prompt, "en prompt");
    assert_eq!(calls[0].1.lang, Lang::En);
    assert_eq!(calls[0].1.scope, Scope::Full);
    assert_eq!(calls[1].1.system_prompt, "zh prompt");
    assert_eq!(calls[1].1.scope, Scope::Tldr);
}

#[tokio::test]
async fn standalone_llm_call_propagates_backend_errors() {
    let err = llm_two_stage(&FailingSummarizer, &paper(), Lang::En, Scope::Both, &llm_cfg())
        .await
        .unwrap_err();

    match err {
        SummarizeError::External(inner) => {
            assert_eq!(inner.to_string(), "connection refused");
        }
        other => panic!("expected external failure, got {other:?}"),
    }
}

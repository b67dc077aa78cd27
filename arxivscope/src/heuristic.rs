// Heuristic summarizer: local string rules only, no external service
use crate::item::{Digest, Item, Lang, Scope, TwoStage};
use crate::text::{first_sentence, DEFAULT_MAX_CHARS};
use crate::vocab::{detect, detect_tasks, KNOWN_DATASETS};

/// Character budget for the "Core Idea" bullet.
pub const CORE_IDEA_MAX_CHARS: usize = 360;

/// Reviewer-style questions appended to every heuristic method card.
pub const DISCUSSION_QUESTIONS: [&str; 5] = [
    "1. 相比强基线，优势是否稳定显著？",
    "2. 代价/延迟与内存开销如何，复现细节是否充分？",
    "3. 失败模式与局限？可能改进方向？",
    "4. 数据与指标是否充分支撑结论，是否存在偏置/重叠？",
    "5. 是否可迁移到真实应用或边缘设备？",
];

const METHOD_CARD_HEADING: &str = "**Method Card (方法卡)**";
const DISCUSSION_HEADING: &str = "**Discussion (讨论问题)**";

/// First sentence of the abstract, or the title when the abstract is empty.
fn lead_sentence(item: &Item, max_chars: usize) -> String {
    let sentence = first_sentence(item.summary(), max_chars);
    if sentence.is_empty() {
        item.title().to_string()
    } else {
        sentence
    }
}

/// English digest from the abstract's first sentence. No translation is
/// attempted, so `digest_zh` is always empty.
pub fn heuristic_digest(item: &Item) -> Digest {
    Digest {
        digest_en: lead_sentence(item, DEFAULT_MAX_CHARS),
        digest_zh: String::new(),
    }
}

/// Bullet lines of the method card: task, core idea, data, venue.
/// Only "Core Idea" is always present.
fn method_card_lines(item: &Item) -> Vec<String> {
    let summary = item.summary();
    let comments = item.comments();

    let tasks = detect_tasks(summary, item.title(), comments);
    let datasets = detect(KNOWN_DATASETS, &format!("{} {}", summary, comments));
    let venue = item.venue();

    let mut lines = Vec::with_capacity(4);
    if !tasks.is_empty() {
        lines.push(format!("- **Task / Problem**: {}", tasks.join(", ")));
    }
    lines.push(format!(
        "- **Core Idea**: {}",
        lead_sentence(item, CORE_IDEA_MAX_CHARS)
    ));
    if !datasets.is_empty() {
        lines.push(format!("- **Data / Benchmarks**: {}", datasets.join(", ")));
    }
    if !venue.is_empty() {
        lines.push(format!("- **Venue**: {}", venue));
    }
    lines
}

/// TL;DR plus a markdown method card with a fixed discussion checklist.
///
/// `lang` is accepted for parity with the LLM path; the card layout does not
/// depend on it. Links are left out since the digest renders them separately.
pub fn heuristic_two_stage(item: &Item, _lang: Lang, scope: Scope) -> TwoStage {
    let tldr = lead_sentence(item, DEFAULT_MAX_CHARS);

    let full_md = format!(
        "{}\n{}\n\n{}\n{}",
        METHOD_CARD_HEADING,
        method_card_lines(item).join("\n"),
        DISCUSSION_HEADING,
        DISCUSSION_QUESTIONS.join("\n"),
    );

    TwoStage { tldr, full_md }.scoped(scope)
}

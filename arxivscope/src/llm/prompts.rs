use crate::item::{Item, Lang, Scope};

pub const DEFAULT_SYSTEM_PROMPT_EN: &str = "You are a careful research assistant who summarizes \
computer vision and machine learning papers for a daily arXiv digest. Be factual, never invent \
numbers, datasets or claims that are not in the provided metadata.";

pub const DEFAULT_SYSTEM_PROMPT_ZH: &str = "你是一名严谨的科研助理，为每日 arXiv 论文速递撰写摘要。\
只依据提供的元数据作答，不要编造数字、数据集或结论。";

/// Built-in system prompt used when the configured one is empty.
pub fn default_system_prompt(lang: Lang) -> &'static str {
    match lang {
        Lang::En => DEFAULT_SYSTEM_PROMPT_EN,
        Lang::Zh => DEFAULT_SYSTEM_PROMPT_ZH,
    }
}

/// Paper metadata block shared by all user prompts.
pub fn paper_block(item: &Item) -> String {
    let mut block = format!(
        "TITLE: {}\nABSTRACT: {}\n",
        item.title(),
        item.summary()
    );
    if !item.comments().is_empty() {
        block.push_str(&format!("COMMENTS: {}\n", item.comments()));
    }
    if !item.venue().is_empty() {
        block.push_str(&format!("VENUE: {}\n", item.venue()));
    }

    let links: Vec<&str> = [item.html_url(), item.pdf_url()]
        .into_iter()
        .filter(|u| !u.is_empty())
        .chain(item.code_urls.iter().map(String::as_str))
        .chain(item.project_urls.iter().map(String::as_str))
        .collect();
    if !links.is_empty() {
        block.push_str(&format!("LINKS: {}\n", links.join(" ")));
    }
    block
}

/// User prompt for a TL;DR + method card reply.
pub fn two_stage_prompt(item: &Item, lang: Lang, scope: Scope) -> String {
    let language = match lang {
        Lang::En => "English",
        Lang::Zh => "Simplified Chinese (keep dataset, model and metric names in English)",
    };
    let wanted = match scope {
        Scope::Tldr => "Only \"tldr\" is needed; return \"full_md\" as an empty string.",
        Scope::Full => "Only \"full_md\" is needed; return \"tldr\" as an empty string.",
        Scope::Both => "Fill both fields.",
    };

    format!(
        r#"Summarize the paper below in {language}.

STAGE 1 - "tldr": one sentence, at most 60 words, stating what the paper does and its main result.
STAGE 2 - "full_md": a markdown method card with these bullets when the metadata supports them:
- **Task / Problem**
- **Core Idea**
- **Data / Benchmarks**
- **Venue**
followed by 3-5 numbered discussion questions a reviewer would ask.
Do not include links.

{wanted}

OUTPUT FORMAT (strict JSON):
{{
  "tldr": "...",
  "full_md": "..."
}}

PAPER:
{paper}"#,
        language = language,
        wanted = wanted,
        paper = paper_block(item),
    )
}

/// User prompt for an English + Chinese digest pair.
pub fn bilingual_prompt(item: &Item) -> String {
    format!(
        r#"Write a short digest of the paper below in two languages.

- "digest_en": 1-2 English sentences covering the problem, the method and the key result.
- "digest_zh": the same content in Simplified Chinese, keeping dataset, model and metric names in English.

OUTPUT FORMAT (strict JSON):
{{
  "digest_en": "...",
  "digest_zh": "..."
}}

PAPER:
{paper}"#,
        paper = paper_block(item),
    )
}

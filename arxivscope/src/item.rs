use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Paper metadata as handed over by the feed fetcher.
///
/// Every field is optional; `null` and a missing key both read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub title: Option<String>,
    /// Abstract text
    pub summary: Option<String>,
    pub comments: Option<String>,
    pub venue_inferred: Option<String>,
    pub journal_ref: Option<String>,
    pub pdf_url: Option<String>,
    pub html_url: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub code_urls: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub project_urls: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Item {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn comments(&self) -> &str {
        self.comments.as_deref().unwrap_or("")
    }

    /// Inferred venue, else the journal reference, else empty.
    pub fn venue(&self) -> &str {
        match self.venue_inferred.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => self.journal_ref.as_deref().unwrap_or(""),
        }
    }

    pub fn pdf_url(&self) -> &str {
        self.pdf_url.as_deref().unwrap_or("")
    }

    pub fn html_url(&self) -> &str {
        self.html_url.as_deref().unwrap_or("")
    }
}

/// Output language of a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    En,
    #[default]
    Zh,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }
}

impl FromStr for Lang {
    type Err = std::convert::Infallible;

    /// Only "zh" selects Chinese; anything else is English.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "zh" { Lang::Zh } else { Lang::En })
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which parts of a two-stage summary are populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    Tldr,
    Full,
    #[default]
    Both,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Tldr => "tldr",
            Scope::Full => "full",
            Scope::Both => "both",
        }
    }
}

impl FromStr for Scope {
    type Err = std::convert::Infallible;

    /// Unknown values keep both parts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tldr" => Scope::Tldr,
            "full" => Scope::Full,
            _ => Scope::Both,
        })
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Llm,
    #[default]
    Heuristic,
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "llm" { Mode::Llm } else { Mode::Heuristic })
    }
}

/// Short one-sentence digests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub digest_en: String,
    pub digest_zh: String,
}

/// TL;DR plus the markdown method card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoStage {
    pub tldr: String,
    pub full_md: String,
}

impl TwoStage {
    /// Blank the part the scope excludes.
    pub fn scoped(mut self, scope: Scope) -> Self {
        match scope {
            Scope::Tldr => self.full_md.clear(),
            Scope::Full => self.tldr.clear(),
            Scope::Both => {}
        }
        self
    }
}

/// What the digest renderer consumes; always exactly these four fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub digest_en: String,
    pub digest_zh: String,
    pub tldr: String,
    pub full_md: String,
}

impl From<Digest> for SummaryRecord {
    /// Digest-only record; the card fields stay empty so templates skip the card.
    fn from(digest: Digest) -> Self {
        Self {
            digest_en: digest.digest_en,
            digest_zh: digest.digest_zh,
            tldr: String::new(),
            full_md: String::new(),
        }
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

/// Default character budget for [`first_sentence`].
pub const DEFAULT_MAX_CHARS: usize = 1024;

static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sentence-ending punctuation followed by whitespace. The punctuation is
/// kept with the preceding sentence.
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?。！？]\s+").unwrap());

/// First sentence of `text`, whitespace-normalized and cut to `max_chars`
/// characters. The cut is hard: no ellipsis, no word boundary.
pub fn first_sentence(text: &str, max_chars: usize) -> String {
    let normalized = WS_RE.replace_all(text.trim(), " ");

    let sentence = match BOUNDARY_RE.find(&normalized) {
        Some(m) => {
            // The match starts on the punctuation char; keep it, drop the whitespace.
            let punct_len = m.as_str().chars().next().map_or(0, char::len_utf8);
            &normalized[..m.start() + punct_len]
        }
        None => &normalized[..],
    };

    truncate_chars(sentence, max_chars)
}

/// Like [`first_sentence`] but for optional input; `None` reads as empty.
pub fn first_sentence_opt(text: Option<&str>, max_chars: usize) -> String {
    text.map(|t| first_sentence(t, max_chars)).unwrap_or_default()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

//! Text tokenization and anchor normalization.
//!
//! Everything downstream (candidate windows, semantic overlap, dedup keys)
//! works on the whitespace-delimited words produced here.

use std::collections::{HashMap, HashSet};

use crate::options::AnchorConfig;
use crate::patterns::{is_stopword, HTML_TAG, WHITESPACE_NORMALIZE, WORD_TOKEN};

/// Strip HTML tags, decode the common entities and collapse whitespace.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let without_tags = HTML_TAG.replace_all(html, " ");
    let decoded = decode_entities(&without_tags);
    collapse_whitespace(&decoded)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&rsquo;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Collapse runs of whitespace to a single space and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// Whitespace-delimited words with their byte offsets in `text`.
#[must_use]
pub fn words_with_offsets(text: &str) -> Vec<(usize, &str)> {
    WORD_TOKEN
        .find_iter(text)
        .map(|m| (m.start(), m.as_str()))
        .collect()
}

/// Lowercase a word and keep letters only.
///
/// Used for boundary stopword checks, so "The," and "the" compare equal.
#[must_use]
pub fn alpha_lower(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Strip leading/trailing non-alphanumeric characters and collapse inner whitespace.
#[must_use]
pub fn clean_phrase(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    collapse_whitespace(trimmed)
}

/// Uniqueness key for an anchor: lowercase alphanumerics only.
///
/// "SEO-ready content" and "seo ready content" share a key.
#[must_use]
pub fn dedup_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase alphanumeric tokens in order of appearance.
#[must_use]
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Set of lowercase tokens that are not stopwords and longer than `min_len` chars.
#[must_use]
pub fn content_words(text: &str, min_len: usize) -> HashSet<String> {
    tokens(text)
        .into_iter()
        .filter(|t| t.chars().count() > min_len && !is_stopword(t))
        .collect()
}

/// The three most frequent non-stopword tokens of a paragraph.
///
/// Ties are broken by first appearance so the result is deterministic.
#[must_use]
pub fn paragraph_theme(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, token) in tokens(text).into_iter().enumerate() {
        if token.chars().count() <= 2 || is_stopword(&token) {
            continue;
        }
        counts.entry(token).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(3).map(|(token, _, _)| token).collect()
}

/// The sentence of `text` containing byte offset `offset`.
///
/// Sentences end at `.`, `!` or `?`. The returned slice is trimmed.
#[must_use]
pub fn sentence_containing(text: &str, offset: usize) -> &str {
    SentenceIndex::new(text).sentence_at(offset)
}

/// A trimmed sentence located in its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last character.
    pub end: usize,
    /// Character offset of `start`.
    pub char_start: usize,
    pub char_len: usize,
}

/// Sentence boundaries of a text, for repeated lookups by offset.
#[derive(Debug, Clone)]
pub struct SentenceIndex<'a> {
    text: &'a str,
    /// Untrimmed end of each sentence; the last one is always `text.len()`.
    bounds: Vec<usize>,
    spans: Vec<SentenceSpan>,
}

impl<'a> SentenceIndex<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut bounds: Vec<usize> = text
            .match_indices(['.', '!', '?'])
            .map(|(i, _)| i + 1)
            .collect();
        bounds.push(text.len());

        let mut spans = Vec::with_capacity(bounds.len());
        let mut start = 0;
        let mut chars = 0;
        for &end in &bounds {
            let raw = &text[start..end];
            let leading = raw.len() - raw.trim_start().len();
            let trimmed = raw.trim();
            spans.push(SentenceSpan {
                start: start + leading,
                end: start + leading + trimmed.len(),
                char_start: chars + raw[..leading].chars().count(),
                char_len: trimmed.chars().count(),
            });
            chars += raw.chars().count();
            start = end;
        }

        Self { text, bounds, spans }
    }

    /// Span of the sentence containing byte offset `offset`.
    #[must_use]
    pub fn span_at(&self, offset: usize) -> SentenceSpan {
        let offset = offset.min(self.text.len());
        let index = self
            .bounds
            .partition_point(|&end| end <= offset)
            .min(self.spans.len() - 1);
        self.spans[index]
    }

    /// Same as [`sentence_containing`].
    #[must_use]
    pub fn sentence_at(&self, offset: usize) -> &'a str {
        let span = self.span_at(offset);
        &self.text[span.start..span.end]
    }
}

/// Reduce a raw phrase to an acceptable anchor shape.
///
/// Edge punctuation is stripped, boundary stopwords are dropped from both
/// ends while at least `min_words` remain, and phrases still longer than
/// `max_words` are cut to `ideal_max_words`. Returns `None` when fewer than
/// `min_words` words survive. Normalizing an already normalized phrase
/// returns it unchanged.
#[must_use]
pub fn normalize_anchor(raw: &str, config: &AnchorConfig) -> Option<String> {
    let cleaned = clean_phrase(raw);
    let mut words: Vec<&str> = cleaned.split_whitespace().collect();

    trim_edges(&mut words, config);
    if words.len() > config.max_words {
        words.truncate(config.ideal_max_words);
        trim_edges(&mut words, config);
    }

    if words.len() < config.min_words {
        return None;
    }
    Some(clean_phrase(&words.join(" ")))
}

/// Drop punctuation-only edge tokens, then boundary stopwords while above `min_words`.
fn trim_edges(words: &mut Vec<&str>, config: &AnchorConfig) {
    let has_alnum = |w: &str| w.chars().any(char::is_alphanumeric);
    loop {
        let before = words.len();

        while words.first().is_some_and(|w| !has_alnum(w)) {
            words.remove(0);
        }
        while words.last().is_some_and(|w| !has_alnum(w)) {
            words.pop();
        }

        if words.len() > config.min_words
            && words
                .first()
                .is_some_and(|w| config.is_boundary_stopword(&alpha_lower(w)))
        {
            words.remove(0);
        }
        if words.len() > config.min_words
            && words
                .last()
                .is_some_and(|w| config.is_boundary_stopword(&alpha_lower(w)))
        {
            words.pop();
        }

        if words.len() == before {
            break;
        }
    }
}

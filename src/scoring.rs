//! Multi-factor anchor scoring.
//!
//! Three independent scores in 0-100 are computed per candidate:
//!
//! - **semantic**: word overlap with the target page's title, description
//!   and the surrounding paragraph, plus keyword bonuses
//! - **naturalness**: length, position inside its sentence, action verbs
//!   and outcome words
//! - **seo**: curated power patterns, primary keyword coverage, descriptiveness
//!
//! `quality_score` folds them into one number with fixed weights.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::options::AnchorConfig;
use crate::page::PageContext;
use crate::patterns::{is_stopword, ACTION_VERBS, OUTCOME_WORDS, SEO_POWER_PATTERNS};
use crate::text::{alpha_lower, content_words, tokens};

/// Weight of the semantic score in the combined quality score.
pub const SEMANTIC_WEIGHT: f64 = 0.30;
/// Weight of the naturalness score in the combined quality score.
pub const NATURALNESS_WEIGHT: f64 = 0.25;
/// Weight of the SEO score in the combined quality score.
pub const SEO_WEIGHT: f64 = 0.20;

const SCORE_MAX: f64 = 100.0;

/// SEO score with the names of the power patterns that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoScore {
    pub score: f64,
    pub matched_patterns: Vec<String>,
}

/// Page and paragraph data shared by every window of one paragraph.
///
/// Word sets and keywords are computed once in [`ScoringContext::new`], so
/// scoring a window only touches the window's own words.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    title_words: HashSet<String>,
    description_words: Option<HashSet<String>>,
    context_words: HashSet<String>,
    primary: Option<String>,
    primary_tokens: Vec<String>,
    secondary: Vec<String>,
}

impl ScoringContext {
    /// Prepare scoring of anchors from `context` that point at `page`.
    #[must_use]
    pub fn new(page: &PageContext, context: &str) -> Self {
        let primary = non_empty_lower(page.primary_keyword.as_deref());
        Self {
            title_words: content_words(&page.title, 2),
            description_words: page.description.as_deref().map(|d| content_words(d, 2)),
            context_words: content_words(context, 2),
            primary_tokens: primary.as_deref().map(tokens).unwrap_or_default(),
            primary,
            secondary: page
                .secondary_keywords
                .iter()
                .filter_map(|k| non_empty_lower(Some(k)))
                .collect(),
        }
    }

    /// See [`semantic_score`].
    #[must_use]
    pub fn semantic(&self, anchor: &str) -> f64 {
        let anchor_words = content_words(anchor, 2);
        let mut score: f64 = 0.0;

        if !anchor_words.is_empty() {
            let total = anchor_words.len() as f64;
            let overlap =
                |other: &HashSet<String>| anchor_words.intersection(other).count() as f64 / total;

            score += 40.0 * overlap(&self.title_words);
            if let Some(description) = &self.description_words {
                score += 25.0 * overlap(description);
            }
            score += 20.0 * overlap(&self.context_words);
        }

        let anchor_lower = anchor.to_lowercase();
        if self
            .primary
            .as_deref()
            .is_some_and(|primary| anchor_lower.contains(primary))
        {
            score += 15.0;
        }
        for secondary in &self.secondary {
            if anchor_lower.contains(secondary.as_str()) {
                score += 5.0;
            }
        }

        score.min(SCORE_MAX)
    }

    /// See [`seo_score`].
    #[must_use]
    pub fn seo(&self, anchor: &str, config: &AnchorConfig) -> SeoScore {
        if config.toxic_match(anchor).is_some() {
            return SeoScore {
                score: 0.0,
                matched_patterns: Vec::new(),
            };
        }

        let mut score: f64 = 40.0;
        let mut matched_patterns = Vec::new();
        for pattern in SEO_POWER_PATTERNS.iter() {
            if pattern.regex.is_match(anchor) {
                score += pattern.boost;
                matched_patterns.push(pattern.name.to_string());
            }
        }

        let anchor_lower = anchor.to_lowercase();
        if let Some(primary) = self.primary.as_deref() {
            if anchor_lower.contains(primary) {
                score += 20.0;
            } else if !self.primary_tokens.is_empty() {
                let anchor_tokens = tokens(&anchor_lower);
                let matched = self
                    .primary_tokens
                    .iter()
                    .filter(|t| anchor_tokens.contains(t))
                    .count();
                score += 10.0 * matched as f64 / self.primary_tokens.len() as f64;
            }
        }

        let words: Vec<&str> = anchor.split_whitespace().collect();
        let descriptive = words
            .iter()
            .map(|w| alpha_lower(w))
            .filter(|w| w.chars().count() > 3 && !is_stopword(w))
            .count();
        if descriptive >= 3 {
            score += 10.0;
        }
        if (4..=6).contains(&words.len()) {
            score += 10.0;
        }

        SeoScore {
            score: score.min(SCORE_MAX),
            matched_patterns,
        }
    }
}

/// Word overlap between the anchor and the target page.
///
/// Each overlap term is the fraction of the anchor's content words (stopwords
/// and words of two characters or less removed) found in the other text.
#[must_use]
pub fn semantic_score(anchor: &str, page: &PageContext, context: &str) -> f64 {
    ScoringContext::new(page, context).semantic(anchor)
}

/// How naturally the anchor reads inside its sentence.
#[must_use]
pub fn naturalness_score(anchor: &str, sentence: &str) -> f64 {
    naturalness_at(anchor, relative_position(anchor, sentence))
}

/// [`naturalness_score`] with the anchor's relative position in its sentence
/// (0.0 at the start) already known.
#[must_use]
pub fn naturalness_at(anchor: &str, position: Option<f64>) -> f64 {
    let words: Vec<&str> = anchor.split_whitespace().collect();
    let word_count = words.len();
    let mut score: f64 = 50.0;

    match word_count {
        4..=6 => score += 20.0,
        7 => score += 12.0,
        n if n < 4 => score -= 30.0,
        _ => {}
    }

    if let Some(ratio) = position {
        if (0.2..=0.8).contains(&ratio) {
            score += 10.0;
        } else if ratio < 0.1 {
            score -= 8.0;
        }
    }

    if words
        .first()
        .is_some_and(|w| ACTION_VERBS.contains(&alpha_lower(w).as_str()))
    {
        score += 15.0;
    }
    if words
        .iter()
        .any(|w| OUTCOME_WORDS.contains(&alpha_lower(w).as_str()))
    {
        score += 10.0;
    }

    score.clamp(0.0, SCORE_MAX)
}

/// Character offset of the anchor divided by sentence length, if found.
fn relative_position(anchor: &str, sentence: &str) -> Option<f64> {
    let sentence_lower = sentence.to_lowercase();
    let byte_offset = sentence_lower.find(&anchor.to_lowercase())?;
    let total = sentence_lower.chars().count();
    if total == 0 {
        return None;
    }
    let before = sentence_lower[..byte_offset].chars().count();
    Some(before as f64 / total as f64)
}

/// Search value of the anchor for the target page.
///
/// Any toxic pattern short-circuits to zero.
#[must_use]
pub fn seo_score(anchor: &str, page: &PageContext, config: &AnchorConfig) -> SeoScore {
    ScoringContext::new(page, "").seo(anchor, config)
}

/// Weighted combination of the three sub-scores, normalized back to 0-100.
#[must_use]
pub fn quality_score(semantic: f64, naturalness: f64, seo: f64) -> f64 {
    (semantic * SEMANTIC_WEIGHT + naturalness * NATURALNESS_WEIGHT + seo * SEO_WEIGHT)
        / (SEMANTIC_WEIGHT + NATURALNESS_WEIGHT + SEO_WEIGHT)
}

/// Whether a scored candidate is good enough to keep.
#[must_use]
pub fn passes_quality(quality: f64, seo: f64, config: &AnchorConfig) -> bool {
    seo > 0.0 && quality >= config.min_quality_score
}

fn non_empty_lower(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

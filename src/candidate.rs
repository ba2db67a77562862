//! Anchor candidate generation and ranking.
//!
//! A window of `min_words..=max_words` words slides over the tag-stripped
//! paragraph. Each window is cleaned, validated and scored; survivors are
//! ranked by quality, deduplicated on their alphanumeric key and capped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::options::AnchorConfig;
use crate::page::PageContext;
use crate::scoring::{naturalness_at, passes_quality, quality_score, ScoringContext};
use crate::text::{clean_phrase, dedup_key, paragraph_theme, strip_tags, words_with_offsets, SentenceIndex};
use crate::validate::{validate_anchor, ValidationStatus};

/// Number of words captured on each side of a candidate.
const CONTEXT_WORDS: usize = 5;

/// Where a candidate starts within its paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Early,
    Middle,
    Late,
}

impl Position {
    /// Classify a start word index against the paragraph's word count.
    #[must_use]
    pub fn from_offset(start: usize, total: usize) -> Self {
        if total == 0 {
            return Self::Early;
        }
        let ratio = start as f64 / total as f64;
        if ratio < 1.0 / 3.0 {
            Self::Early
        } else if ratio < 2.0 / 3.0 {
            Self::Middle
        } else {
            Self::Late
        }
    }
}

/// Text surrounding a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWindow {
    /// Up to five words preceding the candidate.
    pub before: String,
    /// Up to five words following the candidate.
    pub after: String,
    /// The sentence the candidate starts in.
    pub sentence: String,
    /// Three most frequent content words of the paragraph.
    pub paragraph_theme: Vec<String>,
}

/// A scored, validated anchor phrase taken from paragraph text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorCandidate {
    pub text: String,
    pub normalized_text: String,
    pub word_count: usize,
    pub quality_score: f64,
    pub semantic_score: f64,
    pub naturalness: f64,
    pub seo_value: f64,
    pub position: Position,
    pub context_window: ContextWindow,
    pub power_pattern_matches: Vec<String>,
    pub validation_status: ValidationStatus,
}

impl AnchorCandidate {
    /// Alphanumeric-only uniqueness key.
    #[must_use]
    pub fn key(&self) -> String {
        dedup_key(&self.normalized_text)
    }
}

/// Generate every acceptable candidate of a paragraph for one target page.
///
/// The paragraph may contain markup; tags are stripped first. Output order is
/// by window length, then start offset. Use [`rank_candidates`] to order by quality.
#[must_use]
pub fn generate_candidates(
    paragraph: &str,
    page: &PageContext,
    config: &AnchorConfig,
) -> Vec<AnchorCandidate> {
    let text = strip_tags(paragraph);
    let words = words_with_offsets(&text);
    let total = words.len();
    if total < config.min_words {
        return Vec::new();
    }

    let theme = paragraph_theme(&text);
    let scoring = ScoringContext::new(page, &text);
    let sentences = SentenceIndex::new(&text);
    let word_chars = char_offsets(&text, &words);
    let mut candidates = Vec::new();

    for len in config.min_words..=config.max_words {
        if len > total {
            break;
        }
        for start in 0..=(total - len) {
            let (first_offset, _) = words[start];
            let (last_offset, last_word) = words[start + len - 1];
            let phrase = clean_phrase(&text[first_offset..last_offset + last_word.len()]);

            let validation = validate_anchor(&phrase, config);
            if !validation.valid {
                trace!(phrase = %phrase, status = validation.status.as_str(), "window rejected");
                continue;
            }

            let span = sentences.span_at(first_offset);
            let sentence = &text[span.start..span.end];
            let window_end = last_offset + last_word.len();
            let in_sentence = (window_end <= span.end && span.char_len > 0).then(|| {
                word_chars[start].saturating_sub(span.char_start) as f64 / span.char_len as f64
            });

            let semantic = scoring.semantic(&phrase);
            let naturalness = naturalness_at(&phrase, in_sentence);
            let seo = scoring.seo(&phrase, config);
            let quality = quality_score(semantic, naturalness, seo.score);
            if !passes_quality(quality, seo.score, config) {
                continue;
            }

            let before_start = start.saturating_sub(CONTEXT_WORDS);
            let after_end = (start + len + CONTEXT_WORDS).min(total);
            let join = |range: &[(usize, &str)]| {
                range.iter().map(|(_, w)| *w).collect::<Vec<_>>().join(" ")
            };

            candidates.push(AnchorCandidate {
                normalized_text: phrase.to_lowercase(),
                word_count: phrase.split_whitespace().count(),
                text: phrase,
                quality_score: quality,
                semantic_score: semantic,
                naturalness,
                seo_value: seo.score,
                position: Position::from_offset(start, total),
                context_window: ContextWindow {
                    before: join(&words[before_start..start]),
                    after: join(&words[start + len..after_end]),
                    sentence: sentence.to_string(),
                    paragraph_theme: theme.clone(),
                },
                power_pattern_matches: seo.matched_patterns,
                validation_status: ValidationStatus::Valid,
            });
        }
    }

    candidates
}

/// Character offset of each word start, in one pass over `text`.
fn char_offsets(text: &str, words: &[(usize, &str)]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(words.len());
    let mut byte = 0;
    let mut chars = 0;
    for &(offset, _) in words {
        chars += text[byte..offset].chars().count();
        byte = offset;
        offsets.push(chars);
    }
    offsets
}

/// Sort by quality (best first), drop near-duplicates and keep at most `cap`.
///
/// The sort is stable, so equal scores keep generation order.
#[must_use]
pub fn rank_candidates(mut candidates: Vec<AnchorCandidate>, cap: usize) -> Vec<AnchorCandidate> {
    candidates.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.key()));
    candidates.truncate(cap);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAGRAPH: &str = "Implementing modern SEO strategies requires careful keyword research and consistent content optimization efforts.";

    fn seo_page() -> PageContext {
        PageContext::new("SEO Strategy Guide", "seo-strategy-guide")
            .with_description("Implementing modern SEO strategies for sustainable organic growth")
            .with_primary_keyword("SEO strategies")
    }

    fn lenient() -> AnchorConfig {
        AnchorConfig {
            min_quality_score: 0.0,
            ..AnchorConfig::default()
        }
    }

    #[test]
    fn position_thresholds() {
        assert_eq!(Position::from_offset(0, 12), Position::Early);
        assert_eq!(Position::from_offset(4, 12), Position::Middle);
        assert_eq!(Position::from_offset(8, 12), Position::Late);
        assert_eq!(Position::from_offset(0, 0), Position::Early);
    }

    #[test]
    fn generated_candidates_respect_word_bounds() {
        let config = lenient();
        let candidates = generate_candidates(PARAGRAPH, &seo_page(), &config);
        assert!(!candidates.is_empty());
        for c in &candidates {
            assert!((4..=7).contains(&c.word_count), "{} has {} words", c.text, c.word_count);
            assert_eq!(c.validation_status, ValidationStatus::Valid);
            assert_eq!(c.normalized_text, c.text.to_lowercase());
        }
    }

    #[test]
    fn generated_candidates_are_cleaned() {
        let candidates = generate_candidates(PARAGRAPH, &seo_page(), &lenient());
        assert!(candidates.iter().all(|c| !c.text.ends_with('.')));
        assert!(candidates.iter().any(|c| c.text == "consistent content optimization efforts"));
    }

    #[test]
    fn keyword_candidate_scores_above_default_threshold() {
        let candidates = generate_candidates(PARAGRAPH, &seo_page(), &AnchorConfig::default());
        let best = rank_candidates(candidates, 15);
        let top = best.first().expect("at least one candidate");
        assert_eq!(top.text, "Implementing modern SEO strategies");
        assert!(top.quality_score >= 75.0);
        assert_eq!(top.position, Position::Early);
        assert!(top.context_window.before.is_empty());
        assert_eq!(top.context_window.after, "requires careful keyword research and");
        assert!(top.power_pattern_matches.contains(&"strategy_framework".to_string()));
    }

    #[test]
    fn markup_is_stripped_before_windowing() {
        let html = "<p>Implementing <strong>modern SEO strategies</strong> requires careful keyword research.</p>";
        let candidates = generate_candidates(html, &seo_page(), &lenient());
        assert!(candidates.iter().all(|c| !c.text.contains('<')));
    }

    #[test]
    fn position_is_measured_within_the_sentence() {
        let text = "Teams publish weekly. Our editors keep implementing conversion focused landing pages daily.";
        let candidates = generate_candidates(text, &seo_page(), &lenient());
        let candidate = candidates
            .iter()
            .find(|c| c.text == "implementing conversion focused landing pages")
            .unwrap();
        assert_eq!(candidate.context_window.sentence, "Our editors keep implementing conversion focused landing pages daily.");
        // 50 + 20 (5 words) + 10 (middle of sentence) + 15 (action verb) + 10 (outcome word)
        assert!((candidate.naturalness - 100.0).abs() < 1e-9, "got {}", candidate.naturalness);

        let crossing = candidates
            .iter()
            .find(|c| c.text == "Teams publish weekly. Our editors")
            .map(|c| c.naturalness);
        if let Some(score) = crossing {
            assert!((score - 70.0).abs() < 1e-9, "got {score}");
        }
    }

    #[test]
    fn long_paragraph_scales_linearly() {
        let sentence = "Documented editorial workflows help distributed writing teams publish reliable articles.";
        let paragraph = [sentence; 300].join(" ");
        let started = std::time::Instant::now();
        let candidates = generate_candidates(&paragraph, &seo_page(), &lenient());
        assert!(started.elapsed() < std::time::Duration::from_secs(20));
        assert!(!candidates.is_empty());

        let once = generate_candidates(sentence, &seo_page(), &lenient());
        let first = once.iter().find(|c| c.text == "Documented editorial workflows help").unwrap();
        let repeated: Vec<_> = candidates.iter().filter(|c| c.text == first.text).collect();
        assert_eq!(repeated.len(), 300);
        assert!(repeated
            .iter()
            .all(|c| (c.naturalness - first.naturalness).abs() < 1e-9 && c.context_window.sentence == sentence));
    }

    #[test]
    fn short_paragraph_yields_nothing() {
        assert!(generate_candidates("SEO strategies matter", &seo_page(), &lenient()).is_empty());
    }

    #[test]
    fn rank_dedups_on_alphanumeric_key_and_caps() {
        let base = generate_candidates(PARAGRAPH, &seo_page(), &lenient());
        let mut first = base[0].clone();
        first.text = "SEO-ready content workflow guide".to_string();
        first.normalized_text = first.text.to_lowercase();
        first.quality_score = 99.0;
        let mut second = first.clone();
        second.text = "SEO ready content workflow guide".to_string();
        second.normalized_text = second.text.to_lowercase();
        second.quality_score = 98.0;

        let mut pool = base.clone();
        pool.push(second);
        pool.push(first);
        let ranked = rank_candidates(pool, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].text, "SEO-ready content workflow guide");
        assert_ne!(ranked[1].key(), ranked[0].key());
        assert!(ranked[0].quality_score >= ranked[1].quality_score);
        assert!(ranked[1].quality_score >= ranked[2].quality_score);
    }
}

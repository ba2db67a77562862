//! Compiled regex patterns and word tables for anchor scoring.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.
//! Patterns are organized by their purpose in the linking pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// HTML Patterns
// =============================================================================

/// Matches any HTML tag (opening, closing, self-closing, comments).
///
/// Quoted attribute values may contain `>`.
pub static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("HTML_TAG regex")
});

/// Markup that only appears in a full document, not in a content fragment.
pub static DOCUMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!doctype|<html[\s>]|<head[\s>]|<body[\s>]").expect("DOCUMENT_MARKER regex")
});

/// Matches one whitespace-delimited word.
pub static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("WORD_TOKEN regex"));

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

// =============================================================================
// SEO Power Patterns
// =============================================================================

/// A named phrase shape that tends to make a strong, descriptive anchor.
pub struct PowerPattern {
    /// Identifier reported in `AnchorCandidate::power_pattern_matches`.
    pub name: &'static str,
    /// Pattern tested against the anchor text.
    pub regex: Regex,
    /// Points added to the SEO score on match.
    pub boost: f64,
}

fn power(name: &'static str, pattern: &str, boost: f64) -> PowerPattern {
    PowerPattern {
        name,
        regex: Regex::new(pattern).expect("SEO power pattern regex"),
        boost,
    }
}

/// Curated SEO power pattern table, checked in order.
pub static SEO_POWER_PATTERNS: LazyLock<Vec<PowerPattern>> = LazyLock::new(|| {
    vec![
        power("how_to", r"(?i)\bhow\s+to\b", 15.0),
        power("best_practices", r"(?i)\bbest\s+practices?\b", 15.0),
        power(
            "guide_resource",
            r"(?i)\b(guide|tutorial|walkthrough|handbook|playbook|checklist)s?\b",
            12.0,
        ),
        power(
            "strategy_framework",
            r"(?i)\b(strateg(y|ies)|frameworks?|methodolog(y|ies)|roadmaps?)\b",
            12.0,
        ),
        power(
            "action_led",
            r"(?i)^(implementing|optimizing|optimising|building|creating|improving|scaling|automating|measuring|developing|designing)\b",
            10.0,
        ),
        power("optimization", r"(?i)\boptimi[sz](ation|ing|e)\b", 10.0),
        power(
            "outcome_focused",
            r"(?i)\b(results?|roi|conversions?|growth|revenue|rankings?|traffic|performance)\b",
            10.0,
        ),
        power(
            "research_analysis",
            r"(?i)\b(research|analysis|audits?|benchmarks?|case\s+stud(y|ies))\b",
            8.0,
        ),
        power(
            "comparison",
            r"(?i)\b(vs\.?|versus|comparison|alternatives?)\b",
            8.0,
        ),
        power("numeric_specific", r"\b\d+\b", 6.0),
    ]
});

// =============================================================================
// Word Tables
// =============================================================================

/// General stopwords excluded from semantic overlap and theme detection.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "may", "me", "might", "more", "most",
    "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours",
];

/// Default words that may not open or close an anchor.
pub const DEFAULT_BOUNDARY_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "in",
    "into", "is", "it", "its", "of", "on", "or", "our", "so", "than", "that", "the", "their",
    "then", "these", "they", "this", "those", "to", "was", "we", "were", "which", "while",
    "with", "you", "your",
];

/// Default generic phrases that never make acceptable anchors.
pub const DEFAULT_TOXIC_PATTERNS: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "more info",
    "find out more",
    "check out",
    "this article",
    "this post",
    "this page",
    "this guide",
    "visit our website",
    "see more",
    "go here",
];

/// Gerunds that make an anchor read as a concrete activity.
pub const ACTION_VERBS: &[&str] = &[
    "implementing", "optimizing", "optimising", "building", "creating", "developing",
    "improving", "scaling", "automating", "measuring", "designing", "launching", "managing",
    "analyzing", "mastering", "choosing", "planning", "boosting", "increasing", "reducing",
    "running", "writing", "tracking", "auditing", "structuring", "testing",
];

/// Words that tie an anchor to a measurable outcome.
pub const OUTCOME_WORDS: &[&str] = &[
    "results", "roi", "conversion", "conversions", "growth", "revenue", "performance",
    "rankings", "traffic", "engagement", "leads", "sales", "efficiency", "savings",
    "retention", "visibility",
];

/// Whether `word` (lowercase) is a general stopword.
#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

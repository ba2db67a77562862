//! Configuration for anchor selection and link insertion.
//!
//! `AnchorConfig` controls what counts as an acceptable anchor phrase;
//! `LinkOptions` controls how many links the document pipeline places and
//! where. Both are plain structs with public fields, meant to be built with
//! struct-update syntax over `Default::default()`.

use serde::{Deserialize, Serialize};

use crate::patterns::{DEFAULT_BOUNDARY_STOPWORDS, DEFAULT_TOXIC_PATTERNS};
use crate::{Error, Result};

/// Anchor quality rules.
///
/// # Example
///
/// ```rust
/// use rs_anchorlink::AnchorConfig;
///
/// let config = AnchorConfig {
///     min_quality_score: 60.0,
///     max_heading_overlap: 1.0,
///     ..AnchorConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Minimum anchor length in words.
    ///
    /// Default: `4`
    pub min_words: usize,

    /// Maximum anchor length in words.
    ///
    /// Default: `7`
    pub max_words: usize,

    /// Length that over-long phrases are truncated to during normalization.
    ///
    /// Default: `6`
    pub ideal_max_words: usize,

    /// Candidates whose combined quality score is below this are discarded (0-100).
    ///
    /// Default: `75.0`
    pub min_quality_score: f64,

    /// Maximum number of ranked candidates kept per paragraph.
    ///
    /// Default: `15`
    pub max_candidates: usize,

    /// Preferred maximum ratio of anchor words repeated in the nearby heading.
    ///
    /// A value of `1.0` or more disables the preference.
    ///
    /// Default: `0.4`
    pub max_heading_overlap: f64,

    /// Generic phrases that make an anchor worthless (matched case-insensitively).
    pub toxic_patterns: Vec<String>,

    /// Function words not allowed as the first or last word of an anchor.
    pub boundary_stopwords: Vec<String>,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            min_words: 4,
            max_words: 7,
            ideal_max_words: 6,
            min_quality_score: 75.0,
            max_candidates: 15,
            max_heading_overlap: 0.4,
            toxic_patterns: DEFAULT_TOXIC_PATTERNS.iter().map(|s| (*s).to_string()).collect(),
            boundary_stopwords: DEFAULT_BOUNDARY_STOPWORDS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl AnchorConfig {
    /// Check that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        if self.min_words == 0 {
            return Err(Error::InvalidConfig("min_words must be at least 1".into()));
        }
        if self.min_words > self.max_words {
            return Err(Error::InvalidConfig(format!(
                "min_words ({}) exceeds max_words ({})",
                self.min_words, self.max_words
            )));
        }
        if self.ideal_max_words < self.min_words || self.ideal_max_words > self.max_words {
            return Err(Error::InvalidConfig(format!(
                "ideal_max_words ({}) must lie within {}..={}",
                self.ideal_max_words, self.min_words, self.max_words
            )));
        }
        if !(0.0..=100.0).contains(&self.min_quality_score) {
            return Err(Error::InvalidConfig(format!(
                "min_quality_score ({}) must lie within 0..=100",
                self.min_quality_score
            )));
        }
        if self.max_candidates == 0 {
            return Err(Error::InvalidConfig("max_candidates must be at least 1".into()));
        }
        if self.max_heading_overlap.is_nan() || self.max_heading_overlap < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_heading_overlap ({}) must be non-negative",
                self.max_heading_overlap
            )));
        }
        Ok(())
    }

    /// Whether `word` (already lowercased, letters only) is a boundary stopword.
    #[must_use]
    pub fn is_boundary_stopword(&self, word: &str) -> bool {
        self.boundary_stopwords.iter().any(|s| s == word)
    }

    /// First configured toxic pattern contained in `phrase`, if any.
    #[must_use]
    pub fn toxic_match(&self, phrase: &str) -> Option<&str> {
        let lower = phrase.to_lowercase();
        self.toxic_patterns
            .iter()
            .find(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
            .map(String::as_str)
    }
}

/// Options for the document-level linking pipeline.
///
/// # Example
///
/// ```rust
/// use rs_anchorlink::LinkOptions;
///
/// let options = LinkOptions {
///     base_url: "https://example.com/".to_string(),
///     max_links: 3,
///     ..LinkOptions::default()
/// };
/// assert_eq!(options.anchor.min_words, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Base URL that page slugs are resolved against.
    ///
    /// Default: `""` (slugs must then be absolute URLs)
    pub base_url: String,

    /// Maximum number of links inserted into one document.
    ///
    /// Default: `8`
    pub max_links: usize,

    /// Paragraphs shorter than this (in words) are not considered.
    ///
    /// Default: `12`
    pub min_paragraph_words: usize,

    /// Skip paragraphs that already contain a link.
    ///
    /// Default: `true`
    pub skip_linked_paragraphs: bool,

    /// Link each target page at most once per document.
    ///
    /// Default: `true`
    pub one_link_per_target: bool,

    /// Anchor quality rules.
    pub anchor: AnchorConfig,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_links: 8,
            min_paragraph_words: 12,
            skip_linked_paragraphs: true,
            one_link_per_target: true,
            anchor: AnchorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_config() {
        let config = AnchorConfig::default();
        assert_eq!(config.min_words, 4);
        assert_eq!(config.max_words, 7);
        assert_eq!(config.ideal_max_words, 6);
        assert!((config.min_quality_score - 75.0).abs() < f64::EPSILON);
        assert_eq!(config.max_candidates, 15);
        assert!((config.max_heading_overlap - 0.4).abs() < f64::EPSILON);
        assert!(config.toxic_patterns.iter().any(|p| p == "click here"));
        assert!(config.is_boundary_stopword("the"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_greater_than_max_is_rejected() {
        let config = AnchorConfig {
            min_words: 8,
            max_words: 5,
            ..AnchorConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_ideal_outside_range_is_rejected() {
        let config = AnchorConfig {
            ideal_max_words: 9,
            ..AnchorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_score_threshold_out_of_range_is_rejected() {
        let config = AnchorConfig {
            min_quality_score: 120.0,
            ..AnchorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toxic_match_is_case_insensitive() {
        let config = AnchorConfig::default();
        assert_eq!(config.toxic_match("Click Here for more"), Some("click here"));
        assert_eq!(config.toxic_match("keyword research workflow basics"), None);
    }

    #[test]
    fn test_link_options_from_partial_json() {
        let options: LinkOptions =
            serde_json::from_str(r#"{"base_url":"https://example.com","max_links":2}"#)
                .unwrap_or_default();
        assert_eq!(options.max_links, 2);
        assert_eq!(options.min_paragraph_words, 12);
        assert!(options.one_link_per_target);
        assert_eq!(options.anchor, AnchorConfig::default());
    }
}

//! Anchor phrase validation.
//!
//! Rules are checked in a fixed order and the first failure wins:
//! word count (too short, too long), toxic phrase, then the first and last
//! word against the boundary stopword set.

use serde::{Deserialize, Serialize};

use crate::options::AnchorConfig;
use crate::text::alpha_lower;

/// Terminal classification of an anchor phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    TooShort,
    TooLong,
    Toxic,
    StopwordBoundary,
}

impl ValidationStatus {
    /// Stable identifier used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::Toxic => "toxic",
            Self::StopwordBoundary => "stopword_boundary",
        }
    }
}

/// Outcome of validating one phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub status: ValidationStatus,
    /// Human-readable explanation; empty for valid phrases.
    pub reason: String,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            valid: true,
            status: ValidationStatus::Valid,
            reason: String::new(),
        }
    }

    fn rejected(status: ValidationStatus, reason: String) -> Self {
        Self {
            valid: false,
            status,
            reason,
        }
    }
}

/// Validate an anchor phrase against the configured rules.
#[must_use]
pub fn validate_anchor(phrase: &str, config: &AnchorConfig) -> ValidationResult {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let word_count = words.len();

    if word_count < config.min_words {
        return ValidationResult::rejected(
            ValidationStatus::TooShort,
            format!("{word_count} words, minimum is {}", config.min_words),
        );
    }
    if word_count > config.max_words {
        return ValidationResult::rejected(
            ValidationStatus::TooLong,
            format!("{word_count} words, maximum is {}", config.max_words),
        );
    }
    if let Some(pattern) = config.toxic_match(phrase) {
        return ValidationResult::rejected(
            ValidationStatus::Toxic,
            format!("contains generic phrase \"{pattern}\""),
        );
    }

    // word_count >= min_words >= 1, so first/last exist
    if let Some(first) = words.first() {
        let first = alpha_lower(first);
        if config.is_boundary_stopword(&first) {
            return ValidationResult::rejected(
                ValidationStatus::StopwordBoundary,
                format!("starts with stopword \"{first}\""),
            );
        }
    }
    if let Some(last) = words.last() {
        let last = alpha_lower(last);
        if config.is_boundary_stopword(&last) {
            return ValidationResult::rejected(
                ValidationStatus::StopwordBoundary,
                format!("ends with stopword \"{last}\""),
            );
        }
    }

    ValidationResult::valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(phrase: &str) -> ValidationResult {
        validate_anchor(phrase, &AnchorConfig::default())
    }

    #[test]
    fn accepts_descriptive_phrase() {
        let result = check("modern SEO strategies require careful");
        assert!(result.valid);
        assert_eq!(result.status, ValidationStatus::Valid);
        assert!(result.reason.is_empty());
    }

    #[test]
    fn rejects_short_and_long_phrases() {
        assert_eq!(check("SEO strategies").status, ValidationStatus::TooShort);
        assert_eq!(
            check("one two three four five six seven eight").status,
            ValidationStatus::TooLong
        );
    }

    #[test]
    fn rejects_toxic_phrase() {
        let result = check("click here for more");
        assert!(!result.valid);
        assert_eq!(result.status, ValidationStatus::Toxic);
        assert!(result.reason.contains("click here"));
    }

    #[test]
    fn rejects_stopword_boundaries() {
        assert_eq!(
            check("the keyword research process").status,
            ValidationStatus::StopwordBoundary
        );
        assert_eq!(
            check("keyword research process for").status,
            ValidationStatus::StopwordBoundary
        );
        assert_eq!(
            check("The, keyword research process").status,
            ValidationStatus::StopwordBoundary
        );
    }

    #[test]
    fn word_count_is_checked_before_toxicity() {
        assert_eq!(check("click here").status, ValidationStatus::TooShort);
    }

    #[test]
    fn status_identifiers_are_snake_case() {
        assert_eq!(ValidationStatus::StopwordBoundary.as_str(), "stopword_boundary");
        let json = serde_json::to_string(&ValidationStatus::TooLong).unwrap();
        assert_eq!(json, "\"too_long\"");
    }
}

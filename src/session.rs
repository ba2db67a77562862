//! Per-run linking state.
//!
//! A `LinkSession` belongs to one content-generation run (one article). It
//! remembers which anchors and targets have been used and logs every
//! injection attempt. The sets are private: the only writer is
//! [`LinkSession::record`], called by the injector, so the "never reuse an
//! anchor within one article" rule cannot be bypassed by callers.
//!
//! Sessions are not shared between articles; give each article its own.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::dedup_key;

/// One injection attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionRecord {
    pub anchor: String,
    pub target_url: String,
    pub success: bool,
    /// Why the attempt failed; empty on success.
    pub reason: String,
    /// Byte offset of the inserted link in the HTML, on success.
    pub offset: Option<usize>,
    pub word_count: usize,
    pub quality_score: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate view of a session, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    /// Successful injections.
    pub total_injections: usize,
    pub unique_anchors: usize,
    pub unique_targets: usize,
    /// Mean anchor word count over successful injections (0 when none).
    pub average_word_count: f64,
    pub history: Vec<InjectionRecord>,
}

/// Anchors and targets used so far in one run.
#[derive(Debug, Clone, Default)]
pub struct LinkSession {
    used_anchors: HashSet<String>,
    used_targets: HashSet<String>,
    history: Vec<InjectionRecord>,
}

impl LinkSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an anchor with the same alphanumeric key was already injected.
    #[must_use]
    pub fn is_anchor_used(&self, anchor: &str) -> bool {
        self.used_anchors.contains(&dedup_key(anchor))
    }

    /// Whether `key` (as produced by `dedup_key`) was already injected.
    pub(crate) fn is_key_used(&self, key: &str) -> bool {
        self.used_anchors.contains(key)
    }

    /// Whether a link to `target_url` was already injected.
    #[must_use]
    pub fn is_target_used(&self, target_url: &str) -> bool {
        self.used_targets.contains(target_url)
    }

    /// Every attempt recorded so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[InjectionRecord] {
        &self.history
    }

    /// Number of successful injections.
    #[must_use]
    pub fn successful_injections(&self) -> usize {
        self.history.iter().filter(|r| r.success).count()
    }

    /// Append an attempt; successes also claim the anchor and target.
    pub(crate) fn record(&mut self, record: InjectionRecord) {
        if record.success {
            self.used_anchors.insert(dedup_key(&record.anchor));
            self.used_targets.insert(record.target_url.clone());
        }
        self.history.push(record);
    }

    /// Aggregate counts plus the full history.
    #[must_use]
    pub fn stats(&self) -> LinkStats {
        let successes: Vec<&InjectionRecord> = self.history.iter().filter(|r| r.success).collect();
        let average_word_count = if successes.is_empty() {
            0.0
        } else {
            successes.iter().map(|r| r.word_count).sum::<usize>() as f64 / successes.len() as f64
        };

        LinkStats {
            total_injections: successes.len(),
            unique_anchors: self.used_anchors.len(),
            unique_targets: self.used_targets.len(),
            average_word_count,
            history: self.history.clone(),
        }
    }

    /// Forget everything; the session can then serve a new article.
    pub fn reset(&mut self) {
        self.used_anchors.clear();
        self.used_targets.clear();
        self.history.clear();
    }
}

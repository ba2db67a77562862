//! Anchor selection engine.
//!
//! `AnchorEngine` is immutable configuration plus pure selection logic. All
//! per-article state lives in a [`LinkSession`] that callers pass in:
//! selection only reads it, injection is the only thing that writes it.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, warn};

use crate::candidate::{generate_candidates, rank_candidates, AnchorCandidate};
use crate::inject::{place_link_in, InjectionResult, LinkScope};
use crate::options::AnchorConfig;
use crate::page::PageContext;
use crate::session::{InjectionRecord, LinkSession};
use crate::text::{normalize_anchor, tokens};
use crate::validate::validate_anchor;
use crate::Result;

/// Words of this many characters or fewer are ignored for heading overlap.
const HEADING_WORD_MIN_LEN: usize = 3;

/// Selects and injects anchors according to an [`AnchorConfig`].
#[derive(Debug, Clone)]
pub struct AnchorEngine {
    config: AnchorConfig,
}

impl AnchorEngine {
    /// Create an engine, rejecting inconsistent configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `config.validate()` fails.
    pub fn new(config: AnchorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Ranked, deduplicated candidates of a paragraph for one target page.
    ///
    /// Does not consider session state.
    #[must_use]
    pub fn candidates(&self, paragraph: &str, page: &PageContext) -> Vec<AnchorCandidate> {
        let generated = generate_candidates(paragraph, page, &self.config);
        let generated_count = generated.len();
        let ranked = rank_candidates(generated, self.config.max_candidates);
        debug!(
            page = %page.slug,
            generated = generated_count,
            kept = ranked.len(),
            "ranked anchor candidates"
        );
        ranked
    }

    /// Best candidate of `paragraph` that has not been used in this session.
    ///
    /// With a `nearby_heading`, candidates repeating few of the heading's words
    /// are preferred; if none meets `max_heading_overlap`, the best candidate is
    /// returned anyway. Returns `None` when nothing usable remains.
    #[must_use]
    pub fn find_best_anchor(
        &self,
        session: &LinkSession,
        paragraph: &str,
        page: &PageContext,
        nearby_heading: Option<&str>,
    ) -> Option<AnchorCandidate> {
        self.ranked_anchors(session, paragraph, page, nearby_heading)
            .into_iter()
            .next()
    }

    /// Unused candidates of `paragraph` in the order they should be tried.
    ///
    /// The first entry is what [`find_best_anchor`](Self::find_best_anchor)
    /// returns; the rest keep their ranking.
    #[must_use]
    pub fn ranked_anchors(
        &self,
        session: &LinkSession,
        paragraph: &str,
        page: &PageContext,
        nearby_heading: Option<&str>,
    ) -> Vec<AnchorCandidate> {
        let mut available: Vec<AnchorCandidate> = self
            .candidates(paragraph, page)
            .into_iter()
            .filter(|c| !session.is_key_used(&c.key()))
            .collect();

        if available.is_empty() {
            return available;
        }

        if let Some(heading) = nearby_heading {
            if self.config.max_heading_overlap < 1.0 {
                let heading_words = long_words(heading);
                let preferred = available.iter().position(|c| {
                    heading_overlap(&c.text, &heading_words) <= self.config.max_heading_overlap
                });
                match preferred {
                    Some(index) => {
                        let candidate = available.remove(index);
                        available.insert(0, candidate);
                    }
                    None => debug!(
                        heading = heading,
                        "no candidate under heading overlap limit, using best"
                    ),
                }
            }
        }

        available
    }

    /// Normalize a free-form anchor suggestion and check it against the rules.
    ///
    /// Returns the normalized phrase, or `None` if it cannot be made valid or
    /// was already used in this session.
    #[must_use]
    pub fn prepare_anchor(&self, session: &LinkSession, raw: &str) -> Option<String> {
        let normalized = normalize_anchor(raw, &self.config)?;
        if !validate_anchor(&normalized, &self.config).valid || session.is_anchor_used(&normalized) {
            return None;
        }
        Some(normalized)
    }

    /// Link the first free occurrence of `anchor` in `html` to `target_url`.
    ///
    /// Invalid anchors and anchors not found in the HTML produce a failed
    /// result with the input HTML unchanged. Every attempt is recorded in the
    /// session; successes also claim the anchor. The session's used targets are
    /// not consulted here.
    pub fn inject_link(
        &self,
        session: &mut LinkSession,
        html: &str,
        anchor: &str,
        target_url: &str,
    ) -> InjectionResult {
        self.inject(session, html, LinkScope::Document, anchor, target_url, None)
    }

    /// Same as [`inject_link`](Self::inject_link) for a scored candidate; the
    /// candidate's quality score is kept in the session history.
    pub fn inject_candidate(
        &self,
        session: &mut LinkSession,
        html: &str,
        candidate: &AnchorCandidate,
        target_url: &str,
    ) -> InjectionResult {
        self.inject_candidate_in(session, html, LinkScope::Document, candidate, target_url)
    }

    /// Same as [`inject_candidate`](Self::inject_candidate), searching only
    /// `scope` for the anchor.
    pub fn inject_candidate_in(
        &self,
        session: &mut LinkSession,
        html: &str,
        scope: LinkScope,
        candidate: &AnchorCandidate,
        target_url: &str,
    ) -> InjectionResult {
        self.inject(
            session,
            html,
            scope,
            &candidate.text,
            target_url,
            Some(candidate.quality_score),
        )
    }

    fn inject(
        &self,
        session: &mut LinkSession,
        html: &str,
        scope: LinkScope,
        anchor: &str,
        target_url: &str,
        quality_score: Option<f64>,
    ) -> InjectionResult {
        let word_count = anchor.split_whitespace().count();
        let validation = validate_anchor(anchor, &self.config);

        let (result_html, offset, reason) = if !validation.valid {
            (None, None, format!("{}: {}", validation.status.as_str(), validation.reason))
        } else if session.is_anchor_used(anchor) {
            (None, None, "anchor already used in this session".to_string())
        } else {
            match place_link_in(html, scope, anchor, target_url) {
                Some(placement) => (Some(placement.html), Some(placement.offset), String::new()),
                None => (
                    None,
                    None,
                    "anchor text not found outside existing links".to_string(),
                ),
            }
        };

        let success = result_html.is_some();
        if !success {
            warn!(anchor = anchor, target = target_url, reason = %reason, "link injection failed");
        }

        session.record(InjectionRecord {
            anchor: anchor.to_string(),
            target_url: target_url.to_string(),
            success,
            reason: reason.clone(),
            offset,
            word_count,
            quality_score,
            recorded_at: Utc::now(),
        });

        InjectionResult {
            html: result_html.unwrap_or_else(|| html.to_string()),
            success,
            anchor: anchor.to_string(),
            target_url: target_url.to_string(),
            offset,
            word_count,
            reason,
        }
    }
}

fn long_words(text: &str) -> HashSet<String> {
    tokens(text)
        .into_iter()
        .filter(|w| w.chars().count() > HEADING_WORD_MIN_LEN)
        .collect()
}

/// Share of the anchor's long words that also appear in the heading.
fn heading_overlap(anchor: &str, heading_words: &HashSet<String>) -> f64 {
    let anchor_words = long_words(anchor);
    if anchor_words.is_empty() {
        return 0.0;
    }
    let shared = anchor_words.intersection(heading_words).count();
    shared as f64 / anchor_words.len() as f64
}

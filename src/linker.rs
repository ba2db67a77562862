//! Document-level linking pipeline.
//!
//! Walks the paragraphs of a generated article, picks a rich anchor for each
//! target page and injects links until the budget is spent. One
//! [`LinkSession`] is created per call, so nothing leaks between articles.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::dom::{collect_paragraphs, ParagraphBlock};
use crate::engine::AnchorEngine;
use crate::inject::LinkScope;
use crate::options::LinkOptions;
use crate::page::PageContext;
use crate::result::{AcceptedLink, LinkReport, LinkingResult, RejectedLink};
use crate::session::LinkSession;
use crate::url_utils::{parse_base_url, target_url};
use crate::Result;

/// An anchor proposed by an upstream writer (e.g. a language model) for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSuggestion {
    pub anchor: String,
    pub page: PageContext,
}

/// Shared state of one pipeline run.
struct LinkRun<'a> {
    engine: AnchorEngine,
    options: &'a LinkOptions,
    base: Option<Url>,
    session: LinkSession,
    html: String,
    accepted: Vec<AcceptedLink>,
    rejected: Vec<RejectedLink>,
}

impl<'a> LinkRun<'a> {
    fn new(html: &str, options: &'a LinkOptions) -> Result<Self> {
        let engine = AnchorEngine::new(options.anchor.clone())?;
        let base = if options.base_url.trim().is_empty() {
            None
        } else {
            Some(parse_base_url(&options.base_url)?)
        };

        Ok(Self {
            engine,
            options,
            base,
            session: LinkSession::new(),
            html: html.to_string(),
            accepted: Vec::new(),
            rejected: Vec::new(),
        })
    }

    fn budget_left(&self) -> bool {
        self.accepted.len() < self.options.max_links
    }

    fn reject(
        &mut self,
        page: &PageContext,
        target: Option<&str>,
        anchor: Option<&str>,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        debug!(page = %page.slug, reason = %reason, "page not linked");
        self.rejected.push(RejectedLink {
            page_title: page.title.clone(),
            target_url: target.map(str::to_string),
            anchor: anchor.map(str::to_string),
            reason,
        });
    }

    /// Target URL for `page`, or `None` after recording why it cannot be linked.
    fn resolve_target(&mut self, page: &PageContext) -> Option<String> {
        if !self.budget_left() {
            self.reject(page, None, None, "link budget reached");
            return None;
        }
        let target = match target_url(self.base.as_ref(), page) {
            Ok(target) => target,
            Err(err) => {
                self.reject(page, None, None, err.to_string());
                return None;
            }
        };
        if self.options.one_link_per_target && self.session.is_target_used(&target) {
            self.reject(page, Some(target.as_str()), None, "target already linked");
            return None;
        }
        Some(target)
    }

    fn link_page(
        &mut self,
        page: &PageContext,
        blocks: &[ParagraphBlock],
        used_blocks: &mut [bool],
    ) {
        let Some(target) = self.resolve_target(page) else {
            return;
        };

        let mut last_anchor: Option<String> = None;
        let mut last_reason = "no paragraph produced an acceptable anchor".to_string();

        for block in blocks {
            let already_linked = self.options.skip_linked_paragraphs && block.link_count > 0;
            if used_blocks[block.index] || already_linked {
                continue;
            }
            let scope = LinkScope::Paragraph {
                index: block.index,
                min_words: self.options.min_paragraph_words,
            };
            let ranked = self.engine.ranked_anchors(
                &self.session,
                &block.text,
                page,
                block.heading.as_deref(),
            );

            // a candidate split by inline markup cannot be placed; try the next one
            for candidate in ranked {
                let result = self.engine.inject_candidate_in(
                    &mut self.session,
                    &self.html,
                    scope,
                    &candidate,
                    &target,
                );
                if result.success {
                    self.html = result.html;
                    used_blocks[block.index] = true;
                    self.accepted.push(AcceptedLink {
                        page_title: page.title.clone(),
                        target_url: target,
                        anchor: candidate.text,
                        paragraph_index: Some(block.index),
                        quality_score: Some(candidate.quality_score),
                        power_pattern_matches: candidate.power_pattern_matches,
                    });
                    return;
                }
                last_anchor = Some(candidate.text);
                last_reason = result.reason;
            }
        }

        self.reject(page, Some(target.as_str()), last_anchor.as_deref(), last_reason);
    }

    fn link_suggestion(&mut self, suggestion: &LinkSuggestion) {
        let page = &suggestion.page;
        let Some(target) = self.resolve_target(page) else {
            return;
        };
        let Some(anchor) = self.engine.prepare_anchor(&self.session, &suggestion.anchor) else {
            self.reject(
                page,
                Some(target.as_str()),
                Some(suggestion.anchor.as_str()),
                "suggested anchor cannot be normalized into a valid, unused anchor",
            );
            return;
        };

        let result = self
            .engine
            .inject_link(&mut self.session, &self.html, &anchor, &target);
        if result.success {
            self.html = result.html;
            self.accepted.push(AcceptedLink {
                page_title: page.title.clone(),
                target_url: target,
                anchor,
                paragraph_index: None,
                quality_score: None,
                power_pattern_matches: Vec::new(),
            });
        } else {
            self.reject(page, Some(target.as_str()), Some(anchor.as_str()), result.reason);
        }
    }

    fn finish(self, requested: usize) -> LinkingResult {
        let wanted = requested.min(self.options.max_links);
        if self.accepted.len() < wanted {
            warn!(
                inserted = self.accepted.len(),
                wanted = wanted,
                "fewer internal links inserted than requested"
            );
        }
        info!(
            inserted = self.accepted.len(),
            skipped = self.rejected.len(),
            "internal linking complete"
        );

        LinkingResult {
            html: self.html,
            report: LinkReport {
                accepted: self.accepted,
                rejected: self.rejected,
                stats: self.session.stats(),
            },
        }
    }
}

/// Insert internal links to `pages` into an HTML article.
///
/// Pages are tried in the order given. For each page, paragraphs are scanned
/// in document order and the first one yielding an injectable anchor gets the
/// link; that paragraph is not used again. Pages that cannot be linked are
/// listed in the report rather than failing the run.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` for inconsistent anchor rules and
/// `Error::InvalidBaseUrl` for an unparsable non-empty base URL.
///
/// # Example
///
/// ```rust
/// use rs_anchorlink::{insert_internal_links, LinkOptions, PageContext};
///
/// let html = "<p>Implementing modern SEO strategies requires careful keyword research and consistent content optimization efforts.</p>";
/// let page = PageContext::new("SEO Strategy Guide", "seo-strategy-guide")
///     .with_description("Implementing modern SEO strategies for sustainable organic growth")
///     .with_primary_keyword("SEO strategies");
/// let options = LinkOptions {
///     base_url: "https://example.com".to_string(),
///     min_paragraph_words: 5,
///     ..LinkOptions::default()
/// };
///
/// let result = insert_internal_links(html, &[page], &options)?;
/// assert!(result.html.contains(r#"href="https://example.com/seo-strategy-guide""#));
/// assert_eq!(result.report.accepted.len(), 1);
/// # Ok::<(), rs_anchorlink::Error>(())
/// ```
pub fn insert_internal_links(
    html: &str,
    pages: &[PageContext],
    options: &LinkOptions,
) -> Result<LinkingResult> {
    insert_links(html, &[], pages, options)
}

/// Insert links for anchors proposed upstream.
///
/// Each suggestion is normalized and validated like any generated anchor
/// before injection; unusable suggestions are reported, not fatal.
///
/// # Errors
///
/// Same as [`insert_internal_links`].
pub fn insert_suggested_links(
    html: &str,
    suggestions: &[LinkSuggestion],
    options: &LinkOptions,
) -> Result<LinkingResult> {
    insert_links(html, suggestions, &[], options)
}

/// Apply `suggestions` first, then fill the remaining budget with generated
/// anchors for `pages`, all within one session.
///
/// Paragraphs that received a suggested link count as already linked.
///
/// # Errors
///
/// Same as [`insert_internal_links`].
pub fn insert_links(
    html: &str,
    suggestions: &[LinkSuggestion],
    pages: &[PageContext],
    options: &LinkOptions,
) -> Result<LinkingResult> {
    let mut run = LinkRun::new(html, options)?;
    for suggestion in suggestions {
        run.link_suggestion(suggestion);
    }

    let blocks = collect_paragraphs(&run.html, options.min_paragraph_words);
    let mut used_blocks = vec![false; blocks.len()];
    debug!(paragraphs = blocks.len(), pages = pages.len(), "starting internal linking");
    for page in pages {
        run.link_page(page, &blocks, &mut used_blocks);
    }

    Ok(run.finish(suggestions.len() + pages.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn invalid_base_url_is_an_error() {
        let options = LinkOptions {
            base_url: "not a url".to_string(),
            ..LinkOptions::default()
        };
        assert!(matches!(
            insert_internal_links("<p>x</p>", &[], &options),
            Err(Error::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn empty_page_list_leaves_html_untouched() {
        let html = "<p>Nothing to link in this short paragraph of text today.</p>";
        let result = insert_internal_links(html, &[], &LinkOptions::default()).unwrap();
        assert_eq!(result.html, html);
        assert!(result.report.accepted.is_empty());
        assert!(result.report.rejected.is_empty());
    }

    #[test]
    fn unresolvable_slug_is_reported() {
        let page = PageContext::new("Guide", "guide");
        let result = insert_internal_links("<p>text</p>", &[page], &LinkOptions::default()).unwrap();
        assert_eq!(result.report.rejected.len(), 1);
        assert!(result.report.rejected[0].target_url.is_none());
    }
}

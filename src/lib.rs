//! # rs-anchorlink
//!
//! Rich anchor text selection and internal link injection for generated
//! HTML articles.
//!
//! The library slides a 4-7 word window over each paragraph, rejects
//! generic or badly bounded phrases, scores the rest for semantic fit,
//! naturalness and search value, and links the best unused phrase to the
//! target page. Per-article state (anchors already used, injection history)
//! lives in an explicit [`LinkSession`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_anchorlink::{AnchorConfig, AnchorEngine, LinkSession, PageContext};
//!
//! let engine = AnchorEngine::new(AnchorConfig::default())?;
//! let mut session = LinkSession::new();
//!
//! let paragraph = "Implementing modern SEO strategies requires careful keyword research and consistent content optimization efforts.";
//! let page = PageContext::new("SEO Strategy Guide", "seo-strategy-guide")
//!     .with_description("Implementing modern SEO strategies for sustainable organic growth")
//!     .with_primary_keyword("SEO strategies");
//!
//! if let Some(anchor) = engine.find_best_anchor(&session, paragraph, &page, None) {
//!     let html = format!("<p>{paragraph}</p>");
//!     let result = engine.inject_candidate(&mut session, &html, &anchor, "https://example.com/seo-strategy-guide");
//!     assert!(result.success);
//! }
//! # Ok::<(), rs_anchorlink::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Candidate generation**: every 4-7 word span, cleaned and validated
//! - **Scoring**: semantic overlap, naturalness and SEO pattern sub-scores
//! - **Selection**: best unused anchor, with a soft preference against
//!   repeating the nearby heading
//! - **Injection**: first unlinked occurrence only, never nested in another link
//! - **Pipeline**: whole-article linking with a structured report

mod error;
mod options;
mod patterns;
mod result;

/// Tokenization, tag stripping and anchor normalization.
pub mod text;

/// Anchor validation rules.
pub mod validate;

/// Semantic, naturalness and SEO scoring.
pub mod scoring;

/// Candidate generation and ranking.
pub mod candidate;

/// Per-article linking state.
pub mod session;

/// Anchor selection engine.
pub mod engine;

/// Link injection into HTML.
pub mod inject;

/// Target page records and loose JSON parsing.
pub mod page;

/// URL utilities for building link targets.
pub mod url_utils;

/// Paragraph and heading walk over HTML.
pub mod dom;

/// Document-level linking pipeline.
pub mod linker;

// Public API - re-exports
pub use candidate::{AnchorCandidate, ContextWindow, Position};
pub use engine::AnchorEngine;
pub use error::{Error, Result};
pub use inject::{InjectionResult, LinkScope};
pub use linker::{insert_internal_links, insert_links, insert_suggested_links, LinkSuggestion};
pub use options::{AnchorConfig, LinkOptions};
pub use page::{parse_page, parse_pages, PageContext};
pub use result::{AcceptedLink, LinkReport, LinkingResult, RejectedLink};
pub use session::{InjectionRecord, LinkSession, LinkStats};
pub use text::normalize_anchor;
pub use validate::{validate_anchor, ValidationResult, ValidationStatus};

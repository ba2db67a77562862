//! Link injection into HTML.
//!
//! The HTML is parsed with `dom_query` and only text nodes are searched, so
//! attribute values and comments are never touched. Text inside an existing
//! `<a>`, a heading, form controls, `<title>` or script/style/code blocks is
//! skipped, so a new link is never nested inside another one. The anchor is
//! matched case-insensitively on word boundaries, with any whitespace between
//! its words, and only the first match in the scope is wrapped. A phrase
//! split across inline markup does not match.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dom::{content_root, linkable_text, paragraph_node, parse_html, serialize_html};

/// Outcome of one injection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    /// The updated HTML, or the input unchanged on failure.
    #[serde(skip)]
    pub html: String,
    pub success: bool,
    pub anchor: String,
    pub target_url: String,
    /// Byte offset of the linked text within the text of the searched scope.
    pub offset: Option<usize>,
    pub word_count: usize,
    /// Rejection or lookup failure reason; empty on success.
    pub reason: String,
}

/// Where in a document a link may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Anywhere in the document body.
    Document,
    /// Inside one block, numbered as by
    /// [`collect_paragraphs`](crate::dom::collect_paragraphs) with the same `min_words`.
    Paragraph { index: usize, min_words: usize },
}

/// A link placed into HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub html: String,
    pub offset: usize,
}

/// Wrap the first linkable occurrence of `anchor` in the document body.
///
/// Same as [`place_link_in`] with [`LinkScope::Document`].
#[must_use]
pub fn place_link(html: &str, anchor: &str, target_url: &str) -> Option<Placement> {
    place_link_in(html, LinkScope::Document, anchor, target_url)
}

/// Wrap the first linkable occurrence of `anchor` within `scope` in
/// `<a href="target_url">`.
///
/// The original casing of the matched text is kept. Returns `None` when the
/// scope does not exist or the anchor does not occur in its linkable text.
#[must_use]
pub fn place_link_in(
    html: &str,
    scope: LinkScope,
    anchor: &str,
    target_url: &str,
) -> Option<Placement> {
    let pattern = anchor_pattern(anchor)?;
    let document = parse_html(html);
    let scope_node = match scope {
        LinkScope::Document => content_root(&document)?,
        LinkScope::Paragraph { index, min_words } => paragraph_node(&document, min_words, index)?,
    };

    let (target, start, end) = linkable_text(&scope_node).into_iter().find_map(|text| {
        let (start, end) = pattern.find(&text.text).map(|m| (m.start(), m.end()))?;
        Some((text, start, end))
    })?;

    let text = &target.text;
    let markup = format!(
        r#"{}<a href="{}" title="{}">{}</a>{}"#,
        escape_text(&text[..start]),
        escape_attribute(target_url),
        escape_attribute(&link_title(anchor)),
        escape_text(&text[start..end]),
        escape_text(&text[end..]),
    );
    target.node.replace_with_html(markup);

    Some(Placement {
        html: serialize_html(&document)?,
        offset: target.offset + start,
    })
}

/// Title attribute text for an inserted link.
#[must_use]
pub fn link_title(anchor: &str) -> String {
    format!("Learn about {}", anchor.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn anchor_pattern(anchor: &str) -> Option<Regex> {
    let words: Vec<String> = anchor.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+"))).ok()
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

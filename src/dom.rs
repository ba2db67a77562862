//! DOM walk over generated content.
//!
//! Uses `dom_query` to list the text blocks of an HTML document in reading
//! order, each paired with the heading that precedes it, and to find the
//! text nodes a new link may be placed in. Content fragments are parsed as
//! fragments so serializing them back does not add `<html>`/`<body>`.

pub use dom_query::{Document, NodeRef};
pub use tendril::StrTendril;

use crate::patterns::DOCUMENT_MARKER;
use crate::text::collapse_whitespace;

/// Elements whose text never receives a new link.
const PROTECTED_TAGS: &[&str] = &[
    "a", "h1", "h2", "h3", "h4", "h5", "h6", "head", "title", "script", "style", "noscript",
    "template", "code", "pre", "kbd", "samp", "textarea", "select", "option", "button", "label",
    "iframe", "svg", "math",
];

/// A paragraph-like block of text that may receive a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphBlock {
    /// Position among all collected blocks, in document order.
    pub index: usize,
    /// Tag-free text with whitespace collapsed.
    pub text: String,
    /// Text of the closest heading before this block.
    pub heading: Option<String>,
    /// Number of `<a>` elements already inside the block.
    pub link_count: usize,
}

/// A text node outside any protected element.
#[derive(Debug, Clone)]
pub struct LinkableText<'a> {
    pub node: NodeRef<'a>,
    pub text: String,
    /// Byte offset of `text` within the text content of the searched scope.
    pub offset: usize,
}

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Parse HTML as a full document when it looks like one, else as a fragment.
#[must_use]
pub fn parse_html(html: &str) -> Document {
    if DOCUMENT_MARKER.is_match(html) {
        Document::from(html)
    } else {
        Document::fragment(html)
    }
}

/// The element holding the content: `<body>` for documents, the fragment's
/// wrapper element otherwise.
#[must_use]
pub fn content_root(document: &Document) -> Option<NodeRef<'_>> {
    let root = document.root();
    if root.is_fragment() {
        root.first_element_child()
    } else {
        document.body()
    }
}

/// Serialize a document from [`parse_html`] back into the same shape.
#[must_use]
pub fn serialize_html(document: &Document) -> Option<String> {
    let root = document.root();
    let html = if root.is_fragment() {
        root.first_element_child()?.try_inner_html()?
    } else {
        root.try_html()?
    };
    Some(html.to_string())
}

/// Collect `<p>` and `<li>` blocks with at least `min_words` words.
///
/// List items that wrap their own paragraphs are skipped so text is not
/// counted twice. Blocks inside protected elements (links, buttons, code)
/// are ignored.
#[must_use]
pub fn collect_paragraphs(html: &str, min_words: usize) -> Vec<ParagraphBlock> {
    let document = parse_html(html);
    paragraph_nodes(&document, min_words)
        .into_iter()
        .map(|(_, block)| block)
        .collect()
}

/// The element of the block numbered `index` by [`collect_paragraphs`].
#[must_use]
pub fn paragraph_node(document: &Document, min_words: usize, index: usize) -> Option<NodeRef<'_>> {
    paragraph_nodes(document, min_words)
        .into_iter()
        .nth(index)
        .map(|(node, _)| node)
}

fn paragraph_nodes(document: &Document, min_words: usize) -> Vec<(NodeRef<'_>, ParagraphBlock)> {
    let Some(root) = content_root(document) else {
        return Vec::new();
    };
    let mut blocks = Vec::new();
    let mut heading: Option<String> = None;

    walk_elements(&root, |node, tag| {
        if is_heading(tag) {
            let text = collapse_whitespace(&text_content(node));
            heading = (!text.is_empty()).then_some(text);
            return false;
        }
        if is_protected(tag) {
            return false;
        }
        if tag == "p" || (tag == "li" && !has_descendant(node, "p")) {
            let text = collapse_whitespace(&text_content(node));
            if text.split_whitespace().count() >= min_words {
                blocks.push((
                    *node,
                    ParagraphBlock {
                        index: blocks.len(),
                        text,
                        heading: heading.clone(),
                        link_count: count_descendants(node, "a"),
                    },
                ));
            }
        }
        true
    });

    blocks
}

/// Text nodes under `scope` that may receive a link, in document order.
///
/// Returns nothing when `scope` itself sits inside a protected element.
#[must_use]
pub fn linkable_text<'a>(scope: &NodeRef<'a>) -> Vec<LinkableText<'a>> {
    let scope_protected = std::iter::once(*scope)
        .chain(scope.ancestors_it(None))
        .any(|node| tag_name(&node).is_some_and(|tag| is_protected(&tag)));
    if scope_protected {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut offset = 0;
    let mut stack: Vec<(NodeRef<'a>, bool)> = scope
        .children()
        .into_iter()
        .rev()
        .map(|child| (child, false))
        .collect();

    while let Some((node, protected)) = stack.pop() {
        if node.is_text() {
            let text = text_content(&node).to_string();
            let len = text.len();
            if !protected && !text.trim().is_empty() {
                found.push(LinkableText { node, text, offset });
            }
            offset += len;
            continue;
        }
        let protected = protected || tag_name(&node).is_some_and(|tag| is_protected(&tag));
        stack.extend(node.children().into_iter().rev().map(|child| (child, protected)));
    }

    found
}

/// Pre-order walk over the elements below `root`; `visit` returns whether
/// to descend into the element's children.
fn walk_elements<'a>(root: &NodeRef<'a>, mut visit: impl FnMut(&NodeRef<'a>, &str) -> bool) {
    let mut stack: Vec<NodeRef<'a>> = root.children().into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if !node.is_element() {
            continue;
        }
        let Some(tag) = tag_name(&node) else {
            continue;
        };
        if visit(&node, &tag) {
            stack.extend(node.children().into_iter().rev());
        }
    }
}

fn has_descendant(node: &NodeRef, tag: &str) -> bool {
    node.descendants_it().any(|d| d.has_name(tag))
}

fn count_descendants(node: &NodeRef, tag: &str) -> usize {
    node.descendants_it().filter(|d| d.has_name(tag)).count()
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_protected(tag: &str) -> bool {
    PROTECTED_TAGS.contains(&tag)
}

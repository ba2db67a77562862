//! Target page records.
//!
//! Page lists come from sitemap crawls or CMS listings whose JSON shapes
//! vary (`title` vs `title.rendered`, `slug` vs `link`, several keyword
//! field spellings). `parse_page` maps any known shape onto a strict
//! `PageContext` and reports `Error::UnrecognizedSchema` when nothing usable
//! is present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::text::strip_tags;
use crate::url_utils::{is_absolute_url, last_path_segment};
use crate::{Error, Result};

/// A page that content may link to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    pub title: String,
    pub slug: String,
    /// Absolute URL when the source listing provided one; otherwise the slug
    /// is resolved against the pipeline's base URL.
    pub url: Option<String>,
    pub description: Option<String>,
    pub primary_keyword: Option<String>,
    pub secondary_keywords: Vec<String>,
    pub category: Option<String>,
    pub topics: Vec<String>,
}

impl PageContext {
    /// Create a page with just a title and slug.
    #[must_use]
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_primary_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.primary_keyword = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn with_secondary_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secondary_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

const TITLE_FIELDS: &[&str] = &["title", "name", "headline"];
const SLUG_FIELDS: &[&str] = &["slug"];
const URL_FIELDS: &[&str] = &["link", "url", "loc", "permalink"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "excerpt", "meta_description", "metaDescription"];
const PRIMARY_KEYWORD_FIELDS: &[&str] = &[
    "primaryKeyword",
    "primary_keyword",
    "focusKeyword",
    "focus_keyword",
    "keyword",
];
const SECONDARY_KEYWORD_FIELDS: &[&str] = &["secondaryKeywords", "secondary_keywords", "keywords"];
const CATEGORY_FIELDS: &[&str] = &["category", "categories"];
const TOPIC_FIELDS: &[&str] = &["topics", "tags"];
const LIST_FIELDS: &[&str] = &["pages", "items", "posts", "urls"];

/// Map one loosely-typed page record onto a `PageContext`.
///
/// # Errors
///
/// Returns `Error::UnrecognizedSchema` when the value is not an object or
/// carries neither a recognizable title nor a slug/URL.
pub fn parse_page(value: &Value) -> Result<PageContext> {
    let Value::Object(obj) = value else {
        return Err(Error::UnrecognizedSchema(format!(
            "expected a page object, got {}",
            json_kind(value)
        )));
    };

    let title = text_field(obj, TITLE_FIELDS);
    let url = text_field(obj, URL_FIELDS).filter(|u| is_absolute_url(u));
    let slug = text_field(obj, SLUG_FIELDS)
        .or_else(|| text_field(obj, URL_FIELDS).and_then(|u| last_path_segment(&u)));

    let (title, slug) = match (title, slug) {
        (Some(title), Some(slug)) => (title, slug),
        (Some(title), None) => {
            let slug = slugify(&title);
            (title, slug)
        }
        (None, Some(slug)) => (slug.replace(['-', '_'], " "), slug),
        (None, None) => {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            return Err(Error::UnrecognizedSchema(format!(
                "no title or slug field among [{}]",
                keys.join(", ")
            )));
        }
    };

    Ok(PageContext {
        title,
        slug,
        url,
        description: text_field(obj, DESCRIPTION_FIELDS),
        primary_keyword: text_field(obj, PRIMARY_KEYWORD_FIELDS),
        secondary_keywords: list_field(obj, SECONDARY_KEYWORD_FIELDS),
        category: list_field(obj, CATEGORY_FIELDS).into_iter().next(),
        topics: list_field(obj, TOPIC_FIELDS),
    })
}

/// Parse a JSON page listing: either an array of records or an object
/// wrapping one under `pages`, `items`, `posts` or `urls`.
///
/// # Errors
///
/// Returns `Error::Json` for malformed JSON and `Error::UnrecognizedSchema`
/// for an unknown wrapper shape or an unusable record.
pub fn parse_pages(json: &str) -> Result<Vec<PageContext>> {
    let value: Value = serde_json::from_str(json)?;
    parse_page_list(&value)
}

/// Same as [`parse_pages`] for an already decoded value.
///
/// # Errors
///
/// See [`parse_pages`].
pub fn parse_page_list(value: &Value) -> Result<Vec<PageContext>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => LIST_FIELDS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .ok_or_else(|| {
                Error::UnrecognizedSchema(format!(
                    "page listing object has none of [{}]",
                    LIST_FIELDS.join(", ")
                ))
            })?,
        other => {
            return Err(Error::UnrecognizedSchema(format!(
                "expected a page array, got {}",
                json_kind(other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_page(item).map_err(|err| match err {
                Error::UnrecognizedSchema(msg) => {
                    Error::UnrecognizedSchema(format!("page #{index}: {msg}"))
                }
                other => other,
            })
        })
        .collect()
}

/// First non-empty string found under any of `keys`.
///
/// Accepts plain strings and WordPress-style `{ "rendered": "..." }` objects;
/// markup is stripped.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let raw = match obj.get(*key)? {
            Value::String(s) => s.as_str(),
            Value::Object(inner) => inner.get("rendered")?.as_str()?,
            _ => return None,
        };
        let text = strip_tags(raw);
        (!text.is_empty()).then_some(text)
    })
}

/// String list under any of `keys`; comma-separated strings are split.
fn list_field(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| match obj.get(*key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Object(inner) => inner
                            .get("name")
                            .and_then(Value::as_str)
                            .map(|s| s.trim().to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lowercase hyphenated slug from a title.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

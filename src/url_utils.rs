//! URL utilities for building link targets.

use url::Url;

use crate::page::PageContext;
use crate::{Error, Result};

/// Check if a string is an absolute http(s) URL with a host.
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    parse_absolute(s).is_some()
}

fn parse_absolute(s: &str) -> Option<Url> {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// Last non-empty path segment of a URL or path, e.g. the slug of a permalink.
#[must_use]
pub fn last_path_segment(s: &str) -> Option<String> {
    let path = match parse_absolute(s) {
        Some(url) => url.path().to_string(),
        None => s.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Parse and check the base URL used for relative slugs.
///
/// A trailing slash is added so that joining keeps the base path
/// (`https://site.com/blog` + `post` → `https://site.com/blog/post`).
///
/// # Errors
///
/// Returns `Error::InvalidBaseUrl` if `base` is not an absolute http(s) URL.
pub fn parse_base_url(base: &str) -> Result<Url> {
    let trimmed = base.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    parse_absolute(&with_slash).ok_or_else(|| Error::InvalidBaseUrl(base.to_string()))
}

/// Resolve a slug (or already absolute URL) against the base URL.
///
/// Leading slashes on the slug are ignored so it stays under the base path.
#[must_use]
pub fn resolve_slug(base: &Url, slug: &str) -> String {
    let slug = slug.trim();
    if is_absolute_url(slug) {
        return slug.to_string();
    }
    match base.join(slug.trim_start_matches('/')) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!("{}{}", base, slug.trim_start_matches('/')),
    }
}

/// Absolute link target for a page.
///
/// Pages with their own absolute `url` keep it; otherwise the slug is resolved
/// against `base`. With no base, only absolute slugs are usable.
///
/// # Errors
///
/// Returns `Error::InvalidBaseUrl` when the page has no absolute URL and no
/// base is available to resolve its slug.
pub fn target_url(base: Option<&Url>, page: &PageContext) -> Result<String> {
    if let Some(url) = page.url.as_deref().filter(|u| is_absolute_url(u)) {
        return Ok(url.to_string());
    }
    match base {
        Some(base) => Ok(resolve_slug(base, &page.slug)),
        None if is_absolute_url(&page.slug) => Ok(page.slug.trim().to_string()),
        None => Err(Error::InvalidBaseUrl(format!(
            "no base URL to resolve slug \"{}\"",
            page.slug
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com/page"));
        assert!(is_absolute_url("http://example.com"));
        assert!(!is_absolute_url("/relative/path"));
        assert!(!is_absolute_url("ftp://example.com"));
        assert!(!is_absolute_url(""));
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment("https://example.com/blog/seo-guide/").as_deref(),
            Some("seo-guide")
        );
        assert_eq!(last_path_segment("/blog/post?x=1").as_deref(), Some("post"));
        assert_eq!(last_path_segment("https://example.com/"), None);
    }

    #[test]
    fn test_base_url_keeps_path() {
        let base = parse_base_url("https://example.com/blog").unwrap();
        assert_eq!(resolve_slug(&base, "seo-strategy-guide"), "https://example.com/blog/seo-strategy-guide");
        assert_eq!(resolve_slug(&base, "/seo-strategy-guide"), "https://example.com/blog/seo-strategy-guide");
        assert_eq!(resolve_slug(&base, "https://other.com/x"), "https://other.com/x");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(parse_base_url("not a url"), Err(Error::InvalidBaseUrl(_))));
        assert!(parse_base_url("").is_err());
    }

    #[test]
    fn test_target_url_prefers_page_url() {
        let base = parse_base_url("https://example.com").unwrap();
        let mut page = PageContext::new("Guide", "guide");
        assert_eq!(target_url(Some(&base), &page).unwrap(), "https://example.com/guide");

        page.url = Some("https://cdn.example.com/guide/".to_string());
        assert_eq!(target_url(Some(&base), &page).unwrap(), "https://cdn.example.com/guide/");

        let bare = PageContext::new("Guide", "guide");
        assert!(target_url(None, &bare).is_err());
    }
}

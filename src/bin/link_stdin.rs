//! Simple CLI that reads a linking request as JSON from stdin and writes the
//! linked HTML plus report as JSON to stdout.
//!
//! Input: `{ "html": "...", "pages": [...], "suggestions": [...], "options": {...} }`.
//! `pages` accepts any page listing shape understood by `parse_page`;
//! `suggestions` and `options` are optional. Suggestions are applied first, then
//! generated anchors fill the remaining budget within the same session.

use std::io::{self, Read};

use rs_anchorlink::page::parse_page_list;
use rs_anchorlink::{insert_links, LinkOptions, LinkSuggestion};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct Request {
    html: String,
    #[serde(default)]
    pages: Option<Value>,
    #[serde(default)]
    suggestions: Vec<LinkSuggestion>,
    #[serde(default)]
    options: LinkOptions,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "linking failed");
        std::process::exit(1);
    }
}

fn run() -> rs_anchorlink::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    println!("{}", link_request(&input)?);
    Ok(())
}

/// Handle one JSON request and return the JSON response.
fn link_request(input: &str) -> rs_anchorlink::Result<String> {
    let request: Request = serde_json::from_str(input)?;
    let pages = match &request.pages {
        Some(value) => parse_page_list(value)?,
        None => Vec::new(),
    };

    let result = insert_links(&request.html, &request.suggestions, &pages, &request.options)?;
    Ok(serde_json::to_string(&result)?)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

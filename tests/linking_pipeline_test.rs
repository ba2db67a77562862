use rs_anchorlink::{
    insert_internal_links, insert_links, insert_suggested_links, parse_pages, AnchorConfig,
    LinkOptions, LinkSuggestion, PageContext,
};

const SEO_PARAGRAPH: &str = "Implementing modern SEO strategies requires careful keyword research and consistent content optimization efforts.";
const WORKFLOW_PARAGRAPH: &str = "Documented editorial workflows help distributed writing teams publish reliable articles every single week.";

fn article() -> String {
    format!(
        "<article>\
         <h2>Growing Organic Traffic</h2>\
         <p>{SEO_PARAGRAPH}</p>\
         <h2>Writing Workflows</h2>\
         <p>{WORKFLOW_PARAGRAPH}</p>\
         </article>"
    )
}

fn seo_page() -> PageContext {
    PageContext::new("SEO Strategy Guide", "seo-strategy-guide")
        .with_description("Implementing modern SEO strategies for sustainable organic growth")
        .with_primary_keyword("SEO strategies")
}

fn workflow_page() -> PageContext {
    PageContext::new("Editorial Workflow Handbook", "editorial-workflow-handbook")
        .with_description("How documented editorial workflows keep writing teams consistent")
        .with_primary_keyword("editorial workflows")
}

fn options() -> LinkOptions {
    LinkOptions {
        base_url: "https://example.com/blog".to_string(),
        ..LinkOptions::default()
    }
}

fn lenient_options() -> LinkOptions {
    LinkOptions {
        anchor: AnchorConfig {
            min_quality_score: 0.0,
            ..AnchorConfig::default()
        },
        ..options()
    }
}

/// Panics if an `<a>` opens before the previous one closed.
fn assert_no_nested_links(html: &str) {
    let mut open = false;
    let mut rest = html;
    while let Some(pos) = rest.find('<') {
        rest = &rest[pos..];
        if rest.starts_with("<a ") || rest.starts_with("<a>") {
            assert!(!open, "nested link in {html}");
            open = true;
        } else if rest.starts_with("</a>") {
            open = false;
        }
        rest = &rest[1..];
    }
}

#[test]
fn links_each_page_in_its_own_paragraph() {
    let result =
        insert_internal_links(&article(), &[seo_page(), workflow_page()], &lenient_options())
            .unwrap();

    assert_eq!(result.report.accepted.len(), 2, "{:?}", result.report.rejected);
    assert!(result.report.rejected.is_empty());

    let first = &result.report.accepted[0];
    assert_eq!(first.anchor, "Implementing modern SEO strategies");
    assert_eq!(first.target_url, "https://example.com/blog/seo-strategy-guide");
    assert_eq!(first.paragraph_index, Some(0));

    let second = &result.report.accepted[1];
    assert_eq!(second.target_url, "https://example.com/blog/editorial-workflow-handbook");
    assert_eq!(second.paragraph_index, Some(1));
    assert!(WORKFLOW_PARAGRAPH.contains(&second.anchor));
    assert!((4..=7).contains(&second.anchor.split_whitespace().count()));

    assert_eq!(result.html.matches("<a ").count(), 2);
    assert_no_nested_links(&result.html);
    assert_eq!(result.report.stats.total_injections, 2);
    assert_eq!(result.report.stats.unique_targets, 2);
}

#[test]
fn default_threshold_links_keyword_paragraph() {
    let result = insert_internal_links(&article(), &[seo_page()], &options()).unwrap();
    assert_eq!(result.report.accepted.len(), 1);
    assert!(result.html.contains(
        r#"<a href="https://example.com/blog/seo-strategy-guide" title="Learn about Implementing modern SEO strategies">Implementing modern SEO strategies</a>"#
    ));
}

#[test]
fn budget_limits_inserted_links() {
    let opts = LinkOptions {
        max_links: 1,
        ..lenient_options()
    };
    let result = insert_internal_links(&article(), &[seo_page(), workflow_page()], &opts).unwrap();

    assert_eq!(result.report.accepted.len(), 1);
    assert_eq!(result.report.rejected.len(), 1);
    assert_eq!(result.report.rejected[0].page_title, "Editorial Workflow Handbook");
    assert_eq!(result.report.rejected[0].reason, "link budget reached");
}

#[test]
fn repeated_target_is_linked_once() {
    let result =
        insert_internal_links(&article(), &[seo_page(), seo_page()], &lenient_options()).unwrap();

    assert_eq!(result.report.accepted.len(), 1);
    assert_eq!(result.report.rejected[0].reason, "target already linked");
    assert_eq!(
        result.report.rejected[0].target_url.as_deref(),
        Some("https://example.com/blog/seo-strategy-guide")
    );
}

#[test]
fn paragraphs_with_links_are_skipped() {
    let html = format!(
        "<p>{SEO_PARAGRAPH} See the <a href=\"/glossary\">glossary</a>.</p>"
    );
    let result = insert_internal_links(&html, &[seo_page()], &lenient_options()).unwrap();
    assert!(result.report.accepted.is_empty());
    assert_eq!(result.html, html);
    assert_eq!(
        result.report.rejected[0].reason,
        "no paragraph produced an acceptable anchor"
    );
}

#[test]
fn link_lands_in_the_paragraph_it_was_chosen_from() {
    let short = r#"<p>Implementing modern SEO strategies <a href="/faq">today</a>.</p>"#;
    let html = format!("{short}<p>{SEO_PARAGRAPH}</p>");
    let result = insert_internal_links(&html, &[seo_page()], &options()).unwrap();

    assert_eq!(result.report.accepted.len(), 1, "{:?}", result.report.rejected);
    assert_eq!(result.report.accepted[0].paragraph_index, Some(0));
    assert!(result.html.starts_with(short));
    assert!(result.html.contains(
        r#"<p><a href="https://example.com/blog/seo-strategy-guide" title="Learn about Implementing modern SEO strategies">Implementing modern SEO strategies</a> requires"#
    ));
    assert_no_nested_links(&result.html);
}

#[test]
fn phrase_split_by_markup_falls_back_to_next_candidate() {
    let html = "<p>Implementing <strong>modern SEO strategies</strong> requires careful keyword research and consistent content optimization efforts.</p>";
    let opts = LinkOptions {
        anchor: AnchorConfig {
            min_quality_score: 0.0,
            max_candidates: 60,
            ..AnchorConfig::default()
        },
        ..options()
    };
    let result = insert_internal_links(html, &[seo_page()], &opts).unwrap();

    assert_eq!(result.report.accepted.len(), 1, "{:?}", result.report.rejected);
    let accepted = &result.report.accepted[0];
    assert_ne!(accepted.anchor, "Implementing modern SEO strategies");
    assert!(" requires careful keyword research and consistent content optimization efforts."
        .contains(&accepted.anchor));
    assert!(result.html.starts_with("<p>Implementing <strong>modern SEO strategies</strong>"));
    assert!(result.report.stats.history.len() > 1);
    assert_eq!(result.report.stats.total_injections, 1);
}

#[test]
fn short_paragraphs_are_ignored() {
    let html = "<p>Implementing modern SEO strategies works.</p>";
    let result = insert_internal_links(html, &[seo_page()], &lenient_options()).unwrap();
    assert!(result.report.accepted.is_empty());
    assert_eq!(result.html, html);
}

#[test]
fn suggested_anchor_is_normalized_and_linked() {
    let suggestion = LinkSuggestion {
        anchor: "  careful keyword research and consistent content. ".to_string(),
        page: PageContext::new("Keyword Research", "keyword-research"),
    };
    let result = insert_suggested_links(&article(), &[suggestion], &options()).unwrap();

    assert_eq!(result.report.accepted.len(), 1);
    let accepted = &result.report.accepted[0];
    assert_eq!(accepted.anchor, "careful keyword research and consistent content");
    assert_eq!(accepted.paragraph_index, None);
    assert!(result.html.contains(
        r#"<a href="https://example.com/blog/keyword-research" title="Learn about careful keyword research and consistent content">careful keyword research and consistent content</a>"#
    ));
}

#[test]
fn unusable_suggestions_are_reported() {
    let suggestions = [
        LinkSuggestion {
            anchor: "click here for more".to_string(),
            page: PageContext::new("Pricing", "pricing"),
        },
        LinkSuggestion {
            anchor: "quarterly revenue forecasting spreadsheet templates".to_string(),
            page: PageContext::new("Templates", "templates"),
        },
    ];
    let result = insert_suggested_links(&article(), &suggestions, &options()).unwrap();

    assert!(result.report.accepted.is_empty());
    assert_eq!(result.report.rejected.len(), 2);
    assert_eq!(
        result.report.rejected[0].reason,
        "suggested anchor cannot be normalized into a valid, unused anchor"
    );
    assert_eq!(
        result.report.rejected[1].reason,
        "anchor text not found outside existing links"
    );
    assert_eq!(result.html, article());
    assert_eq!(result.report.stats.history.len(), 1);
}

#[test]
fn suggestions_and_generated_links_share_one_session() {
    let suggestion = LinkSuggestion {
        anchor: "careful keyword research and consistent content".to_string(),
        page: PageContext::new("Keyword Research", "keyword-research"),
    };

    let skipping = insert_links(&article(), &[suggestion.clone()], &[seo_page()], &options())
        .unwrap();
    assert_eq!(skipping.report.accepted.len(), 1);
    assert_eq!(skipping.report.rejected.len(), 1);
    assert_eq!(skipping.report.rejected[0].page_title, "SEO Strategy Guide");

    let opts = LinkOptions {
        skip_linked_paragraphs: false,
        ..options()
    };
    let both = insert_links(&article(), &[suggestion], &[seo_page()], &opts).unwrap();
    let anchors: Vec<&str> = both
        .report
        .accepted
        .iter()
        .map(|a| a.anchor.as_str())
        .collect();
    assert_eq!(
        anchors,
        vec![
            "careful keyword research and consistent content",
            "Implementing modern SEO strategies",
        ]
    );
    assert_no_nested_links(&both.html);
    assert_eq!(both.report.stats.unique_anchors, 2);
}

#[test]
fn pipeline_accepts_parsed_page_listing() {
    let pages = parse_pages(
        r#"{
            "posts": [
                {
                    "title": { "rendered": "SEO Strategy Guide" },
                    "link": "https://example.com/guides/seo-strategy-guide/",
                    "excerpt": { "rendered": "<p>Implementing modern SEO strategies for sustainable organic growth</p>" },
                    "focus_keyword": "SEO strategies"
                }
            ]
        }"#,
    )
    .unwrap();

    let result = insert_internal_links(&article(), &pages, &LinkOptions::default()).unwrap();
    assert_eq!(result.report.accepted.len(), 1);
    assert_eq!(
        result.report.accepted[0].target_url,
        "https://example.com/guides/seo-strategy-guide/"
    );
}

#[test]
fn report_serializes_to_camel_case_json() {
    let result = insert_internal_links(&article(), &[seo_page()], &options()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(
        json["report"]["accepted"][0]["targetUrl"],
        "https://example.com/blog/seo-strategy-guide"
    );
    assert_eq!(json["report"]["stats"]["totalInjections"], 1);
    assert!(json["html"].as_str().unwrap().contains("<a href="));
}

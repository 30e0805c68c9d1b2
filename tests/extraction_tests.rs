//! Content extraction tests
//!
//! One test per service quirk in the default rule table, run against small
//! pages shaped like the real ones.

use faqbook::{ContentExtractor, Extraction, RuleTable};
use pretty_assertions::assert_eq;
use scraper::Html;

fn extract(name: &str, page: &str) -> Extraction {
    let extractor = ContentExtractor::new(RuleTable::default()).unwrap();
    let mut doc = Html::parse_document(page);
    extractor.extract(name, &mut doc)
}

fn main_parsys(inner: &str) -> String {
    format!(
        r#"<html><body><main><section><div class="parsys">{}</div></section></main></body></html>"#,
        inner
    )
}

#[test]
fn test_extraction_is_deterministic() {
    let page = main_parsys(
        r#"<div class="aws-text-box"><h2 id="a">A</h2><p>One</p></div><h2>B</h2><p>Two</p>"#,
    );
    let first = extract("sns", &page);
    let second = extract("sns", &page);
    assert_eq!(first, second);
    assert!(!first.missed);
}

#[test]
fn test_unknown_service_takes_defaults() {
    let out = extract(
        "brand-new-service",
        &main_parsys(r#"<h2 id="q1">Q1</h2><h3 id="q2">Q2</h3>"#),
    );
    assert_eq!(out.html, r#"<h2 id="brand-new-service-q1">Q1</h2><h3 id="q2">Q2</h3>"#);
}

#[test]
fn test_column_content_prepended() {
    let out = extract(
        "ec2",
        &main_parsys(
            r#"<div class="columnbuilder"><div class="parsys col1"><div class="section"><ul><li>Mini ToC</li></ul></div><div class="aws-text-box"><p>Intro</p></div></div></div><div class="aws-text-box"><h2 id="a">A</h2></div>"#,
        ),
    );
    assert_eq!(
        out.html,
        r#"<div class="aws-text-box"><p>Intro</p></div><div class="aws-text-box"><h2 id="ec2-a">A</h2></div>"#
    );
}

#[test]
fn test_column_builders_dropped_for_storage_services() {
    for name in ["s3", "efs", "glacier", "route53"] {
        let out = extract(
            name,
            &main_parsys(
                r#"<div class="columnbuilder"><div class="parsys col1"><p>Banner</p></div></div><h2 id="x">X</h2>"#,
            ),
        );
        assert_eq!(out.html, format!(r#"<h2 id="{}-x">X</h2>"#, name));
    }
}

#[test]
fn test_elasticache_keeps_title_block() {
    let out = extract(
        "elasticache",
        &main_parsys(
            r#"<div class="title-wrapper"><h2 id="t">T</h2></div><div class="columnbuilder"><p>Cols</p></div><p>Body</p>"#,
        ),
    );
    assert_eq!(
        out.html,
        r#"<div class="title-wrapper"><h2 id="elasticache-t">T</h2></div><p>Body</p>"#
    );
}

#[test]
fn test_premiumsupport_drops_leading_toc() {
    let out = extract(
        "premiumsupport",
        &main_parsys(
            r#"<div class="divider"><hr></div><div class="aws-text-box"><ul><li>toc</li></ul></div><div class="aws-text-box"><h2 id="q">Q</h2></div>"#,
        ),
    );
    assert_eq!(
        out.html,
        r#"<div class="aws-text-box"><h2 id="premiumsupport-q">Q</h2></div>"#
    );
}

#[test]
fn test_trailing_paragraph_removed() {
    let page = main_parsys(
        r#"<div class="aws-text-box"><div><p>Answer</p><p>Back to top</p></div></div>"#,
    );
    assert_eq!(
        extract("emr", &page).html,
        r#"<div class="aws-text-box"><div><p>Answer</p></div></div>"#
    );
    assert_eq!(
        extract("ec2", &page).html,
        r#"<div class="aws-text-box"><div><p>Answer</p><p>Back to top</p></div></div>"#
    );
}

#[test]
fn test_back_to_top_boxes_removed() {
    let out = extract(
        "lambda",
        &main_parsys(
            r##"<div class="aws-text-box"><h2 id="q">Q</h2></div><div class="aws-text-box"><p><a href="#top">Top</a></p></div>"##,
        ),
    );
    assert_eq!(out.html, r#"<div class="aws-text-box"><h2 id="lambda-q">Q</h2></div>"#);
}

#[test]
fn test_console_concatenates_tabs() {
    let out = extract(
        "console",
        r#"<html><body><div class="tab-pane"><div class="par parsys"><div class="title-wrapper"><h2 id="t1">Tab1</h2></div><div class="aws-text-box">toc</div><div class="aws-text-box"><p>One</p></div></div></div><div class="tab-pane"><div class="par parsys"><p>Two</p></div></div></body></html>"#,
    );
    assert_eq!(
        out.html,
        r#"<div class="title-wrapper"><h2 id="console-t1">Tab1</h2></div><div class="aws-text-box"><p>One</p></div><p>Two</p>"#
    );
}

#[test]
fn test_iam_takes_last_row() {
    let out = extract(
        "iam",
        r#"<html><body><main><section><div class="row-builder"><div class="parsys"><p>first</p></div></div><div class="row-builder"><div class="parsys"><h2 id="q">last</h2></div></div></section></main></body></html>"#,
    );
    assert_eq!(out.html, r#"<h2 id="iam-q">last</h2>"#);
}

#[test]
fn test_gamelift_takes_first_row() {
    let out = extract(
        "gamelift",
        r#"<html><body><main><section><div class="content"><div class="row-builder"><div class="parsys"><p>first</p></div></div><div class="row-builder"><div class="parsys"><p>second</p></div></div></div></section></main></body></html>"#,
    );
    assert_eq!(out.html, "<p>first</p>");
}

#[test]
fn test_quicksight_central_column() {
    let out = extract(
        "quicksight",
        r#"<html><body><div class="central-column"><div class="col-text"><section id="s1"><h2>Basics</h2><a class="back-to-top">top</a></section></div></div></body></html>"#,
    );
    assert_eq!(out.html, r#"<section id="quicksight-s1"><h2>Basics</h2></section>"#);
}

#[test]
fn test_windows_figures_hoisted() {
    let out = extract(
        "windows",
        &main_parsys(concat!(
            r#"<div class="aws-text-box"><p>toc</p></div>"#,
            r#"<div class="divider"><hr></div>"#,
            r#"<div class="aws-text-box"><h3 id="q1">Q1</h3></div>"#,
            r#"<div class="columnbuilder"><div class="parsys col1"><div class="aws-comp"><figure><div class="wrap"><div class="image"><img src="a.png"></div><figcaption>cap</figcaption></div></figure></div></div></div>"#,
            r#"<div class="content-modal">modal</div>"#,
        )),
    );
    assert_eq!(
        out.html,
        concat!(
            r#"<div class="divider"><hr></div>"#,
            r#"<div class="aws-text-box"><h3 id="windows-q1">Q1</h3></div>"#,
            r#"<div class="aws-comp"><figure><div class="image"><img src="a.png"></div></figure></div>"#,
        )
    );
}

#[test]
fn test_custom_rule_table() {
    let rules: RuleTable = serde_json::from_str(
        r#"{"headings":[{"names":["docs"],"action":"h3"}],"content":[{"names":["docs"],"action":"central_column"}]}"#,
    )
    .unwrap();
    let extractor = ContentExtractor::new(rules).unwrap();
    let mut doc = Html::parse_document(
        r#"<div class="central-column"><div class="col-text"><h3 id="x">X</h3><h2 id="y">Y</h2></div></div>"#,
    );
    let out = extractor.extract("docs", &mut doc);
    assert_eq!(out.html, r#"<h3 id="docs-x">X</h3><h2 id="y">Y</h2>"#);
}

#[test]
fn test_miss_reported() {
    let out = extract("iam", &main_parsys("<p>no rows</p>"));
    assert!(out.missed);
    assert_eq!(out.html, "");
}

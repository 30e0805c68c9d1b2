//! Section indexer tests
//!
//! These tests verify category tracking, short-name derivation, the skip
//! list and URL deduplication on hand-written index pages.

use faqbook::{Section, SectionIndexer};
use pretty_assertions::assert_eq;
use scraper::Html;
use url::Url;

fn base() -> Url {
    Url::parse("https://aws.amazon.com/faqs/").unwrap()
}

fn index_page(blocks: &str) -> Html {
    Html::parse_document(&format!(
        r#"<html><body><main><div class="parsys col1">{}</div></main></body></html>"#,
        blocks
    ))
}

fn index(blocks: &str, skip: &[&str]) -> Vec<Section> {
    let skip: Vec<String> = skip.iter().map(|s| s.to_string()).collect();
    SectionIndexer::new()
        .unwrap()
        .index(&index_page(blocks), &base(), &skip)
}

#[test]
fn test_one_category_two_links() {
    let sections = index(
        r#"<div class="section title-wrapper"><h2><a>Compute</a></h2></div>
           <div class="section aws-text-box"><a href="/ec2/faqs/">Amazon EC2</a></div>
           <div class="section aws-text-box"><a href="/lambda/faqs/">AWS Lambda</a></div>"#,
        &[],
    );

    assert_eq!(
        sections,
        vec![
            Section {
                category: Some("Compute".to_string()),
                title: "Amazon EC2".to_string(),
                url: "https://aws.amazon.com/ec2/faqs/".to_string(),
                name: "ec2".to_string(),
                content: None,
            },
            Section {
                category: Some("Compute".to_string()),
                title: "AWS Lambda".to_string(),
                url: "https://aws.amazon.com/lambda/faqs/".to_string(),
                name: "lambda".to_string(),
                content: None,
            },
        ]
    );
}

#[test]
fn test_same_url_collapses_to_first() {
    let sections = index(
        r#"<div class="section title-wrapper"><h2><a>Compute</a></h2></div>
           <div class="section aws-text-box"><a href="/ec2/faqs/">Amazon EC2</a></div>
           <div class="section aws-text-box"><a href="https://aws.amazon.com/ec2/faqs/">EC2 again</a></div>"#,
        &[],
    );
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Amazon EC2");
}

#[test]
fn test_category_carries_forward() {
    let sections = index(
        r#"<div class="section aws-text-box"><a href="/ec2/faqs/">EC2</a></div>
           <div class="section title-wrapper"><h2><a> Storage </a></h2></div>
           <div class="section aws-text-box"><a href="/s3/faqs/">S3</a></div>
           <div class="section divider"><hr></div>
           <div class="section aws-text-box"><a href="/efs/faqs/">EFS</a></div>"#,
        &[],
    );
    let categories: Vec<Option<&str>> = sections.iter().map(|s| s.category.as_deref()).collect();
    assert_eq!(categories, vec![None, Some("Storage"), Some("Storage")]);
}

#[test]
fn test_skip_list_and_empty_names_dropped() {
    let sections = index(
        r#"<div class="section aws-text-box"><a href="/fps/faqs/">FPS</a></div>
           <div class="section aws-text-box"><a href="/faqs/">Home</a></div>
           <div class="section aws-text-box"><p>No link</p></div>
           <div class="section aws-text-box"><a href=" /sqs/faqs/ ">SQS</a></div>"#,
        &["fps"],
    );
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sqs"]);
    assert_eq!(sections[0].url, "https://aws.amazon.com/sqs/faqs/");
}

#[test]
fn test_relative_links_resolve_against_base() {
    let sections = index(
        r#"<div class="section aws-text-box"><a href="../kms/faqs/">KMS</a></div>"#,
        &[],
    );
    assert_eq!(sections[0].url, "https://aws.amazon.com/kms/faqs/");
    assert_eq!(sections[0].name, "kms");
}

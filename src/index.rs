//! FAQ index parsing
//!
//! The index page is a flat run of section blocks: a `title-wrapper` block
//! names the category that the following `aws-text-box` link blocks belong
//! to. Each link block becomes one [`Section`].

use crate::dom::selector;
use crate::error::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

/// One per-service FAQ page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Category heading it was listed under
    pub category: Option<String>,
    /// Link text on the index page
    pub title: String,
    /// Absolute page URL
    pub url: String,
    /// Service short-name, e.g. `ec2`
    pub name: String,
    /// Extracted HTML fragment, set once after the page is fetched
    pub content: Option<String>,
}

impl Section {
    /// Id of the section's top-level heading in the assembled book
    pub fn anchor(&self) -> String {
        format!("section-{}", self.name)
    }
}

/// Short-name of a FAQ link: the third-from-last `/`-separated segment
///
/// `/ec2/faqs/` splits into `["", "ec2", "faqs", ""]`, giving `ec2`.
pub fn short_name(href: &str) -> Option<&str> {
    let parts: Vec<&str> = href.split('/').collect();
    let idx = parts.len().checked_sub(3)?;
    let name = parts[idx];
    (!name.is_empty()).then_some(name)
}

/// Parses the index page into sections
pub struct SectionIndexer {
    blocks: Selector,
    category: Selector,
    link: Selector,
}

impl SectionIndexer {
    /// Create an indexer
    pub fn new() -> Result<Self> {
        Ok(Self {
            blocks: selector(".parsys.col1 > div.section")?,
            category: selector("h2 a")?,
            link: selector("a")?,
        })
    }

    /// Sections in index order, deduplicated by absolute URL, skip list applied
    pub fn index(&self, doc: &Html, base: &Url, skip: &[String]) -> Vec<Section> {
        let mut category: Option<String> = None;
        let mut seen = HashSet::new();
        let mut sections = Vec::new();

        for block in doc.select(&self.blocks) {
            if has_class(block, "title-wrapper") {
                category = Some(text(block.select(&self.category)));
            } else if has_class(block, "aws-text-box") {
                let Some(section) = self.link_block(block, base, category.as_deref(), skip)
                else {
                    continue;
                };
                if seen.insert(section.url.clone()) {
                    sections.push(section);
                } else {
                    debug!("Duplicate FAQ link {}", section.url);
                }
            }
        }

        info!("total {} faqs", sections.len());
        sections
    }

    fn link_block(
        &self,
        block: ElementRef<'_>,
        base: &Url,
        category: Option<&str>,
        skip: &[String],
    ) -> Option<Section> {
        let href = block
            .select(&self.link)
            .find_map(|a| a.value().attr("href"))
            .unwrap_or("")
            .trim();
        let name = short_name(href)?;
        if skip.iter().any(|s| s == name) {
            debug!("Skipping FAQ {}", name);
            return None;
        }
        let url = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!("Unresolvable FAQ link {}: {}", href, e);
                return None;
            }
        };
        Some(Section {
            category: category.map(str::to_string),
            title: text(block.select(&self.link)),
            url: url.to_string(),
            name: name.to_string(),
            content: None,
        })
    }
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

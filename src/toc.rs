//! Table of contents generation
//!
//! The ToC is one nested list: an entry per section, and inside it a link
//! per FAQ heading found in that section's extracted fragment. Headings are
//! selected with the same per-service rules the extractor used, so the ids
//! line up with the prefixed ones in the fragment.

use crate::dom::selector;
use crate::error::Result;
use crate::extraction::{HeadingLevel, RuleTable};
use crate::index::Section;
use crate::render;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One heading link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocLink {
    /// Heading id (already prefixed with the short-name)
    pub id: String,
    /// Link body, as HTML
    pub title: String,
}

/// Builds the nested link list
pub struct TocGenerator {
    rules: RuleTable,
    h2: Selector,
    h3: Selector,
    section: Selector,
    anchor_title: Selector,
    heading_title: Selector,
}

impl TocGenerator {
    /// Create a generator for a rule table
    pub fn new(rules: RuleTable) -> Result<Self> {
        Ok(Self {
            rules,
            h2: selector(HeadingLevel::H2.selector())?,
            h3: selector(HeadingLevel::H3.selector())?,
            section: selector(HeadingLevel::Section.selector())?,
            anchor_title: selector(HeadingLevel::H2.title_selector())?,
            heading_title: selector(HeadingLevel::Section.title_selector())?,
        })
    }

    fn selectors(&self, level: HeadingLevel) -> (&Selector, &Selector) {
        match level {
            HeadingLevel::H2 => (&self.h2, &self.anchor_title),
            HeadingLevel::H3 => (&self.h3, &self.anchor_title),
            HeadingLevel::Section => (&self.section, &self.heading_title),
        }
    }

    /// Links for every heading in a section's fragment
    pub fn links(&self, section: &Section) -> Vec<TocLink> {
        let Some(ref content) = section.content else {
            warn!("Section {} has no content", section.name);
            return Vec::new();
        };
        let fragment = Html::parse_fragment(content);
        let (headings, titles) = self.selectors(self.rules.heading(&section.name));

        fragment
            .select(headings)
            .map(|heading| {
                let id = heading.value().id().unwrap_or_default().to_string();
                let title = heading
                    .select(titles)
                    .next()
                    .map(|t| t.inner_html().trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| htmlescape::encode_minimal(&render::text_of(heading)));
                TocLink { id, title }
            })
            .collect()
    }

    /// Render the whole table of contents
    pub fn render(&self, sections: &[Section]) -> String {
        let mut out = String::from("<ul>");
        for section in sections {
            out.push_str(&format!(
                "<li><h1><a href=\"#{}\">{}</a></h1><ul>",
                section.anchor(),
                htmlescape::encode_minimal(&section.title)
            ));
            for link in self.links(section) {
                out.push_str(&format!(
                    "<li><a href=\"#{}\">{}</a></li>",
                    htmlescape::encode_minimal(&link.id),
                    link.title
                ));
            }
            out.push_str("</ul></li>");
        }
        out.push_str("</ul>");
        out
    }
}

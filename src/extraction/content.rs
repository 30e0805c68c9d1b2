//! FAQ body extraction
//!
//! Isolates the FAQ body of one service page. The page DOM is cleaned in
//! place (alert boxes, scripts, in-page mini tables of contents, "back to
//! top" boxes) and the content container picked by the [`RuleTable`] is
//! serialized. Every heading id is prefixed with the service short-name
//! first, so fragments from different services never share an id.

use super::rules::{ContentSource, HeadingLevel, PreClean, RuleTable};
use crate::dom::{self, selector};
use crate::error::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Result of extracting one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted HTML fragment
    pub html: String,
    /// The content container matched nothing
    pub missed: bool,
}

struct Selectors {
    h2: Selector,
    h3: Selector,
    section: Selector,
    alert_box: Selector,
    script: Selector,
    column_builders: Selector,
    title_wrapper: Selector,
    text_box: Selector,
    divider: Selector,
    column_toc_list: Selector,
    section_block: Selector,
    column_content: Selector,
    column: Selector,
    content_modal: Selector,
    column_component: Selector,
    any_column_builder: Selector,
    figure: Selector,
    figure_image: Selector,
    main_divider: Selector,
    trailing_paragraph: Selector,
    back_to_top_link: Selector,
    any_text_box: Selector,
    tab_toc: Selector,
    back_to_top: Selector,
    sources: HashMap<ContentSource, Selector>,
}

impl Selectors {
    fn new() -> Result<Self> {
        let sources = [
            ContentSource::Default,
            ContentSource::Tabs,
            ContentSource::LastRow,
            ContentSource::FirstRow,
            ContentSource::CentralColumn,
        ]
        .into_iter()
        .map(|source| Ok((source, selector(source.selector())?)))
        .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            h2: selector(HeadingLevel::H2.selector())?,
            h3: selector(HeadingLevel::H3.selector())?,
            section: selector(HeadingLevel::Section.selector())?,
            alert_box: selector(".parsys > .mbox")?,
            script: selector("script")?,
            column_builders: selector(".parsys > .columnbuilder")?,
            title_wrapper: selector(".parsys > .title-wrapper")?,
            text_box: selector(".parsys > .aws-text-box")?,
            divider: selector(".parsys > .divider")?,
            column_toc_list: selector(".parsys > .columnbuilder .parsys.col1 ul")?,
            section_block: selector(".section")?,
            column_content: selector(".parsys > .columnbuilder .parsys.col1 > :not(.columnbuilder)")?,
            column: selector(".parsys > .columnbuilder .parsys.col1")?,
            content_modal: selector(".content-modal")?,
            column_component: selector(".parsys > .columnbuilder .parsys.col1 > .aws-comp")?,
            any_column_builder: selector(".columnbuilder")?,
            figure: selector("figure")?,
            figure_image: selector("div.image")?,
            main_divider: selector("main > section .parsys > .divider")?,
            trailing_paragraph: selector(".parsys > .aws-text-box > div > p:last-child")?,
            back_to_top_link: selector("a[href=\"#top\"]")?,
            any_text_box: selector(".aws-text-box")?,
            tab_toc: selector(".par.parsys > .title-wrapper + .aws-text-box")?,
            back_to_top: selector(".back-to-top")?,
            sources,
        })
    }

    fn heading(&self, level: HeadingLevel) -> &Selector {
        match level {
            HeadingLevel::H2 => &self.h2,
            HeadingLevel::H3 => &self.h3,
            HeadingLevel::Section => &self.section,
        }
    }
}

/// Per-service content extractor
pub struct ContentExtractor {
    rules: RuleTable,
    sel: Selectors,
}

impl ContentExtractor {
    /// Create an extractor for a rule table
    pub fn new(rules: RuleTable) -> Result<Self> {
        Ok(Self {
            rules,
            sel: Selectors::new()?,
        })
    }

    /// Extract the FAQ body of service `name`, mutating `doc` in place
    #[instrument(skip(self, doc))]
    pub fn extract(&self, name: &str, doc: &mut Html) -> Extraction {
        let headings = self.sel.heading(self.rules.heading(name));
        let prefixed = prefix_heading_ids(doc, headings, name);
        debug!("Prefixed {} heading ids", prefixed);
        let mut html = String::new();

        dom::remove_all(doc, &self.sel.alert_box);
        dom::remove_all(doc, &self.sel.script);

        match self.rules.pre_clean(name) {
            Some(PreClean::ColumnBuilders) => {
                dom::remove_all(doc, &self.sel.column_builders);
            }
            Some(PreClean::DuplicateTitle) => {
                dom::remove_first(doc, &self.sel.title_wrapper);
                dom::remove_first(doc, &self.sel.text_box);
            }
            Some(PreClean::LeadingToc) => {
                dom::remove_first(doc, &self.sel.divider);
                dom::remove_first(doc, &self.sel.text_box);
            }
            None => {}
        }

        let tocs = dom::remove_closest(doc, &self.sel.column_toc_list, &self.sel.section_block);
        debug!("Removed {} in-page ToC blocks", tocs);

        if dom::count(doc, &self.sel.column_content) > 0 {
            if self.rules.figure_layout(name) {
                dom::remove_all(doc, &self.sel.content_modal);
                let hoisted = self.hoist_figures(doc);
                debug!("Hoisted {} figure components", hoisted);
            } else if let Some(column) = doc.select(&self.sel.column).next() {
                html.push_str(&column.inner_html());
            }
        }

        dom::remove_all(doc, &self.sel.column_builders);

        if self.rules.figure_layout(name) {
            dom::remove_preceding_siblings(doc, &self.sel.main_divider);
        }

        if self.rules.trailing_paragraph(name) {
            dom::remove_all(doc, &self.sel.trailing_paragraph);
        }

        dom::remove_closest(doc, &self.sel.back_to_top_link, &self.sel.any_text_box);

        let source = self.rules.content(name);
        match source {
            ContentSource::Tabs => {
                dom::remove_all(doc, &self.sel.tab_toc);
            }
            ContentSource::CentralColumn => {
                dom::remove_all(doc, &self.sel.back_to_top);
            }
            ContentSource::Default | ContentSource::LastRow | ContentSource::FirstRow => {}
        }

        let Some(container) = self.sel.sources.get(&source) else {
            return Extraction { html, missed: true };
        };
        let mut matched = doc.select(container).peekable();
        let missed = matched.peek().is_none();
        if missed {
            warn!(
                "No content for {} ({:?} container {})",
                name,
                source,
                source.selector()
            );
        } else if source == ContentSource::Tabs {
            for pane in matched {
                html.push_str(&pane.inner_html());
            }
        } else if let Some(first) = matched.next() {
            html.push_str(&first.inner_html());
        }

        Extraction { html, missed }
    }

    /// Move figure components out of their column builders
    ///
    /// Each `.aws-comp` in a column is re-inserted after the element that
    /// preceded its column builder, with its `figure` reduced to the
    /// `div.image` elements it contains. Components of one column keep their
    /// order. A column with no preceding element loses its components.
    fn hoist_figures(&self, doc: &mut Html) -> usize {
        let components: Vec<_> = doc
            .select(&self.sel.column_component)
            .map(|c| c.id())
            .collect();
        let mut last_hoisted = HashMap::new();
        let mut hoisted = 0;

        for component in components {
            let plan = doc
                .tree
                .get(component)
                .and_then(ElementRef::wrap)
                .and_then(|comp| {
                    let column = dom::closest(comp, &self.sel.any_column_builder)?;
                    let anchor = column
                        .prev_siblings()
                        .find_map(ElementRef::wrap)
                        .map(|prev| prev.id());
                    let figures: Vec<_> = comp.select(&self.sel.figure).map(|f| f.id()).collect();
                    let images: Vec<_> = comp
                        .select(&self.sel.figure_image)
                        .map(|i| i.id())
                        .collect();
                    Some((column.id(), anchor, figures, images))
                });
            let Some((column, anchor, figures, images)) = plan else {
                continue;
            };
            let anchor = last_hoisted.get(&column).copied().or(anchor);

            if let Some(mut node) = doc.tree.get_mut(column) {
                node.detach();
            }

            for figure in &figures {
                let children: Vec<_> = doc
                    .tree
                    .get(*figure)
                    .map(|f| f.children().map(|c| c.id()).collect())
                    .unwrap_or_default();
                for child in children {
                    if let Some(mut node) = doc.tree.get_mut(child) {
                        node.detach();
                    }
                }
            }
            if let Some(&target) = figures.first() {
                for image in images {
                    let encloses_target = image == target
                        || doc
                            .tree
                            .get(target)
                            .map(|f| f.ancestors().any(|a| a.id() == image))
                            .unwrap_or(true);
                    if encloses_target {
                        continue;
                    }
                    if let Some(mut node) = doc.tree.get_mut(target) {
                        node.append_id(image);
                    }
                }
            }

            match anchor.and_then(|a| doc.tree.get_mut(a)) {
                Some(mut node) => {
                    node.insert_id_after(component);
                    last_hoisted.insert(column, component);
                    hoisted += 1;
                }
                None => debug!("Column builder has no preceding element, dropping component"),
            }
        }
        hoisted
    }
}

/// Set every heading's id to `<name>-<id>`
///
/// Headings without an id get `<name>-<n>`, numbered in document order.
fn prefix_heading_ids(doc: &mut Html, headings: &Selector, name: &str) -> usize {
    let mut unnamed = 0;
    dom::set_attr_where(doc, headings, "id", |heading| {
        Some(match heading.value().id() {
            Some(id) => format!("{}-{}", name, id),
            None => {
                let n = unnamed;
                unnamed += 1;
                format!("{}-{}", name, n)
            }
        })
    })
}

//! Book assembly
//!
//! Joins the extracted sections under their own headings, wraps them with
//! the table of contents in a page shell and produces the final markup with
//! every image pointing at its local copy.

use crate::config::Config;
use crate::dom::{self, selector};
use crate::error::Result;
use crate::images::local_file_name;
use crate::index::Section;
use crate::render;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Assembles the final document
pub struct DocumentAssembler {
    stylesheet: String,
    images_prefix: String,
    pretty: bool,
    images: Selector,
}

impl DocumentAssembler {
    /// Create an assembler from the run config
    pub fn new(config: &Config) -> Result<Self> {
        let images_prefix = config
            .images_dir
            .to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            stylesheet: config.stylesheet.clone(),
            images_prefix,
            pretty: config.pretty,
            images: selector("img[src]")?,
        })
    }

    /// All sections in index order, each under its own `h1`
    pub fn body(&self, sections: &[Section]) -> String {
        sections
            .iter()
            .map(|s| {
                format!(
                    "<h1 id=\"{}\">{}</h1>{}",
                    s.anchor(),
                    htmlescape::encode_minimal(&s.title),
                    s.content.as_deref().unwrap_or_default()
                )
            })
            .collect()
    }

    /// Page shell around the ToC and the body
    pub fn shell(&self, toc: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><link href=\"{}\" rel=\"stylesheet\"></head><body><nav>{}</nav>{}</body></html>",
            htmlescape::encode_minimal(&self.stylesheet),
            toc,
            body
        )
    }

    /// Image sources in document order, one per local file name
    pub fn image_sources(&self, doc: &Html, base: &Url) -> Vec<String> {
        let mut seen = HashSet::new();
        doc.select(&self.images)
            .filter_map(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .filter(|src| {
                let key = base
                    .join(src)
                    .ok()
                    .and_then(|u| local_file_name(&u))
                    .unwrap_or_else(|| src.to_string());
                seen.insert(key)
            })
            .map(str::to_string)
            .collect()
    }

    /// Point every image at its local copy and serialize the document
    pub fn finish(&self, doc: &mut Html, base: &Url) -> Result<String> {
        dom::set_attr_where(doc, &self.images, "src", |img| {
            let src = img.value().attr("src")?;
            let name = local_file_name(&base.join(src.trim()).ok()?)?;
            Some(if self.images_prefix.is_empty() {
                name
            } else {
                format!("{}/{}", self.images_prefix, name)
            })
        });
        render::document(doc, self.pretty)
    }
}

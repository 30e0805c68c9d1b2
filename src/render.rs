//! HTML serialization
//!
//! Markup is produced by html5ever's serializer, the one behind
//! `ElementRef::html`. Compact output is `Html::html` as is. Pretty output
//! walks the tree and feeds the same serializer, only adding line breaks
//! and a two-space indent around block elements.

use crate::error::{Error, Result};
use html5ever::serialize::{HtmlSerializer, SerializeOpts, Serializer, TraversalScope};
use scraper::node::Node;
use scraper::{ElementRef, Html};
use std::io;
use std::sync::OnceLock;

/// Elements that get their own line when pretty printing
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "head", "body", "nav", "main", "section", "article", "header", "footer", "aside",
    "div", "p", "ul", "ol", "li", "dl", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6", "table",
    "thead", "tbody", "tfoot", "tr", "td", "th", "figure", "figcaption", "blockquote", "pre",
    "hr", "form", "link", "meta", "title", "script", "style", "noscript",
];

/// Elements whose content is written exactly as parsed
const VERBATIM_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

/// Serialize a whole document, optionally pretty printed
pub fn document(doc: &Html, pretty: bool) -> Result<String> {
    if !pretty {
        return Ok(doc.html());
    }

    let mut printer = Pretty::new();
    for child in root_nodes(doc) {
        printer.node(child, 0)?;
    }
    let mut out = printer.ser.writer;
    out.push(b'\n');
    String::from_utf8(out).map_err(|e| Error::generic(format!("Serialized non UTF-8 markup: {}", e)))
}

/// Trimmed, whitespace-collapsed text of an element
pub fn text_of(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    whitespace().replace_all(text.trim(), " ").into_owned()
}

fn whitespace() -> &'static regex::Regex {
    static WS: OnceLock<regex::Regex> = OnceLock::new();
    WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"))
}

/// A tree node, flattened to what the printer needs
enum Child<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
    Comment(&'a str),
    Doctype(&'a str),
}

fn classify<'a>(value: &'a Node) -> Option<Child<'a>> {
    match value {
        Node::Text(text) => Some(Child::Text(text)),
        Node::Comment(comment) => Some(Child::Comment(comment)),
        Node::Doctype(doctype) => Some(Child::Doctype(doctype.name())),
        _ => None,
    }
}

fn child_nodes(element: ElementRef<'_>) -> Vec<Child<'_>> {
    element
        .children()
        .filter_map(|child| match ElementRef::wrap(child) {
            Some(el) => Some(Child::Element(el)),
            None => classify(child.value()),
        })
        .collect()
}

fn root_nodes(doc: &Html) -> Vec<Child<'_>> {
    doc.tree
        .root()
        .children()
        .filter_map(|child| match ElementRef::wrap(child) {
            Some(el) => Some(Child::Element(el)),
            None => classify(child.value()),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    None,
    AfterOpen,
    AfterClose,
}

struct Pretty {
    ser: HtmlSerializer<Vec<u8>>,
    boundary: Boundary,
    blocks: usize,
    verbatim: usize,
}

impl Pretty {
    fn new() -> Self {
        let opts = SerializeOpts {
            scripting_enabled: false,
            traversal_scope: TraversalScope::IncludeNode,
            create_missing_parent: false,
        };
        Self {
            ser: HtmlSerializer::new(Vec::new(), opts),
            boundary: Boundary::None,
            blocks: 0,
            verbatim: 0,
        }
    }

    fn line(&mut self, depth: usize) {
        if self.verbatim > 0 {
            return;
        }
        let out = &mut self.ser.writer;
        if !out.is_empty() {
            out.push(b'\n');
        }
        for _ in 0..depth {
            out.extend_from_slice(b"  ");
        }
    }

    fn node(&mut self, child: Child<'_>, depth: usize) -> io::Result<()> {
        match child {
            Child::Element(el) => self.element(el, depth),
            Child::Text(text) => self.text(text, depth),
            Child::Comment(comment) => {
                if self.boundary != Boundary::None {
                    self.line(depth);
                }
                self.ser.write_comment(comment)
            }
            Child::Doctype(name) => {
                self.ser.write_doctype(name)?;
                self.boundary = Boundary::AfterClose;
                Ok(())
            }
        }
    }

    fn text(&mut self, text: &str, depth: usize) -> io::Result<()> {
        if self.verbatim > 0 {
            return self.ser.write_text(text);
        }
        let collapsed = whitespace().replace_all(text, " ");
        let piece = match self.boundary {
            Boundary::None => &collapsed[..],
            Boundary::AfterOpen | Boundary::AfterClose => collapsed.trim_start(),
        };
        if piece.is_empty() {
            return Ok(());
        }
        if self.boundary == Boundary::AfterClose {
            self.line(depth);
        }
        self.ser.write_text(piece)?;
        self.boundary = Boundary::None;
        Ok(())
    }

    fn element(&mut self, el: ElementRef<'_>, depth: usize) -> io::Result<()> {
        let element = el.value();
        let name = element.name();
        let block = self.verbatim == 0 && BLOCK_ELEMENTS.contains(&name);

        if block {
            self.line(depth);
            self.blocks += 1;
        } else if self.boundary == Boundary::AfterClose {
            self.line(depth);
        }
        self.ser.start_elem(
            element.name.clone(),
            element.attrs.iter().map(|(k, v)| (k, &**v)),
        )?;
        self.boundary = if block { Boundary::AfterOpen } else { Boundary::None };

        let marker = self.blocks;
        let verbatim = VERBATIM_ELEMENTS.contains(&name);
        if verbatim {
            self.verbatim += 1;
        }
        for child in child_nodes(el) {
            self.node(child, depth + 1)?;
        }
        if verbatim {
            self.verbatim -= 1;
        }

        if block && self.blocks > marker {
            self.line(depth);
        }
        self.ser.end_elem(element.name.clone())?;
        self.boundary = if block { Boundary::AfterClose } else { Boundary::None };
        Ok(())
    }
}

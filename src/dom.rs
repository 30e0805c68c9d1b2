//! In-place DOM surgery on parsed documents
//!
//! `scraper` parses into an `ego_tree` arena exposed as [`Html::tree`].
//! Removing a node detaches it from its parent; it stays in the arena but is
//! no longer reachable from the root, so later selections never see it.
//! Attribute changes rebuild the element in place, so the serializer and
//! later selections both see the new values.

use crate::error::{ExtractionError, Result};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Parse a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ExtractionError::InvalidSelector(format!("{}: {:?}", css, e)).into())
}

/// Nearest element matching `sel`, starting with `element` itself
pub fn closest<'a>(element: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|el| sel.matches(el))
}

/// Number of elements matching `sel`
pub fn count(doc: &Html, sel: &Selector) -> usize {
    doc.select(sel).count()
}

/// Remove every element matching `sel`; returns how many were removed
pub fn remove_all(doc: &mut Html, sel: &Selector) -> usize {
    let ids: Vec<_> = doc.select(sel).map(|el| el.id()).collect();
    let removed = ids.len();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    removed
}

/// Remove the first element matching `sel`
pub fn remove_first(doc: &mut Html, sel: &Selector) -> bool {
    let Some(id) = doc.select(sel).next().map(|el| el.id()) else {
        return false;
    };
    if let Some(mut node) = doc.tree.get_mut(id) {
        node.detach();
    }
    true
}

/// For every element matching `target`, remove its closest `container`
pub fn remove_closest(doc: &mut Html, target: &Selector, container: &Selector) -> usize {
    let mut seen = HashSet::new();
    let ids: Vec<_> = doc
        .select(target)
        .filter_map(|el| closest(el, container))
        .map(|el| el.id())
        .filter(|id| seen.insert(*id))
        .collect();
    let removed = ids.len();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    removed
}

/// Remove every element sibling preceding the first match of `sel`
pub fn remove_preceding_siblings(doc: &mut Html, sel: &Selector) -> usize {
    let ids: Vec<_> = match doc.select(sel).next() {
        Some(el) => el
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .map(|sibling| sibling.id())
            .collect(),
        None => return 0,
    };
    let removed = ids.len();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    removed
}

/// Set attribute `name` on `element`, replacing it in place or appending it
///
/// Only attributes without a namespace are matched, so `xlink:href` is
/// never mistaken for `href`.
pub fn set_attr(element: &mut Element, name: &str, value: &str) {
    let mut attrs: Vec<Attribute> = element
        .attrs
        .iter()
        .map(|(k, v)| Attribute {
            name: k.clone(),
            value: StrTendril::from(&**v),
        })
        .collect();
    match attrs
        .iter_mut()
        .find(|a| a.name.ns.is_empty() && &*a.name.local == name)
    {
        Some(attr) => attr.value = StrTendril::from(value),
        None => attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value: StrTendril::from(value),
        }),
    }
    *element = Element::new(element.name.clone(), attrs);
}

/// Set attribute `name` on every element matching `sel` for which `value`
/// yields one; returns how many were changed
///
/// `value` sees the elements in document order.
pub fn set_attr_where<F>(doc: &mut Html, sel: &Selector, name: &str, mut value: F) -> usize
where
    F: FnMut(ElementRef<'_>) -> Option<String>,
{
    let updates: Vec<_> = doc
        .select(sel)
        .filter_map(|el| Some((el.id(), value(el)?)))
        .collect();
    let changed = updates.len();
    for (id, new_value) in updates {
        if let Some(mut node) = doc.tree.get_mut(id) {
            if let Node::Element(element) = node.value() {
                set_attr(element, name, &new_value);
            }
        }
    }
    changed
}

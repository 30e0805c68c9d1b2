//! Content extraction module
//!
//! This module isolates the FAQ body of each service page, driven by a
//! static table of per-service rules.

pub mod content;
pub mod rules;

pub use content::{ContentExtractor, Extraction};
pub use rules::{ContentSource, HeadingLevel, PreClean, Rule, RuleTable};

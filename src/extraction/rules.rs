//! Per-service extraction rules
//!
//! Every FAQ page follows roughly the same template, but many drift from it:
//! different heading levels, a different content container, extra
//! boilerplate. The [`RuleTable`] records those deviations by short-name.
//! Services not mentioned anywhere get the defaults.

use serde::{Deserialize, Serialize};

/// Which elements count as FAQ headings on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// `h2` headings (default)
    H2,
    /// `h3` headings
    H3,
    /// Generic `section` containers, titled by a nested `h2`
    Section,
}

impl HeadingLevel {
    /// CSS selector for the headings
    pub fn selector(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::Section => "section",
        }
    }

    /// CSS selector for a heading's ToC title, looked up inside the heading
    pub fn title_selector(self) -> &'static str {
        match self {
            HeadingLevel::Section => "h2",
            HeadingLevel::H2 | HeadingLevel::H3 => "a",
        }
    }
}

/// Extra clean-up before the column builders are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreClean {
    /// Drop every top-level column builder
    ColumnBuilders,
    /// Drop the first title block and the first text box (duplicate title)
    DuplicateTitle,
    /// Drop the first divider and the first text box (in-page ToC)
    LeadingToc,
}

/// Where the FAQ body is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// `main > section > .parsys`
    Default,
    /// Every tab pane of a tabbed layout, concatenated
    Tabs,
    /// The last row builder of the main section
    LastRow,
    /// The first row builder of the main content
    FirstRow,
    /// The central text column
    CentralColumn,
}

impl ContentSource {
    /// CSS selector for the content container
    pub fn selector(self) -> &'static str {
        match self {
            ContentSource::Default => "main > section > .parsys",
            ContentSource::Tabs => ".tab-pane .par.parsys",
            ContentSource::LastRow => "main > section .row-builder:last-child .parsys",
            ContentSource::FirstRow => "main > section .content > .row-builder:first-child .parsys",
            ContentSource::CentralColumn => ".central-column > .col-text",
        }
    }
}

/// A rule that applies to a set of short-names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule<T> {
    /// Short-names the rule applies to
    pub names: Vec<String>,
    /// What applies
    pub action: T,
}

impl<T: Copy> Rule<T> {
    /// Create a rule
    pub fn new(names: &[&str], action: T) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            action,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

fn first_match<T: Copy>(rules: &[Rule<T>], name: &str) -> Option<T> {
    rules.iter().find(|r| r.matches(name)).map(|r| r.action)
}

/// Static table of per-service extraction behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    /// Heading overrides; first match wins
    pub headings: Vec<Rule<HeadingLevel>>,
    /// Pre-clean special cases; first match wins
    pub pre_clean: Vec<Rule<PreClean>>,
    /// Services whose column content holds figures that must be hoisted
    pub figure_layout: Vec<String>,
    /// Services whose text boxes end in a trailing "back to top" paragraph
    pub trailing_paragraph: Vec<String>,
    /// Content container overrides; first match wins
    pub content: Vec<Rule<ContentSource>>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            headings: vec![
                Rule::new(&["quicksight"], HeadingLevel::Section),
                Rule::new(
                    &["windows", "iot", "ses", "swf", "config", "elasticsearch-service"],
                    HeadingLevel::H3,
                ),
            ],
            pre_clean: vec![
                Rule::new(
                    &["s3", "efs", "glacier", "elasticache", "route53"],
                    PreClean::ColumnBuilders,
                ),
                Rule::new(&["elasticache"], PreClean::DuplicateTitle),
                Rule::new(&["premiumsupport"], PreClean::LeadingToc),
            ],
            figure_layout: vec!["windows".to_string()],
            trailing_paragraph: ["storagegateway", "emr", "machine-learning", "api-gateway"]
                .iter()
                .map(|n| n.to_string())
                .collect(),
            content: vec![
                Rule::new(&["console"], ContentSource::Tabs),
                Rule::new(&["iam", "kms"], ContentSource::LastRow),
                Rule::new(&["lumberyard", "gamelift"], ContentSource::FirstRow),
                Rule::new(&["quicksight"], ContentSource::CentralColumn),
            ],
        }
    }
}

impl RuleTable {
    /// Heading level for a service
    pub fn heading(&self, name: &str) -> HeadingLevel {
        first_match(&self.headings, name).unwrap_or(HeadingLevel::H2)
    }

    /// Pre-clean special case for a service, if any
    pub fn pre_clean(&self, name: &str) -> Option<PreClean> {
        first_match(&self.pre_clean, name)
    }

    /// Whether the service's column content needs the figure fix-up
    pub fn figure_layout(&self, name: &str) -> bool {
        self.figure_layout.iter().any(|n| n == name)
    }

    /// Whether the service's text boxes carry a trailing paragraph to strip
    pub fn trailing_paragraph(&self, name: &str) -> bool {
        self.trailing_paragraph.iter().any(|n| n == name)
    }

    /// Content container for a service
    pub fn content(&self, name: &str) -> ContentSource {
        first_match(&self.content, name).unwrap_or(ContentSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_uses_defaults() {
        let rules = RuleTable::default();
        assert_eq!(rules.heading("ec2"), HeadingLevel::H2);
        assert_eq!(rules.content("ec2"), ContentSource::Default);
        assert_eq!(rules.pre_clean("ec2"), None);
        assert!(!rules.figure_layout("ec2"));
        assert!(!rules.trailing_paragraph("ec2"));
    }

    #[test]
    fn test_heading_overrides() {
        let rules = RuleTable::default();
        assert_eq!(rules.heading("quicksight"), HeadingLevel::Section);
        assert_eq!(rules.heading("windows"), HeadingLevel::H3);
        assert_eq!(rules.heading("elasticsearch-service"), HeadingLevel::H3);
        assert_eq!(HeadingLevel::Section.title_selector(), "h2");
        assert_eq!(HeadingLevel::H3.title_selector(), "a");
    }

    #[test]
    fn test_pre_clean_first_match_wins() {
        let rules = RuleTable::default();
        assert_eq!(rules.pre_clean("elasticache"), Some(PreClean::ColumnBuilders));
        assert_eq!(rules.pre_clean("premiumsupport"), Some(PreClean::LeadingToc));
    }

    #[test]
    fn test_content_overrides() {
        let rules = RuleTable::default();
        assert_eq!(rules.content("console"), ContentSource::Tabs);
        assert_eq!(rules.content("kms"), ContentSource::LastRow);
        assert_eq!(rules.content("gamelift"), ContentSource::FirstRow);
        assert_eq!(rules.content("quicksight"), ContentSource::CentralColumn);
    }

    #[test]
    fn test_rule_table_serializes() {
        let json = serde_json::to_string(&RuleTable::default()).unwrap();
        assert!(json.contains("\"column_builders\""));
        assert!(json.contains("\"central_column\""));
        let back: RuleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RuleTable::default());
    }
}

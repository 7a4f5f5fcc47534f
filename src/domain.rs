//! Domain classification for events and theme relevance matching
//!
//! An event is bucketed by keywords in its host string. Each bucket carries
//! the theme-name pattern used to narrow the ranked theme list.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Broad domain an event belongs to, judged from its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Consumer,
    Infra,
    Security,
    Unclassified,
}

impl Domain {
    /// Buckets in classification order
    const ORDERED: [Domain; 3] = [Domain::Consumer, Domain::Infra, Domain::Security];

    /// Host-string keywords that select this bucket
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Domain::Consumer => &["forerunner", "imaginary", "lita", "consumer", "collaborative"],
            Domain::Infra => &["a16z", "sequoia", "benchmark", "infrastructure", "databricks"],
            Domain::Security => &["cybersecurity", "security", "cyber"],
            Domain::Unclassified => &[],
        }
    }

    /// Pattern a theme name must match to stay in this bucket's view.
    /// `None` keeps every theme.
    pub fn theme_pattern(&self) -> Option<&'static Regex> {
        static CONSUMER: OnceLock<Regex> = OnceLock::new();
        static INFRA: OnceLock<Regex> = OnceLock::new();
        static SECURITY: OnceLock<Regex> = OnceLock::new();

        let (cell, pattern) = match self {
            Domain::Consumer => (
                &CONSUMER,
                r"(?i)consumer|e-commerce|retail|brand|food|culinary|creator",
            ),
            Domain::Infra => (&INFRA, r"(?i)infra|data|developer|devtools|distributed|cloud"),
            Domain::Security => (&SECURITY, r"(?i)security|cyber|privacy"),
            Domain::Unclassified => return None,
        };
        Some(cell.get_or_init(|| Regex::new(pattern).expect("static theme pattern")))
    }

    /// Whether a theme name belongs in this bucket
    pub fn matches_theme(&self, theme_name: &str) -> bool {
        match self.theme_pattern() {
            Some(re) => re.is_match(theme_name),
            None => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Consumer => "consumer",
            Domain::Infra => "infra",
            Domain::Security => "security",
            Domain::Unclassified => "unclassified",
        }
    }
}

/// Classify an event by case-insensitive keyword match on its host string.
/// Consumer is checked before Infra, Infra before Security.
pub fn classify(host: Option<&str>) -> Domain {
    let lower = host.unwrap_or_default().to_lowercase();
    if lower.is_empty() {
        return Domain::Unclassified;
    }
    Domain::ORDERED
        .into_iter()
        .find(|domain| domain.keywords().iter().any(|k| lower.contains(k)))
        .unwrap_or(Domain::Unclassified)
}

/// Case-insensitive "starts a word" matchers for a host's topics.
///
/// Word boundaries are ASCII, so "ai" matches "AI infra tools", "open-ai agents"
/// and "éai", but not "Retail".
#[derive(Debug, Clone, Default)]
pub struct TopicMatcher {
    patterns: Vec<Regex>,
}

impl TopicMatcher {
    pub fn new(topics: &[&str]) -> Self {
        let patterns = topics
            .iter()
            .filter(|t| !t.is_empty())
            .filter_map(|t| Regex::new(&format!(r"(?i)(?-u:\b){}", regex::escape(t))).ok())
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any topic starts a word in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_consumer_hosts() {
        assert_eq!(classify(Some("Forerunner Ventures")), Domain::Consumer);
        assert_eq!(classify(Some("Lita.co breakfast")), Domain::Consumer);
        assert_eq!(classify(Some("Collaborative Fund")), Domain::Consumer);
    }

    #[test]
    fn test_classify_infra_and_security() {
        assert_eq!(classify(Some("Sequoia Capital")), Domain::Infra);
        assert_eq!(classify(Some("Databricks AI Summit")), Domain::Infra);
        assert_eq!(classify(Some("SF Cyber Week")), Domain::Security);
    }

    #[test]
    fn test_classify_order_consumer_first() {
        assert_eq!(classify(Some("Forerunner + a16z")), Domain::Consumer);
        // "infrastructure security" hits infra before security
        assert_eq!(classify(Some("Infrastructure Security Night")), Domain::Infra);
    }

    #[test]
    fn test_classify_unclassified() {
        assert_eq!(classify(None), Domain::Unclassified);
        assert_eq!(classify(Some("")), Domain::Unclassified);
        assert_eq!(classify(Some("Hustle Fund")), Domain::Unclassified);
    }

    #[test]
    fn test_theme_patterns() {
        assert!(Domain::Consumer.matches_theme("Creator economy tools"));
        assert!(Domain::Consumer.matches_theme("E-commerce checkout"));
        assert!(!Domain::Consumer.matches_theme("Vector databases"));
        assert!(Domain::Infra.matches_theme("Vector DATABASES"));
        assert!(Domain::Security.matches_theme("Privacy-preserving ML"));
        assert!(Domain::Unclassified.matches_theme("anything at all"));
    }

    #[test]
    fn test_topic_matcher_word_start() {
        let ai = TopicMatcher::new(&["ai"]);
        assert!(ai.matches("AI infra tools"));
        assert!(ai.matches("open-ai agents"));
        assert!(!ai.matches("Retail media"));
        assert!(TopicMatcher::new(&["health"]).matches("Healthcare agents"));
        assert!(TopicMatcher::new(&["deep tech"]).matches("deep tech robotics"));
        assert!(TopicMatcher::new(&["x", "ai"]).matches("Agentic AI"));
    }

    #[test]
    fn test_topic_matcher_ascii_boundaries() {
        // Non-ASCII letters do not count as word characters
        assert!(TopicMatcher::new(&["ai"]).matches("éai tools"));
        assert!(!TopicMatcher::new(&["ai"]).matches("r_ai"));
    }

    #[test]
    fn test_topic_matcher_skips_empty_topics() {
        let matcher = TopicMatcher::new(&[""]);
        assert!(matcher.is_empty());
        assert!(!matcher.matches("anything"));
    }
}

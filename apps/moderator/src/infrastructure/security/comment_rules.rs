//! Local, network-free comment checks: the block-list and the spam pattern.

use regex::Regex;

pub const DEFAULT_BLOCKED_TERMS: &[&str] = &["spam", "hate", "inappropriate"];

/// Bare URLs and domain-like tokens.
pub const DEFAULT_SPAM_PATTERN: &str = r"(?i)(http|www|\.com|\.net|\.org)";

#[derive(Debug, Clone)]
pub struct CommentRules {
    blocked_terms: Vec<String>,
    spam_pattern: Regex,
}

impl CommentRules {
    /// Builds the rule set. Terms are matched case-insensitively; blank terms are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `spam_pattern` is not a valid regular expression.
    pub fn new<I, S>(blocked_terms: I, spam_pattern: &str) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocked_terms = blocked_terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        Ok(Self {
            blocked_terms,
            spam_pattern: Regex::new(spam_pattern)?,
        })
    }

    /// First block-listed term contained in `text`, if any.
    pub fn blocked_term<'a>(&'a self, text: &str) -> Option<&'a str> {
        let lowered = text.to_lowercase();
        self.blocked_terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn is_spam(&self, text: &str) -> bool {
        self.spam_pattern.is_match(text)
    }

    pub fn blocked_terms(&self) -> &[String] {
        &self.blocked_terms
    }
}

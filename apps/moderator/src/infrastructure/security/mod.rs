pub mod comment_rules;

pub use comment_rules::{CommentRules, DEFAULT_BLOCKED_TERMS, DEFAULT_SPAM_PATTERN};

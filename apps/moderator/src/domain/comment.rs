use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub video_id: String,
    pub text: String,
}

/// One page of top-level comments for a video.
///
/// `next_page_token` is `None` on the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
}

impl CommentPage {
    pub fn last(comments: Vec<Comment>) -> Self {
        Self {
            comments,
            next_page_token: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    #[serde(rename = "keyword-match")]
    BlockedTerm,
    SpamPattern,
    NegativeSentiment,
    Toxic,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlockedTerm => "keyword-match",
            Self::SpamPattern => "spam-pattern",
            Self::NegativeSentiment => "negative-sentiment",
            Self::Toxic => "toxic",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_reject(&self) -> bool {
        matches!(self, Self::Reject(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Keep => None,
            Self::Reject(reason) => Some(*reason),
        }
    }
}

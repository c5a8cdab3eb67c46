use crate::domain::errors::ClassifierError;
use async_trait::async_trait;

/// Result of a sentiment call that reached the service.
///
/// An unsupported language is an expected answer, not a failure: the caller
/// skips sentiment for that text and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentOutcome {
    Supported { language: String, score: f64 },
    Unsupported { language: Option<String> },
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Detect the language of `text` and, when supported, score it in `[-1.0, 1.0]`.
    async fn analyze(&self, text: &str) -> Result<SentimentOutcome, ClassifierError>;
}

#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    /// Probability in `[0.0, 1.0]` that `text` is toxic.
    async fn score(&self, text: &str) -> Result<f64, ClassifierError>;
}

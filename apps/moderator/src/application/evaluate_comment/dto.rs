use serde::{Deserialize, Serialize};

pub const DEFAULT_SENTIMENT_THRESHOLD: f64 = -0.5;
pub const DEFAULT_TOXICITY_THRESHOLD: f64 = 0.8;

/// Cut-offs for the two remote checks.
///
/// Sentiment rejects strictly below its threshold; toxicity rejects at or above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub sentiment: f64,
    pub toxicity: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sentiment: DEFAULT_SENTIMENT_THRESHOLD,
            toxicity: DEFAULT_TOXICITY_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn rejects_sentiment(&self, score: f64) -> bool {
        score < self.sentiment
    }

    pub fn rejects_toxicity(&self, probability: f64) -> bool {
        probability >= self.toxicity
    }
}

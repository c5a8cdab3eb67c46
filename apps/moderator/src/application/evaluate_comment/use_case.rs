use super::dto::Thresholds;
use crate::domain::comment::{RejectReason, Verdict};
use crate::infrastructure::{
    classifiers::{SentimentClassifier, SentimentOutcome, ToxicityClassifier},
    security::CommentRules,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a comment stays up.
///
/// Checks run cheapest first and stop at the first rejection: block-list,
/// spam pattern, sentiment, toxicity. The two remote checks never fail the
/// evaluation; a classifier error is logged and counts as "no signal".
pub struct DecisionEngine {
    rules: CommentRules,
    sentiment: Arc<dyn SentimentClassifier>,
    toxicity: Arc<dyn ToxicityClassifier>,
    thresholds: Thresholds,
}

impl DecisionEngine {
    pub fn new(
        rules: CommentRules,
        sentiment: Arc<dyn SentimentClassifier>,
        toxicity: Arc<dyn ToxicityClassifier>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            rules,
            sentiment,
            toxicity,
            thresholds,
        }
    }

    pub async fn evaluate(&self, text: &str) -> Verdict {
        if let Some(term) = self.rules.blocked_term(text) {
            debug!(check = "keyword-match", term, "Comment contains a blocked term");
            return Verdict::Reject(RejectReason::BlockedTerm);
        }

        if self.rules.is_spam(text) {
            debug!(check = "spam-pattern", "Comment matches the spam pattern");
            return Verdict::Reject(RejectReason::SpamPattern);
        }

        if self.is_negative(text).await {
            return Verdict::Reject(RejectReason::NegativeSentiment);
        }

        if self.is_toxic(text).await {
            return Verdict::Reject(RejectReason::Toxic);
        }

        Verdict::Keep
    }

    async fn is_negative(&self, text: &str) -> bool {
        match self.sentiment.analyze(text).await {
            Ok(SentimentOutcome::Supported { language, score }) => {
                let negative = self.thresholds.rejects_sentiment(score);
                debug!(
                    check = "negative-sentiment",
                    language = %language,
                    score,
                    negative,
                    "Sentiment scored"
                );
                negative
            }
            Ok(SentimentOutcome::Unsupported { language }) => {
                debug!(
                    check = "negative-sentiment",
                    language = language.as_deref().unwrap_or("unknown"),
                    "Language not supported, skipping sentiment"
                );
                false
            }
            Err(err) => {
                warn!(check = "negative-sentiment", error = %err, "Sentiment classifier failed");
                false
            }
        }
    }

    async fn is_toxic(&self, text: &str) -> bool {
        match self.toxicity.score(text).await {
            Ok(probability) => {
                let toxic = self.thresholds.rejects_toxicity(probability);
                debug!(check = "toxic", probability, toxic, "Toxicity scored");
                toxic
            }
            Err(err) => {
                warn!(check = "toxic", error = %err, "Toxicity classifier failed");
                false
            }
        }
    }
}

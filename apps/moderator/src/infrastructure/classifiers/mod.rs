pub mod perspective;
pub mod sentiment_api;
pub mod traits;

pub use traits::{SentimentClassifier, SentimentOutcome, ToxicityClassifier};

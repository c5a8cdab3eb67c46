//! Moderator configuration loaded from environment variables.
//!
//! Everything is read once at startup (a `.env` file is honoured through
//! `dotenvy` in `main`) and then passed by value into the components.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `YOUTUBE_CHANNEL_ID`: Channel whose videos are moderated
//! - `PERSPECTIVE_API_KEY`: Google Perspective API key
//! - `SENTIMENT_API_URL`: Sentiment analysis endpoint
//! - Either `YOUTUBE_ACCESS_TOKEN`, or all of `GOOGLE_CLIENT_ID`,
//!   `GOOGLE_CLIENT_SECRET` and `GOOGLE_REFRESH_TOKEN`
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,moderator=debug")
//! - `YOUTUBE_API_BASE`: YouTube Data API root (default: "https://www.googleapis.com/youtube/v3")
//! - `GOOGLE_TOKEN_URI`: OAuth token endpoint (default: "https://oauth2.googleapis.com/token")
//! - `PERSPECTIVE_API_URL`: Perspective API root (default: "https://commentanalyzer.googleapis.com")
//! - `PERSPECTIVE_LANGUAGES`: Comma-separated language hints, empty to auto-detect (default: "en")
//! - `SENTIMENT_API_KEY`: Bearer token for the sentiment endpoint
//! - `SENTIMENT_LANGUAGES`: Comma-separated languages sentiment is trusted for (default: "en")
//! - `BLOCKED_TERMS`: Comma-separated block-list (default: "spam,hate,inappropriate")
//! - `SPAM_PATTERN`: Regex for link spam (default: `(?i)(http|www|\.com|\.net|\.org)`)
//! - `SENTIMENT_THRESHOLD`: Reject below this score, in [-1, 1] (default: -0.5)
//! - `TOXICITY_THRESHOLD`: Reject at or above this probability, in [0, 1] (default: 0.8)
//! - `LEDGER_PATH`: Processed-comment ledger file (default: "./data/processed_comments.json")
//! - `LEDGER_FLUSH_PER_VIDEO`: Save the ledger after every video (default: true)
//! - `REMOVAL_MODE`: "delete" or "reject" (default: "delete")
//! - `HTTP_TIMEOUT_SECONDS`: Timeout for every remote call (default: 30)

use crate::application::evaluate_comment::dto::{
    DEFAULT_SENTIMENT_THRESHOLD, DEFAULT_TOXICITY_THRESHOLD, Thresholds,
};
use crate::infrastructure::{
    classifiers::perspective::PERSPECTIVE_DEFAULT_URL,
    security::{DEFAULT_BLOCKED_TERMS, DEFAULT_SPAM_PATTERN},
    youtube::{RemovalMode, auth::GOOGLE_TOKEN_URI, client::YOUTUBE_DEFAULT_BASE_URL},
};

/// How the moderator authenticates against YouTube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YouTubeCredentials {
    AccessToken(String),
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        token_uri: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Channel to moderate
    pub channel_id: String,

    pub youtube_api_base: String,

    pub youtube_credentials: YouTubeCredentials,

    /// Take-down strategy for rejected comments
    pub removal_mode: RemovalMode,

    pub perspective_api_url: String,

    pub perspective_api_key: String,

    /// Language hints sent to Perspective; empty lets the API detect
    pub perspective_languages: Vec<String>,

    pub sentiment_api_url: String,

    pub sentiment_api_key: Option<String>,

    /// Languages whose sentiment score is acted on
    pub sentiment_languages: Vec<String>,

    pub blocked_terms: Vec<String>,

    pub spam_pattern: String,

    pub thresholds: Thresholds,

    pub ledger_path: String,

    /// Persist the ledger after each video instead of only at the end
    pub ledger_flush_per_video: bool,

    pub http_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value cannot be
    /// parsed, or a threshold is out of range.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let thresholds = Thresholds {
            sentiment: env.or("SENTIMENT_THRESHOLD", DEFAULT_SENTIMENT_THRESHOLD)?,
            toxicity: env.or("TOXICITY_THRESHOLD", DEFAULT_TOXICITY_THRESHOLD)?,
        };
        if !(-1.0..=1.0).contains(&thresholds.sentiment) {
            anyhow::bail!(
                "SENTIMENT_THRESHOLD must be within [-1, 1], got {}",
                thresholds.sentiment
            );
        }
        if !(0.0..=1.0).contains(&thresholds.toxicity) {
            anyhow::bail!(
                "TOXICITY_THRESHOLD must be within [0, 1], got {}",
                thresholds.toxicity
            );
        }

        let removal_mode = match env.optional("REMOVAL_MODE") {
            Some(raw) => raw
                .parse::<RemovalMode>()
                .map_err(|e| anyhow::anyhow!("Failed to parse REMOVAL_MODE: {}", e))?,
            None => RemovalMode::default(),
        };

        Ok(Self {
            channel_id: env.required("YOUTUBE_CHANNEL_ID")?,
            youtube_api_base: env.or("YOUTUBE_API_BASE", YOUTUBE_DEFAULT_BASE_URL.to_string())?,
            youtube_credentials: youtube_credentials(&env)?,
            removal_mode,
            perspective_api_url: env.or("PERSPECTIVE_API_URL", PERSPECTIVE_DEFAULT_URL.to_string())?,
            perspective_api_key: env.required("PERSPECTIVE_API_KEY")?,
            perspective_languages: env.list("PERSPECTIVE_LANGUAGES", &["en"]),
            sentiment_api_url: env.required("SENTIMENT_API_URL")?,
            sentiment_api_key: env.optional("SENTIMENT_API_KEY"),
            sentiment_languages: env.list("SENTIMENT_LANGUAGES", &["en"]),
            blocked_terms: env.list("BLOCKED_TERMS", DEFAULT_BLOCKED_TERMS),
            spam_pattern: env.or("SPAM_PATTERN", DEFAULT_SPAM_PATTERN.to_string())?,
            thresholds,
            ledger_path: env.or(
                "LEDGER_PATH",
                "./data/processed_comments.json".to_string(),
            )?,
            ledger_flush_per_video: env.or("LEDGER_FLUSH_PER_VIDEO", true)?,
            http_timeout_seconds: env.or("HTTP_TIMEOUT_SECONDS", 30)?,
        })
    }
}

fn youtube_credentials<F>(env: &Env<F>) -> anyhow::Result<YouTubeCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = env.optional("YOUTUBE_ACCESS_TOKEN") {
        return Ok(YouTubeCredentials::AccessToken(token));
    }

    match (
        env.optional("GOOGLE_CLIENT_ID"),
        env.optional("GOOGLE_CLIENT_SECRET"),
        env.optional("GOOGLE_REFRESH_TOKEN"),
    ) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => {
            Ok(YouTubeCredentials::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
                token_uri: env.or("GOOGLE_TOKEN_URI", GOOGLE_TOKEN_URI.to_string())?,
            })
        }
        _ => Err(anyhow::anyhow!(
            "Missing YouTube credentials: set YOUTUBE_ACCESS_TOKEN or GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN"
        )),
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Set and non-blank.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    /// Load a required variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set.
    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
    }

    /// Load a variable with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but cannot be parsed.
    fn or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(val) => val
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
            None => Ok(default),
        }
    }

    /// Comma-separated list. A variable set to an empty string yields an empty list.
    fn list(&self, key: &str, default: &[&str]) -> Vec<String> {
        match (self.lookup)(key) {
            Some(raw) => raw
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            None => default.iter().map(|item| item.to_string()).collect(),
        }
    }
}

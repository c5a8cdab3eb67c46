//! Wires the configured collaborators into a [`ModerationDriver`].

use crate::{
    application::evaluate_comment::DecisionEngine,
    config::{Config, YouTubeCredentials},
    infrastructure::{
        classifiers::{perspective::PerspectiveClient, sentiment_api::SentimentApiClient},
        persistence::json_ledger_store::JsonLedgerStore,
        security::CommentRules,
        youtube::{AccessTokenProvider, RefreshTokenProvider, StaticTokenProvider, YouTubeClient},
    },
    workers::ModerationDriver,
};
use std::{sync::Arc, time::Duration};

pub fn http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds.max(1)))
        .user_agent(concat!("moderator/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

pub fn token_provider(config: &Config, client: reqwest::Client) -> Arc<dyn AccessTokenProvider> {
    match &config.youtube_credentials {
        YouTubeCredentials::AccessToken(token) => Arc::new(StaticTokenProvider::new(token.clone())),
        YouTubeCredentials::RefreshToken {
            client_id,
            client_secret,
            refresh_token,
            token_uri,
        } => Arc::new(RefreshTokenProvider::new(
            client,
            token_uri.clone(),
            client_id.clone(),
            client_secret.clone(),
            refresh_token.clone(),
        )),
    }
}

/// Builds the driver from configuration.
///
/// # Errors
///
/// Returns an error if the spam pattern does not compile.
pub fn build_driver(
    config: &Config,
    client: reqwest::Client,
    tokens: Arc<dyn AccessTokenProvider>,
) -> anyhow::Result<ModerationDriver> {
    let rules = CommentRules::new(&config.blocked_terms, &config.spam_pattern)
        .map_err(|e| anyhow::anyhow!("Invalid SPAM_PATTERN: {}", e))?;

    let sentiment = Arc::new(SentimentApiClient::new(
        client.clone(),
        config.sentiment_api_url.clone(),
        config.sentiment_api_key.clone(),
        config.sentiment_languages.clone(),
    ));
    let toxicity = Arc::new(PerspectiveClient::new(
        client.clone(),
        config.perspective_api_url.clone(),
        config.perspective_api_key.clone(),
        config.perspective_languages.clone(),
    ));
    let engine = DecisionEngine::new(rules, sentiment, toxicity, config.thresholds);

    let youtube = Arc::new(YouTubeClient::new(
        client,
        config.youtube_api_base.clone(),
        tokens,
        config.removal_mode,
    ));
    let ledger = Arc::new(JsonLedgerStore::new(&config.ledger_path));

    Ok(ModerationDriver::new(
        youtube.clone(),
        youtube.clone(),
        youtube,
        engine,
        ledger,
        config.ledger_flush_per_video,
    ))
}

//! Access tokens for the YouTube Data API.
//!
//! Either a pre-issued token is used as-is, or an OAuth2 refresh token is
//! exchanged for short-lived access tokens which are cached and refreshed
//! shortly before they expire.

use crate::domain::errors::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        if self.token.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct RefreshTokenProvider {
    client: Client,
    token_uri: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: Mutex<Option<CachedToken>>,
}

impl RefreshTokenProvider {
    pub fn new(
        client: Client,
        token_uri: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_uri: token_uri.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            cached: Mutex::new(None),
        }
    }

    async fn refresh(&self) -> Result<CachedToken, AuthError> {
        let res = self
            .client
            .post(&self.token_uri)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let raw = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TokenErrorResponse>(&raw)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(raw);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;
        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Malformed("missing access_token".to_string()))?;
        let expires_in = body.expires_in.unwrap_or(3600);

        debug!("Refreshed YouTube access token, valid for {}s", expires_in);
        Ok(CachedToken {
            access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in - EXPIRY_MARGIN_SECONDS),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshTokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Utc::now()) {
            return Ok(token.access_token.clone());
        }

        let fresh = self.refresh().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }
}

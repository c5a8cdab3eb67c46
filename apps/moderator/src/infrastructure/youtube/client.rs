use super::{
    auth::AccessTokenProvider,
    traits::{CommentRemover, CommentSource, VideoSource},
};
use crate::domain::{
    comment::{Comment, CommentPage},
    errors::HostingError,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{debug, warn};

pub const YOUTUBE_DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const SEARCH_PAGE_SIZE: &str = "50";
const COMMENT_PAGE_SIZE: &str = "100";

/// How a rejected comment is taken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalMode {
    /// `comments.delete`, irreversible.
    #[default]
    Delete,
    /// `comments.setModerationStatus` with `rejected`, hidden but restorable from YouTube Studio.
    Reject,
}

impl FromStr for RemovalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown removal mode '{}', expected 'delete' or 'reject'",
                other
            )),
        }
    }
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("delete"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    id: String,
    snippet: TopLevelCommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopLevelCommentSnippet {
    #[serde(default)]
    text_display: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    reason: String,
}

struct ApiFailure {
    status: StatusCode,
    message: String,
    reasons: Vec<String>,
}

impl ApiFailure {
    async fn from_response(res: Response) -> Self {
        let status = res.status();
        let raw = res.text().await.unwrap_or_default();
        match serde_json::from_str::<GoogleErrorEnvelope>(&raw) {
            Ok(envelope) => Self {
                status,
                message: envelope.error.message,
                reasons: envelope.error.errors.into_iter().map(|e| e.reason).collect(),
            },
            Err(_) => Self {
                status,
                message: raw,
                reasons: vec![],
            },
        }
    }

    fn has_reason(&self, reason: &str) -> bool {
        self.reasons.iter().any(|r| r == reason)
    }

    fn into_error(self) -> HostingError {
        if self.status == StatusCode::UNAUTHORIZED {
            return HostingError::Authentication(self.message);
        }
        HostingError::Api {
            status: self.status.as_u16(),
            message: self.message,
        }
    }
}

/// YouTube Data API v3 client covering the three calls the moderator needs.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
    removal_mode: RemovalMode,
}

impl YouTubeClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
        removal_mode: RemovalMode,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            removal_mode,
        }
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, HostingError> {
        let token = self.tokens.access_token().await?;
        Ok(request.bearer_auth(token))
    }

    async fn search_page(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, HostingError> {
        let mut params = vec![
            ("part", "id"),
            ("channelId", channel_id),
            ("maxResults", SEARCH_PAGE_SIZE),
            ("order", "date"),
            ("type", "video"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params);
        let res = self.authorized(request).await?.send().await?;
        if !res.status().is_success() {
            return Err(ApiFailure::from_response(res).await.into_error());
        }
        res.json()
            .await
            .map_err(|e| HostingError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn list_video_ids(&self, channel_id: &str) -> Result<Vec<String>, HostingError> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.search_page(channel_id, page_token.as_deref()).await?;
            video_ids.extend(
                page.items
                    .into_iter()
                    .filter(|item| item.id.kind == "youtube#video")
                    .filter_map(|item| item.id.video_id),
            );

            match page.next_page_token {
                Some(next) if page_token.as_deref() != Some(next.as_str()) => {
                    page_token = Some(next)
                }
                _ => break,
            }
        }

        debug!("Channel {} has {} videos", channel_id, video_ids.len());
        Ok(video_ids)
    }
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn list_comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, HostingError> {
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", COMMENT_PAGE_SIZE),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let request = self
            .client
            .get(format!("{}/commentThreads", self.base_url))
            .query(&params);
        let res = self.authorized(request).await?.send().await?;

        if !res.status().is_success() {
            let failure = ApiFailure::from_response(res).await;
            if failure.status == StatusCode::FORBIDDEN && failure.has_reason("commentsDisabled") {
                debug!("Comments are disabled on video {}", video_id);
                return Ok(CommentPage::default());
            }
            return Err(failure.into_error());
        }

        let body: CommentThreadListResponse = res
            .json()
            .await
            .map_err(|e| HostingError::Malformed(e.to_string()))?;

        let comments = body
            .items
            .into_iter()
            .map(|thread| {
                let top = thread.snippet.top_level_comment;
                Comment {
                    id: top.id,
                    video_id: video_id.to_string(),
                    text: top.snippet.text_display,
                }
            })
            .collect();

        Ok(CommentPage {
            comments,
            next_page_token: body.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl CommentRemover for YouTubeClient {
    async fn remove_comment(&self, comment_id: &str) -> Result<(), HostingError> {
        let request = match self.removal_mode {
            RemovalMode::Delete => self
                .client
                .delete(format!("{}/comments", self.base_url))
                .query(&[("id", comment_id)]),
            RemovalMode::Reject => self
                .client
                .post(format!("{}/comments/setModerationStatus", self.base_url))
                .query(&[("id", comment_id), ("moderationStatus", "rejected")]),
        };
        let res = self.authorized(request).await?.send().await?;

        if res.status().is_success() {
            return Ok(());
        }
        if res.status() == StatusCode::NOT_FOUND {
            warn!("Comment {} was already gone", comment_id);
            return Ok(());
        }
        Err(ApiFailure::from_response(res).await.into_error())
    }
}

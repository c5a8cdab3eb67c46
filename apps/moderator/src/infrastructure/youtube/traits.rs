use crate::domain::{comment::CommentPage, errors::HostingError};
use async_trait::async_trait;

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Every video id of the channel, newest first. Pagination is drained internally.
    async fn list_video_ids(&self, channel_id: &str) -> Result<Vec<String>, HostingError>;
}

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// One page of top-level comments. `page_token` is `None` for the first page.
    async fn list_comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, HostingError>;
}

#[async_trait]
pub trait CommentRemover: Send + Sync {
    /// Makes the comment invisible to viewers. Removing an already removed
    /// comment succeeds.
    async fn remove_comment(&self, comment_id: &str) -> Result<(), HostingError>;
}

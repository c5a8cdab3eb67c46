pub mod auth;
pub mod client;
pub mod traits;

pub use auth::{AccessTokenProvider, RefreshTokenProvider, StaticTokenProvider};
pub use client::{RemovalMode, YouTubeClient};
pub use traits::{CommentRemover, CommentSource, VideoSource};

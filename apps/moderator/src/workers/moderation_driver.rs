use crate::application::evaluate_comment::DecisionEngine;
use crate::domain::{
    comment::{Comment, RejectReason, Verdict},
    errors::{HostingError, ModerationError},
    ledger::{Ledger, LedgerStore},
};
use crate::infrastructure::youtube::{CommentRemover, CommentSource, VideoSource};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub channel_id: String,
    pub videos_scanned: usize,
    pub videos_failed: usize,
    pub comments_evaluated: usize,
    pub comments_skipped: usize,
    pub comments_rejected: usize,
    pub deletions_failed: usize,
    pub rejected_by_reason: BTreeMap<String, usize>,
    /// Rejected comments that could not be removed and are still visible.
    pub failed_deletions: Vec<String>,
}

impl RunSummary {
    fn new(channel_id: &str) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            ..Self::default()
        }
    }

    fn record_rejection(&mut self, reason: RejectReason) {
        self.comments_rejected += 1;
        *self
            .rejected_by_reason
            .entry(reason.as_str().to_string())
            .or_insert(0) += 1;
    }

    fn record_failed_deletion(&mut self, comment_id: &str) {
        self.deletions_failed += 1;
        self.failed_deletions.push(comment_id.to_string());
    }
}

/// Walks every video of a channel and takes down rejected comments.
///
/// Each comment id goes through the decision engine at most once across all
/// runs: the ledger is consulted before evaluation and updated right after,
/// whatever the verdict or the removal outcome.
pub struct ModerationDriver {
    videos: Arc<dyn VideoSource>,
    comments: Arc<dyn CommentSource>,
    remover: Arc<dyn CommentRemover>,
    engine: DecisionEngine,
    ledger_store: Arc<dyn LedgerStore>,
    flush_per_video: bool,
}

impl ModerationDriver {
    pub fn new(
        videos: Arc<dyn VideoSource>,
        comments: Arc<dyn CommentSource>,
        remover: Arc<dyn CommentRemover>,
        engine: DecisionEngine,
        ledger_store: Arc<dyn LedgerStore>,
        flush_per_video: bool,
    ) -> Self {
        Self {
            videos,
            comments,
            remover,
            engine,
            ledger_store,
            flush_per_video,
        }
    }

    pub async fn run(&self, channel_id: &str) -> Result<RunSummary, ModerationError> {
        let mut ledger = self.load_ledger().await;
        let mut summary = RunSummary::new(channel_id);

        let video_ids = self
            .videos
            .list_video_ids(channel_id)
            .await
            .map_err(|source| {
                if source.is_fatal() {
                    ModerationError::Authentication(source.to_string())
                } else {
                    ModerationError::VideoEnumeration {
                        channel_id: channel_id.to_string(),
                        source,
                    }
                }
            })?;
        info!("Scanning {} videos on channel {}", video_ids.len(), channel_id);

        for video_id in &video_ids {
            let span = info_span!("video", video_id = %video_id);
            let outcome = self
                .moderate_video(video_id, &mut ledger, &mut summary)
                .instrument(span)
                .await;

            match outcome {
                Ok(()) => summary.videos_scanned += 1,
                Err(err) if err.is_fatal() => {
                    error!(video_id = %video_id, error = %err, "Aborting run");
                    if let Err(save_err) = self.ledger_store.save(&ledger).await {
                        error!(error = %save_err, "Could not save ledger progress before aborting");
                    }
                    return Err(ModerationError::Authentication(err.to_string()));
                }
                Err(err) => {
                    warn!(video_id = %video_id, error = %err, "Skipping rest of video, comment listing failed");
                    summary.videos_failed += 1;
                }
            }

            if self.flush_per_video {
                if let Err(err) = self.ledger_store.save(&ledger).await {
                    warn!(video_id = %video_id, error = %err, "Ledger flush failed, will retry at end of run");
                }
            }
        }

        self.ledger_store.save(&ledger).await?;
        info!(
            videos_scanned = summary.videos_scanned,
            videos_failed = summary.videos_failed,
            comments_evaluated = summary.comments_evaluated,
            comments_skipped = summary.comments_skipped,
            comments_rejected = summary.comments_rejected,
            deletions_failed = summary.deletions_failed,
            "Moderation run finished"
        );
        Ok(summary)
    }

    async fn load_ledger(&self) -> Ledger {
        match self.ledger_store.load().await {
            Ok(ledger) => {
                debug!("Loaded ledger with {} processed comments", ledger.len());
                ledger
            }
            Err(err) => {
                warn!(error = %err, "Ledger unreadable, starting empty; known comments will be re-evaluated");
                Ledger::new()
            }
        }
    }

    async fn moderate_video(
        &self,
        video_id: &str,
        ledger: &mut Ledger,
        summary: &mut RunSummary,
    ) -> Result<(), HostingError> {
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .comments
                .list_comment_page(video_id, page_token.as_deref())
                .await?;

            for comment in &page.comments {
                if ledger.is_processed(&comment.id) {
                    summary.comments_skipped += 1;
                    continue;
                }

                let span = info_span!("comment", comment_id = %comment.id);
                self.moderate_comment(comment, summary)
                    .instrument(span)
                    .await?;
                ledger.mark_processed(&comment.id);
            }

            match page.next_page_token {
                Some(next) if page_token.as_deref() != Some(next.as_str()) => {
                    page_token = Some(next)
                }
                Some(next) => {
                    warn!(page_token = %next, "Comment listing returned the same page token twice, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Only an authentication failure is returned; the comment then stays
    /// unmarked so the next run picks it up again.
    async fn moderate_comment(
        &self,
        comment: &Comment,
        summary: &mut RunSummary,
    ) -> Result<(), HostingError> {
        summary.comments_evaluated += 1;

        let Verdict::Reject(reason) = self.engine.evaluate(&comment.text).await else {
            return Ok(());
        };
        summary.record_rejection(reason);
        info!(reason = %reason, "Removing comment");

        match self.remover.remove_comment(&comment.id).await {
            Ok(()) => {}
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(reason = %reason, error = %err, "Removal failed, rejected comment stays visible");
                summary.record_failed_deletion(&comment.id);
            }
        }
        Ok(())
    }
}

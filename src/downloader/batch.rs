//! Batch orchestration — bounded fan-out over posts, sequential result folding.

use super::PostDownloader;
use crate::error::{Error, Result};
use crate::report::{BatchReport, FailedPost, UnhandledVideos};
use crate::types::Event;
use futures::{StreamExt, stream};
use std::path::Path;
use url::Url;

impl PostDownloader {
    /// Run the whole batch, folding every post into the returned report
    ///
    /// At most `max_concurrent_posts` posts are in flight at a time: the first
    /// wave starts together, then each completion admits the next post. As
    /// outcomes arrive they are folded into the report by this task alone, so
    /// the report lists never see concurrent writers. Entry order is
    /// completion order, not input order.
    ///
    /// One post's failure never stops the batch. Cancelling the downloader
    /// stops admission and aborts posts still in flight at their next
    /// suspension point; both fold into the report as failed, keeping the
    /// exactly-once accounting of every input.
    pub async fn run(&self, post_urls: Vec<Url>, output_dir: &Path) -> Result<BatchReport> {
        tokio::fs::create_dir_all(output_dir).await?;
        tokio::fs::create_dir_all(&self.config.download.temp_dir).await?;

        let total_posts = post_urls.len();
        tracing::info!(posts = total_posts, output = %output_dir.display(), "Batch started");

        let mut report = BatchReport {
            total_posts,
            ..Default::default()
        };

        let mut outcomes = stream::iter(post_urls.into_iter().enumerate())
            .map(|(index, url)| async move {
                if self.cancel_token.is_cancelled() {
                    return (index, url, Err(Error::Cancelled));
                }
                self.emit_event(Event::PostStarted {
                    url: url.clone(),
                    index,
                });
                let result = tokio::select! {
                    _ = self.cancel_token.cancelled() => Err(Error::Cancelled),
                    result = self.process_post(&url, index, output_dir) => result,
                };
                (index, url, result)
            })
            .buffer_unordered(self.config.download.max_concurrent_posts);

        while let Some((index, url, result)) = outcomes.next().await {
            match result {
                Ok(videos) => {
                    self.emit_event(Event::PostCompleted {
                        url: url.clone(),
                        index,
                        unhandled_videos: videos.len(),
                    });
                    if !videos.is_empty() {
                        report.unhandled_videos.push(UnhandledVideos {
                            post_url: url,
                            videos,
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!(index, url = %url, error = %error, "Post failed");
                    self.emit_event(Event::PostFailed {
                        url: url.clone(),
                        index,
                        error: error.to_string(),
                    });
                    report.failed_posts.push(FailedPost { url, error });
                }
            }
        }

        tracing::info!(
            failed = report.failed_posts.len(),
            succeeded = report.succeeded(),
            "Batch finished"
        );
        Ok(report)
    }
}

//! Batch results and plain-text report artifacts
//!
//! The orchestrator folds every per-post outcome into a [`BatchReport`]. After
//! the run, the report can write two artifacts into the output directory: one
//! listing posts that failed outright, one listing streaming-video links that
//! were surfaced but not downloaded.

use crate::error::{Error, Result};
use crate::resource::VideoResource;
use std::path::{Path, PathBuf};
use url::Url;

/// Report file enumerating failed posts, one per line
pub const FAILED_REPORT_FILE: &str = "_failedURLs.txt";

/// Report file enumerating posts with undownloaded video links
pub const VIDEO_REPORT_FILE: &str = "_videos.txt";

/// A post that could not be processed, with the error that stopped it
#[derive(Debug)]
pub struct FailedPost {
    /// The post URL
    pub url: Url,
    /// The first error observed for this post
    pub error: Error,
}

/// The streaming videos of one post, surfaced for external handling
#[derive(Clone, Debug)]
pub struct UnhandledVideos {
    /// The post the videos belong to
    pub post_url: Url,
    /// The video references, in document order
    pub videos: Vec<VideoResource>,
}

/// Aggregated outcome of one batch run
///
/// Every input post folds into exactly one of: silent full success, an entry
/// in `failed_posts`, or an entry in `unhandled_videos`. Entry order reflects
/// completion order, not input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Posts that failed, in completion order
    pub failed_posts: Vec<FailedPost>,
    /// Posts that completed but carried videos this tool does not download
    pub unhandled_videos: Vec<UnhandledVideos>,
    /// Number of posts submitted to the run
    pub total_posts: usize,
}

/// Paths of the report files a [`BatchReport::write_reports`] call produced
#[derive(Debug, Default)]
pub struct WrittenReports {
    /// The failed-posts report, if any post failed
    pub failed: Option<PathBuf>,
    /// The unhandled-videos report, if any post carried videos
    pub videos: Option<PathBuf>,
}

impl BatchReport {
    /// Number of posts that completed (with or without unhandled videos)
    pub fn succeeded(&self) -> usize {
        self.total_posts - self.failed_posts.len()
    }

    fn failed_report_contents(&self) -> String {
        self.failed_posts
            .iter()
            .map(|failed| format!("{} [{}]", failed.url, failed.error))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn video_report_contents(&self) -> String {
        self.unhandled_videos
            .iter()
            .filter(|set| !set.videos.is_empty())
            .map(|set| {
                let links: Vec<&str> = set.videos.iter().map(|v| v.url().as_str()).collect();
                format!("{}\n{}\n", set.post_url, links.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the non-empty report artifacts into `output_dir`
    pub fn write_reports(&self, output_dir: &Path) -> Result<WrittenReports> {
        let mut written = WrittenReports::default();
        if !self.failed_posts.is_empty() {
            let path = output_dir.join(FAILED_REPORT_FILE);
            std::fs::write(&path, self.failed_report_contents())?;
            written.failed = Some(path);
        }
        if self.unhandled_videos.iter().any(|set| !set.videos.is_empty()) {
            let path = output_dir.join(VIDEO_REPORT_FILE);
            std::fs::write(&path, self.video_report_contents())?;
            written.videos = Some(path);
        }
        Ok(written)
    }
}

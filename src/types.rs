//! Progress events emitted during a batch run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Events emitted by [`crate::PostDownloader`] while a batch runs
///
/// Subscribers receive every event independently through a broadcast channel;
/// with no subscribers, events are silently dropped and the run proceeds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A post entered the pipeline
    PostStarted {
        /// The post URL
        url: Url,
        /// Position of the post in the input list
        index: usize,
    },

    /// The post's page rendered and its media references were classified
    MediaFound {
        /// The post URL
        url: Url,
        /// Position of the post in the input list
        index: usize,
        /// Number of downloadable images found
        images: usize,
        /// Number of streaming videos found
        videos: usize,
    },

    /// One image landed in the output directory
    ImageSaved {
        /// Resource name (output filename stem)
        name: String,
        /// Final path of the saved file
        path: PathBuf,
    },

    /// The post finished; its images (if any) are all saved
    PostCompleted {
        /// The post URL
        url: Url,
        /// Position of the post in the input list
        index: usize,
        /// Number of videos left for external handling
        unhandled_videos: usize,
    },

    /// The post failed; the batch continues without it
    PostFailed {
        /// The post URL
        url: Url,
        /// Position of the post in the input list
        index: usize,
        /// Error description
        error: String,
    },
}

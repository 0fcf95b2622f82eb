//! Configuration types for postmedia-dl

use crate::error::{Error, Result};
use crate::resource::ImageSize;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Rendering service connection settings
///
/// The engine talks to a Browserless-style headless browser service over HTTP.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Base URL of the rendering service (default: "http://localhost:3000")
    #[serde(default = "default_renderer_base_url")]
    pub base_url: String,

    /// API token appended to every request (None = unauthenticated service)
    #[serde(default)]
    pub token: Option<String>,

    /// User agent presented to the page
    ///
    /// A desktop browser identity makes the page emit plain video `src` URLs
    /// instead of blob links.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_url: default_renderer_base_url(),
            token: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Render-and-extract polling behavior
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum content-query attempts per post (default: 10)
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Delay between attempts while the content container has not appeared yet
    /// (default: 200 ms)
    #[serde(default = "default_not_ready_delay")]
    pub not_ready_delay: Duration,

    /// Delay between attempts once the container was found but held no media
    /// yet (default: 500 ms)
    #[serde(default = "default_empty_delay")]
    pub empty_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry_limit: default_retry_limit(),
            not_ready_delay: default_not_ready_delay(),
            empty_delay: default_empty_delay(),
        }
    }
}

/// File collision handling when moving a downloaded image into the output
/// directory
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCollisionAction {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Fail the download with a collision error
    Skip,
    /// Add a " (1)", " (2)", ... suffix until the name is free
    Rename,
}

/// Download behavior configuration (concurrency, sizing, temp storage)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum posts processed simultaneously (default: 6)
    #[serde(default = "default_max_concurrent_posts")]
    pub max_concurrent_posts: usize,

    /// Image rendition requested from the image host (default: large)
    #[serde(default)]
    pub image_size: ImageSize,

    /// Temporary directory for in-flight downloads (default: "./temp")
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// File collision handling
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_posts: default_max_concurrent_posts(),
            image_size: ImageSize::default(),
            temp_dir: default_temp_dir(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rendering service settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Render-and-extract polling behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Download behavior
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Validate the configuration, returning the offending key on failure
    pub fn validate(&self) -> Result<()> {
        if self.renderer.base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "rendering service base URL must not be empty".to_string(),
                key: Some("renderer.base_url".to_string()),
            });
        }
        if self.fetch.retry_limit == 0 {
            return Err(Error::Config {
                message: "retry limit must be at least 1".to_string(),
                key: Some("fetch.retry_limit".to_string()),
            });
        }
        if self.download.max_concurrent_posts == 0 {
            return Err(Error::Config {
                message: "concurrent post limit must be at least 1".to_string(),
                key: Some("download.max_concurrent_posts".to_string()),
            });
        }
        Ok(())
    }
}

fn default_renderer_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
     (KHTML, like Gecko) Version/16.1 Safari/605.1.15"
        .to_string()
}

fn default_retry_limit() -> u32 {
    10
}

fn default_not_ready_delay() -> Duration {
    Duration::from_millis(200)
}

fn default_empty_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_concurrent_posts() -> usize {
    6
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./temp")
}

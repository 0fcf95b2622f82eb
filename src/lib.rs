//! # postmedia-dl
//!
//! Renders social-media posts in a rendering engine it does not control — a
//! headless browser service that executes page scripts — extracts the media
//! references embedded in each post, downloads the images, and reports
//! streaming videos it intentionally leaves alone.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - The CLI binary is a thin shell over the crate
//! - **Narrow collaborator seams** - The renderer and the byte transfer are
//!   traits, so the extraction state machine is testable with deterministic
//!   fakes
//! - **No batch-level fragility** - One stalled or failed post never corrupts
//!   the batch's result
//!
//! ## Quick Start
//!
//! ```no_run
//! use postmedia_dl::{Config, PostDownloader};
//! use std::path::Path;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PostDownloader::new(Config::default())?;
//!     let posts = vec![Url::parse("https://twitter.com/someone/status/123")?];
//!
//!     let report = downloader.run(posts, Path::new("./downloads")).await?;
//!     println!(
//!         "{} of {} posts failed",
//!         report.failed_posts.len(),
//!         report.total_posts
//!     );
//!     report.write_reports(Path::new("./downloads"))?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Image byte-transfer collaborator
pub mod download;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Render-and-extract engine
pub mod extract;
/// Batch input helpers (link extraction, output directory checks)
pub mod input;
/// Rendering collaborator seam
pub mod render;
/// Batch results and report artifacts
pub mod report;
/// Typed media resources and their classification
pub mod resource;
/// Progress events
pub mod types;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, FetchConfig, FileCollisionAction, RendererConfig};
pub use download::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use downloader::PostDownloader;
pub use error::{Error, RenderError, Result};
pub use extract::MediaExtractor;
pub use render::{BrowserlessRenderer, RenderSession, Renderer};
pub use report::{BatchReport, FailedPost, UnhandledVideos, WrittenReports};
pub use resource::{ImageResource, ImageSize, ResourceSet, VideoResource};
pub use types::Event;

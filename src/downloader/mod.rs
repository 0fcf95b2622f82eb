//! Core downloader implementation split into focused submodules.
//!
//! The `PostDownloader` struct and its methods are organized by domain:
//! - [`batch`] - Batch orchestration over many posts
//! - [`post`] - Per-post pipeline (extract, download, place files)

mod batch;
mod post;

use crate::config::Config;
use crate::download::{HttpImageFetcher, ImageFetcher};
use crate::error::Result;
use crate::extract::MediaExtractor;
use crate::render::{BrowserlessRenderer, Renderer};
use crate::types::Event;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main downloader instance (cloneable - all fields are cheaply shareable)
#[derive(Clone)]
pub struct PostDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Render-and-extract engine; opens one rendering session per post
    pub(crate) extractor: Arc<MediaExtractor>,
    /// Image byte-transfer capability (trait object for pluggable implementations)
    pub(crate) fetcher: Arc<dyn ImageFetcher>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Cancellation token shared by every task of the current batch
    pub(crate) cancel_token: CancellationToken,
}

impl PostDownloader {
    /// Create a downloader with the production collaborators
    ///
    /// Connects a [`BrowserlessRenderer`] for page rendering and an
    /// [`HttpImageFetcher`] for image byte transfer.
    pub fn new(config: Config) -> Result<Self> {
        let renderer: Arc<dyn Renderer> = Arc::new(BrowserlessRenderer::new(&config.renderer)?);
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new()?);
        Self::with_collaborators(config, renderer, fetcher)
    }

    /// Create a downloader with explicit collaborators
    ///
    /// This is the seam for tests and for embedding alternative renderer or
    /// transfer implementations.
    pub fn with_collaborators(
        config: Config,
        renderer: Arc<dyn Renderer>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1024);
        let extractor = Arc::new(MediaExtractor::new(renderer, config.fetch.clone()));
        Ok(Self {
            config: Arc::new(config),
            extractor,
            fetcher,
            event_tx,
            cancel_token: CancellationToken::new(),
        })
    }

    /// Subscribe to progress events
    ///
    /// Multiple subscribers are supported; each receives all events
    /// independently. A subscriber that falls far behind sees a
    /// `RecvError::Lagged` instead of blocking the run.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Token that cancels the current batch when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Request cancellation of the current batch
    ///
    /// Posts not yet started fold into the report as failed; posts in flight
    /// are aborted at their next suspension point.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Emit an event to all subscribers
    ///
    /// With no active subscribers the event is silently dropped; the run never
    /// depends on anyone listening.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}

//! Rendering collaborator seam
//!
//! The extraction engine drives an external rendering engine it does not
//! control: an opaque service that loads a page, executes its scripts, and
//! exposes the resulting DOM to queries. That capability is abstracted behind
//! the [`Renderer`] / [`RenderSession`] trait pair so the engine's state
//! machine can be exercised with a deterministic fake.
//!
//! - [`BrowserlessRenderer`]: drives a Browserless-style headless Chrome
//!   service over HTTP.

mod browserless;

pub use browserless::BrowserlessRenderer;

use crate::error::RenderError;
use async_trait::async_trait;
use url::Url;

/// One exclusive page session
///
/// A session holds the load state of a single page. `&mut self` on both
/// operations makes concurrent use of one session a compile-time error: the
/// load state is single-flight by construction.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate the session to `url`
    ///
    /// Resolves once navigation has finished; a navigation failure is
    /// reported exactly once, as the error of this call.
    async fn load(&mut self, url: &Url) -> Result<(), RenderError>;

    /// Evaluate a script against the loaded page and return its value
    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, RenderError>;
}

/// Factory for page sessions
///
/// The engine requests a fresh session per fetch; sessions are never shared
/// across concurrent fetches.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a new page session
    async fn new_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

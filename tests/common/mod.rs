//! Common test utilities for postmedia-dl integration tests

use async_trait::async_trait;
use postmedia_dl::{
    Config, Error, FetchedImage, ImageFetcher, RenderError, RenderSession, Renderer, Result,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

#[allow(dead_code)]
pub const IMAGE_A: &str = "https://pbs.twimg.com/media/AAA111?format=jpg&name=medium";
#[allow(dead_code)]
pub const IMAGE_B: &str = "https://pbs.twimg.com/media/BBB222?format=jpg";
#[allow(dead_code)]
pub const VIDEO_A: &str = "https://video.twimg.com/ext_tw_video/1/pu/pl/a.m3u8";

/// Configuration with millisecond delays suitable for tests
#[allow(dead_code)]
pub fn fast_config(temp_dir: &Path) -> Config {
    let mut config = Config::default();
    config.fetch.retry_limit = 3;
    config.fetch.not_ready_delay = Duration::from_millis(1);
    config.fetch.empty_delay = Duration::from_millis(1);
    config.download.temp_dir = temp_dir.to_path_buf();
    config
}

/// What the scripted renderer answers for one post URL
#[derive(Clone)]
#[allow(dead_code)]
pub enum PageScript {
    /// Answer every content query with these raw `src` strings
    Sources(Vec<&'static str>),
    /// Answer every content query with the "still loading" marker
    NeverReady,
    /// Fail navigation outright
    FailLoad(&'static str),
}

/// Renderer whose sessions answer from a per-URL script
#[derive(Default)]
pub struct ScriptedRenderer {
    pages: Mutex<HashMap<String, PageScript>>,
}

#[allow(dead_code)]
impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &Url, script: PageScript) {
        self.pages.lock().unwrap().insert(url.to_string(), script);
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn new_session(&self) -> std::result::Result<Box<dyn RenderSession>, RenderError> {
        let pages = self.pages.lock().unwrap().clone();
        Ok(Box::new(ScriptedSession {
            pages,
            current: None,
        }))
    }
}

struct ScriptedSession {
    pages: HashMap<String, PageScript>,
    current: Option<String>,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn load(&mut self, url: &Url) -> std::result::Result<(), RenderError> {
        match self.pages.get(url.as_str()) {
            Some(PageScript::FailLoad(message)) => {
                Err(RenderError::Navigation(message.to_string()))
            }
            _ => {
                self.current = Some(url.to_string());
                Ok(())
            }
        }
    }

    async fn evaluate(&mut self, _script: &str) -> std::result::Result<Value, RenderError> {
        let current = self.current.as_deref().ok_or(RenderError::NoPageLoaded)?;
        match self.pages.get(current) {
            Some(PageScript::Sources(list)) => Ok(json!(list)),
            _ => Ok(Value::String("loading".to_string())),
        }
    }
}

/// Fetcher that materializes bytes locally and records peak concurrency
pub struct RecordingFetcher {
    failures: Mutex<Vec<String>>,
    content_type: Option<String>,
    delay: Duration,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingFetcher {
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
            content_type: Some("image/jpeg".to_string()),
            delay: Duration::from_millis(10),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn with_content_type(content_type: &str) -> Self {
        Self {
            content_type: Some(content_type.to_string()),
            ..Self::new()
        }
    }

    /// Make every URL containing `fragment` fail with a transport-style error
    pub fn fail_on(&self, fragment: &str) {
        self.failures.lock().unwrap().push(fragment.to_string());
    }

    /// Highest number of transfers observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl Default for RecordingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for RecordingFetcher {
    async fn fetch(&self, url: &Url, temp_dir: &Path) -> Result<FetchedImage> {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        let should_fail = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| url.as_str().contains(fragment.as_str()));
        if should_fail {
            return Err(Error::Io(std::io::Error::other(
                "simulated transport failure",
            )));
        }

        std::fs::create_dir_all(temp_dir)?;
        let path = temp_dir.join(format!("{}.part", Uuid::new_v4()));
        std::fs::write(&path, b"imagebytes")?;
        Ok(FetchedImage {
            path,
            content_type: self.content_type.clone(),
        })
    }
}

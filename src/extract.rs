//! Render-and-extract engine
//!
//! Turns one opaque, asynchronously-loading post page into a typed
//! [`ResourceSet`]. The engine owns a fresh rendering session per fetch and
//! drives a load → poll → classify state machine against it. Two outcomes that
//! look alike from the outside are tracked apart deliberately: a page whose
//! content container never appeared (a broken load, an error) and a container
//! that rendered but holds no media (a legitimate post, an empty success).

use crate::config::FetchConfig;
use crate::error::{Error, RenderError, Result};
use crate::render::Renderer;
use crate::resource::ResourceSet;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Marker the query script yields while the content container is absent
const STILL_LOADING: &str = "loading";

/// Script evaluated against the rendered page on every poll attempt
///
/// Finds the first `<article>` element. When absent the page is still
/// assembling and the script yields the `"loading"` marker. When present it
/// yields every `src` attribute of the image and video elements nested inside
/// it, images first, each group in document order.
const CONTENT_QUERY_SCRIPT: &str = r#"
const article = document.getElementsByTagName("article")[0];
if (article) {
    article.scrollIntoView();
    const sources = [];
    for (const img of article.getElementsByTagName("img")) {
        const src = img.getAttribute("src");
        if (src) {
            sources.push(src);
        }
    }
    for (const video of article.getElementsByTagName("video")) {
        const src = video.getAttribute("src");
        if (src) {
            sources.push(src);
        }
    }
    sources;
} else {
    "loading";
}
"#;

/// Outcome of one content-query attempt
enum ContainerQuery {
    /// The container has not rendered yet
    NotReady,
    /// The container rendered with these raw `src` strings
    Sources(Vec<String>),
}

/// Extracts classified media references from post pages
pub struct MediaExtractor {
    renderer: Arc<dyn Renderer>,
    config: FetchConfig,
}

impl MediaExtractor {
    /// Create an extractor that opens sessions on `renderer`
    pub fn new(renderer: Arc<dyn Renderer>, config: FetchConfig) -> Self {
        Self { renderer, config }
    }

    /// Fetch and classify the media references of one post
    ///
    /// Polls the rendered page up to the configured retry limit. The very
    /// first "still loading" response costs no retry slot — pages routinely
    /// answer the first query before their scripts have produced anything.
    /// Subsequent attempts each consume one slot, with a short delay while the
    /// container is missing and the standard delay once it rendered empty
    /// (lazy-loaded media may still be on its way).
    pub async fn fetch(&self, url: &Url) -> Result<ResourceSet> {
        let mut session = self.renderer.new_session().await?;
        session.load(url).await?;

        let mut attempts = 0u32;
        let mut container_seen = false;
        let mut first_not_ready = true;

        while attempts < self.config.retry_limit {
            let value = session.evaluate(CONTENT_QUERY_SCRIPT).await?;
            match Self::parse_query_value(&value)? {
                ContainerQuery::NotReady => {
                    if first_not_ready {
                        first_not_ready = false;
                    } else {
                        attempts += 1;
                    }
                    if attempts < self.config.retry_limit {
                        tokio::time::sleep(self.config.not_ready_delay).await;
                    }
                }
                ContainerQuery::Sources(raw) => {
                    attempts += 1;
                    container_seen = true;
                    let set = ResourceSet::classify(&raw);
                    if !set.is_empty() {
                        tracing::debug!(
                            url = %url,
                            images = set.images.len(),
                            videos = set.videos.len(),
                            attempts,
                            "Media references classified"
                        );
                        return Ok(set);
                    }
                    if attempts < self.config.retry_limit {
                        tokio::time::sleep(self.config.empty_delay).await;
                    }
                }
            }
        }

        if container_seen {
            tracing::debug!(url = %url, "Content container rendered with no media");
            Ok(ResourceSet::default())
        } else {
            Err(Error::RenderTimeout {
                url: url.clone(),
                attempts,
            })
        }
    }

    fn parse_query_value(value: &Value) -> Result<ContainerQuery> {
        match value {
            Value::String(marker) if marker == STILL_LOADING => Ok(ContainerQuery::NotReady),
            Value::Array(items) => Ok(ContainerQuery::Sources(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect(),
            )),
            other => Err(Error::Render(RenderError::Evaluation(format!(
                "unexpected query result: {other}"
            )))),
        }
    }
}

//! Image byte-transfer collaborator
//!
//! A narrow capability: fetch a URL into a uniquely named temporary file and
//! report the server's content type. The pipeline decides filenames and final
//! placement; this layer only moves bytes.

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;
use uuid::Uuid;

/// HTTP timeout for a single image transfer
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// A downloaded image sitting in temporary storage
#[derive(Debug)]
pub struct FetchedImage {
    /// Location of the temporary file holding the bytes
    pub path: PathBuf,
    /// Content type reported by the server, parameters stripped off by the caller
    pub content_type: Option<String>,
}

/// Byte-transfer capability for image URLs
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download `url` into a fresh file under `temp_dir`
    async fn fetch(&self, url: &Url, temp_dir: &Path) -> Result<FetchedImage>;
}

/// [`ImageFetcher`] backed by a shared reqwest client
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Create a fetcher with its own connection pool
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TRANSFER_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url, temp_dir: &Path) -> Result<FetchedImage> {
        let mut resp = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let path = temp_dir.join(format!("{}.part", Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&path).await?;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::debug!(url = %url, path = %path.display(), "Image fetched to temp storage");
        Ok(FetchedImage { path, content_type })
    }
}

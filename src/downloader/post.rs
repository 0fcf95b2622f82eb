//! Per-post pipeline — extract media references, download images, place files.

use super::PostDownloader;
use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use crate::resource::{ImageResource, VideoResource};
use crate::types::Event;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use url::Url;

/// Extension used when the server reports no recognizable image type
const FALLBACK_EXTENSION: &str = "jpg";

/// Maximum rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

impl PostDownloader {
    /// Process one post end to end
    ///
    /// Extraction failures and the first observed download failure surface
    /// verbatim; retries already happened inside the extraction engine, so
    /// none are added here. A post with no media completes immediately. On
    /// success the post's video references are returned untouched for
    /// external reporting — they are never downloaded.
    pub(crate) async fn process_post(
        &self,
        url: &Url,
        index: usize,
        output_dir: &Path,
    ) -> Result<Vec<VideoResource>> {
        let set = self.extractor.fetch(url).await?;
        tracing::info!(
            index,
            url = %url,
            images = set.images.len(),
            videos = set.videos.len(),
            "Classified post media"
        );
        self.emit_event(Event::MediaFound {
            url: url.clone(),
            index,
            images: set.images.len(),
            videos: set.videos.len(),
        });

        if set.is_empty() {
            return Ok(Vec::new());
        }

        try_join_all(
            set.images
                .iter()
                .map(|image| self.download_image(image, output_dir)),
        )
        .await?;
        Ok(set.videos)
    }

    /// Download one image and move it into the output directory
    async fn download_image(&self, image: &ImageResource, output_dir: &Path) -> Result<()> {
        let url = image.url_for(self.config.download.image_size);
        let fetched = self
            .fetcher
            .fetch(&url, &self.config.download.temp_dir)
            .await?;
        let extension = extension_for(fetched.content_type.as_deref());
        let target = output_dir.join(format!("{}.{}", image.name(), extension));
        let target = resolve_collision(target, self.config.download.file_collision)?;
        tokio::fs::rename(&fetched.path, &target).await?;
        tracing::debug!(name = image.name(), path = %target.display(), "Image saved");
        self.emit_event(Event::ImageSaved {
            name: image.name().to_string(),
            path: target,
        });
        Ok(())
    }
}

/// Map a reported content type to an output file extension
fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("image/jpeg" | "image/jpg") => "jpg",
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        Some("image/bmp") => "bmp",
        _ => FALLBACK_EXTENSION,
    }
}

/// Apply the collision policy to a desired target path
fn resolve_collision(path: PathBuf, action: FileCollisionAction) -> Result<PathBuf> {
    match action {
        FileCollisionAction::Overwrite => Ok(path),
        FileCollisionAction::Skip => {
            if path.exists() {
                return Err(Error::FileCollision {
                    path,
                    reason: "file already exists".to_string(),
                });
            }
            Ok(path)
        }
        FileCollisionAction::Rename => {
            if !path.exists() {
                return Ok(path);
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("image")
                .to_string();
            let extension = path.extension().and_then(|e| e.to_str()).map(str::to_owned);
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            for i in 1..=MAX_RENAME_ATTEMPTS {
                let candidate = match &extension {
                    Some(ext) => parent.join(format!("{stem} ({i}).{ext}")),
                    None => parent.join(format!("{stem} ({i})")),
                };
                if !candidate.exists() {
                    return Ok(candidate);
                }
            }
            Err(Error::FileCollision {
                path,
                reason: format!("no free name after {MAX_RENAME_ATTEMPTS} attempts"),
            })
        }
    }
}

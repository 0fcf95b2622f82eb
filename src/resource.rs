//! Typed media resources extracted from a rendered post
//!
//! Raw `src` strings scraped out of the page are classified into
//! [`ImageResource`] and [`VideoResource`] values. Classification is pure:
//! unrelated strings are simply not a match, never an error.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Host/path prefix identifying downloadable post images
/// (e.g. `https://pbs.twimg.com/media/FWJ8YmYaAAEjJzZ?format=jpg&name=medium`)
const IMAGE_URL_PREFIX: &str = "https://pbs.twimg.com/media/";

/// Host prefix identifying streaming video playlists
/// (e.g. `https://video.twimg.com/ext_tw_video/.../pl/xyz.m3u8`)
const VIDEO_URL_PREFIX: &str = "https://video.twimg.com";

/// Query key carrying the requested image size
const SIZE_QUERY_KEY: &str = "name";

/// Image size qualifier understood by the image host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// Medium rendition
    Medium,
    /// Large rendition (the best quality worth archiving)
    #[default]
    Large,
}

impl ImageSize {
    /// The size qualifier value as it appears in the URL query
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
        }
    }
}

/// A downloadable image reference extracted from a rendered post
///
/// The stored base URL has every size qualifier stripped, so
/// [`ImageResource::url_for`] always yields exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageResource {
    name: String,
    base: Url,
}

impl ImageResource {
    /// Classify a raw `src` string as a post image
    ///
    /// Returns `None` for strings outside the known image host or that do not
    /// parse as URLs. The resource name is derived from the last path segment,
    /// falling back to a generated id if the path has none.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.starts_with(IMAGE_URL_PREFIX) {
            return None;
        }
        let mut base = Url::parse(raw).ok()?;
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(key, _)| key.as_ref() != SIZE_QUERY_KEY)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        base.set_query(None);
        if !retained.is_empty() {
            base.query_pairs_mut()
                .extend_pairs(retained.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        let name = base
            .path_segments()
            .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Some(Self { name, base })
    }

    /// Stable identifier used as the output filename stem
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The image URL without any size qualifier
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The image URL with the requested size qualifier appended
    pub fn url_for(&self, size: ImageSize) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(SIZE_QUERY_KEY, size.as_str());
        url
    }
}

/// A streaming video reference extracted from a rendered post
///
/// Never downloaded; surfaced to the caller for external handling. The name is
/// a generated id — video identity is not derived from content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoResource {
    name: String,
    url: Url,
}

impl VideoResource {
    /// Classify a raw `src` string as a streaming video reference
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.starts_with(VIDEO_URL_PREFIX) {
            return None;
        }
        let url = Url::parse(raw).ok()?;
        Some(Self {
            name: Uuid::new_v4().to_string(),
            url,
        })
    }

    /// Generated identifier for this reference
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The video playlist URL
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// The classified media references of one post
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceSet {
    /// Downloadable images, in document order
    pub images: Vec<ImageResource>,
    /// Streaming videos, in document order
    pub videos: Vec<VideoResource>,
}

impl ResourceSet {
    /// Partition raw reference strings into images and videos
    ///
    /// Order within each category follows the input; unrecognized strings are
    /// discarded.
    pub fn classify(raw: &[String]) -> Self {
        Self {
            images: raw.iter().filter_map(|s| ImageResource::parse(s)).collect(),
            videos: raw.iter().filter_map(|s| VideoResource::parse(s)).collect(),
        }
    }

    /// True when the post carries no recognized media at all
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_and_derives_name_from_path() {
        let resource =
            ImageResource::parse("https://pbs.twimg.com/media/ABC123?format=jpg&name=medium")
                .unwrap();
        assert_eq!(resource.name(), "ABC123");
        assert_eq!(resource.base().host_str(), Some("pbs.twimg.com"));
    }

    #[test]
    fn url_for_replaces_existing_size_qualifier() {
        let resource =
            ImageResource::parse("https://pbs.twimg.com/media/ABC123?format=jpg&name=medium")
                .unwrap();
        let large = resource.url_for(ImageSize::Large);
        let query = large.query().unwrap();
        assert!(query.ends_with("name=large"));
        assert!(!query.contains("name=medium"));
        assert!(query.contains("format=jpg"));
    }

    #[test]
    fn url_for_yields_exactly_one_size_qualifier() {
        let resource = ImageResource::parse(
            "https://pbs.twimg.com/media/XYZ?name=small&format=png&name=medium",
        )
        .unwrap();
        let url = resource.url_for(ImageSize::Medium);
        let qualifier_count = url
            .query_pairs()
            .filter(|(key, _)| key.as_ref() == "name")
            .count();
        assert_eq!(qualifier_count, 1);
    }

    #[test]
    fn image_without_query_gains_a_qualifier() {
        let resource = ImageResource::parse("https://pbs.twimg.com/media/NoQuery").unwrap();
        let url = resource.url_for(ImageSize::Large);
        assert_eq!(url.query(), Some("name=large"));
    }

    #[test]
    fn rejects_unrelated_hosts() {
        assert!(ImageResource::parse("https://example.com/media/ABC").is_none());
        assert!(ImageResource::parse("https://abs.twimg.com/sticky/icon.png").is_none());
        assert!(VideoResource::parse("https://example.com/clip.m3u8").is_none());
    }

    #[test]
    fn image_classification_is_idempotent() {
        let raw = "https://pbs.twimg.com/media/ABC123?format=jpg&name=medium";
        let first = ImageResource::parse(raw).unwrap();
        let second = ImageResource::parse(raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn video_classification_is_stable_up_to_generated_name() {
        let raw = "https://video.twimg.com/ext_tw_video/123/pu/pl/abc.m3u8?tag=12";
        let first = VideoResource::parse(raw).unwrap();
        let second = VideoResource::parse(raw).unwrap();
        assert_eq!(first.url(), second.url());
    }

    #[test]
    fn classify_partitions_and_preserves_order() {
        let raw = vec![
            "https://pbs.twimg.com/media/AAA?name=small".to_string(),
            "https://abs.twimg.com/responsive-web/icon.svg".to_string(),
            "https://video.twimg.com/ext_tw_video/1/pu/pl/a.m3u8".to_string(),
            "https://pbs.twimg.com/media/BBB".to_string(),
            "not a url at all".to_string(),
        ];
        let set = ResourceSet::classify(&raw);
        assert_eq!(set.images.len(), 2);
        assert_eq!(set.videos.len(), 1);
        assert_eq!(set.images[0].name(), "AAA");
        assert_eq!(set.images[1].name(), "BBB");
        assert!(!set.is_empty());
    }

    #[test]
    fn classify_of_nothing_is_empty() {
        let set = ResourceSet::classify(&[]);
        assert!(set.is_empty());
    }
}

//! Batch input helpers — post links from user input, output directory checks.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

/// Link prefixes accepted as post links
const POST_LINK_PREFIXES: &[&str] = &["https://twitter.com", "https://x.com"];

#[allow(clippy::expect_used)]
fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // anything https:// up to whitespace or a common delimiter
    PATTERN.get_or_init(|| {
        Regex::new(r#"https://[^\s"',<>\\]+"#).expect("literal link pattern compiles")
    })
}

/// Extract post links from free-form text
///
/// Scans arbitrary text (archive JSON fragments, CSV exports, plain link
/// lists) for links and keeps only those pointing at posts, in order of
/// appearance.
pub fn extract_post_links(content: &str) -> Vec<Url> {
    link_pattern()
        .find_iter(content)
        .filter(|found| {
            POST_LINK_PREFIXES
                .iter()
                .any(|prefix| found.as_str().starts_with(prefix))
        })
        .filter_map(|found| Url::parse(found.as_str()).ok())
        .collect()
}

/// Read post links from a text file
pub fn read_post_links(path: &Path) -> Result<Vec<Url>> {
    if !path.is_file() {
        return Err(Error::InputFileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(extract_post_links(&content))
}

/// Parse a single post link supplied directly by the caller
pub fn parse_post_link(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|_| Error::InvalidPostUrl(raw.to_string()))
}

/// Create the output directory if needed, rejecting non-directory paths
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::OutputNotDirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    tracing::info!(path = %path.display(), "Created output directory");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // a slice of the kind of text users feed in: archive JSON, then a CSV row
    const MIXED_CONTENT: &str = r#"
{
  "like" : {
    "tweetId" : "1650000000000000001",
    "fullText" : "spring sketches https://t.co/AbCdEf123",
    "expandedUrl" : "https://twitter.com/i/web/status/1650000000000000001"
  }
},
{
  "like" : {
    "tweetId" : "1650000000000000002",
    "expandedUrl" : "https://twitter.com/i/web/status/1650000000000000002"
  }
},
https://t.co/ZzYyXx987,https://x.com/somepainter/status/1650000000000000003,weekly roundup
"#;

    #[test]
    fn extracts_post_links_in_order_and_skips_shorteners() {
        let links = extract_post_links(MIXED_CONTENT);
        let raw: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            raw,
            [
                "https://twitter.com/i/web/status/1650000000000000001",
                "https://twitter.com/i/web/status/1650000000000000002",
                "https://x.com/somepainter/status/1650000000000000003",
            ]
        );
    }

    #[test]
    fn text_without_post_links_yields_nothing() {
        assert!(extract_post_links("no links here, just words").is_empty());
        assert!(extract_post_links("https://example.com/not-a-post").is_empty());
    }

    #[test]
    fn read_post_links_reads_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "https://twitter.com/a/status/1\n").unwrap();
        let links = read_post_links(&path).unwrap();
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn missing_input_file_is_reported() {
        let err = read_post_links(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::InputFileNotFound(_)));
    }

    #[test]
    fn parse_post_link_rejects_garbage() {
        assert!(parse_post_link("https://twitter.com/a/status/1").is_ok());
        assert!(matches!(
            parse_post_link("not a url"),
            Err(Error::InvalidPostUrl(_))
        ));
    }

    #[test]
    fn ensure_output_dir_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());
        // a second call on the existing directory is fine
        ensure_output_dir(&target).unwrap();
    }

    #[test]
    fn ensure_output_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a-file");
        std::fs::write(&target, b"x").unwrap();
        let err = ensure_output_dir(&target).unwrap_err();
        assert!(matches!(err, Error::OutputNotDirectory(_)));
    }
}

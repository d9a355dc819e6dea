//! Download of manifests, checksum sidecars, and archives.
//!
//! Provides a trait-based abstraction over HTTP so the pipeline can be
//! exercised in tests without network access.

use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Network timeout applied when no override is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Trait for fetching a URL into a local file.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::artefact::download::{DEFAULT_TIMEOUT, HttpDownloader};
///
/// let downloader = HttpDownloader::new(DEFAULT_TIMEOUT);
/// // Use downloader.download(url, dest) in production
/// # let _ = downloader;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Downloader {
    /// Download `url` and write the body to `dest`, replacing any existing
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP downloader using `ureq`.
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    /// Create a downloader whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        debug!("GET {url} -> {}", dest.display());
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = BufWriter::new(File::create(dest)?);
        let bytes = std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(
            |e| DownloadError::HttpError {
                url: url.to_owned(),
                reason: e.to_string(),
            },
        )?;
        file.flush()?;
        debug!("received {bytes} bytes from {url}");
        Ok(())
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/channel-rust-nightly.toml", &err);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[rstest]
    #[case::server_error(500)]
    #[case::forbidden(403)]
    fn map_ureq_error_maps_other_status_to_http_error(#[case] status: u16) {
        let err = ureq::Error::StatusCode(status);
        let mapped = map_ureq_error("https://example.test/archive.tar.xz", &err);
        match mapped {
            DownloadError::HttpError { url, reason } => {
                assert_eq!(url, "https://example.test/archive.tar.xz");
                assert!(reason.contains(&status.to_string()), "reason: {reason}");
            }
            other => panic!("expected HttpError, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_host_reports_http_error() {
        let downloader = HttpDownloader::new(Duration::from_secs(5));
        let dir = tempfile::tempdir().expect("temp dir");
        let result = downloader.download("http://127.0.0.1:9/manifest", &dir.path().join("m"));
        assert!(matches!(result, Err(DownloadError::HttpError { .. })));
    }
}

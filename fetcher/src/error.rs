//! Error types for the `fetch-docs-json` pipeline.
//!
//! Every failure is fatal. Each variant wraps the error of the step that
//! failed so the message names what went wrong and where.

use crate::artefact::checksum::ChecksumError;
use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use crate::artefact::manifest::ManifestError;
use crate::config::ConfigError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching documentation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The command-line configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The output directory does not exist or is not a directory.
    #[error("output directory {path} does not exist; create it before running")]
    OutputDirMissing {
        /// The configured output directory.
        path: Utf8PathBuf,
    },

    /// The staging directory could not be created or its contents could
    /// not be moved into the output directory.
    #[error("staging in {path} failed: {source}")]
    Staging {
        /// The directory being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A manifest, checksum, or archive download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// A checksum file was malformed or a digest did not match.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// The manifest could not be parsed or lacks the requested archive.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The archive could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_missing_names_directory() {
        let err = FetchError::OutputDirMissing {
            path: Utf8PathBuf::from("doc-json"),
        };
        assert_eq!(
            err.to_string(),
            "output directory doc-json does not exist; create it before running"
        );
    }

    #[test]
    fn download_errors_keep_their_message() {
        let err = FetchError::from(DownloadError::NotFound {
            url: "https://example.test/channel-rust-nightly.toml".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "not found: https://example.test/channel-rust-nightly.toml"
        );
    }
}

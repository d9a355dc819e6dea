//! Detached checksum files and digest verification.
//!
//! Distribution servers publish a `<file>.sha256` sidecar next to each
//! manifest in the `sha256sum` layout:
//!
//! ```text
//! 0123…cdef  channel-rust-nightly.toml
//! ```
//!
//! This module parses that line and compares digests of downloaded files
//! against an expected value.

use super::sha256_digest::Sha256Digest;
use log::debug;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Errors arising from checksum parsing or verification.
#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    /// The checksum file has no non-blank line.
    #[error("checksum file {} is empty", .file.display())]
    EmptyChecksumFile {
        /// The checksum file that was read.
        file: PathBuf,
    },

    /// The digest field of the checksum line is malformed.
    #[error("checksum file {} is malformed: {source}", .file.display())]
    InvalidDigest {
        /// The checksum file that was read.
        file: PathBuf,
        /// The validation failure.
        #[source]
        source: super::error::ArtefactError,
    },

    /// The computed digest differs from the expected one.
    #[error(
        "checksum mismatch for {}: expected {expected}, got {actual}",
        .file.display()
    )]
    Mismatch {
        /// The file whose digest was checked.
        file: PathBuf,
        /// The digest that was expected.
        expected: Sha256Digest,
        /// The digest computed from the file contents.
        actual: Sha256Digest,
    },

    /// The file could not be read.
    #[error("failed to read {}: {source}", .file.display())]
    Io {
        /// The file being read.
        file: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A parsed `sha256sum`-style checksum line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumLine {
    /// The expected digest.
    pub digest: Sha256Digest,
    /// The filename the digest refers to, when present.
    pub filename: Option<String>,
}

/// Parse the first non-blank line of a checksum file.
///
/// A leading `*` (binary mode marker) on the filename is dropped.
///
/// # Errors
///
/// Returns [`ChecksumError::EmptyChecksumFile`] when no line is present and
/// [`ChecksumError::InvalidDigest`] when the digest is not 64 lowercase hex
/// characters. `file` is only used to label errors.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::artefact::checksum::parse_checksum_line;
/// use std::path::Path;
///
/// let text = format!("{}  channel-rust-nightly.toml\n", "a".repeat(64));
/// let line = parse_checksum_line(&text, Path::new("x.sha256")).expect("valid line");
/// assert_eq!(line.filename.as_deref(), Some("channel-rust-nightly.toml"));
/// ```
pub fn parse_checksum_line(text: &str, file: &Path) -> Result<ChecksumLine, ChecksumError> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ChecksumError::EmptyChecksumFile {
            file: file.to_path_buf(),
        })?;

    let (digest_text, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let digest =
        Sha256Digest::try_from(digest_text).map_err(|source| ChecksumError::InvalidDigest {
            file: file.to_path_buf(),
            source,
        })?;

    let name = rest.trim_start().trim_start_matches('*');
    let filename = (!name.is_empty()).then(|| name.to_owned());

    Ok(ChecksumLine { digest, filename })
}

/// Read and parse a checksum file from disk.
///
/// # Errors
///
/// Returns [`ChecksumError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_checksum_line`].
pub fn read_checksum_file(path: &Path) -> Result<ChecksumLine, ChecksumError> {
    let text = std::fs::read_to_string(path).map_err(|source| ChecksumError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    parse_checksum_line(&text, path)
}

/// Compute the SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks.
///
/// # Errors
///
/// Returns [`ChecksumError::Io`] if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<Sha256Digest, ChecksumError> {
    let io_error = |source| ChecksumError::Io {
        file: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(Sha256Digest::from_hasher(hasher))
}

/// Verify that the file at `path` hashes to `expected`.
///
/// # Errors
///
/// Returns [`ChecksumError::Mismatch`] when the digests differ and
/// [`ChecksumError::Io`] if the file cannot be read.
pub fn verify_file(path: &Path, expected: &Sha256Digest) -> Result<(), ChecksumError> {
    let actual = sha256_file(path)?;
    debug!("sha256 {} = {actual}", path.display());
    if &actual != expected {
        return Err(ChecksumError::Mismatch {
            file: path.to_path_buf(),
            expected: expected.clone(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ABC_SHA: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn write_temp(contents: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("payload");
        std::fs::write(&path, contents).expect("write payload");
        (dir, path)
    }

    #[rstest]
    #[case::text_mode(format!("{ABC_SHA}  channel-rust-nightly.toml\n"))]
    #[case::binary_mode(format!("{ABC_SHA} *channel-rust-nightly.toml"))]
    #[case::leading_blank_lines(format!("\n\n{ABC_SHA}  channel-rust-nightly.toml"))]
    fn parses_sha256sum_layouts(#[case] text: String) {
        let line = parse_checksum_line(&text, Path::new("m.sha256")).expect("valid line");
        assert_eq!(line.digest.as_str(), ABC_SHA);
        assert_eq!(line.filename.as_deref(), Some("channel-rust-nightly.toml"));
    }

    #[test]
    fn parses_bare_digest_without_filename() {
        let line = parse_checksum_line(ABC_SHA, Path::new("m.sha256")).expect("valid line");
        assert_eq!(line.filename, None);
    }

    #[test]
    fn rejects_empty_file() {
        let result = parse_checksum_line("  \n\n", Path::new("m.sha256"));
        assert!(matches!(
            result,
            Err(ChecksumError::EmptyChecksumFile { .. })
        ));
    }

    #[test]
    fn rejects_malformed_digest() {
        let result = parse_checksum_line("not-a-digest  file", Path::new("m.sha256"));
        assert!(matches!(result, Err(ChecksumError::InvalidDigest { .. })));
    }

    #[test]
    fn sha256_file_matches_known_vector() {
        let (_dir, path) = write_temp(b"abc");
        let digest = sha256_file(&path).expect("hash file");
        assert_eq!(digest.as_str(), ABC_SHA);
    }

    #[test]
    fn verify_file_accepts_matching_digest() {
        let (_dir, path) = write_temp(b"abc");
        let expected = Sha256Digest::try_from(ABC_SHA).expect("known good");
        assert!(verify_file(&path, &expected).is_ok());
    }

    #[test]
    fn verify_file_reports_mismatch() {
        let (_dir, path) = write_temp(b"tampered");
        let expected = Sha256Digest::try_from(ABC_SHA).expect("known good");
        let err = verify_file(&path, &expected).expect_err("digest differs");
        match err {
            ChecksumError::Mismatch {
                expected: reported, ..
            } => assert_eq!(reported.as_str(), ABC_SHA),
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn sha256_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = sha256_file(&dir.path().join("absent"));
        assert!(matches!(result, Err(ChecksumError::Io { .. })));
    }
}

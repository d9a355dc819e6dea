//! Toolchain version identifier used to select a dated manifest.
//!
//! The identifier is interpolated verbatim as a path segment of the
//! distribution server URL (e.g. `dist/2024-01-15/channel-rust-nightly.toml`),
//! so only characters that are safe inside a single segment are accepted:
//! ASCII alphanumerics, hyphens, dots, and underscores.

use super::error::{ArtefactError, Result};
use std::fmt;

/// A validated toolchain version identifier (e.g. `2024-01-15`).
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::artefact::toolchain_version::ToolchainVersion;
///
/// let version = ToolchainVersion::try_from("2024-01-15").expect("valid version");
/// assert_eq!(version.as_str(), "2024-01-15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolchainVersion(String);

fn is_valid_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_'
}

impl ToolchainVersion {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ToolchainVersion {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(ArtefactError::InvalidToolchainVersion {
                value: value.to_owned(),
                reason: "identifier must not be empty".to_owned(),
            });
        }
        if value == "." || value == ".." {
            return Err(ArtefactError::InvalidToolchainVersion {
                value: value.to_owned(),
                reason: "identifier must not be a relative path segment".to_owned(),
            });
        }
        if let Some(bad) = value.chars().find(|c| !is_valid_segment_char(*c)) {
            return Err(ArtefactError::InvalidToolchainVersion {
                value: value.to_owned(),
                reason: format!("invalid character '{bad}'"),
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for ToolchainVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Rust distribution channel manifest.
//!
//! A channel manifest (`channel-rust-<channel>.toml`) lists every package of
//! a release together with per-target download metadata:
//!
//! ```toml
//! manifest-version = "2"
//! date = "2024-01-15"
//!
//! [pkg.rust-docs-json-preview]
//! version = "1.77.0-nightly (2024-01-14)"
//!
//! [pkg.rust-docs-json-preview.target.x86_64-unknown-linux-gnu]
//! available = true
//! url = "https://static.rust-lang.org/dist/2024-01-15/rust-docs-json-nightly-x86_64-unknown-linux-gnu.tar.gz"
//! hash = "…"
//! xz_url = "https://static.rust-lang.org/dist/2024-01-15/rust-docs-json-nightly-x86_64-unknown-linux-gnu.tar.xz"
//! xz_hash = "…"
//! ```
//!
//! Only the keys needed to locate an archive are modelled; everything else
//! (`renames`, `profiles`, `artifacts`, component lists) is ignored during
//! deserialization.

use super::compression::Compression;
use super::sha256_digest::Sha256Digest;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The manifest schema version this crate understands.
pub const SUPPORTED_MANIFEST_VERSION: &str = "2";

/// Errors arising from manifest parsing or lookup.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The document is not valid TOML or does not match the schema.
    #[error("manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The manifest declares a schema version other than the supported one.
    #[error(
        "unsupported manifest-version \"{found}\"; expected \"{}\"",
        SUPPORTED_MANIFEST_VERSION
    )]
    UnsupportedVersion {
        /// The declared version.
        found: String,
    },

    /// The requested package has no section in the manifest.
    #[error("package {package} not found in manifest")]
    MissingPackage {
        /// The requested package.
        package: String,
    },

    /// The package exists but has no entry for the requested target.
    #[error("package {package} has no entry for target {target}")]
    MissingTarget {
        /// The requested package.
        package: String,
        /// The requested target triple.
        target: String,
    },

    /// The target entry exists but is marked unavailable.
    #[error("package {package} is not available for target {target} in this release")]
    Unavailable {
        /// The requested package.
        package: String,
        /// The requested target triple.
        target: String,
    },

    /// A required field is absent from the target entry.
    #[error("field {field} missing from [pkg.{package}.target.{target}]")]
    MissingField {
        /// The requested package.
        package: String,
        /// The requested target triple.
        target: String,
        /// The name of the absent field.
        field: &'static str,
    },
}

/// A parsed channel manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelManifest {
    #[serde(rename = "manifest-version")]
    manifest_version: Option<String>,
    date: Option<String>,
    #[serde(rename = "pkg", default)]
    packages: BTreeMap<String, Package>,
}

/// One `[pkg.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
struct Package {
    version: Option<String>,
    #[serde(default)]
    target: BTreeMap<String, TargetArtefact>,
}

/// One `[pkg.<name>.target.<triple>]` section.
#[derive(Debug, Clone, Deserialize)]
struct TargetArtefact {
    /// Only an explicit `available = false` marks the target unavailable.
    #[serde(default = "available_by_default")]
    available: bool,
    url: Option<String>,
    hash: Option<Sha256Digest>,
    xz_url: Option<String>,
    xz_hash: Option<Sha256Digest>,
}

const fn available_by_default() -> bool {
    true
}

impl TargetArtefact {
    fn fields(&self, compression: Compression) -> (Option<&String>, Option<&Sha256Digest>) {
        match compression {
            Compression::Xz => (self.xz_url.as_ref(), self.xz_hash.as_ref()),
            Compression::Gz => (self.url.as_ref(), self.hash.as_ref()),
        }
    }
}

/// The download location and expected digest of a package archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    /// The archive URL, verbatim from the manifest.
    pub url: String,
    /// The digest the downloaded archive must match.
    pub sha256: Sha256Digest,
}

impl ChannelManifest {
    /// The `date` key, when present.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// The `version` string of `package`, when present.
    #[must_use]
    pub fn package_version(&self, package: &str) -> Option<&str> {
        self.packages.get(package)?.version.as_deref()
    }

    /// Locate the archive for `package` on `target` in the given format.
    ///
    /// # Errors
    ///
    /// Returns a [`ManifestError`] naming the first missing piece: the
    /// package, the target, availability, or the URL or hash field.
    pub fn archive_source(
        &self,
        package: &str,
        target: &str,
        compression: Compression,
    ) -> Result<ArchiveSource, ManifestError> {
        let entry = self
            .packages
            .get(package)
            .ok_or_else(|| ManifestError::MissingPackage {
                package: package.to_owned(),
            })?
            .target
            .get(target)
            .ok_or_else(|| ManifestError::MissingTarget {
                package: package.to_owned(),
                target: target.to_owned(),
            })?;

        if !entry.available {
            return Err(ManifestError::Unavailable {
                package: package.to_owned(),
                target: target.to_owned(),
            });
        }

        let missing = |field| ManifestError::MissingField {
            package: package.to_owned(),
            target: target.to_owned(),
            field,
        };
        let (url, sha256) = entry.fields(compression);
        let url = url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| missing(compression.url_field()))?;
        let sha256 = sha256.ok_or_else(|| missing(compression.hash_field()))?;

        Ok(ArchiveSource {
            url: url.clone(),
            sha256: sha256.clone(),
        })
    }
}

/// Parse a channel manifest from TOML text.
///
/// Digest fields are validated during deserialization, so a malformed
/// `hash`/`xz_hash` is reported here rather than at verification time.
///
/// # Errors
///
/// Returns [`ManifestError::Toml`] for malformed documents and
/// [`ManifestError::UnsupportedVersion`] when `manifest-version` is present
/// but not `"2"`.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::artefact::manifest::parse_manifest;
///
/// let manifest = parse_manifest("manifest-version = \"2\"\ndate = \"2024-01-15\"\n")
///     .expect("valid manifest");
/// assert_eq!(manifest.date(), Some("2024-01-15"));
/// ```
pub fn parse_manifest(text: &str) -> Result<ChannelManifest, ManifestError> {
    let manifest: ChannelManifest = toml::from_str(text)?;
    match manifest.manifest_version.as_deref() {
        None | Some(SUPPORTED_MANIFEST_VERSION) => Ok(manifest),
        Some(other) => Err(ManifestError::UnsupportedVersion {
            found: other.to_owned(),
        }),
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

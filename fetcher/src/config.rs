//! Resolved run configuration.
//!
//! [`FetchConfig`] holds every value the pipeline needs, already validated,
//! and derives the distribution URLs, local filenames, and archive member
//! selection from them. It is normally built from [`Cli`] arguments but can
//! be constructed directly for tests and embedding.

use crate::artefact::compression::Compression;
use crate::artefact::download::DEFAULT_TIMEOUT;
use crate::artefact::error::ArtefactError;
use crate::artefact::extraction::{ExtractionError, MemberSelection};
use crate::artefact::toolchain_version::ToolchainVersion;
use crate::cli::Cli;
use camino::Utf8PathBuf;
use std::time::Duration;

/// Distribution server hosting channel manifests.
pub const DEFAULT_DIST_SERVER: &str = "https://static.rust-lang.org";

/// Environment variable overriding [`DEFAULT_DIST_SERVER`].
pub const DIST_SERVER_ENV: &str = "DOCS_JSON_DIST_SERVER";

/// Release channel whose manifest is fetched.
pub const DEFAULT_CHANNEL: &str = "nightly";

/// Manifest package holding the JSON documentation.
pub const DEFAULT_PACKAGE: &str = "rust-docs-json-preview";

/// Target triple whose archive is fetched.
pub const DEFAULT_TARGET: &str = "x86_64-unknown-linux-gnu";

/// Directory receiving downloads and extracted files.
pub const DEFAULT_OUTPUT_DIR: &str = "doc-json";

/// Leading member components removed during extraction:
/// `<archive-root>/<package>/share/doc/rust/json/`.
pub const DEFAULT_STRIP_COMPONENTS: usize = 6;

/// Prefix shared by documentation archive names and their root directory.
const ARCHIVE_PREFIX: &str = "rust-docs-json";

/// Path of the JSON documentation inside a package directory.
const DOCS_SUBDIR: &str = "share/doc/rust/json";

/// Errors arising from invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The toolchain version identifier is malformed.
    #[error(transparent)]
    InvalidVersion(#[from] ArtefactError),

    /// The distribution server is not an HTTP(S) URL.
    #[error("invalid distribution server \"{value}\": expected an http:// or https:// URL")]
    InvalidDistServer {
        /// The rejected value.
        value: String,
    },

    /// A required name is empty or contains characters unusable in a file
    /// name or URL segment.
    #[error("invalid {what} \"{value}\"")]
    InvalidName {
        /// Which setting was rejected.
        what: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The member selection pattern could not be compiled.
    #[error(transparent)]
    Selection(#[from] ExtractionError),
}

/// Everything the fetch pipeline needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Distribution server root, without a trailing slash.
    pub dist_server: String,
    /// Release channel (e.g. `nightly`).
    pub channel: String,
    /// Dated release to fetch; `None` selects the latest.
    pub version: Option<ToolchainVersion>,
    /// Manifest package section.
    pub package: String,
    /// Manifest target section.
    pub target: String,
    /// Which advertised archive to download.
    pub compression: Compression,
    /// Pre-existing directory receiving all output.
    pub output_dir: Utf8PathBuf,
    /// Leading member components removed during extraction.
    pub strip_components: usize,
    /// Per-request network timeout.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    /// The latest nightly `rust-docs-json-preview` for
    /// `x86_64-unknown-linux-gnu`, extracted into `doc-json`.
    fn default() -> Self {
        Self {
            dist_server: DEFAULT_DIST_SERVER.to_owned(),
            channel: DEFAULT_CHANNEL.to_owned(),
            version: None,
            package: DEFAULT_PACKAGE.to_owned(),
            target: DEFAULT_TARGET.to_owned(),
            compression: Compression::default(),
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            strip_components: DEFAULT_STRIP_COMPONENTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Resolve and validate configuration from command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the version identifier, distribution
    /// server, channel, package, or target is malformed.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let version = cli
            .toolchain_version
            .as_deref()
            .map(ToolchainVersion::try_from)
            .transpose()?;
        let config = Self {
            dist_server: normalise_dist_server(&cli.dist_server)?,
            channel: validate_name("channel", &cli.channel)?,
            version,
            package: validate_name("package", &cli.package)?,
            target: validate_name("target", &cli.target)?,
            compression: cli.compression,
            output_dir: cli.output_dir.clone(),
            strip_components: cli.strip_components,
            timeout: Duration::from_secs(cli.timeout),
        };
        config.member_selection()?;
        Ok(config)
    }

    /// File name of the channel manifest, e.g. `channel-rust-nightly.toml`.
    #[must_use]
    pub fn manifest_filename(&self) -> String {
        format!("channel-rust-{}.toml", self.channel)
    }

    /// File name of the manifest's checksum sidecar.
    #[must_use]
    pub fn checksum_filename(&self) -> String {
        format!("{}.sha256", self.manifest_filename())
    }

    /// URL of the channel manifest.
    ///
    /// The version, when present, is inserted as a path segment directly
    /// before the manifest file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_json_fetcher::artefact::toolchain_version::ToolchainVersion;
    /// use docs_json_fetcher::config::FetchConfig;
    ///
    /// let latest = FetchConfig::default();
    /// assert_eq!(
    ///     latest.manifest_url(),
    ///     "https://static.rust-lang.org/dist/channel-rust-nightly.toml"
    /// );
    ///
    /// let dated = FetchConfig {
    ///     version: Some(ToolchainVersion::try_from("2024-01-15").expect("valid")),
    ///     ..FetchConfig::default()
    /// };
    /// assert_eq!(
    ///     dated.manifest_url(),
    ///     "https://static.rust-lang.org/dist/2024-01-15/channel-rust-nightly.toml"
    /// );
    /// ```
    #[must_use]
    pub fn manifest_url(&self) -> String {
        let filename = self.manifest_filename();
        match &self.version {
            Some(version) => format!("{}/dist/{version}/{filename}", self.dist_server),
            None => format!("{}/dist/{filename}", self.dist_server),
        }
    }

    /// URL of the manifest's checksum sidecar.
    #[must_use]
    pub fn checksum_url(&self) -> String {
        format!("{}.sha256", self.manifest_url())
    }

    /// Root directory name inside the documentation archive, e.g.
    /// `rust-docs-json-nightly-x86_64-unknown-linux-gnu`.
    #[must_use]
    pub fn archive_root(&self) -> String {
        format!("{ARCHIVE_PREFIX}-{}-{}", self.channel, self.target)
    }

    /// Local file name of the downloaded archive.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{}.{}", self.archive_root(), self.compression.extension())
    }

    /// Glob over archive members holding the JSON documentation.
    #[must_use]
    pub fn member_pattern(&self) -> String {
        format!("{}/{}/{DOCS_SUBDIR}/*", self.archive_root(), self.package)
    }

    /// Member selection applied during extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Selection`] if the derived pattern is not a
    /// valid glob, which can happen when a name contains glob syntax.
    pub fn member_selection(&self) -> Result<MemberSelection, ConfigError> {
        Ok(MemberSelection::new(
            &self.member_pattern(),
            self.strip_components,
        )?)
    }
}

fn normalise_dist_server(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_host = ["https://", "http://"]
        .iter()
        .filter_map(|scheme| trimmed.strip_prefix(scheme))
        .any(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidDistServer {
            value: value.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

fn validate_name(what: &'static str, value: &str) -> Result<String, ConfigError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if !valid {
        return Err(ConfigError::InvalidName {
            what,
            value: value.to_owned(),
        });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

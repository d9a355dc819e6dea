//! CLI argument definitions for `fetch-docs-json`.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::artefact::compression::Compression;
use crate::artefact::download::DEFAULT_TIMEOUT;
use crate::config::{
    DEFAULT_CHANNEL, DEFAULT_DIST_SERVER, DEFAULT_OUTPUT_DIR, DEFAULT_PACKAGE,
    DEFAULT_STRIP_COMPONENTS, DEFAULT_TARGET, DIST_SERVER_ENV,
};
use camino::Utf8PathBuf;
use clap::Parser;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

/// Fetch the rustdoc JSON documentation of a nightly Rust toolchain.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fetch-docs-json")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch the rustdoc JSON documentation of a nightly Rust toolchain.\n\n",
    "Downloads the channel manifest and its .sha256 sidecar, verifies the ",
    "manifest, locates the rust-docs-json-preview archive for the target, ",
    "downloads and verifies that archive, and extracts its ",
    "share/doc/rust/json/ files into the output directory.\n\n",
    "The output directory must already exist.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Fetch the latest nightly documentation into ./doc-json:\n",
    "    $ mkdir doc-json && fetch-docs-json\n\n",
    "  Fetch the documentation of a dated nightly:\n",
    "    $ fetch-docs-json 2024-01-15\n\n",
    "  Use the gzip archive and a custom output directory:\n",
    "    $ fetch-docs-json --compression gz -o docs\n",
))]
pub struct Cli {
    /// Dated release to fetch (e.g. 2024-01-15) [default: latest].
    #[arg(value_name = "TOOLCHAIN_VERSION")]
    pub toolchain_version: Option<String>,

    /// Pre-existing directory receiving downloads and extracted files.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: Utf8PathBuf,

    /// Distribution server root URL.
    #[arg(long, value_name = "URL", env = DIST_SERVER_ENV, default_value = DEFAULT_DIST_SERVER)]
    pub dist_server: String,

    /// Release channel named in the manifest and archive file names.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Manifest package holding the documentation archive.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    pub package: String,

    /// Target triple whose archive is fetched.
    #[arg(long, value_name = "TRIPLE", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Archive format to download.
    #[arg(long, value_enum, default_value_t = Compression::Xz)]
    pub compression: Compression,

    /// Leading archive member components to strip when extracting.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_STRIP_COMPONENTS)]
    pub strip_components: usize,

    /// Per-request network timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Increase diagnostic log output (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` matching an invocation with no arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_json_fetcher::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.toolchain_version.is_none());
    /// assert_eq!(cli.output_dir, "doc-json");
    /// ```
    fn default() -> Self {
        Self {
            toolchain_version: None,
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            dist_server: DEFAULT_DIST_SERVER.to_owned(),
            channel: DEFAULT_CHANNEL.to_owned(),
            package: DEFAULT_PACKAGE.to_owned(),
            target: DEFAULT_TARGET.to_owned(),
            compression: Compression::default(),
            strip_components: DEFAULT_STRIP_COMPONENTS,
            timeout: DEFAULT_TIMEOUT_SECS,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

//! Fetcher for nightly rustdoc JSON documentation.
//!
//! This crate downloads the `rust-docs-json-preview` component of a Rust
//! release channel, verifies it against the channel manifest's published
//! digests, and extracts the JSON documentation into a local directory. It
//! is used by the `fetch-docs-json` CLI binary and can be driven
//! programmatically with injected downloaders and extractors.
//!
//! # Modules
//!
//! - [`artefact`] - Manifest, checksum, download, and extraction primitives
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Validated run configuration and derived URLs
//! - [`error`] - Pipeline error type
//! - [`logging`] - Diagnostic logging setup for the binary
//! - [`output`] - User-facing progress messages
//! - [`pipeline`] - Fetch, verify, and extract orchestration

pub mod artefact;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

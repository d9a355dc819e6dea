//! Building blocks for fetching and verifying distribution artefacts.
//!
//! # Sub-modules
//!
//! - [`checksum`] - Detached `.sha256` sidecar parsing and file verification.
//! - [`compression`] - Archive formats advertised by channel manifests.
//! - [`download`] - Downloader trait and HTTP implementation.
//! - [`error`] - Validation errors for artefact newtypes.
//! - [`extraction`] - Selective tar extraction with component stripping.
//! - [`manifest`] - Channel manifest schema and archive lookup.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`toolchain_version`] - Toolchain version identifier newtype.

pub mod checksum;
pub mod compression;
pub mod download;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod sha256_digest;
pub mod toolchain_version;

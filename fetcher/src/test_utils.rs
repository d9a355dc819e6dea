//! Shared fixture builders for unit and integration tests.
//!
//! Renders channel manifests, builds compressed documentation archives with
//! the same member layout as the published `rust-docs-json` tarballs, and
//! computes digests for them.

use crate::artefact::compression::Compression;
use crate::artefact::sha256_digest::Sha256Digest;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Package section used by the default fixtures.
pub const DOCS_PACKAGE: &str = "rust-docs-json-preview";

/// Target section used by the default fixtures.
pub const LINUX_TARGET: &str = "x86_64-unknown-linux-gnu";

/// Top-level directory of a nightly `rust-docs-json` archive for
/// [`LINUX_TARGET`].
pub const DOCS_ARCHIVE_ROOT: &str = "rust-docs-json-nightly-x86_64-unknown-linux-gnu";

/// Return the lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of_bytes(bytes).into_inner()
}

/// A channel manifest with a single package/target section.
///
/// `xz` and `gz` hold `(url, hash)` pairs; `None` omits the fields.
#[derive(Debug, Clone)]
pub struct ManifestFixture<'a> {
    /// Value of the top-level `date` key.
    pub date: &'a str,
    /// Package section name.
    pub package: &'a str,
    /// Target section name.
    pub target: &'a str,
    /// Value of the `available` key.
    pub available: bool,
    /// The `xz_url`/`xz_hash` pair.
    pub xz: Option<(&'a str, &'a str)>,
    /// The `url`/`hash` pair.
    pub gz: Option<(&'a str, &'a str)>,
}

impl Default for ManifestFixture<'_> {
    fn default() -> Self {
        Self {
            date: "2024-01-15",
            package: DOCS_PACKAGE,
            target: LINUX_TARGET,
            available: true,
            xz: None,
            gz: None,
        }
    }
}

impl ManifestFixture<'_> {
    /// Render the fixture as manifest TOML, including an unrelated package
    /// so lookups have something to skip over.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = format!(
            concat!(
                "manifest-version = \"2\"\n",
                "date = \"{date}\"\n\n",
                "[pkg.cargo]\n",
                "version = \"0.78.0-nightly (2024-01-14)\"\n\n",
                "[pkg.cargo.target.{target}]\n",
                "available = false\n\n",
                "[pkg.{package}]\n",
                "version = \"1.77.0-nightly (2024-01-14)\"\n\n",
                "[pkg.{package}.target.{target}]\n",
                "available = {available}\n",
            ),
            date = self.date,
            package = self.package,
            target = self.target,
            available = self.available,
        );
        if let Some((url, hash)) = self.gz {
            text.push_str(&format!("url = \"{url}\"\nhash = \"{hash}\"\n"));
        }
        if let Some((url, hash)) = self.xz {
            text.push_str(&format!("xz_url = \"{url}\"\nxz_hash = \"{hash}\"\n"));
        }
        text
    }
}

/// Render a default manifest advertising an xz archive at `xz_url`.
#[must_use]
pub fn docs_manifest_toml(xz_url: &str, xz_hash: &str) -> String {
    ManifestFixture {
        xz: Some((xz_url, xz_hash)),
        ..ManifestFixture::default()
    }
    .render()
}

/// Render a bare documentation target section carrying only the xz fields,
/// as published manifests may omit `available`, `version`, and the
/// top-level keys.
#[must_use]
pub fn bare_docs_section(xz_url: &str, xz_hash: &str) -> String {
    format!(
        "[pkg.{DOCS_PACKAGE}.target.{LINUX_TARGET}]\nxz_url = \"{xz_url}\"\nxz_hash = \"{xz_hash}\"\n"
    )
}

/// Return the archive member path of a JSON documentation file.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::test_utils::docs_member_path;
///
/// assert_eq!(
///     docs_member_path("std.json"),
///     "rust-docs-json-nightly-x86_64-unknown-linux-gnu/rust-docs-json-preview/share/doc/rust/json/std.json"
/// );
/// ```
#[must_use]
pub fn docs_member_path(file: &str) -> String {
    format!("{DOCS_ARCHIVE_ROOT}/{DOCS_PACKAGE}/share/doc/rust/json/{file}")
}

/// Build a compressed tar archive at `path` containing `(member, contents)`
/// entries.
///
/// # Errors
///
/// Returns an I/O error if the archive cannot be written.
pub fn write_archive(
    path: &Path,
    compression: Compression,
    entries: &[(&str, &[u8])],
) -> io::Result<()> {
    let file = File::create(path)?;
    match compression {
        Compression::Xz => {
            let encoder = append_entries(xz2::write::XzEncoder::new(file, 6), entries)?;
            encoder.finish()?;
        }
        Compression::Gz => {
            let encoder = append_entries(
                flate2::write::GzEncoder::new(file, flate2::Compression::default()),
                entries,
            )?;
            encoder.finish()?;
        }
    }
    Ok(())
}

/// Build a documentation archive holding `files` under the JSON docs
/// directory, plus a file outside it that extraction must skip.
///
/// # Errors
///
/// Returns an I/O error if the archive cannot be written.
pub fn write_docs_archive(
    path: &Path,
    compression: Compression,
    files: &[(&str, &[u8])],
) -> io::Result<()> {
    let members: Vec<(String, &[u8])> = files
        .iter()
        .map(|(name, contents)| (docs_member_path(name), *contents))
        .chain(std::iter::once((
            format!("{DOCS_ARCHIVE_ROOT}/components"),
            b"rust-docs-json-preview\n".as_slice(),
        )))
        .collect();
    let entries: Vec<(&str, &[u8])> = members
        .iter()
        .map(|(name, contents)| (name.as_str(), *contents))
        .collect();
    write_archive(path, compression, &entries)
}

fn append_entries<W: Write>(writer: W, entries: &[(&str, &[u8])]) -> io::Result<W> {
    let mut builder = tar::Builder::new(writer);
    for (name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, name, *contents)?;
    }
    builder.into_inner()
}

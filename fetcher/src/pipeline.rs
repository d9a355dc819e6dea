//! Fetch, verify, and extract pipeline.
//!
//! The pipeline runs strictly in order and stops at the first failure:
//!
//! 1. download the channel manifest and its `.sha256` sidecar;
//! 2. verify the manifest against the sidecar;
//! 3. parse the manifest and locate the documentation archive;
//! 4. download the archive and verify it against the manifest hash;
//! 5. extract the JSON documentation subtree;
//! 6. move everything into the output directory.
//!
//! All intermediate files live in a staging directory created inside the
//! output directory. Promotion is a series of renames within that one
//! filesystem. Entries being replaced are moved aside into staging and put
//! back if a later rename fails. The staging directory is removed when the
//! run ends, so a failed run leaves the output directory as it found it.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::artefact::checksum::{read_checksum_file, verify_file};
use crate::artefact::download::{Downloader, HttpDownloader};
use crate::artefact::extraction::{ArchiveExtractor, TarExtractor};
use crate::artefact::manifest::{ArchiveSource, parse_manifest};
use crate::artefact::toolchain_version::ToolchainVersion;
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::output::{manifest_message, success_message, write_line};

/// Prefix of the staging directory created inside the output directory.
const STAGING_PREFIX: &str = ".fetch-docs-json-";

/// Name of the extraction directory inside the staging directory.
const EXTRACT_DIR: &str = "extract";

/// Prefix of staging entries holding output entries displaced by promotion.
const DISPLACED_PREFIX: &str = "displaced-";

/// What a successful run fetched and where it put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The directory holding all output.
    pub output_dir: Utf8PathBuf,
    /// The manifest URL that was used.
    pub manifest_url: String,
    /// The manifest's `date`, when present.
    pub manifest_date: Option<String>,
    /// The archive location and digest taken from the manifest.
    pub archive: ArchiveSource,
    /// Extracted files, relative to `output_dir`, in archive order.
    pub extracted: Vec<PathBuf>,
}

/// Fetch documentation using the production HTTP downloader and tar
/// extractor.
///
/// Progress lines are written to `out`.
///
/// # Errors
///
/// Returns the [`FetchError`] of the first step that fails.
pub fn fetch_docs(config: &FetchConfig, out: &mut dyn Write) -> Result<FetchOutcome> {
    let downloader = HttpDownloader::new(config.timeout);
    let extractor = TarExtractor::new(config.compression);
    fetch_docs_with(config, &downloader, &extractor, out)
}

/// Testable inner function with injected dependencies.
///
/// The production entry point [`fetch_docs`] delegates here with real
/// implementations; tests inject mocks and stubs.
///
/// # Errors
///
/// Returns the [`FetchError`] of the first step that fails. Nothing is
/// written to the output directory in that case.
pub fn fetch_docs_with(
    config: &FetchConfig,
    downloader: &dyn Downloader,
    extractor: &dyn ArchiveExtractor,
    out: &mut dyn Write,
) -> Result<FetchOutcome> {
    let output_dir = config.output_dir.as_path();
    if !output_dir.is_dir() {
        return Err(FetchError::OutputDirMissing {
            path: output_dir.to_owned(),
        });
    }
    let selection = config.member_selection()?;
    let staging = Staging::create(output_dir)?;

    // Step 1: Download the manifest and its sidecar.
    let manifest_url = config.manifest_url();
    write_line(
        out,
        manifest_message(
            config.version.as_ref().map(ToolchainVersion::as_str),
            &manifest_url,
        ),
    );
    let manifest_filename = config.manifest_filename();
    let checksum_filename = config.checksum_filename();
    let manifest_path = staging.path().join(&manifest_filename);
    let checksum_path = staging.path().join(&checksum_filename);
    downloader.download(&manifest_url, &manifest_path)?;
    downloader.download(&config.checksum_url(), &checksum_path)?;

    // Step 2: Verify the manifest before reading any of it.
    let checksum = read_checksum_file(&checksum_path)?;
    if let Some(named) = checksum.filename.as_deref().filter(|n| *n != manifest_filename) {
        debug!("checksum file names {named}, verifying {manifest_filename}");
    }
    verify_file(&manifest_path, &checksum.digest)?;

    // Step 3: Parse the manifest and locate the archive.
    let manifest = parse_manifest(&std::fs::read_to_string(&manifest_path)?)?;
    let source = manifest.archive_source(&config.package, &config.target, config.compression)?;
    if let Some(date) = manifest.date() {
        write_line(out, format!("Manifest date: {date}"));
    }
    if let Some(version) = manifest.package_version(&config.package) {
        debug!("{} version {version}", config.package);
    }

    // Step 4: Download and verify the archive.
    let archive_filename = config.archive_filename();
    let archive_path = staging.path().join(&archive_filename);
    write_line(out, format!("Downloading {archive_filename}..."));
    downloader.download(&source.url, &archive_path)?;
    verify_file(&archive_path, &source.sha256)?;

    // Step 5: Extract the documentation subtree.
    write_line(out, format!("Extracting {}...", selection.pattern()));
    let extract_dir = staging.path().join(EXTRACT_DIR);
    std::fs::create_dir(&extract_dir).map_err(|source| staging.error(source))?;
    let extracted = extractor.extract(&archive_path, &selection, &extract_dir)?;

    // Step 6: Promote downloads and extracted files.
    let mut moves: Vec<PathBuf> = [&manifest_filename, &checksum_filename, &archive_filename]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    moves.extend(staging.children(Path::new(EXTRACT_DIR))?);
    staging.promote_all(&moves)?;

    write_line(out, success_message(extracted.len(), output_dir));

    Ok(FetchOutcome {
        output_dir: output_dir.to_owned(),
        manifest_url,
        manifest_date: manifest.date().map(str::to_owned),
        archive: source,
        extracted,
    })
}

/// A scoped working directory inside the output directory.
///
/// Dropping it removes whatever was not promoted, including entries that
/// promotion displaced from the output directory.
struct Staging {
    dir: TempDir,
    output_dir: Utf8PathBuf,
}

/// One completed rename into the output directory.
struct Promoted {
    target: PathBuf,
    displaced: Option<PathBuf>,
}

impl Staging {
    fn create(output_dir: &Utf8Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(output_dir)
            .map_err(|source| FetchError::Staging {
                path: output_dir.to_owned(),
                source,
            })?;
        debug!("staging in {}", dir.path().display());
        Ok(Self {
            dir,
            output_dir: output_dir.to_owned(),
        })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn error(&self, source: std::io::Error) -> FetchError {
        FetchError::Staging {
            path: self.output_dir.clone(),
            source,
        }
    }

    /// Staging-relative paths of the entries of the subdirectory `relative`.
    fn children(&self, relative: &Path) -> Result<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(self.path().join(relative)).map_err(|source| self.error(source))?;
        entries
            .map(|entry| {
                entry
                    .map(|entry| relative.join(entry.file_name()))
                    .map_err(|source| self.error(source))
            })
            .collect()
    }

    /// Move each staging-relative path to its file name in the output
    /// directory.
    ///
    /// Existing entries are moved aside into staging first. If any rename
    /// fails, completed renames are undone and displaced entries restored,
    /// so the output directory is left as it was.
    fn promote_all(&self, relatives: &[PathBuf]) -> Result<()> {
        let mut journal = Vec::with_capacity(relatives.len());
        for (index, relative) in relatives.iter().enumerate() {
            let Some(name) = relative.file_name() else {
                continue;
            };
            let from = self.path().join(relative);
            let target = self.output_dir.as_std_path().join(name);
            let displaced = self.path().join(format!("{DISPLACED_PREFIX}{index}"));
            match promote_one(&from, &target, &displaced) {
                Ok(promoted) => journal.push(promoted),
                Err(source) => {
                    roll_back(journal);
                    return Err(self.error(source));
                }
            }
        }
        Ok(())
    }
}

/// Rename `from` to `target`, first moving any existing `target` to
/// `displaced`.
fn promote_one(from: &Path, target: &Path, displaced: &Path) -> std::io::Result<Promoted> {
    let displaced = match std::fs::symlink_metadata(target) {
        Ok(_) => {
            std::fs::rename(target, displaced)?;
            Some(displaced.to_path_buf())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(err),
    };
    debug!("promote {} -> {}", from.display(), target.display());
    if let Err(err) = std::fs::rename(from, target) {
        if let Some(previous) = &displaced {
            restore(previous, target);
        }
        return Err(err);
    }
    Ok(Promoted {
        target: target.to_path_buf(),
        displaced,
    })
}

/// Undo completed promotions, newest first.
fn roll_back(journal: Vec<Promoted>) {
    for promoted in journal.into_iter().rev() {
        let removed = if promoted.target.is_dir() {
            std::fs::remove_dir_all(&promoted.target)
        } else {
            std::fs::remove_file(&promoted.target)
        };
        if let Err(err) = removed {
            warn!("could not remove {}: {err}", promoted.target.display());
        }
        if let Some(previous) = &promoted.displaced {
            restore(previous, &promoted.target);
        }
    }
}

fn restore(previous: &Path, target: &Path) {
    if let Err(err) = std::fs::rename(previous, target) {
        warn!("could not restore {}: {err}", target.display());
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

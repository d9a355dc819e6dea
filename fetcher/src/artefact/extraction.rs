//! Selective archive extraction with leading-component stripping.
//!
//! Only members whose path matches a glob pattern are written. Each
//! selected member loses a fixed number of leading path components before
//! it is joined to the destination directory, mirroring
//! `tar --wildcards --strip-components=N`. Stripped paths are validated to
//! prevent zip-slip writes outside the destination.

use super::compression::Compression;
use glob::{MatchOptions, Pattern};
use log::trace;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting a selection of archive members, enabling test
/// mocking.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::artefact::compression::Compression;
/// use docs_json_fetcher::artefact::extraction::TarExtractor;
///
/// let extractor = TarExtractor::new(Compression::Xz);
/// // Use extractor.extract(archive_path, &selection, dest_dir) in production
/// # let _ = extractor;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the members of `archive_path` chosen by `selection` into
    /// `dest_dir`.
    ///
    /// Returns the extracted file paths relative to `dest_dir`, in archive
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if a stripped member path
    /// would escape `dest_dir`, [`ExtractionError::UnsupportedEntry`] if a
    /// selected member is a link or special file,
    /// [`ExtractionError::NothingExtracted`] if no file matched, and [`ExtractionError::Io`] on I/O or decoding
    /// failures.
    fn extract(
        &self,
        archive_path: &Path,
        selection: &MemberSelection,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O or decompression error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A member path attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending member path.
        path: String,
    },

    /// A selected member is neither a regular file nor a directory.
    #[error("unsupported {kind} member: {path}")]
    UnsupportedEntry {
        /// The offending member path.
        path: String,
        /// The tar entry type.
        kind: String,
    },

    /// No file in the archive matched the selection.
    #[error("archive contains no files matching {pattern}")]
    NothingExtracted {
        /// The member pattern that was applied.
        pattern: String,
    },

    /// The member pattern is not a valid glob.
    #[error("invalid member pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },
}

/// Which archive members to extract and how to rename them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSelection {
    pattern: Pattern,
    strip_components: usize,
}

impl MemberSelection {
    /// Build a selection from a glob `pattern` over `/`-separated member
    /// paths and the number of leading components to strip.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidPattern`] if `pattern` is not a
    /// valid glob.
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_json_fetcher::artefact::extraction::MemberSelection;
    /// use std::path::{Path, PathBuf};
    ///
    /// let selection = MemberSelection::new("root/pkg/json/*", 3).expect("valid pattern");
    /// assert_eq!(
    ///     selection.destination(Path::new("root/pkg/json/std.json")),
    ///     Some(PathBuf::from("std.json"))
    /// );
    /// assert_eq!(selection.destination(Path::new("root/pkg/manifest.in")), None);
    /// ```
    pub fn new(pattern: &str, strip_components: usize) -> Result<Self, ExtractionError> {
        let pattern = Pattern::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            strip_components,
        })
    }

    /// The glob pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The number of leading components removed from selected members.
    #[must_use]
    pub const fn strip_components(&self) -> usize {
        self.strip_components
    }

    /// Return the stripped relative path for `member`, or `None` when the
    /// member is not selected or nothing remains after stripping.
    ///
    /// `*` also matches `/`, so `dir/*` selects the whole subtree below
    /// `dir`, as tar's default wildcard matching does.
    #[must_use]
    pub fn destination(&self, member: &Path) -> Option<PathBuf> {
        let normalised = member
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        if !self.pattern.matches_with(&normalised, options) {
            return None;
        }
        let stripped: PathBuf = member
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .skip(self.strip_components)
            .collect();
        (stripped.components().next().is_some()).then_some(stripped)
    }
}

/// Extractor for `.tar.xz` and `.tar.gz` archives using the `tar` crate.
///
/// Validates each stripped path before writing to guard against path
/// traversal attacks (zip-slip).
pub struct TarExtractor {
    compression: Compression,
}

impl TarExtractor {
    /// Create an extractor for archives in the given format.
    #[must_use]
    pub const fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl ArchiveExtractor for TarExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        selection: &MemberSelection,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let mut archive = tar::Archive::new(self.compression.decoder(file));
        let mut extracted = Vec::new();

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let member = entry.path()?.into_owned();
            let Some(relative) = selection.destination(&member) else {
                trace!("skipping {}", member.display());
                continue;
            };
            validate_entry_path(&relative)?;

            // Links could redirect later members outside `dest_dir`.
            let entry_type = entry.header().entry_type();
            let dest_path = dest_dir.join(&relative);
            if entry_type.is_dir() {
                std::fs::create_dir_all(&dest_path)?;
                continue;
            }
            if !entry_type.is_file() {
                return Err(ExtractionError::UnsupportedEntry {
                    path: member.display().to_string(),
                    kind: format!("{entry_type:?}"),
                });
            }
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            entry.unpack(&dest_path)?;
            trace!("extracted {} -> {}", member.display(), relative.display());
            extracted.push(relative);
        }

        if extracted.is_empty() {
            return Err(ExtractionError::NothingExtracted {
                pattern: selection.pattern().to_owned(),
            });
        }

        Ok(extracted)
    }
}

/// Validate that a stripped member path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

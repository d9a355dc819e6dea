//! Compression formats advertised by channel manifests.
//!
//! Each manifest target entry may carry a gzip archive (`url`/`hash`) and an
//! xz archive (`xz_url`/`xz_hash`). The chosen format decides which pair of
//! fields is read, the local archive extension, and the decoder used during
//! extraction.

use clap::ValueEnum;
use std::fmt;
use std::fs::File;
use std::io::Read;

/// Archive compression format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Compression {
    /// `.tar.xz`, advertised via `xz_url`/`xz_hash`.
    #[default]
    Xz,
    /// `.tar.gz`, advertised via `url`/`hash`.
    Gz,
}

impl Compression {
    /// Manifest field holding the archive URL for this format.
    #[must_use]
    pub const fn url_field(self) -> &'static str {
        match self {
            Self::Xz => "xz_url",
            Self::Gz => "url",
        }
    }

    /// Manifest field holding the archive digest for this format.
    #[must_use]
    pub const fn hash_field(self) -> &'static str {
        match self {
            Self::Xz => "xz_hash",
            Self::Gz => "hash",
        }
    }

    /// File extension (without leading dot) for archives of this format.
    ///
    /// # Examples
    ///
    /// ```
    /// use docs_json_fetcher::artefact::compression::Compression;
    ///
    /// assert_eq!(Compression::Xz.extension(), "tar.xz");
    /// assert_eq!(Compression::Gz.extension(), "tar.gz");
    /// ```
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xz => "tar.xz",
            Self::Gz => "tar.gz",
        }
    }

    /// Wrap `file` in a streaming decoder for this format.
    #[must_use]
    pub fn decoder(self, file: File) -> Box<dyn Read> {
        match self {
            Self::Xz => Box::new(xz2::read::XzDecoder::new(file)),
            Self::Gz => Box::new(flate2::read::GzDecoder::new(file)),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xz => write!(f, "xz"),
            Self::Gz => write!(f, "gz"),
        }
    }
}

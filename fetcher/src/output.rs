//! User-facing progress and result lines.

use camino::Utf8Path;
use std::io::Write;

/// Write a line to `out`, ignoring write failures.
///
/// Progress output is best-effort: a closed stdout must not abort a fetch
/// that is otherwise succeeding.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the line announcing which manifest is used.
///
/// # Examples
///
/// ```
/// use docs_json_fetcher::output::manifest_message;
///
/// let line = manifest_message(None, "https://example.test/dist/channel-rust-nightly.toml");
/// assert!(line.starts_with("Using latest manifest"));
/// ```
#[must_use]
pub fn manifest_message(version: Option<&str>, url: &str) -> String {
    match version {
        Some(version) => format!("Using manifest for {version}: {url}"),
        None => format!("Using latest manifest: {url}"),
    }
}

/// Format the success message after extraction.
#[must_use]
pub fn success_message(count: usize, output_dir: &Utf8Path) -> String {
    let plural = if count == 1 { "file" } else { "files" };
    format!("Successfully extracted {count} documentation {plural} to {output_dir}")
}

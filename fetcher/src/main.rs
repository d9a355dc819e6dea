//! `fetch-docs-json` CLI entrypoint.
//!
//! Downloads the nightly `rust-docs-json-preview` archive, verifies the
//! manifest and archive digests, and extracts the JSON documentation into
//! a pre-existing output directory.

use clap::Parser;
use docs_json_fetcher::cli::Cli;
use docs_json_fetcher::config::FetchConfig;
use docs_json_fetcher::error::Result;
use docs_json_fetcher::logging::init_logging;
use docs_json_fetcher::pipeline::fetch_docs;
use std::error::Error;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = FetchConfig::from_cli(cli)?;
    if cli.quiet {
        fetch_docs(&config, &mut std::io::sink())?;
    } else {
        fetch_docs(&config, &mut std::io::stdout().lock())?;
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_error_chain(stderr, &err);
            1
        }
    }
}

/// Print `err` and each source whose message it does not already include.
fn write_error_chain(stderr: &mut dyn Write, err: &dyn Error) {
    let mut shown = err.to_string();
    write_stderr_line(stderr, format!("error: {shown}"));
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !shown.contains(&message) {
            write_stderr_line(stderr, format!("  caused by: {message}"));
            shown = message;
        }
        source = cause.source();
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use docs_json_fetcher::artefact::download::DownloadError;
    use docs_json_fetcher::error::FetchError;

    fn stderr_text(err: FetchError) -> (i32, String) {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        (exit_code, String::from_utf8(stderr).expect("stderr was not UTF-8"))
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let (exit_code, text) = stderr_text(FetchError::OutputDirMissing {
            path: Utf8PathBuf::from("doc-json"),
        });
        assert_eq!(exit_code, 1);
        assert_eq!(
            text,
            "error: output directory doc-json does not exist; create it before running\n"
        );
    }

    #[test]
    fn sources_already_in_the_message_are_not_repeated() {
        let err = FetchError::from(DownloadError::Io(std::io::Error::other("disk full")));
        let (_, text) = stderr_text(err);
        assert_eq!(text, "error: I/O error writing download: disk full\n");
    }

    #[test]
    fn distinct_sources_are_listed() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let mut stderr = Vec::new();
        write_error_chain(&mut stderr, &Outer(std::io::Error::other("inner")));
        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(text, "error: outer\n  caused by: inner\n");
    }

    #[test]
    fn invalid_version_fails_before_any_network_access() {
        let cli = Cli {
            toolchain_version: Some("../etc".to_owned()),
            ..Cli::default()
        };
        let err = run(&cli).expect_err("invalid version should fail");
        assert!(matches!(err, FetchError::Config(_)), "unexpected error: {err}");
    }
}

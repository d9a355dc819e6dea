//! Unit tests for CLI argument parsing.

use super::*;
use rstest::rstest;

#[test]
fn no_arguments_matches_default() {
    let cli = temp_env::with_var_unset(DIST_SERVER_ENV, || {
        Cli::try_parse_from(["fetch-docs-json"]).expect("parse")
    });
    assert_eq!(cli, Cli::default());
}

#[test]
fn positional_version_is_captured() {
    let cli = Cli::try_parse_from(["fetch-docs-json", "2024-01-15"]).expect("parse");
    assert_eq!(cli.toolchain_version.as_deref(), Some("2024-01-15"));
}

#[test]
fn options_override_defaults() {
    let cli = Cli::try_parse_from([
        "fetch-docs-json",
        "--output-dir",
        "out",
        "--channel",
        "beta",
        "--package",
        "rust-docs",
        "--target",
        "aarch64-apple-darwin",
        "--compression",
        "gz",
        "--strip-components",
        "3",
        "--timeout",
        "10",
    ])
    .expect("parse");

    assert_eq!(cli.output_dir, "out");
    assert_eq!(cli.channel, "beta");
    assert_eq!(cli.package, "rust-docs");
    assert_eq!(cli.target, "aarch64-apple-darwin");
    assert_eq!(cli.compression, Compression::Gz);
    assert_eq!(cli.strip_components, 3);
    assert_eq!(cli.timeout, 10);
}

#[test]
fn dist_server_reads_environment() {
    let cli = temp_env::with_var(DIST_SERVER_ENV, Some("https://mirror.example"), || {
        Cli::try_parse_from(["fetch-docs-json"]).expect("parse")
    });
    assert_eq!(cli.dist_server, "https://mirror.example");
}

#[test]
fn dist_server_flag_beats_environment() {
    let cli = temp_env::with_var(DIST_SERVER_ENV, Some("https://mirror.example"), || {
        Cli::try_parse_from(["fetch-docs-json", "--dist-server", "https://flag.example"])
            .expect("parse")
    });
    assert_eq!(cli.dist_server, "https://flag.example");
}

#[rstest]
#[case::short(&["fetch-docs-json", "-vv"], 2)]
#[case::long(&["fetch-docs-json", "--verbose"], 1)]
fn verbosity_counts_flags(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::try_parse_from(args).expect("parse");
    assert_eq!(cli.verbosity, expected);
}

#[rstest]
#[case::quiet_and_verbose(&["fetch-docs-json", "-q", "-v"])]
#[case::unknown_compression(&["fetch-docs-json", "--compression", "zstd"])]
#[case::negative_strip(&["fetch-docs-json", "--strip-components", "-1"])]
#[case::two_versions(&["fetch-docs-json", "2024-01-15", "2024-01-16"])]
fn rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

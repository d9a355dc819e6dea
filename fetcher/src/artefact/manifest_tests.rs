//! Unit tests for channel manifest parsing and archive lookup.

use super::*;
use crate::test_utils::{
    DOCS_PACKAGE, LINUX_TARGET, ManifestFixture, bare_docs_section, docs_manifest_toml,
};
use rstest::rstest;

const XZ_URL: &str = "https://example.org/archive.tar.xz";
const GZ_URL: &str = "https://example.org/archive.tar.gz";

fn digest(fill: char) -> String {
    fill.to_string().repeat(64)
}

#[test]
fn extracts_quoted_url_and_hash_for_target_section() {
    let hash = digest('a');
    let manifest = parse_manifest(&docs_manifest_toml(XZ_URL, &hash)).expect("valid manifest");

    let source = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, Compression::Xz)
        .expect("archive present");
    assert_eq!(source.url, XZ_URL);
    assert_eq!(source.sha256.as_str(), hash);
}

#[test]
fn gz_compression_reads_plain_url_and_hash_fields() {
    let text = ManifestFixture {
        gz: Some((GZ_URL, &digest('b'))),
        xz: Some((XZ_URL, &digest('c'))),
        ..ManifestFixture::default()
    }
    .render();
    let manifest = parse_manifest(&text).expect("valid manifest");

    let source = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, Compression::Gz)
        .expect("archive present");
    assert_eq!(source.url, GZ_URL);
    assert_eq!(source.sha256.as_str(), digest('b'));
}

#[test]
fn exposes_date_and_package_version() {
    let manifest = parse_manifest(&docs_manifest_toml(XZ_URL, &digest('a'))).expect("valid");
    assert_eq!(manifest.date(), Some("2024-01-15"));
    assert_eq!(
        manifest.package_version(DOCS_PACKAGE),
        Some("1.77.0-nightly (2024-01-14)")
    );
    assert_eq!(manifest.package_version("cargo"), None);
}

#[test]
fn ignores_unmodelled_tables() {
    let text = format!(
        "{}\n[renames.rls]\nto = \"rls-preview\"\n\n[profiles]\nminimal = [\"rustc\"]\n",
        docs_manifest_toml(XZ_URL, &digest('a'))
    );
    assert!(parse_manifest(&text).is_ok());
}

#[test]
fn missing_package_is_reported() {
    let manifest = parse_manifest(&docs_manifest_toml(XZ_URL, &digest('a'))).expect("valid");
    let err = manifest
        .archive_source("rust-src", LINUX_TARGET, Compression::Xz)
        .expect_err("package absent");
    assert!(matches!(err, ManifestError::MissingPackage { package } if package == "rust-src"));
}

#[test]
fn missing_target_is_reported() {
    let manifest = parse_manifest(&docs_manifest_toml(XZ_URL, &digest('a'))).expect("valid");
    let err = manifest
        .archive_source(DOCS_PACKAGE, "aarch64-apple-darwin", Compression::Xz)
        .expect_err("target absent");
    assert!(matches!(err, ManifestError::MissingTarget { .. }));
}

#[test]
fn target_without_available_key_is_usable() {
    let hash = digest('d');
    let manifest = parse_manifest(&bare_docs_section(XZ_URL, &hash)).expect("valid manifest");

    let source = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, Compression::Xz)
        .expect("archive present");
    assert_eq!(source.url, XZ_URL);
    assert_eq!(source.sha256.as_str(), hash);
    assert_eq!(manifest.date(), None);
}

#[test]
fn rendered_fixture_carries_both_archive_pairs() {
    let text = ManifestFixture {
        gz: Some((GZ_URL, &digest('e'))),
        xz: Some((XZ_URL, &digest('f'))),
        ..ManifestFixture::default()
    }
    .render();
    assert!(text.contains(&format!("url = \"{GZ_URL}\"\nhash = \"{}\"\n", digest('e'))));
    assert!(text.contains(&format!("xz_url = \"{XZ_URL}\"\nxz_hash = \"{}\"\n", digest('f'))));
}

#[test]
fn unavailable_target_is_reported() {
    let text = ManifestFixture {
        available: false,
        xz: None,
        ..ManifestFixture::default()
    }
    .render();
    let manifest = parse_manifest(&text).expect("valid manifest");
    let err = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, Compression::Xz)
        .expect_err("unavailable");
    assert!(matches!(err, ManifestError::Unavailable { .. }));
}

#[rstest]
#[case::xz_missing(Compression::Xz, "xz_url")]
#[case::gz_missing(Compression::Gz, "url")]
fn absent_url_field_is_reported(#[case] compression: Compression, #[case] field: &str) {
    let text = ManifestFixture {
        xz: None,
        gz: None,
        ..ManifestFixture::default()
    }
    .render();
    let manifest = parse_manifest(&text).expect("valid manifest");
    let err = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, compression)
        .expect_err("field absent");
    assert!(
        matches!(&err, ManifestError::MissingField { field: missing, .. } if *missing == field),
        "unexpected error: {err}"
    );
}

#[test]
fn absent_hash_field_is_reported() {
    let text = format!(
        concat!(
            "manifest-version = \"2\"\n",
            "[pkg.{pkg}.target.{target}]\n",
            "available = true\n",
            "xz_url = \"{url}\"\n",
        ),
        pkg = DOCS_PACKAGE,
        target = LINUX_TARGET,
        url = XZ_URL,
    );
    let manifest = parse_manifest(&text).expect("valid manifest");
    let err = manifest
        .archive_source(DOCS_PACKAGE, LINUX_TARGET, Compression::Xz)
        .expect_err("hash absent");
    assert!(matches!(
        err,
        ManifestError::MissingField {
            field: "xz_hash",
            ..
        }
    ));
}

#[rstest]
#[case::short_hash("abc123")]
#[case::uppercase_hash("ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789")]
fn malformed_hash_fails_to_parse(#[case] hash: &str) {
    let result = parse_manifest(&docs_manifest_toml(XZ_URL, hash));
    assert!(matches!(result, Err(ManifestError::Toml(_))));
}

#[test]
fn rejects_unsupported_manifest_version() {
    let text = docs_manifest_toml(XZ_URL, &digest('a'))
        .replace("manifest-version = \"2\"", "manifest-version = \"3\"");
    let err = parse_manifest(&text).expect_err("unsupported version");
    assert!(matches!(err, ManifestError::UnsupportedVersion { found } if found == "3"));
}

#[test]
fn rejects_invalid_toml() {
    assert!(matches!(
        parse_manifest("[pkg.broken"),
        Err(ManifestError::Toml(_))
    ));
}

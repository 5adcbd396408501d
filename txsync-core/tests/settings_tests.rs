//! Settings and credential lookup against a real home directory layout.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;
use txsync_core::{config, credentials, ConfigError, SyncSettings};

// ---------------------------------------------------------------------------
// 1. Settings file
// ---------------------------------------------------------------------------

#[test]
fn settings_path_is_under_dot_txsync() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::settings_path_at(home.path());
    assert!(path.ends_with(".txsync/config.yaml"));
}

#[test]
fn full_settings_file_overrides_every_field() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".txsync/config.yaml")
        .write_str(
            "organization: acme\n\
             main_project: acme-translations\n\
             release_project_template: acme-{release_name}\n\
             api_base_url: http://127.0.0.1:9999\n",
        )
        .expect("write");

    let settings = config::load_at(home.path()).expect("load");
    assert_eq!(settings.organization, "acme");
    assert_eq!(settings.main_project.as_str(), "acme-translations");
    assert_eq!(settings.release_project("Teak").as_str(), "acme-teak");
    assert_eq!(settings.api_base_url, "http://127.0.0.1:9999");
}

#[test]
fn empty_settings_file_yields_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".txsync/config.yaml").touch().expect("touch");
    let settings = config::load_at(home.path()).expect("load");
    assert_eq!(settings, SyncSettings::default());
}

#[test]
fn wrong_type_settings_file_is_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".txsync/config.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");
    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Credentials
// ---------------------------------------------------------------------------

#[rstest]
#[case::spaces("[https://www.transifex.com]\npassword = tok-1\n", "tok-1")]
#[case::no_spaces("[https://www.transifex.com]\npassword=tok-2\n", "tok-2")]
#[case::after_other_sections(
    "[defaults]\npassword = wrong\n\n[https://www.transifex.com]\nhostname = x\npassword = tok-3\n",
    "tok-3"
)]
fn rc_file_password_is_used(#[case] rc: &str, #[case] expected: &str) {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".transifexrc").write_str(rc).expect("write");
    let token = credentials::resolve_token_at(home.path(), None).expect("token");
    assert_eq!(token, expected);
}

#[test]
fn missing_token_message_names_both_sources() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".transifexrc").assert(predicate::path::missing());
    let err = credentials::resolve_token_at(home.path(), None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("TRANSIFEX_API_TOKEN"), "got: {msg}");
    assert!(msg.contains(".transifexrc"), "got: {msg}");
}

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use apexporter_core::Platform;
use apexporter_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
api_key: "k"
player_name: "NotAWraithMain"
platform: "PC"
exporter:
  poll_intervall_secs: 30 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "config");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
api_key: "k"
uid: "1009876543210"
platform: "ps4"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.platform, Platform::Ps4);
    assert_eq!(cfg.exporter.poll_interval_secs, 15);
}

#[test]
fn yaml_is_validated_like_env() {
    let both = r#"
api_key: "k"
uid: "1"
player_name: "x"
platform: "PC"
"#;
    let err = config::load_from_str(both).expect_err("must fail");
    assert!(err.to_string().contains("both USER_ID and PLAYER_NAME"));
}

#[test]
fn bad_listen_address() {
    let bad = r#"
api_key: "k"
uid: "1"
platform: "PC"
exporter:
  listen: "not-an-address"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("exporter.listen"));
}

#[test]
fn yaml_reports_identity_before_key_and_platform() {
    let neither = r#"
platform: "xbox"
"#;
    let err = config::load_from_str(neither).expect_err("must fail");
    assert!(err.to_string().contains("either USER_ID or PLAYER_NAME"), "{err}");
}

#[test]
fn yaml_missing_api_key_is_reported_as_such() {
    let no_key = r#"
uid: "1"
platform: "PC"
"#;
    let err = config::load_from_str(no_key).expect_err("must fail");
    assert!(err.to_string().contains("API_KEY not set"), "{err}");
}

#[test]
fn yaml_exit_on_poll_error_defaults_on() {
    let ok = r#"
api_key: "k"
uid: "1"
platform: "PC"
exporter:
  poll_interval_secs: 30
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert!(cfg.exporter.exit_on_poll_error);

    let opt_out = r#"
api_key: "k"
uid: "1"
platform: "PC"
exporter:
  exit_on_poll_error: false
"#;
    let cfg = config::load_from_str(opt_out).expect("must parse");
    assert!(!cfg.exporter.exit_on_poll_error);
}

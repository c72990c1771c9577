#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use urlguard_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
rules:
  - pattern: ".*admin.*"
    excluded_users: "alice" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert!(cfg.rules.is_empty());
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.identity.header, "x-remote-user");
    assert_eq!(cfg.identity.anonymous, "anonymous");
    assert!(cfg.admin.enabled);
    assert_eq!(cfg.admin.path_prefix, "/_urlguard");
}

#[test]
fn rules_keep_their_order() {
    let ok = r#"
version: 1
rules:
  - pattern: ".*whoAmI.*"
    exclusions: "alice bob mic.*"
  - pattern: "/admin.*"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.rules.len(), 2);
    assert_eq!(cfg.rules[0].pattern, ".*whoAmI.*");
    assert_eq!(cfg.rules[0].exclusions, "alice bob mic.*");
    assert_eq!(cfg.rules[1].exclusions, "");
}

#[test]
fn broken_rule_pattern_is_not_a_load_error() {
    let ok = r#"
version: 1
rules:
  - pattern: "[invalid("
"#;
    let cfg = config::load_from_str(ok).expect("broken patterns fail open, not at load");
    assert_eq!(cfg.rules.len(), 1);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn invalid_listen_address() {
    let bad = r#"
version: 1
gateway:
  listen: "not-an-addr"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn invalid_identity_header() {
    for header in ["", "bad header"] {
        let bad = format!("version: 1\nidentity:\n  header: \"{header}\"\n");
        let err = config::load_from_str(&bad).expect_err("must fail");
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }
}

#[test]
fn invalid_admin_prefix() {
    for prefix in ["", "/", "admin", "/admin/"] {
        let bad = format!("version: 1\nadmin:\n  path_prefix: \"{prefix}\"\n");
        assert!(config::load_from_str(&bad).is_err(), "prefix {prefix:?} must fail");
    }
}

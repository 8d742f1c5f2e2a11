// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Hark configuration system.

use hark_config::diagnostic::ConfigError;
use hark_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_hark_config() {
    let toml = r#"
[client]
name = "support-bot"
log_level = "debug"

[listener]
default_timeout_secs = 120
unallowed_click_alert = false
unallowed_click_alert_text = "Not yours."
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.client.name, "support-bot");
    assert_eq!(config.client.log_level, "debug");
    assert_eq!(config.listener.default_timeout_secs, Some(120));
    assert!(!config.listener.unallowed_click_alert);
    assert_eq!(config.listener.unallowed_click_alert_text, "Not yours.");
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.client.name, "hark");
    assert!(config.listener.default_timeout_secs.is_none());
}

/// Unknown field in [listener] is rejected with a suggestion.
#[test]
fn unknown_listener_key_is_reported_with_suggestion() {
    let toml = r#"
[listener]
unallowed_click_alrt = true
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("expected an UnknownKey diagnostic");
    assert_eq!(unknown.0, "unallowed_click_alrt");
    assert_eq!(unknown.1.as_deref(), Some("unallowed_click_alert"));
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[listeners]
default_timeout_secs = 5
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Wrong value type produces an InvalidType diagnostic naming the key.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[listener]
default_timeout_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string timeout");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("default_timeout_secs")
    )));
}

/// Values that parse but violate constraints surface as validation errors.
#[test]
fn semantic_violations_are_reported() {
    let toml = r#"
[listener]
default_timeout_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero timeout should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { .. })));
}

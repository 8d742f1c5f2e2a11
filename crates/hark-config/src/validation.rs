// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::HarkConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing on the first one.
pub fn validate_config(config: &HarkConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.client.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.log_level `{}` must be one of {}",
                config.client.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.client.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "client.name must not be empty".to_string(),
        });
    }

    if config.listener.default_timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "listener.default_timeout_secs must be greater than 0; omit it to wait forever"
                .to_string(),
        });
    }

    if config.listener.unallowed_click_alert
        && config.listener.unallowed_click_alert_text.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "listener.unallowed_click_alert_text must not be empty while alerts are enabled"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_validation_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&HarkConfig::default()).is_ok());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = HarkConfig::default();
        config.listener.default_timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "default_timeout_secs"));
    }

    #[test]
    fn empty_alert_text_only_matters_when_alerts_enabled() {
        let mut config = HarkConfig::default();
        config.listener.unallowed_click_alert_text = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "unallowed_click_alert_text"));

        config.listener.unallowed_click_alert = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = HarkConfig::default();
        config.client.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation_error(&errors, "log_level"));
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = HarkConfig::default();
        config.client.name = String::new();
        config.listener.default_timeout_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

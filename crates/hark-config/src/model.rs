// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hark listener engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Hark configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HarkConfig {
    /// Client identity and logging settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Listener engine settings.
    #[serde(default)]
    pub listener: ListenerConfig,
}

/// Client identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Display name of the client; the listener engine tags its lifecycle logs with it.
    #[serde(default = "default_client_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error) for the host's subscriber.
    ///
    /// Library crates install no subscriber, so only the embedding binary reads this.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_client_name() -> String {
    "hark".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Listener engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    /// Timeout applied to listeners registered without an explicit one.
    /// `None` means such listeners wait until matched or cancelled.
    #[serde(default)]
    pub default_timeout_secs: Option<u64>,

    /// Answer callback queries pressed by users a listener is not waiting for.
    #[serde(default = "default_unallowed_click_alert")]
    pub unallowed_click_alert: bool,

    /// Alert text shown to those users unless the listener overrides it.
    #[serde(default = "default_unallowed_click_alert_text")]
    pub unallowed_click_alert_text: String,
}

impl ListenerConfig {
    /// The default timeout as a [`Duration`], if one is configured.
    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: None,
            unallowed_click_alert: default_unallowed_click_alert(),
            unallowed_click_alert_text: default_unallowed_click_alert_text(),
        }
    }
}

fn default_unallowed_click_alert() -> bool {
    true
}

fn default_unallowed_click_alert_text() -> String {
    "This button is not meant for you.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_wait_forever() {
        let config = HarkConfig::default();
        assert_eq!(config.client.name, "hark");
        assert_eq!(config.client.log_level, "info");
        assert!(config.listener.default_timeout().is_none());
        assert!(config.listener.unallowed_click_alert);
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = ListenerConfig {
            default_timeout_secs: Some(90),
            ..ListenerConfig::default()
        };
        assert_eq!(config.default_timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn partial_listener_section_keeps_other_defaults() {
        let toml_str = r#"
[listener]
default_timeout_secs = 30
"#;
        let config: HarkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listener.default_timeout_secs, Some(30));
        assert!(config.listener.unallowed_click_alert);
        assert_eq!(
            config.listener.unallowed_click_alert_text,
            "This button is not meant for you."
        );
    }
}

// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hark.toml` > `~/.config/hark/hark.toml` > `/etc/hark/hark.toml`
//! with environment variable overrides via `HARK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HarkConfig;

/// Path of the system-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hark/hark.toml";

/// File name of the local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "hark.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hark/hark.toml` (system-wide)
/// 3. `~/.config/hark/hark.toml` (user XDG config)
/// 4. `./hark.toml` (local directory)
/// 5. `HARK_*` environment variables
pub fn load_config() -> Result<HarkConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HarkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HarkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HarkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HarkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HarkConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Location of the per-user configuration file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hark").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `HARK_LISTENER_DEFAULT_TIMEOUT_SECS` must map to
/// `listener.default_timeout_secs`, not `listener.default.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("HARK_").map(|key| {
        // Figment hands over the variable name in its original case.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = if let Some(rest) = key_str.strip_prefix("client_") {
            format!("client.{rest}")
        } else if let Some(rest) = key_str.strip_prefix("listener_") {
            format!("listener.{rest}")
        } else {
            key_str
        };
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_listener_section() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HARK_LISTENER_DEFAULT_TIMEOUT_SECS", "45");
            jail.set_env("HARK_CLIENT_LOG_LEVEL", "debug");

            let config: HarkConfig = Figment::new()
                .merge(Serialized::defaults(HarkConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.listener.default_timeout_secs, Some(45));
            assert_eq!(config.client.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[listener]
unallowed_click_alert_text = "from file"
default_timeout_secs = 10
"#,
            )?;
            jail.set_env("HARK_LISTENER_DEFAULT_TIMEOUT_SECS", "20");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.listener.unallowed_click_alert_text, "from file");
            assert_eq!(config.listener.default_timeout_secs, Some(20));
            Ok(())
        });
    }

    #[test]
    fn uppercase_env_names_map_to_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HARK_CLIENT_NAME", "support-bot");
            jail.set_env("HARK_LISTENER_UNALLOWED_CLICK_ALERT", "false");

            let config = build_figment().extract::<HarkConfig>()?;
            assert_eq!(config.client.name, "support-bot");
            assert!(!config.listener.unallowed_click_alert);
            Ok(())
        });
    }
}

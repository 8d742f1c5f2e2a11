// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration options and engine-wide settings.

use std::time::Duration;

use hark_config::{HarkConfig, ListenerConfig};
use hark_core::ListenerTypes;

use crate::identifier::Identifier;
use crate::listener::UnallowedClickAlert;

/// How long a listener may stay pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Use [`ListenerSettings::default_timeout`].
    #[default]
    Configured,
    /// Wait until matched or cancelled.
    Never,
    After(Duration),
}

/// What to wait for and for how long.
#[derive(Debug, Clone)]
pub struct ListenOptions {
    pub listener_type: ListenerTypes,
    pub identifier: Identifier,
    pub timeout: TimeoutPolicy,
    pub unallowed_click_alert: UnallowedClickAlert,
}

impl ListenOptions {
    /// Wait for any update of `listener_type`; narrow it with [`ListenOptions::identifier`].
    pub fn new(listener_type: ListenerTypes) -> Self {
        Self {
            listener_type,
            identifier: Identifier::new(),
            timeout: TimeoutPolicy::default(),
            unallowed_click_alert: UnallowedClickAlert::default(),
        }
    }

    pub fn message() -> Self {
        Self::new(ListenerTypes::Message)
    }

    pub fn callback_query() -> Self {
        Self::new(ListenerTypes::CallbackQuery)
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = TimeoutPolicy::After(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.timeout = TimeoutPolicy::Never;
        self
    }

    pub fn unallowed_click_alert(mut self, alert: UnallowedClickAlert) -> Self {
        self.unallowed_click_alert = alert;
        self
    }
}

/// Engine-wide listener settings, usually taken from [`HarkConfig`].
#[derive(Debug, Clone)]
pub struct ListenerSettings {
    /// Applied to listeners registered with [`TimeoutPolicy::Configured`].
    pub default_timeout: Option<Duration>,
    /// Whether listeners with [`UnallowedClickAlert::Default`] answer foreign clicks.
    pub unallowed_click_alert: bool,
    pub unallowed_click_alert_text: String,
}

impl ListenerSettings {
    pub(crate) fn resolve_timeout(&self, policy: TimeoutPolicy) -> Option<Duration> {
        match policy {
            TimeoutPolicy::Configured => self.default_timeout,
            TimeoutPolicy::Never => None,
            TimeoutPolicy::After(timeout) => Some(timeout),
        }
    }

    /// Alert text to show for `alert`, or `None` to stay silent.
    pub(crate) fn alert_text<'a>(&'a self, alert: &'a UnallowedClickAlert) -> Option<&'a str> {
        match alert {
            UnallowedClickAlert::Off => None,
            UnallowedClickAlert::Default => self
                .unallowed_click_alert
                .then_some(self.unallowed_click_alert_text.as_str()),
            UnallowedClickAlert::Custom(text) => Some(text),
        }
    }
}

impl From<&ListenerConfig> for ListenerSettings {
    fn from(config: &ListenerConfig) -> Self {
        Self {
            default_timeout: config.default_timeout(),
            unallowed_click_alert: config.unallowed_click_alert,
            unallowed_click_alert_text: config.unallowed_click_alert_text.clone(),
        }
    }
}

impl From<&HarkConfig> for ListenerSettings {
    fn from(config: &HarkConfig) -> Self {
        Self::from(&config.listener)
    }
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self::from(&ListenerConfig::default())
    }
}

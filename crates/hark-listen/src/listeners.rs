// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-facing entry points: wait for updates, ask questions, stop waiting.

use std::sync::Arc;

use hark_config::{ClientConfig, HarkConfig};
use hark_core::{ChatId, HarkError, ListenerTypes, Message, StopReason, Transport, Update};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::handle::ListenerHandle;
use crate::identifier::Identifier;
use crate::lifecycle;
use crate::listener::{Delivery, Listener, Outcome};
use crate::options::{ListenOptions, ListenerSettings};
use crate::registry::ListenerRegistry;
use crate::resolver::MatchResolver;

/// A prompt sent by [`Listeners::ask`] together with the update that answered it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub request: Message,
    pub response: Update,
}

/// The listener engine of one client.
///
/// Owns the registry for the client's lifetime; call
/// [`Listeners::shutdown`] when the client stops so no waiter hangs forever.
pub struct Listeners {
    name: String,
    pub(crate) registry: Arc<ListenerRegistry>,
    pub(crate) resolver: MatchResolver,
    pub(crate) settings: ListenerSettings,
    pub(crate) transport: Option<Arc<dyn Transport>>,
}

impl Listeners {
    pub fn new(settings: ListenerSettings) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        Self {
            name: ClientConfig::default().name,
            resolver: MatchResolver::new(Arc::clone(&registry)),
            registry,
            settings,
            transport: None,
        }
    }

    pub fn from_config(config: &HarkConfig) -> Self {
        let listeners = Self::new(ListenerSettings::from(config)).with_name(&config.client.name);
        debug!(
            client = %listeners.name,
            default_timeout = ?listeners.settings.default_timeout,
            "listener engine configured"
        );
        listeners
    }

    /// Client name attached to lifecycle logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the transport used by [`Listeners::ask`] and click alerts.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &MatchResolver {
        &self.resolver
    }

    pub fn settings(&self) -> &ListenerSettings {
        &self.settings
    }

    /// Register a listener and return the handle to await it on.
    ///
    /// Fails only when a timeout applies and no tokio runtime is running.
    pub fn listen(&self, options: ListenOptions) -> Result<ListenerHandle, HarkError> {
        let (tx, rx) = oneshot::channel();
        let listener = self.install(options, Delivery::Future(tx))?;
        Ok(ListenerHandle::new(listener, Arc::clone(&self.registry), rx))
    }

    /// Send `text` to `chat_id` and wait for the reply.
    ///
    /// The listener is registered before the prompt is sent so a fast reply
    /// cannot slip past it. Unless the options say otherwise it is scoped to
    /// `chat_id` and, for message listeners, to incoming messages only, so the
    /// prompt itself never counts as the answer.
    pub async fn ask(
        &self,
        chat_id: ChatId,
        text: &str,
        mut options: ListenOptions,
    ) -> Result<Answer, HarkError> {
        let transport = self
            .transport
            .clone()
            .ok_or_else(|| HarkError::Internal("ask requires a transport".into()))?;

        if options.identifier.chat_id().is_none() {
            options.identifier = options.identifier.with_chat_id(chat_id);
        }
        if options.listener_type == ListenerTypes::Message && options.identifier.outgoing().is_none()
        {
            options.identifier = options.identifier.with_outgoing(false);
        }

        let handle = self.listen(options)?;
        let request = match transport.send_message(chat_id, text).await {
            Ok(request) => request,
            Err(err) => {
                handle.cancel();
                return Err(err);
            }
        };
        debug!(listener_id = %handle.id(), chat_id = chat_id.0, "prompt sent, awaiting answer");

        let response = handle.wait().await?;
        Ok(Answer { request, response })
    }

    /// Register a callback invoked exactly once with the listener's outcome.
    ///
    /// The callback runs on whichever task settles the listener (the
    /// dispatcher, a timer or a canceller) and should not block.
    pub fn register_next_step_handler<F>(
        &self,
        options: ListenOptions,
        callback: F,
    ) -> Result<Arc<Listener>, HarkError>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        self.install(options, Delivery::Callback(Box::new(callback)))
    }

    /// Cancel one listener. Returns `false` if it had already settled.
    pub fn stop_listener(&self, listener: &Listener) -> bool {
        lifecycle::cancel(&self.registry, listener, StopReason::Caller)
    }

    /// Cancel every pending listener whose identifier satisfies `pattern`.
    ///
    /// Returns how many listeners this call cancelled.
    pub fn stop_listening(&self, pattern: &Identifier, listener_type: ListenerTypes) -> usize {
        let mut stopped = 0;
        while let Some(listener) = self.resolver.find_by_pattern(pattern, listener_type) {
            if self.stop_listener(&listener) {
                stopped += 1;
            }
        }
        stopped
    }

    /// Cancel every pending listener with [`StopReason::Shutdown`].
    ///
    /// Later registrations are cancelled immediately.
    pub fn shutdown(&self) -> usize {
        let drained = self.registry.drain();
        info!(client = %self.name, drained, "listener engine shut down");
        drained
    }

    fn install(&self, options: ListenOptions, delivery: Delivery) -> Result<Arc<Listener>, HarkError> {
        let timeout = self.settings.resolve_timeout(options.timeout);
        if timeout.is_some() && tokio::runtime::Handle::try_current().is_err() {
            return Err(HarkError::Internal(
                "listener timeouts require a running tokio runtime".into(),
            ));
        }

        let listener = Arc::new(Listener::new(
            options.identifier,
            options.listener_type,
            timeout,
            options.unallowed_click_alert,
            delivery,
            self.registry.timer_token(),
        ));

        let registered = self.registry.register(Arc::clone(&listener));
        if let (true, Some(timeout)) = (registered, timeout) {
            lifecycle::arm_timer(Arc::clone(&self.registry), Arc::clone(&listener), timeout);
        }
        Ok(listener)
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::new(ListenerSettings::default())
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn from_config_takes_client_name() {
        let mut config = HarkConfig::default();
        config.client.name = "support-bot".into();
        let listeners = Listeners::from_config(&config);
        assert_eq!(listeners.name(), "support-bot");
        assert_eq!(Listeners::default().name(), "hark");
    }

    #[tokio::test]
    #[traced_test]
    async fn shutdown_log_names_the_client() {
        let listeners = Listeners::default().with_name("support-bot");
        let _handle = listeners.listen(ListenOptions::message()).unwrap();

        assert_eq!(listeners.shutdown(), 1);
        assert!(logs_contain("listener engine shut down"));
        assert!(logs_contain("support-bot"));
    }
}

// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listener engine: await future updates that match a partial pattern.
//!
//! A caller registers a [`Listener`] with an [`Identifier`] pattern and
//! awaits its [`ListenerHandle`]. For every incoming update the dispatcher
//! calls [`Listeners::dispatch`], which asks the [`MatchResolver`] for the
//! most specific pending listener whose pattern matches and hands it the
//! update. Each listener settles exactly once: resolved by a match,
//! cancelled, or timed out.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use hark_core::ChatId;
//! use hark_listen::{Identifier, ListenOptions, Listeners};
//!
//! # async fn example(listeners: &Listeners) -> Result<(), hark_core::HarkError> {
//! let reply = listeners
//!     .listen(
//!         ListenOptions::message()
//!             .identifier(Identifier::new().with_chat_id(ChatId(42)))
//!             .timeout(Duration::from_secs(60)),
//!     )?
//!     .await?;
//! println!("got {:?}", reply.text());
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod handle;
pub mod identifier;
pub mod lifecycle;
pub mod listener;
pub mod listeners;
pub mod options;
pub mod registry;
pub mod resolver;

pub use dispatch::DispatchOutcome;
pub use handle::ListenerHandle;
pub use identifier::{Identifier, Predicate, PredicateError, Scope};
pub use listener::{Listener, ListenerId, ListenerState, Outcome, UnallowedClickAlert};
pub use listeners::{Answer, Listeners};
pub use options::{ListenOptions, ListenerSettings, TimeoutPolicy};
pub use registry::ListenerRegistry;
pub use resolver::MatchResolver;

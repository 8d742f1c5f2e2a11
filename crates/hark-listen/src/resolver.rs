// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-match selection among pending listeners.
//!
//! Among the listeners of the update's kind whose pattern matches, the one
//! with the most populated fields wins; ties go to the earliest registered.
//! The winner is claimed and removed while its bucket is locked, and the
//! update is delivered after the lock is released.

use std::cmp::Reverse;
use std::sync::Arc;

use hark_core::{ListenerTypes, Update};
use tracing::{debug, warn};

use crate::identifier::Identifier;
use crate::listener::{Listener, ListenerState};
use crate::registry::ListenerRegistry;

/// Finds and resolves the best listener for an incoming update.
#[derive(Debug, Clone)]
pub struct MatchResolver {
    registry: Arc<ListenerRegistry>,
}

impl MatchResolver {
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Resolve the best listener waiting for `update`, if any.
    ///
    /// Returns the resolved listener, or `None` when nothing matched, in which
    /// case the registry is left untouched.
    pub fn resolve(&self, update: &Update) -> Option<Arc<Listener>> {
        let concrete = Identifier::from_update(update);
        self.resolve_with(update.listener_type(), &concrete, update)
    }

    /// Resolve against an already-derived concrete identifier.
    ///
    /// `payload` is what the winning listener receives.
    pub fn resolve_with(
        &self,
        listener_type: ListenerTypes,
        concrete: &Identifier,
        payload: &Update,
    ) -> Option<Arc<Listener>> {
        let claimed = self.registry.with_bucket(listener_type, |bucket| {
            let ranked = rank(bucket, |listener| {
                evaluate(listener, listener.identifier(), concrete)
            });
            // A listener already claimed by a racing cancel or timeout is
            // still in the bucket until that path removes it; skip it.
            for index in ranked {
                if let Some(delivery) = bucket[index].claim(ListenerState::Resolved) {
                    return Some((bucket.remove(index), delivery));
                }
            }
            None
        });

        let Some((listener, delivery)) = claimed else {
            debug!(%listener_type, "no listener matched update");
            return None;
        };

        debug!(
            listener_id = %listener.id(),
            %listener_type,
            specificity = listener.identifier().count_populated(),
            "listener resolved"
        );
        delivery.deliver(Ok(payload.clone()));
        Some(listener)
    }

    /// The listener [`MatchResolver::resolve_with`] would pick, without resolving it.
    pub fn find_best(
        &self,
        listener_type: ListenerTypes,
        concrete: &Identifier,
    ) -> Option<Arc<Listener>> {
        self.registry.with_bucket(listener_type, |bucket| {
            rank(bucket, |listener| {
                evaluate(listener, listener.identifier(), concrete)
            })
            .first()
            .map(|&index| Arc::clone(&bucket[index]))
        })
    }

    /// The most specific pending listener whose own identifier satisfies `pattern`.
    ///
    /// This is the reverse of [`MatchResolver::find_best`]: the caller holds a
    /// partial description and looks for listeners registered on it, e.g. to
    /// stop every listener waiting in a chat.
    pub fn find_by_pattern(
        &self,
        pattern: &Identifier,
        listener_type: ListenerTypes,
    ) -> Option<Arc<Listener>> {
        self.registry.with_bucket(listener_type, |bucket| {
            rank(bucket, |listener| evaluate(listener, pattern, listener.identifier()))
                .first()
                .map(|&index| Arc::clone(&bucket[index]))
        })
    }
}

/// Indices of pending, matching listeners, most specific first.
///
/// The sort is stable, so equally specific listeners keep insertion order.
fn rank(bucket: &[Arc<Listener>], mut matches: impl FnMut(&Listener) -> bool) -> Vec<usize> {
    let mut ranked: Vec<(usize, usize)> = bucket
        .iter()
        .enumerate()
        .filter(|(_, listener)| listener.is_pending() && matches(listener))
        .map(|(index, listener)| (index, listener.identifier().count_populated()))
        .collect();
    ranked.sort_by_key(|&(_, specificity)| Reverse(specificity));
    ranked.into_iter().map(|(index, _)| index).collect()
}

/// Match `candidate` against `pattern`, containing predicate failures.
fn evaluate(listener: &Listener, pattern: &Identifier, candidate: &Identifier) -> bool {
    match pattern.try_matches(candidate) {
        Ok(matched) => matched,
        Err(err) => {
            warn!(
                listener_id = %listener.id(),
                error = %err,
                "listener predicate failed, treating as no match"
            );
            false
        }
    }
}

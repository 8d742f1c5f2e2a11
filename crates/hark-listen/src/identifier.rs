// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partial-match patterns over update attributes.
//!
//! The same [`Identifier`] type describes what a listener waits for (a
//! pattern, usually sparse) and what an incoming update is (a concrete
//! identifier built by [`Identifier::from_update`], with every applicable
//! field set). Unset fields in a pattern mean "don't care".

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use hark_core::{ChatId, HarkError, MessageId, Update, UserId};

/// Error a custom predicate may return; the listener is then treated as non-matching.
pub type PredicateError = Box<dyn std::error::Error + Send + Sync>;

type PredicateFn = dyn Fn(&Update) -> Result<bool, PredicateError> + Send + Sync;

/// One value or a set of acceptable values for a field.
///
/// Two scopes match when they share at least one value, so a pattern can
/// wait on any of several chats. An empty `AnyOf` matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope<T> {
    One(T),
    AnyOf(Vec<T>),
}

impl<T: PartialEq> Scope<T> {
    /// Build a scope accepting any of `values`.
    pub fn any_of(values: impl IntoIterator<Item = T>) -> Self {
        Scope::AnyOf(values.into_iter().collect())
    }

    pub fn values(&self) -> &[T] {
        match self {
            Scope::One(value) => std::slice::from_ref(value),
            Scope::AnyOf(values) => values,
        }
    }

    /// Whether the two scopes have a value in common.
    pub fn overlaps(&self, other: &Scope<T>) -> bool {
        let theirs = other.values();
        self.values().iter().any(|value| theirs.contains(value))
    }
}

impl<T> From<T> for Scope<T> {
    fn from(value: T) -> Self {
        Scope::One(value)
    }
}

/// A caller-supplied filter evaluated against the raw update.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap a fallible predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Update) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an infallible predicate.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Update) -> bool + Send + Sync + 'static,
    {
        Self::new(move |update| Ok(f(update)))
    }

    /// Evaluate against an update, mapping a failure to [`HarkError::Predicate`].
    ///
    /// A panicking predicate is caught and reported the same way, so it only
    /// disqualifies its own listener.
    pub fn evaluate(&self, update: &Update) -> Result<bool, HarkError> {
        match catch_unwind(AssertUnwindSafe(|| (self.0)(update))) {
            Ok(result) => result.map_err(|err| HarkError::Predicate {
                message: err.to_string(),
            }),
            Err(payload) => Err(HarkError::Predicate {
                message: format!("predicate panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<fn>)")
    }
}

/// A partial-match pattern, or a concrete description of one update.
#[derive(Clone, Default)]
pub struct Identifier {
    chat_id: Option<Scope<ChatId>>,
    from_user_id: Option<Scope<UserId>>,
    message_id: Option<Scope<MessageId>>,
    inline_message_id: Option<Scope<String>>,
    outgoing: Option<bool>,
    predicate: Option<Predicate>,
    /// The update a concrete identifier was derived from; predicates run against it.
    subject: Option<Arc<Update>>,
}

impl Identifier {
    /// An empty pattern that matches every candidate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_id(mut self, chat_id: impl Into<Scope<ChatId>>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    pub fn with_from_user_id(mut self, user_id: impl Into<Scope<UserId>>) -> Self {
        self.from_user_id = Some(user_id.into());
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<Scope<MessageId>>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_inline_message_id(mut self, inline_message_id: impl Into<Scope<String>>) -> Self {
        self.inline_message_id = Some(inline_message_id.into());
        self
    }

    pub fn with_outgoing(mut self, outgoing: bool) -> Self {
        self.outgoing = Some(outgoing);
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Describe a concrete update, setting every field that applies to it.
    ///
    /// Messages carry chat, message id, direction and (when known) sender.
    /// Callback queries carry the presser plus whatever identifies the
    /// keyboard's message: chat and message id, inline message id, or both.
    pub fn from_update(update: &Update) -> Self {
        let mut identifier = match update {
            Update::Message(msg) => Identifier {
                chat_id: Some(Scope::One(msg.chat)),
                from_user_id: msg.from.map(Scope::One),
                message_id: Some(Scope::One(msg.id)),
                outgoing: Some(msg.outgoing),
                ..Identifier::default()
            },
            Update::CallbackQuery(query) => Identifier {
                chat_id: query.message.as_ref().map(|m| Scope::One(m.chat)),
                from_user_id: Some(Scope::One(query.from)),
                message_id: query.message.as_ref().map(|m| Scope::One(m.id)),
                inline_message_id: query.inline_message_id.clone().map(Scope::One),
                ..Identifier::default()
            },
        };
        identifier.subject = Some(Arc::new(update.clone()));
        identifier
    }

    pub fn chat_id(&self) -> Option<&Scope<ChatId>> {
        self.chat_id.as_ref()
    }

    pub fn from_user_id(&self) -> Option<&Scope<UserId>> {
        self.from_user_id.as_ref()
    }

    pub fn message_id(&self) -> Option<&Scope<MessageId>> {
        self.message_id.as_ref()
    }

    pub fn inline_message_id(&self) -> Option<&Scope<String>> {
        self.inline_message_id.as_ref()
    }

    pub fn outgoing(&self) -> Option<bool> {
        self.outgoing
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn subject(&self) -> Option<&Update> {
        self.subject.as_deref()
    }

    /// Whether `candidate` satisfies this pattern.
    ///
    /// A failing predicate counts as no match; use [`Identifier::try_matches`]
    /// to observe the failure.
    pub fn matches(&self, candidate: &Identifier) -> bool {
        self.try_matches(candidate).unwrap_or(false)
    }

    /// Like [`Identifier::matches`] but surfaces predicate failures.
    ///
    /// Every field set here must be set on `candidate` and overlap with it.
    /// A predicate requires the candidate to carry its subject update. Plain
    /// fields are checked first so a predicate only runs on otherwise
    /// matching candidates.
    pub fn try_matches(&self, candidate: &Identifier) -> Result<bool, HarkError> {
        let plain = field_matches(&self.chat_id, &candidate.chat_id)
            && field_matches(&self.from_user_id, &candidate.from_user_id)
            && field_matches(&self.message_id, &candidate.message_id)
            && field_matches(&self.inline_message_id, &candidate.inline_message_id)
            && self
                .outgoing
                .is_none_or(|outgoing| candidate.outgoing == Some(outgoing));
        if !plain {
            return Ok(false);
        }

        match (&self.predicate, candidate.subject()) {
            (None, _) => Ok(true),
            (Some(_), None) => Ok(false),
            (Some(predicate), Some(update)) => predicate.evaluate(update),
        }
    }

    /// Number of set fields, used as the pattern's specificity.
    pub fn count_populated(&self) -> usize {
        [
            self.chat_id.is_some(),
            self.from_user_id.is_some(),
            self.message_id.is_some(),
            self.inline_message_id.is_some(),
            self.outgoing.is_some(),
            self.predicate.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// A pattern locating the same keyboard message, ignoring who pressed it.
    ///
    /// Keeps only chat, message id and inline message id.
    pub fn message_locator(&self) -> Identifier {
        Identifier {
            chat_id: self.chat_id.clone(),
            message_id: self.message_id.clone(),
            inline_message_id: self.inline_message_id.clone(),
            ..Identifier::default()
        }
    }
}

fn field_matches<T: PartialEq>(pattern: &Option<Scope<T>>, candidate: &Option<Scope<T>>) -> bool {
    match (pattern, candidate) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(wanted), Some(actual)) => wanted.overlaps(actual),
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("chat_id", &self.chat_id)
            .field("from_user_id", &self.from_user_id)
            .field("message_id", &self.message_id)
            .field("inline_message_id", &self.inline_message_id)
            .field("outgoing", &self.outgoing)
            .field("predicate", &self.predicate.is_some())
            .field("subject", &self.subject.is_some())
            .finish()
    }
}

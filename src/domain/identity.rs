// SPDX-License-Identifier: MPL-2.0
//! Identity types for messages and presenters.
//!
//! A [`MessageId`] is the de-duplication key chosen by the caller (or
//! synthesized from the view). A [`PresenterKey`] is the object identity of a
//! single presenter: two presenters showing the same message id still have
//! distinct keys.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// De-duplication key for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesizes an id from the address of a shared value.
    ///
    /// Used for views that do not declare their own identity: two handles to
    /// the same view yield the same id, distinct views yield distinct ids for
    /// as long as both are alive.
    #[must_use]
    pub fn from_address<T: ?Sized>(value: *const T) -> Self {
        Self(format!("view-{:x}", value.cast::<()>() as usize))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Process-unique identity of a presenter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresenterKey(u64);

impl PresenterKey {
    /// Creates a new unique presenter key.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw key value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for PresenterKey {
    fn default() -> Self {
        Self::new()
    }
}

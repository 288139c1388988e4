// SPDX-License-Identifier: MPL-2.0
//! Execution contexts and completion plumbing.
//!
//! Two logical domains exist: the manager's serial actor (see
//! [`crate::manager`]) and the UI-affine [`MainContext`] defined here. Work
//! crosses between them only through explicit hand-offs.

mod completion;
mod main_context;

pub use completion::{completion, Completer, Completion};
pub use main_context::MainContext;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// State guarded here is only ever replaced wholesale, so a poisoned guard
/// still holds a consistent value.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// SPDX-License-Identifier: MPL-2.0
//! Exactly-once completion for animated transitions.
//!
//! A transition hands its caller a [`Completion`] future and keeps the
//! matching [`Completer`]. The future resolves once: with the value passed
//! to [`Completer::complete`], or `false` if the completer is dropped first.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Creates a linked completer/completion pair.
#[must_use]
pub fn completion() -> (Completer, Completion) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx: Some(tx) }, Completion { rx })
}

/// Completing half of a transition.
#[derive(Debug)]
pub struct Completer {
    tx: Option<oneshot::Sender<bool>>,
}

impl Completer {
    /// Resolves the paired [`Completion`] with `finished`.
    pub fn complete(mut self, finished: bool) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(finished);
        }
    }
}

impl Drop for Completer {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(false);
        }
    }
}

/// Future resolving to whether a transition ran to its end.
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<bool>,
}

impl Completion {
    /// A completion that is already resolved.
    #[must_use]
    pub fn ready(finished: bool) -> Self {
        let (completer, completion) = completion();
        completer.complete(finished);
        completion
    }
}

impl Future for Completion {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(false))
    }
}

// SPDX-License-Identifier: MPL-2.0
//! UI-affine execution context.
//!
//! All view mutation, animation and gesture handling runs as jobs on a single
//! task, one job at a time, in posting order. Continuations that wait on a
//! [`Completion`] are awaited elsewhere and posted back when resolved, so a
//! running animation never blocks other UI work.

use super::Completion;
use std::time::Duration;
use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to the UI-affine context.
///
/// Cheap to clone. The context keeps running while any handle is alive.
#[derive(Clone, Debug)]
pub struct MainContext {
    job_tx: mpsc::UnboundedSender<Job>,
}

impl MainContext {
    /// Spawns the context's job loop on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn() -> Self {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = job_rx.recv().await {
                job();
            }
        });
        Self { job_tx }
    }

    /// Queues `job` to run on the context.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) {
        if self.job_tx.send(Box::new(job)).is_err() {
            tracing::trace!("main context closed, dropping job");
        }
    }

    /// Queues `job` to run on the context once `delay` has elapsed.
    pub fn post_after(&self, delay: Duration, job: impl FnOnce() + Send + 'static) {
        if delay.is_zero() {
            self.post(job);
            return;
        }
        let main = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            main.post(job);
        });
    }

    /// Runs `job` on the context with the outcome of `completion`.
    pub fn on_complete(
        &self,
        completion: Completion,
        job: impl FnOnce(bool) + Send + 'static,
    ) {
        let main = self.clone();
        tokio::spawn(async move {
            let finished = completion.await;
            main.post(move || job(finished));
        });
    }
}

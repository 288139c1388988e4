// SPDX-License-Identifier: MPL-2.0
//! Queue state owned by the manager actor.
//!
//! Everything here runs on the actor task, one [`Command`] at a time, so no
//! locking is needed. Presenter transitions are posted to the main context;
//! their outcomes and every timer come back as commands. Timers are never
//! cancelled: a firing timer is matched against the current token and
//! ignored when stale.

use crate::domain::{MessageId, PresenterKey};
use crate::presentation::{Phase, Presenter, Report};
use crate::runtime::MainContext;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// Commands processed by the manager actor.
pub(crate) enum Command {
    Enqueue(Arc<Presenter>),
    HideCurrent,
    Hide(MessageId),
    HideCounted(MessageId),
    HideAll,
    Report(PresenterKey, Report),
    AutoHide(AutoHideToken),
    DelayElapsed(PresenterKey),
    DequeueNext,
    Query(Query),
}

/// Read-only questions answered by the actor.
pub(crate) enum Query {
    CurrentId(oneshot::Sender<Option<MessageId>>),
    QueuedIds(oneshot::Sender<Vec<MessageId>>),
    Count(MessageId, oneshot::Sender<usize>),
    Idle(oneshot::Sender<bool>),
}

/// Marks the one auto-hide timer allowed to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AutoHideToken {
    key: PresenterKey,
    generation: u64,
}

/// Non-owning handle to the actor.
///
/// Presenters and timers hold this so pending work never keeps a dropped
/// manager alive.
#[derive(Clone, Debug)]
pub(crate) struct ManagerLink {
    command_tx: mpsc::WeakUnboundedSender<Command>,
}

impl ManagerLink {
    pub(crate) fn new(command_tx: &mpsc::UnboundedSender<Command>) -> Self {
        Self {
            command_tx: command_tx.downgrade(),
        }
    }

    pub(crate) fn send(&self, command: Command) {
        match self.command_tx.upgrade() {
            Some(command_tx) => {
                if command_tx.send(command).is_err() {
                    tracing::trace!("manager stopped, dropping command");
                }
            }
            None => tracing::trace!("manager dropped, dropping command"),
        }
    }

    pub(crate) fn report(&self, key: PresenterKey, report: Report) {
        self.send(Command::Report(key, report));
    }

    /// Sends `command` once `delay` has elapsed.
    pub(crate) fn send_after(&self, delay: Duration, command: Command) {
        let link = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            link.send(command);
        });
    }
}

struct Current {
    presenter: Arc<Presenter>,
    shown_at: Instant,
    /// Deadline of the earliest hide already posted.
    hide_at: Option<Instant>,
    interactively_hidden: bool,
}

pub(crate) struct Queue {
    queue: VecDeque<Arc<Presenter>>,
    delayed: Vec<Arc<Presenter>>,
    current: Option<Current>,
    counts: HashMap<MessageId, usize>,
    autohide: Option<AutoHideToken>,
    next_generation: u64,
    last_cleared: Option<Instant>,
    pause: Duration,
    main: MainContext,
    link: ManagerLink,
}

impl Queue {
    pub(crate) fn new(main: MainContext, link: ManagerLink, pause: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            delayed: Vec::new(),
            current: None,
            counts: HashMap::new(),
            autohide: None,
            next_generation: 0,
            last_cleared: None,
            pause,
            main,
            link,
        }
    }

    pub(crate) fn handle(&mut self, command: Command) {
        match command {
            Command::Enqueue(presenter) => self.enqueue(presenter),
            Command::HideCurrent => self.hide_current(),
            Command::Hide(id) => self.hide_id(&id),
            Command::HideCounted(id) => self.hide_counted(&id),
            Command::HideAll => self.hide_all(),
            Command::Report(key, report) => self.on_report(key, report),
            Command::AutoHide(token) => self.on_auto_hide(token),
            Command::DelayElapsed(key) => self.on_delay_elapsed(key),
            Command::DequeueNext => self.dequeue_next(),
            Command::Query(query) => self.answer(query),
        }
    }

    fn current_key(&self) -> Option<PresenterKey> {
        self.current.as_ref().map(|current| current.presenter.key())
    }

    /// Whether `id` is waiting or on screen. A current message already
    /// sliding out no longer counts, so the same id can come back.
    fn contains_id(&self, id: &MessageId) -> bool {
        self.current.as_ref().is_some_and(|current| {
            current.presenter.id() == id && current.presenter.phase() != Phase::Hiding
        })
            || self.queue.iter().any(|presenter| presenter.id() == id)
            || self.delayed.iter().any(|presenter| presenter.id() == id)
    }

    fn next_token(&mut self, key: PresenterKey) -> AutoHideToken {
        self.next_generation += 1;
        AutoHideToken {
            key,
            generation: self.next_generation,
        }
    }

    // ---------------------------------------------------------------------
    // Enqueue / dequeue
    // ---------------------------------------------------------------------

    fn enqueue(&mut self, presenter: Arc<Presenter>) {
        let id = presenter.id().clone();
        if presenter.config().ignore_duplicates {
            *self.counts.entry(id.clone()).or_insert(0) += 1;
            if self.contains_id(&id) {
                tracing::debug!(%id, "dropping duplicate message");
                return;
            }
        }
        match presenter.delay_show() {
            Some(delay) if !delay.is_zero() => {
                tracing::debug!(%id, ?delay, "delaying message");
                self.link
                    .send_after(delay, Command::DelayElapsed(presenter.key()));
                self.delayed.push(presenter);
            }
            _ => self.push(presenter),
        }
    }

    fn on_delay_elapsed(&mut self, key: PresenterKey) {
        if let Some(position) = self.delayed.iter().position(|p| p.key() == key) {
            let presenter = self.delayed.remove(position);
            self.push(presenter);
        }
    }

    fn push(&mut self, presenter: Arc<Presenter>) {
        tracing::debug!(id = %presenter.id(), queued = self.queue.len(), "enqueue");
        self.queue.push_back(presenter);
        self.dequeue_next();
    }

    fn dequeue_next(&mut self) {
        if self.current.is_some() || self.queue.is_empty() {
            return;
        }
        let now = Instant::now();
        if let Some(cleared) = self.last_cleared {
            let since = now.saturating_duration_since(cleared);
            if since < self.pause {
                // The hide that cleared the slot scheduled the next dequeue.
                tracing::trace!(remaining = ?(self.pause - since), "pausing between messages");
                return;
            }
        }
        let Some(presenter) = self.queue.pop_front() else {
            return;
        };
        let key = presenter.key();
        tracing::debug!(id = %presenter.id(), "showing message");
        self.current = Some(Current {
            presenter: Arc::clone(&presenter),
            shown_at: now,
            hide_at: None,
            interactively_hidden: false,
        });
        // A drag that starts before the show completes is still honored.
        self.autohide = Some(self.next_token(key));

        let link = self.link.clone();
        self.main.post(move || {
            if let Err(err) = presenter.show() {
                tracing::debug!(id = %presenter.id(), %err, "message dropped");
                link.report(key, Report::ShowFailed);
            }
        });
    }

    // ---------------------------------------------------------------------
    // Hiding
    // ---------------------------------------------------------------------

    fn hide_current(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let now = Instant::now();
        let shown_for = now.saturating_duration_since(current.shown_at);
        let delay = current
            .presenter
            .delay_hide(shown_for, current.interactively_hidden);
        let Some(deadline) = now.checked_add(delay) else {
            // A floor this long is never reached; only an interactive
            // dismissal can take the message down.
            tracing::debug!(id = %current.presenter.id(), "hide deferred indefinitely");
            return;
        };
        if current.hide_at.is_some_and(|posted| posted <= deadline) {
            return;
        }
        current.hide_at = Some(deadline);
        tracing::debug!(id = %current.presenter.id(), ?delay, "hiding message");
        let presenter = Arc::clone(&current.presenter);
        self.main.post_after(delay, move || presenter.hide());
    }

    fn hide_id(&mut self, id: &MessageId) {
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.presenter.id() == id)
        {
            self.hide_current();
        }
        self.queue.retain(|presenter| presenter.id() != id);
        self.delayed.retain(|presenter| presenter.id() != id);
        self.counts.remove(id);
    }

    fn hide_counted(&mut self, id: &MessageId) {
        if let Some(count) = self.counts.get_mut(id) {
            if *count > 1 {
                *count -= 1;
                tracing::trace!(%id, remaining = *count, "counted hide");
                return;
            }
        }
        self.hide_id(id);
    }

    fn hide_all(&mut self) {
        self.queue.clear();
        self.delayed.clear();
        self.counts.clear();
        self.hide_current();
    }

    fn hide_presenter(&mut self, key: PresenterKey) {
        if self.current_key() == Some(key) {
            self.hide_current();
        } else {
            self.queue.retain(|presenter| presenter.key() != key);
            self.delayed.retain(|presenter| presenter.key() != key);
        }
    }

    // ---------------------------------------------------------------------
    // Auto-hide
    // ---------------------------------------------------------------------

    fn queue_auto_hide(&mut self) {
        let Some(presenter) = self.current.as_ref().map(|c| Arc::clone(&c.presenter)) else {
            return;
        };
        let token = self.next_token(presenter.key());
        self.autohide = Some(token);
        if let Some(pause) = presenter.pause_duration() {
            tracing::trace!(id = %presenter.id(), ?pause, "auto-hide scheduled");
            self.link.send_after(pause, Command::AutoHide(token));
        }
    }

    fn on_auto_hide(&mut self, token: AutoHideToken) {
        if self.autohide != Some(token) {
            tracing::trace!(?token, "stale auto-hide timer");
            return;
        }
        self.hide_presenter(token.key);
    }

    // ---------------------------------------------------------------------
    // Presenter reports
    // ---------------------------------------------------------------------

    fn on_report(&mut self, key: PresenterKey, report: Report) {
        let is_current = self.current_key() == Some(key);
        match report {
            Report::Shown if is_current => {
                if self.autohide.is_some_and(|token| token.key == key) {
                    self.queue_auto_hide();
                }
            }
            Report::ShowFailed if is_current => {
                self.clear_current();
            }
            Report::Hidden if is_current => {
                self.clear_current();
                self.last_cleared = Some(Instant::now());
                tracing::debug!(pause = ?self.pause, "message hidden");
                self.link.send_after(self.pause, Command::DequeueNext);
            }
            Report::PanStarted if is_current => {
                self.autohide = None;
            }
            Report::PanEnded if is_current => {
                self.queue_auto_hide();
            }
            Report::InteractiveHide => {
                if let Some(current) = self.current.as_mut().filter(|_| is_current) {
                    current.interactively_hidden = true;
                }
                self.hide_presenter(key);
            }
            _ => tracing::trace!(?key, ?report, "report from a stale presenter"),
        }
    }

    /// Empties the current slot. The id's count is forgotten unless the same
    /// id was requested again while the message was sliding out.
    fn clear_current(&mut self) {
        self.autohide = None;
        if let Some(current) = self.current.take() {
            let id = current.presenter.id();
            if !self.contains_id(id) {
                self.counts.remove(id);
            }
        }
    }

    fn answer(&self, query: Query) {
        // A dropped receiver just means the caller stopped waiting.
        match query {
            Query::CurrentId(reply) => {
                let _ = reply.send(self.current.as_ref().map(|c| c.presenter.id().clone()));
            }
            Query::QueuedIds(reply) => {
                let _ = reply.send(self.queue.iter().map(|p| p.id().clone()).collect());
            }
            Query::Count(id, reply) => {
                let _ = reply.send(self.counts.get(&id).copied().unwrap_or(0));
            }
            Query::Idle(reply) => {
                let _ = reply.send(
                    self.current.is_none() && self.queue.is_empty() && self.delayed.is_empty(),
                );
            }
        }
    }
}

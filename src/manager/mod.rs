// SPDX-License-Identifier: MPL-2.0
//! Message manager: the public entry point for showing and hiding messages.
//!
//! A [`Manager`] is a cheap handle to a serial actor task that owns the
//! queue. Every public operation becomes a command on the actor's channel,
//! so calls from any thread are applied in the order they were made. The
//! actor stops once every handle is dropped.
//!
//! # Example
//!
//! ```no_run
//! use herald::manager::Manager;
//! use herald::presentation::MessageConfig;
//! use herald::view::{Banner, HeadlessHost, Host, Point, Rectangle, RootResolver, Size};
//! use std::sync::Arc;
//!
//! # async fn demo() -> herald::error::Result<()> {
//! let host: Arc<dyn Host> = Arc::new(HeadlessHost::new(Rectangle::new(
//!     Point::ORIGIN,
//!     Size::new(375.0, 812.0),
//! )));
//! let manager = Manager::new(Arc::new(RootResolver::new(&host)));
//! manager.show(MessageConfig::default(), Arc::new(Banner::new(64.0).with_id("saved")))?;
//! # Ok(())
//! # }
//! ```

mod queue;

pub(crate) use queue::ManagerLink;

use crate::config::Config;
use crate::domain::MessageId;
use crate::error::{Error, PresentationError, Result};
use crate::presentation::{MessageConfig, Presenter, Services};
use crate::runtime::{lock, MainContext};
use crate::view::{ContainerResolver, FrameLayout, Layout, MessageView};
use queue::{Command, Query, Queue};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tokio::sync::{mpsc, oneshot};

static SHARED: OnceLock<Manager> = OnceLock::new();

/// Handle to a message queue.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct Manager {
    command_tx: mpsc::UnboundedSender<Command>,
    services: Services,
    defaults: Arc<Mutex<MessageConfig>>,
}

/// Configures and spawns a [`Manager`].
pub struct ManagerBuilder {
    resolver: Arc<dyn ContainerResolver>,
    config: Config,
    layout: Arc<dyn Layout>,
    main: Option<MainContext>,
    defaults: MessageConfig,
}

impl ManagerBuilder {
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the constraint solver used to place message views.
    #[must_use]
    pub fn layout(mut self, layout: Arc<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    /// Shares an existing UI context instead of spawning a new one.
    #[must_use]
    pub fn main_context(mut self, main: MainContext) -> Self {
        self.main = Some(main);
        self
    }

    #[must_use]
    pub fn default_config(mut self, defaults: MessageConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Spawns the actor task and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn build(self) -> Manager {
        let main = self.main.unwrap_or_else(MainContext::spawn);
        let pause = self.config.pause_between_messages().as_duration();
        let (command_tx, mut command_rx) = mpsc::unbounded_channel();
        let mut queue = Queue::new(main.clone(), ManagerLink::new(&command_tx), pause);

        tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                queue.handle(command);
            }
            tracing::debug!("message manager stopped");
        });

        Manager {
            command_tx,
            services: Services {
                main,
                resolver: self.resolver,
                layout: self.layout,
                settings: Arc::new(self.config),
            },
            defaults: Arc::new(Mutex::new(self.defaults)),
        }
    }
}

impl Manager {
    #[must_use]
    pub fn builder(resolver: Arc<dyn ContainerResolver>) -> ManagerBuilder {
        ManagerBuilder {
            resolver,
            config: Config::default(),
            layout: Arc::new(FrameLayout),
            main: None,
            defaults: MessageConfig::default(),
        }
    }

    /// Spawns a manager with default settings.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(resolver: Arc<dyn ContainerResolver>) -> Self {
        Self::builder(resolver).build()
    }

    /// Installs the process-wide default manager.
    ///
    /// # Errors
    ///
    /// Returns [`PresentationError::SharedAlreadyInstalled`] if a shared
    /// manager was installed before.
    pub fn install_shared(manager: Manager) -> Result<()> {
        SHARED
            .set(manager)
            .map_err(|_| PresentationError::SharedAlreadyInstalled.into())
    }

    /// The process-wide default manager, if one was installed.
    #[must_use]
    pub fn shared() -> Option<&'static Manager> {
        SHARED.get()
    }

    /// The UI context presenters of this manager run on.
    #[must_use]
    pub fn main_context(&self) -> &MainContext {
        &self.services.main
    }

    #[must_use]
    pub fn settings(&self) -> &Config {
        &self.services.settings
    }

    /// Configuration used by [`Manager::show_default`].
    #[must_use]
    pub fn default_config(&self) -> MessageConfig {
        lock(&self.defaults).clone()
    }

    pub fn set_default_config(&self, config: MessageConfig) {
        *lock(&self.defaults) = config;
    }

    // ---------------------------------------------------------------------
    // Showing
    // ---------------------------------------------------------------------

    /// Queues `view` for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn show(&self, config: MessageConfig, view: Arc<dyn MessageView>) -> Result<()> {
        let presenter = self.presenter(config, view);
        self.send_command(Command::Enqueue(presenter))
    }

    /// Queues a view built by `provider` on the UI context.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn show_with<F>(&self, config: MessageConfig, provider: F) -> Result<()>
    where
        F: FnOnce() -> Arc<dyn MessageView> + Send + 'static,
    {
        self.ensure_running()?;
        let manager = self.clone();
        self.services.main.post(move || {
            let presenter = manager.presenter(config, provider());
            if let Err(err) = manager.send_command(Command::Enqueue(presenter)) {
                tracing::debug!(%err, "provided message dropped");
            }
        });
        Ok(())
    }

    /// Queues `view` with the manager's default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn show_default(&self, view: Arc<dyn MessageView>) -> Result<()> {
        self.show(self.default_config(), view)
    }

    // ---------------------------------------------------------------------
    // Hiding
    // ---------------------------------------------------------------------

    /// Hides the message currently on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn hide(&self) -> Result<()> {
        self.send_command(Command::HideCurrent)
    }

    /// Hides or dequeues every message with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn hide_id(&self, id: impl Into<MessageId>) -> Result<()> {
        self.send_command(Command::Hide(id.into()))
    }

    /// Releases one show request for `id`, hiding it when none remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn hide_counted(&self, id: impl Into<MessageId>) -> Result<()> {
        self.send_command(Command::HideCounted(id.into()))
    }

    /// Empties the queue and hides the current message.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn hide_all(&self) -> Result<()> {
        self.send_command(Command::HideAll)
    }

    /// Same as [`Manager::hide_all`].
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub fn remove_all(&self) -> Result<()> {
        self.hide_all()
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Id of the message holding the current slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub async fn current_id(&self) -> Result<Option<MessageId>> {
        self.query(Query::CurrentId).await
    }

    /// Ids waiting in the queue, head first.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub async fn queued_ids(&self) -> Result<Vec<MessageId>> {
        self.query(Query::QueuedIds).await
    }

    /// Outstanding show requests for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub async fn count(&self, id: impl Into<MessageId>) -> Result<usize> {
        let id = id.into();
        self.query(|reply| Query::Count(id, reply)).await
    }

    /// Whether nothing is shown, queued or waiting on a show delay.
    ///
    /// # Errors
    ///
    /// Returns an error if the manager task is no longer running.
    pub async fn is_idle(&self) -> Result<bool> {
        self.query(Query::Idle).await
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    fn presenter(&self, config: MessageConfig, view: Arc<dyn MessageView>) -> Arc<Presenter> {
        Presenter::new(
            config,
            view,
            self.services.clone(),
            ManagerLink::new(&self.command_tx),
        )
    }

    fn ensure_running(&self) -> Result<()> {
        if self.command_tx.is_closed() {
            return Err(stopped());
        }
        Ok(())
    }

    fn send_command(&self, command: Command) -> Result<()> {
        self.command_tx.send(command).map_err(|_| stopped())
    }

    async fn query<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Query) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(Command::Query(make(reply_tx)))?;
        reply_rx.await.map_err(|_| stopped())
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("running", &!self.command_tx.is_closed())
            .field("settings", &self.services.settings)
            .finish_non_exhaustive()
    }
}

fn stopped() -> Error {
    Error::Io("Message manager task is not running".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{headless_manager, settle};
    use crate::view::Banner;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn new_manager_is_idle() {
        let (manager, _host) = headless_manager();
        assert!(manager.is_idle().await.unwrap());
        assert_eq!(manager.current_id().await.unwrap(), None);
        assert!(manager.queued_ids().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn show_takes_current_slot() {
        let (manager, host) = headless_manager();
        manager
            .show(MessageConfig::default(), Arc::new(Banner::new(60.0).with_id("a")))
            .unwrap();
        assert_eq!(manager.current_id().await.unwrap(), Some("a".into()));
        settle(Duration::from_millis(50)).await;
        assert_eq!(host.attached_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn show_with_builds_view_on_main_context() {
        let (manager, _host) = headless_manager();
        manager
            .show_with(MessageConfig::default(), || {
                Arc::new(Banner::new(60.0).with_id("lazy"))
            })
            .unwrap();
        settle(Duration::from_millis(10)).await;
        assert_eq!(manager.current_id().await.unwrap(), Some("lazy".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn default_config_is_replaceable() {
        let (manager, _host) = headless_manager();
        assert!(manager.default_config().ignore_duplicates);
        manager.set_default_config(MessageConfig::default().allowing_duplicates());
        assert!(!manager.default_config().ignore_duplicates);
    }

    #[tokio::test(start_paused = true)]
    async fn count_tracks_duplicate_requests() {
        let (manager, _host) = headless_manager();
        for _ in 0..3 {
            manager
                .show(MessageConfig::default(), Arc::new(Banner::new(60.0).with_id("n")))
                .unwrap();
        }
        assert_eq!(manager.count("n").await.unwrap(), 3);
        manager.hide_counted("n").unwrap();
        assert_eq!(manager.count("n").await.unwrap(), 2);
        assert_eq!(manager.current_id().await.unwrap(), Some("n".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_message_is_not_queued_until_delay_elapses() {
        let (manager, _host) = headless_manager();
        let config = MessageConfig::default().with_duration(
            crate::presentation::DisplayDuration::Indefinite {
                delay: Duration::from_millis(500),
                minimum: Duration::ZERO,
            },
        );
        manager
            .show(config, Arc::new(Banner::new(60.0).with_id("late")))
            .unwrap();
        assert_eq!(manager.current_id().await.unwrap(), None);
        assert!(!manager.is_idle().await.unwrap());
        settle(Duration::from_millis(600)).await;
        assert_eq!(manager.current_id().await.unwrap(), Some("late".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn shared_manager_installs_once() {
        let (first, _host) = headless_manager();
        let (second, _other) = headless_manager();
        // Other tests may have raced to install; only one install can win.
        let outcomes = [Manager::install_shared(first), Manager::install_shared(second)];
        assert!(outcomes.iter().filter(|outcome| outcome.is_ok()).count() <= 1);
        assert!(matches!(
            outcomes[1],
            Err(Error::Presentation(PresentationError::SharedAlreadyInstalled))
        ));
        assert!(Manager::shared().is_some());
    }
}

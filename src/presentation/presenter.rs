// SPDX-License-Identifier: MPL-2.0
//! Lifecycle of one message: install, show, hide, clean up.
//!
//! A presenter runs its transitions on the main context and reports the
//! outcomes to the manager through a weak link. It never touches queue
//! state.

use super::config::{Event, MessageConfig, PresentationStyle};
use crate::animation::{
    weak_delegate, AnimationContext, AnimationDelegate, Animator, PhysicsAnimator, Placement,
    SafeZoneConflicts, SlideEdge, TopBottomAnimator,
};
use crate::config::{Config, DIM_ANIMATION_SECS, STATUS_BAR_HEIGHT};
use crate::domain::{MessageId, PresenterKey};
use crate::error::PresentationError;
use crate::manager::ManagerLink;
use crate::runtime::{lock, MainContext};
use crate::view::{message_id, ContainerResolver, Host, Layout, MessageView, Overlay, OverlaySpec};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Where a presenter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Installing,
    Showing,
    Shown,
    Hiding,
    Hidden,
    /// No container could be found; the message was dropped.
    Failed,
}

impl Phase {
    /// Whether the message is on screen or animating.
    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Phase::Showing | Phase::Shown | Phase::Hiding)
    }
}

/// Outcome a presenter reports back to its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Report {
    Shown,
    ShowFailed,
    Hidden,
    PanStarted,
    PanEnded,
    InteractiveHide,
}

/// Collaborators shared by every presenter of a manager.
#[derive(Clone)]
pub(crate) struct Services {
    pub main: MainContext,
    pub resolver: Arc<dyn ContainerResolver>,
    pub layout: Arc<dyn Layout>,
    pub settings: Arc<Config>,
}

pub struct Presenter {
    key: PresenterKey,
    id: MessageId,
    config: MessageConfig,
    view: Arc<dyn MessageView>,
    animator: Arc<dyn Animator>,
    services: Services,
    link: ManagerLink,
    state: Mutex<PresenterState>,
}

struct PresenterState {
    phase: Phase,
    overlay: Option<Arc<Overlay>>,
    host: Option<Arc<dyn Host>>,
}

impl Presenter {
    pub(crate) fn new(
        config: MessageConfig,
        view: Arc<dyn MessageView>,
        services: Services,
        link: ManagerLink,
    ) -> Arc<Self> {
        let animator = animator_for(&config.presentation_style, &services.settings);
        Arc::new(Self {
            key: PresenterKey::new(),
            id: message_id(&view),
            config,
            view,
            animator,
            services,
            link,
            state: Mutex::new(PresenterState {
                phase: Phase::Idle,
                overlay: None,
                host: None,
            }),
        })
    }

    #[must_use]
    pub fn key(&self) -> PresenterKey {
        self.key
    }

    #[must_use]
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &MessageConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> &Arc<dyn MessageView> {
        &self.view
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        lock(&self.state).phase
    }

    /// Overlay of the current show, while installed.
    #[must_use]
    pub fn overlay(&self) -> Option<Arc<Overlay>> {
        lock(&self.state).overlay.clone()
    }

    /// Time on screen before hiding automatically, if ever.
    #[must_use]
    pub fn pause_duration(&self) -> Option<Duration> {
        self.config
            .duration
            .pause_duration(self.services.settings.automatic_duration())
    }

    #[must_use]
    pub fn delay_show(&self) -> Option<Duration> {
        self.config.duration.delay_show()
    }

    /// How long a hide requested now must wait.
    ///
    /// Interactive dismissal is never deferred.
    #[must_use]
    pub fn delay_hide(&self, shown_for: Duration, interactive: bool) -> Duration {
        if interactive {
            return Duration::ZERO;
        }
        self.config
            .duration
            .minimum_shown()
            .map_or(Duration::ZERO, |minimum| minimum.saturating_sub(shown_for))
    }

    // ---------------------------------------------------------------------
    // Transitions, run on the main context
    // ---------------------------------------------------------------------

    pub(crate) fn show(self: &Arc<Self>) -> Result<(), PresentationError> {
        {
            let mut state = lock(&self.state);
            if state.phase != Phase::Idle {
                tracing::debug!(id = %self.id, phase = ?state.phase, "show ignored");
                return Ok(());
            }
            state.phase = Phase::Installing;
        }

        let host = match self.services.resolver.resolve(&self.config.presentation_context) {
            Ok(host) => host,
            Err(err) => {
                lock(&self.state).phase = Phase::Failed;
                return Err(err);
            }
        };

        let overlay = Overlay::new(
            OverlaySpec {
                key: self.key,
                bounds: host.bounds(),
                safe_area: host.safe_area(),
                dim: self.config.dim_mode,
                dim_gray_opacity: self.services.settings.dim_gray_opacity(),
                status_bar_style: self.config.preferred_status_bar_style,
            },
            self.services.main.clone(),
            Arc::clone(&self.services.layout),
        );
        host.attach(Arc::clone(&overlay));

        let delegate = weak_delegate(self);
        if self.config.dim_mode.is_interactive() {
            overlay.set_tap_target(delegate.clone());
        }
        self.animator.set_delegate(delegate);
        let context = self.animation_context(host.as_ref(), &overlay);

        {
            let mut state = lock(&self.state);
            state.phase = Phase::Showing;
            state.overlay = Some(Arc::clone(&overlay));
            state.host = Some(host);
        }

        self.emit(Event::WillShow(self.id.clone()));
        let completion = self.animator.show(&context);
        if self.config.dim_mode.is_modal() {
            let _ = overlay.animate_dim(overlay.dim_full_opacity(), dim_duration());
        }

        let presenter = Arc::downgrade(self);
        self.services.main.on_complete(completion, move |_| {
            if let Some(presenter) = presenter.upgrade() {
                presenter.did_show();
            }
        });
        Ok(())
    }

    fn did_show(&self) {
        {
            let mut state = lock(&self.state);
            if state.phase != Phase::Showing {
                return;
            }
            state.phase = Phase::Shown;
        }
        self.emit(Event::DidShow(self.id.clone()));
        self.link.report(self.key, Report::Shown);
    }

    pub(crate) fn hide(self: &Arc<Self>) {
        let (overlay, host) = {
            let mut state = lock(&self.state);
            match (state.phase, state.overlay.clone(), state.host.clone()) {
                (Phase::Showing | Phase::Shown, Some(overlay), Some(host)) => {
                    state.phase = Phase::Hiding;
                    (overlay, host)
                }
                (phase, ..) => {
                    tracing::trace!(id = %self.id, ?phase, "hide ignored");
                    return;
                }
            }
        };

        self.emit(Event::WillHide(self.id.clone()));
        let context = self.animation_context(host.as_ref(), &overlay);
        let completion = self.animator.hide(&context);
        if self.config.dim_mode.is_modal() {
            let _ = overlay.animate_dim(0.0, dim_duration());
        }

        // An interrupted hide still counts as hidden.
        let presenter = Arc::clone(self);
        self.services
            .main
            .on_complete(completion, move |_| presenter.did_hide());
    }

    fn did_hide(&self) {
        let host = {
            let mut state = lock(&self.state);
            if state.phase != Phase::Hiding {
                return;
            }
            state.phase = Phase::Hidden;
            state.overlay = None;
            state.host.take()
        };
        if let Some(host) = host {
            host.detach(self.key);
        }
        self.emit(Event::DidHide(self.id.clone()));
        self.link.report(self.key, Report::Hidden);
    }

    fn animation_context(&self, host: &dyn Host, overlay: &Arc<Overlay>) -> AnimationContext {
        AnimationContext {
            message_view: Arc::clone(&self.view),
            container: Arc::clone(overlay),
            safe_zone_conflicts: safe_zone_conflicts(host),
            interactive_hide: self.config.interactive_hide,
        }
    }

    fn emit(&self, event: Event) {
        tracing::trace!(?event, "lifecycle event");
        for listener in &self.config.event_listeners {
            listener(&event);
        }
    }
}

impl AnimationDelegate for Presenter {
    fn hide(&self) {
        self.link.report(self.key, Report::InteractiveHide);
    }

    fn pan_started(&self) {
        self.link.report(self.key, Report::PanStarted);
    }

    fn pan_ended(&self) {
        self.link.report(self.key, Report::PanEnded);
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn animator_for(style: &PresentationStyle, settings: &Config) -> Arc<dyn Animator> {
    match style {
        PresentationStyle::Top => Arc::new(TopBottomAnimator::new(
            SlideEdge::Top,
            settings.edge_tuning(),
        )),
        PresentationStyle::Bottom => Arc::new(TopBottomAnimator::new(
            SlideEdge::Bottom,
            settings.edge_tuning(),
        )),
        PresentationStyle::Center => Arc::new(PhysicsAnimator::new(
            Placement::Center,
            settings.physics_tuning(),
        )),
        PresentationStyle::Custom(animator) => Arc::clone(animator),
    }
}

/// Screen regions a message in `host` may overlap.
pub(crate) fn safe_zone_conflicts(host: &dyn Host) -> SafeZoneConflicts {
    let safe_area = host.safe_area();
    if host.level().is_above_normal() {
        if (safe_area.top - STATUS_BAR_HEIGHT).abs() < f32::EPSILON {
            return SafeZoneConflicts::OVER_STATUS_BAR;
        }
        let mut conflicts = SafeZoneConflicts::SENSOR_NOTCH;
        if safe_area.bottom > 0.0 {
            conflicts |= SafeZoneConflicts::HOME_INDICATOR;
        }
        return conflicts;
    }
    let mut conflicts = SafeZoneConflicts::empty();
    if !host.under_navigation_bar() {
        conflicts |= SafeZoneConflicts::SENSOR_NOTCH | SafeZoneConflicts::STATUS_BAR;
    }
    if !host.under_tab_bar() {
        conflicts |= SafeZoneConflicts::HOME_INDICATOR;
    }
    conflicts
}

fn dim_duration() -> Duration {
    Duration::from_secs_f64(DIM_ANIMATION_SECS)
}

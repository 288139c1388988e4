// SPDX-License-Identifier: MPL-2.0
//! Scale and fade in place, with a throwable drag.

use super::pan::{PanGesture, PanRecognizer, PhysicsPanHandler, PhysicsPanStep};
use super::{AnimationContext, AnimationDelegate, Animator, Appearance, Curve, PhysicsTuning};
use crate::config::{
    FRAME_INTERVAL_MS, PHYSICS_RESTORE_DAMPING, PHYSICS_RESTORE_DURATION_SECS,
    PHYSICS_SHOW_DAMPING,
};
use crate::runtime::{lock, Completion, MainContext};
use crate::view::{default_margin_adjustment, Anchor, Constraint, Edge, Overlay};
use iced_core::Point;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const SHOW_FROM: Appearance = Appearance {
    translation: iced_core::Vector { x: 0.0, y: 0.0 },
    scale: 0.6,
    rotation: 0.0,
    alpha: 0.25,
};

const HIDE_SCALE: f32 = 0.8;

/// Vertical position of a [`PhysicsAnimator`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Grows and fades a message in at its placement, shrinks and fades it out.
///
/// While dragged the view hangs from the finger and swings; a hard enough
/// throw sends it off screen before the hide is requested.
pub struct PhysicsAnimator {
    inner: Arc<PhysicsInner>,
}

struct PhysicsInner {
    me: Weak<PhysicsInner>,
    placement: Placement,
    tuning: PhysicsTuning,
    pan: PhysicsPanHandler,
    delegate: Mutex<Option<Weak<dyn AnimationDelegate>>>,
    session: Mutex<Option<Session>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Clone)]
struct Session {
    container: Weak<Overlay>,
    rest_center: Point,
}

impl PhysicsAnimator {
    #[must_use]
    pub fn new(placement: Placement, tuning: PhysicsTuning) -> Self {
        Self {
            inner: Arc::new_cyclic(|me| PhysicsInner {
                me: me.clone(),
                placement,
                tuning,
                pan: PhysicsPanHandler::new(tuning.fling),
                delegate: Mutex::new(None),
                session: Mutex::new(None),
                ticker: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.inner.placement
    }
}

impl Default for PhysicsAnimator {
    fn default() -> Self {
        Self::new(Placement::default(), PhysicsTuning::default())
    }
}

impl PhysicsInner {
    fn delegate(&self) -> Option<Arc<dyn AnimationDelegate>> {
        lock(&self.delegate).as_ref().and_then(Weak::upgrade)
    }

    fn constraints(&self) -> [Constraint; 3] {
        let vertical = match self.placement {
            Placement::Top => Constraint::absolute(Edge::Top, 0.0).to(Anchor::Margin),
            Placement::Center => Constraint::absolute(Edge::CenterY, 0.0),
            Placement::Bottom => Constraint::absolute(Edge::Bottom, 0.0).to(Anchor::Margin),
        };
        [
            Constraint::absolute(Edge::Leading, 0.0).to(Anchor::Margin),
            Constraint::absolute(Edge::Trailing, 0.0).to(Anchor::Margin),
            vertical,
        ]
    }

    fn stop_ticker(&self) {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.abort();
        }
    }

    /// Ticks the drag simulation until the drag ends.
    fn start_ticker(&self, main: MainContext) {
        let inner = self.me.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
            interval.tick().await;
            let mut last = Instant::now();
            loop {
                interval.tick().await;
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                if !inner.pan.is_active() {
                    break;
                }
                let now = Instant::now();
                let dt = now.saturating_duration_since(last).as_secs_f32();
                last = now;
                main.post(move || inner.frame(dt));
            }
        });
        if let Some(previous) = lock(&self.ticker).replace(handle) {
            previous.abort();
        }
    }

    /// Applies one simulation step to the view.
    fn frame(&self, dt: f32) {
        let Some(container) = lock(&self.session)
            .as_ref()
            .and_then(|session| session.container.upgrade())
        else {
            return;
        };
        let Some(appearance) = self.pan.tick(dt) else {
            return;
        };
        container.set_appearance(appearance);
        if !self.pan.is_off_screen() && !container.is_on_screen() {
            self.pan.mark_off_screen();
            tracing::debug!("message left the container, hiding");
            if let Some(delegate) = self.delegate() {
                delegate.hide();
            }
        }
    }
}

impl Animator for PhysicsAnimator {
    fn show(&self, context: &AnimationContext) -> Completion {
        let inner = &self.inner;
        inner.stop_ticker();
        inner.pan.reset();

        let container = &context.container;
        if let Some(adjustable) = context.message_view.margin_adjustable() {
            container.set_layout_margins(default_margin_adjustment(adjustable, context));
        }
        let frame = container.install(Arc::clone(&context.message_view), &inner.constraints());
        if context.interactive_hide {
            let recognizer: Weak<PhysicsInner> = inner.me.clone();
            container.set_pan_target(recognizer);
        }
        *lock(&inner.session) = Some(Session {
            container: Arc::downgrade(container),
            rest_center: frame.center(),
        });

        tracing::trace!(placement = ?inner.placement, "scaling in");
        container.set_appearance(SHOW_FROM);
        container.animate(
            Appearance::IDENTITY,
            inner.tuning.show_duration,
            Curve::Spring {
                damping: PHYSICS_SHOW_DAMPING,
            },
        )
    }

    fn hide(&self, context: &AnimationContext) -> Completion {
        let inner = &self.inner;
        let off_screen = inner.pan.is_off_screen();
        inner.stop_ticker();
        inner.pan.reset();

        let container = &context.container;
        let current = container.appearance();
        let hidden = Appearance {
            scale: HIDE_SCALE,
            alpha: 0.0,
            ..current
        };
        if off_screen {
            tracing::trace!("message already off screen");
            container.set_appearance(Appearance { alpha: 0.0, ..current });
            return Completion::ready(true);
        }
        tracing::trace!(placement = ?inner.placement, "scaling out");
        container.animate(hidden, inner.tuning.hide_duration, Curve::EaseIn)
    }

    fn set_delegate(&self, delegate: Weak<dyn AnimationDelegate>) {
        *lock(&self.inner.delegate) = Some(delegate);
    }
}

impl PanRecognizer for PhysicsInner {
    fn pan(&self, gesture: &PanGesture) {
        let Some(session) = lock(&self.session).clone() else {
            return;
        };
        let Some(container) = session.container.upgrade() else {
            return;
        };
        match self.pan.handle(gesture, session.rest_center, Instant::now()) {
            PhysicsPanStep::Ignore | PhysicsPanStep::Tracking => {}
            PhysicsPanStep::Started => {
                if let Some(delegate) = self.delegate() {
                    delegate.pan_started();
                }
                self.start_ticker(container.main_context().clone());
            }
            PhysicsPanStep::Fling {
                velocity,
                angular_velocity,
            } => {
                tracing::debug!(?velocity, angular_velocity, "message flung");
                let delegate = lock(&self.delegate).clone();
                container
                    .main_context()
                    .post_after(self.tuning.hide_delay, move || {
                        if let Some(delegate) = delegate.as_ref().and_then(Weak::upgrade) {
                            delegate.hide();
                        }
                    });
            }
            PhysicsPanStep::Restore => {
                self.stop_ticker();
                if let Some(delegate) = self.delegate() {
                    delegate.pan_ended();
                }
                let _ = container.animate(
                    Appearance::IDENTITY,
                    Duration::from_secs_f64(PHYSICS_RESTORE_DURATION_SECS),
                    Curve::Spring {
                        damping: PHYSICS_RESTORE_DAMPING,
                    },
                );
            }
        }
    }
}

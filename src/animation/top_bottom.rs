// SPDX-License-Identifier: MPL-2.0
//! Slide in from the top or bottom edge.

use super::pan::{EdgePanHandler, EdgePanStep, PanGesture, PanRecognizer};
use super::{
    AnimationContext, AnimationDelegate, Animator, Appearance, Curve, EdgeTuning,
};
use crate::config::DEFAULT_BOUNCE_OFFSET;
use crate::runtime::{lock, Completion};
use crate::view::{default_margin_adjustment, is_inset, Constraint, Edge, Overlay};
use std::sync::{Arc, Mutex, Weak};

/// Edge a [`TopBottomAnimator`] attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideEdge {
    Top,
    Bottom,
}

impl SlideEdge {
    /// Sign of the vertical direction pointing off screen through this edge.
    #[must_use]
    pub fn outward(self) -> f32 {
        match self {
            SlideEdge::Top => -1.0,
            SlideEdge::Bottom => 1.0,
        }
    }

    fn layout_edge(self) -> Edge {
        match self {
            SlideEdge::Top => Edge::Top,
            SlideEdge::Bottom => Edge::Bottom,
        }
    }
}

/// Slides a full-width message in from an edge with a spring and out with
/// an ease-in.
///
/// The view is placed `bounce_animation_offset` points past the edge so the
/// spring's overshoot never uncovers a gap. Dragging it towards the edge
/// dismisses it.
pub struct TopBottomAnimator {
    inner: Arc<EdgeInner>,
}

struct EdgeInner {
    edge: SlideEdge,
    tuning: EdgeTuning,
    pan: EdgePanHandler,
    delegate: Mutex<Option<Weak<dyn AnimationDelegate>>>,
    session: Mutex<Option<Session>>,
}

/// Geometry of the current installation.
#[derive(Clone)]
struct Session {
    container: Weak<Overlay>,
    /// Distance between rest and fully hidden.
    travel: f32,
    background_inset: bool,
}

impl TopBottomAnimator {
    #[must_use]
    pub fn new(edge: SlideEdge, tuning: EdgeTuning) -> Self {
        Self {
            inner: Arc::new(EdgeInner {
                edge,
                tuning,
                pan: EdgePanHandler::new(edge, tuning.thresholds),
                delegate: Mutex::new(None),
                session: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn top() -> Self {
        Self::new(SlideEdge::Top, EdgeTuning::default())
    }

    #[must_use]
    pub fn bottom() -> Self {
        Self::new(SlideEdge::Bottom, EdgeTuning::default())
    }

    #[must_use]
    pub fn edge(&self) -> SlideEdge {
        self.inner.edge
    }
}

impl EdgeInner {
    fn hidden(&self, travel: f32) -> Appearance {
        Appearance::translated(0.0, travel * self.edge.outward())
    }

    fn delegate(&self) -> Option<Arc<dyn AnimationDelegate>> {
        lock(&self.delegate).as_ref().and_then(Weak::upgrade)
    }

    fn spring(&self) -> Curve {
        Curve::Spring {
            damping: self.tuning.spring_damping,
        }
    }

    fn install(self: &Arc<Self>, context: &AnimationContext) -> Session {
        let container = &context.container;
        let view = &context.message_view;
        let adjustable = view.margin_adjustable();
        let bounce = adjustable.map_or(DEFAULT_BOUNCE_OFFSET, |a| a.bounce_animation_offset());

        if let Some(adjustable) = adjustable {
            let mut margins = default_margin_adjustment(adjustable, context);
            match self.edge {
                SlideEdge::Top => margins.top += bounce,
                SlideEdge::Bottom => margins.bottom += bounce,
            }
            container.set_layout_margins(margins);
        }

        let frame = container.install(
            Arc::clone(view),
            &[
                Constraint::absolute(Edge::Leading, 0.0),
                Constraint::absolute(Edge::Trailing, 0.0),
                Constraint::absolute(self.edge.layout_edge(), -bounce),
            ],
        );
        let background_inset = view
            .background_viewable()
            .is_some_and(|background| is_inset(frame.size(), background.background_frame(frame.size())));

        if context.interactive_hide {
            let recognizer: Weak<EdgeInner> = Arc::downgrade(self);
            container.set_pan_target(recognizer);
        }

        let session = Session {
            container: Arc::downgrade(container),
            travel: (frame.height - bounce).max(0.0),
            background_inset,
        };
        *lock(&self.session) = Some(session.clone());
        session
    }
}

impl Animator for TopBottomAnimator {
    fn show(&self, context: &AnimationContext) -> Completion {
        let inner = &self.inner;
        inner.pan.reset();
        let session = inner.install(context);
        context.container.set_appearance(inner.hidden(session.travel));
        tracing::trace!(edge = ?inner.edge, travel = session.travel, "sliding in");
        context
            .container
            .animate(Appearance::IDENTITY, inner.tuning.show_duration, inner.spring())
    }

    fn hide(&self, context: &AnimationContext) -> Completion {
        let inner = &self.inner;
        inner.pan.reset();
        let travel = lock(&inner.session)
            .as_ref()
            .map_or(context.container.frame().height, |session| session.travel);
        tracing::trace!(edge = ?inner.edge, "sliding out");
        context
            .container
            .animate(inner.hidden(travel), inner.tuning.hide_duration, Curve::EaseIn)
    }

    fn set_delegate(&self, delegate: Weak<dyn AnimationDelegate>) {
        *lock(&self.inner.delegate) = Some(delegate);
    }
}

impl PanRecognizer for EdgeInner {
    fn pan(&self, gesture: &PanGesture) {
        let Some(session) = lock(&self.session).clone() else {
            return;
        };
        let Some(container) = session.container.upgrade() else {
            return;
        };
        match self.pan.handle(gesture, session.travel, session.background_inset) {
            EdgePanStep::Ignore => {}
            EdgePanStep::Started(offset) => {
                if let Some(delegate) = self.delegate() {
                    delegate.pan_started();
                }
                container.set_appearance(Appearance::translated(0.0, offset));
            }
            EdgePanStep::Moved(offset) => {
                container.set_appearance(Appearance::translated(0.0, offset));
            }
            EdgePanStep::Dismiss => {
                tracing::debug!(edge = ?self.edge, "drag dismissed message");
                if let Some(delegate) = self.delegate() {
                    delegate.hide();
                }
            }
            EdgePanStep::Restore => {
                let completion =
                    container.animate(Appearance::IDENTITY, self.tuning.show_duration, self.spring());
                let delegate = lock(&self.delegate).clone();
                container.main_context().on_complete(completion, move |_| {
                    if let Some(delegate) = delegate.as_ref().and_then(Weak::upgrade) {
                        delegate.pan_ended();
                    }
                });
            }
        }
    }
}

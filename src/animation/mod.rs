// SPDX-License-Identifier: MPL-2.0
//! Show/hide transitions and interactive dismissal.
//!
//! An [`Animator`] installs a message view into the per-show [`Overlay`] and
//! drives its [`Appearance`] in and out. Both transitions hand back a
//! [`Completion`] that resolves exactly once. Animators talk back to their
//! presenter only through a weak [`AnimationDelegate`] handle.
//!
//! Two animators ship with the crate:
//!
//! - [`TopBottomAnimator`] slides from an edge and dismisses on drag.
//! - [`PhysicsAnimator`] scales and fades in place and can be flung away.

pub mod integrator;
pub mod pan;
mod physics;
mod top_bottom;
mod transition;

pub use physics::{PhysicsAnimator, Placement};
pub use top_bottom::{SlideEdge, TopBottomAnimator};
pub use transition::{Appearance, Curve, Lerp};
pub(crate) use transition::Track;

use crate::runtime::Completion;
use crate::view::{MessageView, Overlay};
use bitflags::bitflags;
use pan::{DismissThresholds, FlingThresholds};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Pluggable show/hide transition.
///
/// Implementations must resolve every returned [`Completion`] exactly once,
/// including when a transition is interrupted. `hide` may be called before
/// the `show` transition finished and must start from the current visual
/// state.
pub trait Animator: Send + Sync {
    /// Installs `context.message_view` into `context.container` and animates
    /// it in.
    fn show(&self, context: &AnimationContext) -> Completion;

    /// Animates the installed view out.
    fn hide(&self, context: &AnimationContext) -> Completion;

    /// Sets the back-channel used for interactive dismissal.
    fn set_delegate(&self, delegate: Weak<dyn AnimationDelegate>);
}

/// Listener an animator reports gesture outcomes to.
pub trait AnimationDelegate: Send + Sync {
    /// The user dismissed the message interactively.
    fn hide(&self);

    /// A drag began; automatic hiding should be suspended.
    fn pan_started(&self);

    /// A drag ended without dismissing; automatic hiding may resume.
    fn pan_ended(&self);
}

bitflags! {
    /// Screen regions the message may overlap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SafeZoneConflicts: u8 {
        /// The sensor housing at the top of the screen.
        const SENSOR_NOTCH = 1 << 0;
        const STATUS_BAR = 1 << 1;
        /// The home indicator at the bottom of the screen.
        const HOME_INDICATOR = 1 << 2;
        /// The message sits in a window above a legacy status bar.
        const OVER_STATUS_BAR = 1 << 3;
    }
}

/// Everything an animator needs for one show or hide call.
///
/// Built fresh for every call and never mutated.
#[derive(Clone)]
pub struct AnimationContext {
    pub message_view: Arc<dyn MessageView>,
    pub container: Arc<Overlay>,
    pub safe_zone_conflicts: SafeZoneConflicts,
    pub interactive_hide: bool,
}

impl fmt::Debug for AnimationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationContext")
            .field("container", &self.container.key())
            .field("safe_zone_conflicts", &self.safe_zone_conflicts)
            .field("interactive_hide", &self.interactive_hide)
            .finish_non_exhaustive()
    }
}

/// Timings and dismiss thresholds of [`TopBottomAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeTuning {
    pub show_duration: Duration,
    pub hide_duration: Duration,
    pub spring_damping: f32,
    pub thresholds: DismissThresholds,
}

impl Default for EdgeTuning {
    fn default() -> Self {
        crate::config::Config::default().edge_tuning()
    }
}

/// Timings and fling thresholds of [`PhysicsAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsTuning {
    pub show_duration: Duration,
    pub hide_duration: Duration,
    /// Grace period between a fling and the hide request.
    pub hide_delay: Duration,
    pub fling: FlingThresholds,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        crate::config::Config::default().physics_tuning()
    }
}

/// Upcasts a concrete delegate handle.
pub(crate) fn weak_delegate<T: AnimationDelegate + 'static>(
    delegate: &Arc<T>,
) -> Weak<dyn AnimationDelegate> {
    let weak: Weak<T> = Arc::downgrade(delegate);
    weak
}

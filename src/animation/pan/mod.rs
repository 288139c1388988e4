// SPDX-License-Identifier: MPL-2.0
//! Drag-to-dismiss gesture handling.
//!
//! Hosts forward drags on a message view as [`PanGesture`]s through
//! [`Overlay::pan`](crate::view::Overlay::pan). The animator that installed
//! the view registers a [`PanRecognizer`] to receive them.

mod edge;
mod physics;

pub use edge::{EdgePanHandler, EdgePanStep};
pub use physics::{PhysicsPanHandler, PhysicsPanStep};

use crate::domain::ClosePercent;
use iced_core::{Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One sample of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub phase: PanPhase,
    /// Finger position in container coordinates.
    pub location: Point,
    /// Finger travel since the gesture began.
    pub translation: Vector,
    /// Finger velocity in points per second.
    pub velocity: Vector,
}

impl PanGesture {
    #[must_use]
    pub fn new(phase: PanPhase, location: Point, translation: Vector, velocity: Vector) -> Self {
        Self {
            phase,
            location,
            translation,
            velocity,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, PanPhase::Ended | PanPhase::Cancelled)
    }
}

/// Receiver of drags forwarded by an overlay.
pub trait PanRecognizer: Send + Sync {
    fn pan(&self, gesture: &PanGesture);
}

/// When releasing an edge-attached drag dismisses the message.
///
/// Any single threshold suffices, so flicks, long swipes and slow drags all
/// qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissThresholds {
    /// Release speed towards the edge, points per second.
    pub speed: f32,
    /// Travel towards the edge as a fraction of the view height.
    pub percent: ClosePercent,
    /// Travel towards the edge in points.
    pub absolute: f32,
}

impl DismissThresholds {
    /// `travel` and `speed` are measured towards the attachment edge.
    #[must_use]
    pub fn should_dismiss(&self, travel: f32, speed: f32, height: f32) -> bool {
        let percent = if height > 0.0 { travel / height } else { 0.0 };
        speed >= self.speed || percent >= self.percent.value() || travel >= self.absolute
    }
}

impl Default for DismissThresholds {
    fn default() -> Self {
        crate::config::Config::default().edge_tuning().thresholds
    }
}

/// When releasing a physics drag flings the message away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingThresholds {
    /// Minimum combined linear and angular escape energy.
    pub energy: f32,
    /// Minimum linear speed, points per second.
    pub speed: f32,
}

impl FlingThresholds {
    #[must_use]
    pub fn is_fling(&self, energy: f32, speed: f32) -> bool {
        energy > self.energy && speed > self.speed
    }
}

impl Default for FlingThresholds {
    fn default() -> Self {
        crate::config::Config::default().physics_tuning().fling
    }
}

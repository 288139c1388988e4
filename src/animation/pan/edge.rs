// SPDX-License-Identifier: MPL-2.0
//! Drag handling for edge-attached messages.

use super::{DismissThresholds, PanGesture, PanPhase};
use crate::animation::SlideEdge;
use crate::config::RUBBER_BAND_EXPONENT;
use crate::runtime::lock;
use std::sync::Mutex;

/// What the animator should do with one drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePanStep {
    Ignore,
    /// The drag engaged. Suspend auto-hide and move the view by the vertical
    /// offset.
    Started(f32),
    /// Move the view by the vertical offset from its resting position.
    Moved(f32),
    Dismiss,
    /// Spring back to rest, then resume auto-hide.
    Restore,
}

#[derive(Debug, Default)]
struct EdgePanState {
    closing: bool,
    rubber_banding: bool,
}

/// Tracks one drag of an edge-attached view.
///
/// The drag engages on the first movement towards the attachment edge.
/// Wrong-way movement rubber-bands when the view's visible background is
/// inset from its bounds and is clamped to zero otherwise.
#[derive(Debug)]
pub struct EdgePanHandler {
    edge: SlideEdge,
    thresholds: DismissThresholds,
    state: Mutex<EdgePanState>,
}

impl EdgePanHandler {
    #[must_use]
    pub fn new(edge: SlideEdge, thresholds: DismissThresholds) -> Self {
        Self {
            edge,
            thresholds,
            state: Mutex::new(EdgePanState::default()),
        }
    }

    pub fn is_closing(&self) -> bool {
        lock(&self.state).closing
    }

    pub fn reset(&self) {
        *lock(&self.state) = EdgePanState::default();
    }

    /// Processes one sample.
    ///
    /// `travel` is the distance the view moves between rest and fully
    /// hidden. `background_inset` enables rubber-banding.
    pub fn handle(&self, gesture: &PanGesture, travel: f32, background_inset: bool) -> EdgePanStep {
        // Positive values point towards the attachment edge.
        let sign = self.edge.outward();
        let toward = gesture.translation.y * sign;
        let speed = gesture.velocity.y * sign;

        let mut state = lock(&self.state);
        match gesture.phase {
            PanPhase::Began => EdgePanStep::Ignore,
            PanPhase::Changed => {
                if travel <= 0.0 {
                    return EdgePanStep::Ignore;
                }
                let mut amount = if toward >= 0.0 {
                    toward
                } else {
                    -toward.abs().powf(RUBBER_BAND_EXPONENT)
                };
                let started = !state.closing;
                if started {
                    state.rubber_banding = background_inset;
                    if !state.rubber_banding && amount < 0.0 {
                        return EdgePanStep::Ignore;
                    }
                    state.closing = true;
                }
                if !state.rubber_banding && amount < 0.0 {
                    amount = 0.0;
                }
                let offset = amount * sign;
                if started {
                    EdgePanStep::Started(offset)
                } else {
                    EdgePanStep::Moved(offset)
                }
            }
            PanPhase::Ended | PanPhase::Cancelled => {
                if !state.closing {
                    return EdgePanStep::Ignore;
                }
                *state = EdgePanState::default();
                if self.thresholds.should_dismiss(toward, speed, travel) {
                    EdgePanStep::Dismiss
                } else {
                    EdgePanStep::Restore
                }
            }
        }
    }
}

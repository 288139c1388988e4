// SPDX-License-Identifier: MPL-2.0
//! Drag handling for freely placed messages.
//!
//! While held, the view hangs from the finger on a [`Pin`] and is simulated
//! by the [`Integrator`], so grabbing it off center makes it swing. On
//! release a fast enough throw flings it away with capped residual
//! velocity; anything slower springs it back to rest.

use super::{FlingThresholds, PanGesture, PanPhase};
use crate::animation::integrator::{Body, Integrator, Pin};
use crate::animation::Appearance;
use crate::config::{
    ANGULAR_ENERGY_FACTOR, ANGULAR_SNAPSHOT_WINDOW_SECS, MAX_ESCAPE_ANGULAR_VELOCITY,
    MAX_ESCAPE_SPEED,
};
use crate::runtime::lock;
use iced_core::{Point, Vector};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// What the animator should do with one drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsPanStep {
    Ignore,
    /// Suspend auto-hide and start ticking the simulation.
    Started,
    Tracking,
    /// The view was thrown. Keep ticking and hide after the grace delay.
    Fling {
        velocity: Vector,
        angular_velocity: f32,
    },
    /// Spring back to rest, then resume auto-hide.
    Restore,
}

#[derive(Debug, Clone, Copy)]
struct AngleSnapshot {
    at: Instant,
    angle: f32,
}

#[derive(Debug)]
struct Drag {
    rest_center: Point,
    body: Body,
    pin: Option<Pin>,
    snapshots: VecDeque<AngleSnapshot>,
}

impl Drag {
    fn record(&mut self, at: Instant) {
        self.snapshots.push_back(AngleSnapshot {
            at,
            angle: self.body.angle,
        });
        let window = Duration::from_secs_f64(ANGULAR_SNAPSHOT_WINDOW_SECS);
        while self.snapshots.len() > 1
            && self
                .snapshots
                .front()
                .is_some_and(|first| at.saturating_duration_since(first.at) > window)
        {
            self.snapshots.pop_front();
        }
    }

    /// Angular velocity over the snapshot window, zero when degenerate.
    fn angular_velocity(&self) -> f32 {
        let Some(last) = self.snapshots.back() else {
            return 0.0;
        };
        self.snapshots
            .iter()
            .rev()
            .skip(1)
            .find(|previous| previous.at != last.at && previous.angle != last.angle)
            .map_or(0.0, |previous| {
                let dt = last.at.saturating_duration_since(previous.at).as_secs_f32();
                if dt > 0.0 {
                    (last.angle - previous.angle) / dt
                } else {
                    0.0
                }
            })
    }
}

#[derive(Debug, Default)]
struct PhysicsPanState {
    drag: Option<Drag>,
    off_screen: bool,
}

#[derive(Debug)]
pub struct PhysicsPanHandler {
    fling: FlingThresholds,
    integrator: Integrator,
    state: Mutex<PhysicsPanState>,
}

impl PhysicsPanHandler {
    #[must_use]
    pub fn new(fling: FlingThresholds) -> Self {
        Self {
            fling,
            integrator: Integrator::default(),
            state: Mutex::new(PhysicsPanState::default()),
        }
    }

    /// Whether a held or flung view is being simulated.
    pub fn is_active(&self) -> bool {
        lock(&self.state).drag.is_some()
    }

    /// Whether a flung view has left the container.
    pub fn is_off_screen(&self) -> bool {
        lock(&self.state).off_screen
    }

    pub fn mark_off_screen(&self) {
        lock(&self.state).off_screen = true;
    }

    pub fn reset(&self) {
        *lock(&self.state) = PhysicsPanState::default();
    }

    /// Processes one sample for a view resting at `rest_center`.
    pub fn handle(&self, gesture: &PanGesture, rest_center: Point, now: Instant) -> PhysicsPanStep {
        let mut state = lock(&self.state);
        match gesture.phase {
            PanPhase::Began => {
                let body = Body::at_rest(rest_center);
                let mut drag = Drag {
                    rest_center,
                    body,
                    pin: Some(Pin {
                        offset: Vector::new(
                            gesture.location.x - rest_center.x,
                            gesture.location.y - rest_center.y,
                        ),
                        anchor: gesture.location,
                    }),
                    snapshots: VecDeque::new(),
                };
                drag.record(now);
                state.drag = Some(drag);
                state.off_screen = false;
                PhysicsPanStep::Started
            }
            PanPhase::Changed => match state.drag.as_mut() {
                Some(drag) => {
                    if let Some(pin) = drag.pin.as_mut() {
                        pin.anchor = gesture.location;
                    }
                    drag.record(now);
                    PhysicsPanStep::Tracking
                }
                None => PhysicsPanStep::Ignore,
            },
            PanPhase::Ended | PanPhase::Cancelled => {
                let Some(drag) = state.drag.as_mut() else {
                    return PhysicsPanStep::Ignore;
                };
                let velocity = gesture.velocity;
                let speed = velocity.x.hypot(velocity.y);
                let angular_velocity = drag.angular_velocity();
                let energy = speed.hypot(angular_velocity * ANGULAR_ENERGY_FACTOR);
                if self.fling.is_fling(energy, speed) {
                    let speed_scale = if speed > 0.0 {
                        (MAX_ESCAPE_SPEED / speed).min(1.0)
                    } else {
                        1.0
                    };
                    let escape = Vector::new(velocity.x * speed_scale, velocity.y * speed_scale);
                    let escape_angular = if angular_velocity != 0.0 {
                        angular_velocity
                            * (MAX_ESCAPE_ANGULAR_VELOCITY / angular_velocity.abs()).min(1.0)
                    } else {
                        0.0
                    };
                    drag.pin = None;
                    drag.body.velocity = escape;
                    drag.body.angular_velocity = escape_angular;
                    PhysicsPanStep::Fling {
                        velocity: escape,
                        angular_velocity: escape_angular,
                    }
                } else {
                    state.drag = None;
                    PhysicsPanStep::Restore
                }
            }
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Returns the view's appearance relative to rest, or `None` when no
    /// drag is being simulated.
    pub fn tick(&self, dt: f32) -> Option<Appearance> {
        let mut state = lock(&self.state);
        let drag = state.drag.as_mut()?;
        self.integrator.step(&mut drag.body, drag.pin.as_ref(), dt);
        let offset = drag.body.offset_from(drag.rest_center);
        Some(Appearance {
            translation: offset,
            rotation: drag.body.angle,
            ..Appearance::IDENTITY
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    const REST: Point = Point { x: 150.0, y: 300.0 };

    fn sample(phase: PanPhase, location: Point, velocity: Vector) -> PanGesture {
        PanGesture::new(
            phase,
            location,
            Vector::new(location.x - REST.x, location.y - REST.y),
            velocity,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn slow_release_restores() {
        let handler = PhysicsPanHandler::new(FlingThresholds::default());
        let now = Instant::now();
        assert_eq!(
            handler.handle(&sample(PanPhase::Began, REST, Vector::new(0.0, 0.0)), REST, now),
            PhysicsPanStep::Started
        );
        let moved = Point::new(REST.x + 20.0, REST.y);
        handler.handle(&sample(PanPhase::Changed, moved, Vector::new(0.0, 0.0)), REST, now);
        assert_eq!(
            handler.handle(
                &sample(PanPhase::Ended, moved, Vector::new(100.0, 0.0)),
                REST,
                now
            ),
            PhysicsPanStep::Restore
        );
        assert!(!handler.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn fast_throw_flings_with_capped_speed() {
        let handler = PhysicsPanHandler::new(FlingThresholds::default());
        let now = Instant::now();
        handler.handle(&sample(PanPhase::Began, REST, Vector::new(0.0, 0.0)), REST, now);
        let step = handler.handle(
            &sample(PanPhase::Ended, REST, Vector::new(0.0, 3600.0)),
            REST,
            now,
        );
        match step {
            PhysicsPanStep::Fling { velocity, .. } => {
                assert_abs_diff_eq!(velocity.y, MAX_ESCAPE_SPEED, epsilon = 1e-3);
            }
            other => panic!("expected fling, got {other:?}"),
        }
        assert!(handler.is_active());
        let appearance = handler.tick(0.1).expect("flung view keeps simulating");
        assert_abs_diff_eq!(appearance.translation.y, 180.0, epsilon = 1e-2);
    }

    #[tokio::test(start_paused = true)]
    async fn off_center_grab_swings_and_reports_angular_velocity() {
        let handler = PhysicsPanHandler::new(FlingThresholds::default());
        let grab = Point::new(REST.x + 100.0, REST.y);
        handler.handle(&sample(PanPhase::Began, grab, Vector::new(0.0, 0.0)), REST, Instant::now());
        let pulled = Point::new(grab.x, grab.y + 60.0);
        for _ in 0..3 {
            tokio::time::advance(Duration::from_millis(16)).await;
            handler.handle(&sample(PanPhase::Changed, pulled, Vector::new(0.0, 0.0)), REST, Instant::now());
            handler.tick(0.016);
        }
        let appearance = handler.tick(0.0).expect("drag active");
        assert!(appearance.rotation > 0.0);
        let state = lock(&handler.state);
        let drag = state.drag.as_ref().expect("drag active");
        assert!(drag.angular_velocity() > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn identical_snapshots_give_zero_angular_velocity() {
        let handler = PhysicsPanHandler::new(FlingThresholds::default());
        let now = Instant::now();
        handler.handle(&sample(PanPhase::Began, REST, Vector::new(0.0, 0.0)), REST, now);
        handler.handle(&sample(PanPhase::Changed, REST, Vector::new(0.0, 0.0)), REST, now);
        let state = lock(&handler.state);
        assert_eq!(state.drag.as_ref().map(Drag::angular_velocity), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn changes_without_a_drag_are_ignored() {
        let handler = PhysicsPanHandler::new(FlingThresholds::default());
        let still = Vector::new(0.0, 0.0);
        assert_eq!(
            handler.handle(&sample(PanPhase::Changed, REST, still), REST, Instant::now()),
            PhysicsPanStep::Ignore
        );
        assert!(handler.tick(0.016).is_none());
    }
}

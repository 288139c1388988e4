// SPDX-License-Identifier: MPL-2.0
//! Interruptible, timed transitions.
//!
//! A [`Track`] holds the model value of one animatable property plus the
//! transition currently moving it. Starting a new transition samples the
//! current presentation value first, so every transition begins from where
//! the property visibly is, and the superseded transition's completion
//! resolves as unfinished.

use crate::runtime::{completion, Completer, Completion};
use iced_core::Vector;
use std::f32::consts::PI;
use std::time::Duration;
use tokio::time::Instant;

/// Values that can be interpolated.
pub trait Lerp: Copy {
    /// Interpolates from `self` towards `to`. `t` may leave `[0, 1]` when a
    /// curve overshoots.
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// Visual state of an installed message view relative to its resting frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub translation: Vector,
    pub scale: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub alpha: f32,
}

impl Appearance {
    /// Resting state: no offset, full size, upright, opaque.
    pub const IDENTITY: Self = Self {
        translation: Vector { x: 0.0, y: 0.0 },
        scale: 1.0,
        rotation: 0.0,
        alpha: 1.0,
    };

    /// Identity shifted by `(x, y)`.
    #[must_use]
    pub fn translated(x: f32, y: f32) -> Self {
        Self {
            translation: Vector::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Identity scaled uniformly with the given alpha.
    #[must_use]
    pub fn scaled(scale: f32, alpha: f32) -> Self {
        Self {
            scale,
            alpha,
            ..Self::IDENTITY
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for Appearance {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            translation: Vector::new(
                self.translation.x.lerp(to.translation.x, t),
                self.translation.y.lerp(to.translation.y, t),
            ),
            scale: self.scale.lerp(to.scale, t),
            rotation: self.rotation.lerp(to.rotation, t),
            // Alpha never overshoots.
            alpha: self.alpha.lerp(to.alpha, t.clamp(0.0, 1.0)),
        }
    }
}

/// Timing curve of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseIn,
    EaseOut,
    /// Damped spring settling at the end of the duration.
    Spring { damping: f32 },
}

impl Curve {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Returns exactly `1.0` once `t >= 1.0`.
    #[must_use]
    pub fn progress(self, t: f32) -> f32 {
        if t >= 1.0 {
            return 1.0;
        }
        let t = t.max(0.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t,
            Curve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::Spring { damping } => spring(t, damping),
        }
    }
}

/// Unit step response of a damped harmonic oscillator, scaled so the
/// envelope has decayed by the end of the unit interval.
fn spring(t: f32, damping: f32) -> f32 {
    let zeta = damping.clamp(0.05, 1.0);
    let omega = 8.0 / zeta;
    if zeta >= 1.0 {
        return 1.0 - (-omega * t).exp() * (1.0 + omega * t);
    }
    let root = (1.0 - zeta * zeta).sqrt();
    let omega_d = omega * root;
    let envelope = (-zeta * omega * t).exp();
    let phase = omega_d * t;
    // Keep oscillation bounded for tiny damping values.
    let phase = phase.min(8.0 * PI);
    1.0 - envelope * (phase.cos() + zeta / root * phase.sin())
}

#[derive(Debug, Clone, Copy)]
struct Transition<T> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    curve: Curve,
}

impl<T: Lerp> Transition<T> {
    fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    fn sample(&self, now: Instant) -> T {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let t = elapsed / self.duration.as_secs_f32();
        self.from.lerp(self.to, self.curve.progress(t))
    }
}

/// Model value of one property plus its running transition.
#[derive(Debug)]
pub(crate) struct Track<T> {
    value: T,
    transition: Option<Transition<T>>,
    generation: u64,
    pending: Option<Completer>,
}

impl<T: Lerp> Track<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            transition: None,
            generation: 0,
            pending: None,
        }
    }

    /// Presentation value at `now`.
    pub(crate) fn current(&self, now: Instant) -> T {
        match &self.transition {
            Some(transition) if !transition.is_finished(now) => transition.sample(now),
            _ => self.value,
        }
    }

    /// Target value of the running transition, or the resting value.
    pub(crate) fn target(&self) -> T {
        self.value
    }

    pub(crate) fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| !transition.is_finished(now))
    }

    /// Jumps to `value`, cancelling any running transition.
    pub(crate) fn set(&mut self, value: T) {
        self.supersede();
        self.value = value;
        self.transition = None;
    }

    /// Starts a transition from the current presentation value to `to`.
    ///
    /// Returns the generation to pass to [`Track::finish`] when the duration
    /// has elapsed, and the completion of this transition.
    pub(crate) fn begin(
        &mut self,
        to: T,
        duration: Duration,
        curve: Curve,
        now: Instant,
    ) -> (u64, Completion) {
        let from = self.current(now);
        self.supersede();
        let (completer, completion) = completion();
        self.pending = Some(completer);
        self.value = to;
        self.transition = Some(Transition {
            from,
            to,
            start: now,
            duration,
            curve,
        });
        (self.generation, completion)
    }

    /// Marks the transition of `generation` as finished, if still current.
    pub(crate) fn finish(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.transition = None;
        if let Some(completer) = self.pending.take() {
            completer.complete(true);
        }
    }

    fn supersede(&mut self) {
        self.generation += 1;
        if let Some(completer) = self.pending.take() {
            completer.complete(false);
        }
    }
}

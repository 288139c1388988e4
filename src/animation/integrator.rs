// SPDX-License-Identifier: MPL-2.0
//! Small rigid-body integrator for dragged and flung messages.
//!
//! A [`Body`] is the message view treated as a rigid plate: a center
//! position, a rotation and their velocities. While a finger holds it, a
//! [`Pin`] acts as a damped spring between a point on the body and the
//! finger. Once released the body coasts freely.
//!
//! Integration is semi-implicit Euler with a fixed maximum sub-step so large
//! frame gaps stay stable.

use crate::config::{PIN_ANGULAR_DAMPING, PIN_DAMPING, PIN_STIFFNESS};
use iced_core::{Point, Vector};

/// Longest step taken in one integration pass (seconds).
const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Moment-of-inertia scale for turning a pin force into torque.
const ROTATIONAL_INERTIA: f32 = 8_000.0;

/// State of the simulated view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Point,
    /// Points per second.
    pub velocity: Vector,
    /// Radians.
    pub angle: f32,
    /// Radians per second.
    pub angular_velocity: f32,
}

impl Body {
    #[must_use]
    pub fn at_rest(center: Point) -> Self {
        Self {
            center,
            velocity: Vector::new(0.0, 0.0),
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    /// Linear speed in points per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.x.hypot(self.velocity.y)
    }

    /// World position of a point given in body-local coordinates.
    #[must_use]
    pub fn world_point(&self, local: Vector) -> Point {
        let rotated = rotate(local, self.angle);
        Point::new(self.center.x + rotated.x, self.center.y + rotated.y)
    }

    /// Displacement from `origin` to the current center.
    #[must_use]
    pub fn offset_from(&self, origin: Point) -> Vector {
        Vector::new(self.center.x - origin.x, self.center.y - origin.y)
    }
}

/// Spring attaching a body-local point to a world anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Attachment point relative to the body center, unrotated.
    pub offset: Vector,
    /// World position the attachment point is pulled towards.
    pub anchor: Point,
}

/// Advances bodies through time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    pub stiffness: f32,
    pub damping: f32,
    pub angular_damping: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            stiffness: PIN_STIFFNESS,
            damping: PIN_DAMPING,
            angular_damping: PIN_ANGULAR_DAMPING,
        }
    }
}

impl Integrator {
    /// Advances `body` by `dt` seconds, pulled by `pin` if present.
    pub fn step(&self, body: &mut Body, pin: Option<&Pin>, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let steps = (dt / MAX_SUBSTEP).ceil().max(1.0);
        let h = dt / steps;
        for _ in 0..steps as u32 {
            self.substep(body, pin, h);
        }
    }

    fn substep(&self, body: &mut Body, pin: Option<&Pin>, h: f32) {
        if let Some(pin) = pin {
            let arm = rotate(pin.offset, body.angle);
            let attached = Point::new(body.center.x + arm.x, body.center.y + arm.y);
            let stretch = Vector::new(pin.anchor.x - attached.x, pin.anchor.y - attached.y);
            let force = Vector::new(
                stretch.x * self.stiffness - body.velocity.x * self.damping,
                stretch.y * self.stiffness - body.velocity.y * self.damping,
            );
            // Torque is the 2D cross product of lever arm and force.
            let torque = arm.x * force.y - arm.y * force.x;
            body.velocity = Vector::new(
                body.velocity.x + force.x * h,
                body.velocity.y + force.y * h,
            );
            body.angular_velocity += (torque / ROTATIONAL_INERTIA
                - body.angular_velocity * self.angular_damping)
                * h;
        }
        body.center = Point::new(
            body.center.x + body.velocity.x * h,
            body.center.y + body.velocity.y * h,
        );
        body.angle += body.angular_velocity * h;
    }
}

fn rotate(v: Vector, angle: f32) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

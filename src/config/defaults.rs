// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the library. Constants are organized by category.
//!
//! # Categories
//!
//! - **Queue**: Pause between messages and automatic display duration
//! - **Dim**: Background overlay opacity and fade timing
//! - **Edge Animator**: Slide timings and drag-to-dismiss thresholds
//! - **Physics Animator**: Scale/fade timings and fling thresholds

use crate::domain::newtypes::pause_bounds;

// ==========================================================================
// Queue Defaults
// ==========================================================================

/// Default pause between one message hiding and the next one showing (seconds).
///
/// Bounds live with [`MessagePause`](crate::domain::MessagePause).
pub const DEFAULT_PAUSE_BETWEEN_MESSAGES_SECS: f64 = pause_bounds::DEFAULT_SECS;

/// Display time for messages using the `Automatic` duration (seconds).
pub const DEFAULT_AUTOMATIC_DURATION_SECS: f64 = 2.0;

// ==========================================================================
// Dim Defaults
// ==========================================================================

/// Opacity of the black overlay used by the gray dim mode.
pub const DEFAULT_DIM_GRAY_OPACITY: f32 = 0.3;

/// Duration of the dim fade in and out (seconds).
pub const DIM_ANIMATION_SECS: f64 = 0.2;

// ==========================================================================
// Edge (Top/Bottom) Animator Defaults
// ==========================================================================

/// Slide-in duration (seconds).
pub const EDGE_SHOW_DURATION_SECS: f64 = 0.4;

/// Slide-out duration (seconds).
pub const EDGE_HIDE_DURATION_SECS: f64 = 0.2;

/// Spring damping ratio used by the slide-in.
pub const EDGE_SPRING_DAMPING: f32 = 0.8;

/// Release speed above which a drag dismisses the message (points/second).
pub const DEFAULT_CLOSE_SPEED_THRESHOLD: f32 = 750.0;

/// Fraction of the view height above which a drag dismisses the message.
pub const DEFAULT_CLOSE_PERCENT_THRESHOLD: f32 = 0.33;

/// Drag distance above which a drag dismisses the message (points).
pub const DEFAULT_CLOSE_ABSOLUTE_THRESHOLD: f32 = 75.0;

/// Extra distance the view overshoots into the container while bouncing (points).
pub const DEFAULT_BOUNCE_OFFSET: f32 = 5.0;

/// Exponent applied to wrong-way drag distance while rubber-banding.
pub const RUBBER_BAND_EXPONENT: f32 = 0.7;

// ==========================================================================
// Physics Animator Defaults
// ==========================================================================

/// Scale/fade-in duration (seconds).
pub const PHYSICS_SHOW_DURATION_SECS: f64 = 0.5;

/// Scale/fade-out duration (seconds).
pub const PHYSICS_HIDE_DURATION_SECS: f64 = 0.15;

/// Spring damping ratio used by the scale-in.
pub const PHYSICS_SHOW_DAMPING: f32 = 0.6;

/// Grace delay between a fling and the hide request (seconds).
pub const PHYSICS_HIDE_DELAY_SECS: f64 = 0.2;

/// Minimum escape energy for a release to count as a fling.
pub const DEFAULT_FLING_ENERGY_THRESHOLD: f32 = 200.0;

/// Minimum linear release speed for a fling (points/second).
pub const DEFAULT_FLING_SPEED_THRESHOLD: f32 = 600.0;

/// Cap on the residual linear speed given to a flung view (points/second).
pub const MAX_ESCAPE_SPEED: f32 = 1800.0;

/// Cap on the residual angular speed given to a flung view (radians/second).
pub const MAX_ESCAPE_ANGULAR_VELOCITY: f32 = 10.0;

/// Weight of angular velocity in the escape energy (hand tuned).
pub const ANGULAR_ENERGY_FACTOR: f32 = 75.0;

/// Window of angle snapshots used to derive angular velocity (seconds).
pub const ANGULAR_SNAPSHOT_WINDOW_SECS: f64 = 0.1;

/// Duration of the spring back to rest after an aborted drag (seconds).
pub const PHYSICS_RESTORE_DURATION_SECS: f64 = 0.65;

/// Damping ratio of the spring back to rest.
pub const PHYSICS_RESTORE_DAMPING: f32 = 0.8;

/// Stiffness of the pin attaching the grabbed point to the finger.
pub const PIN_STIFFNESS: f32 = 400.0;

/// Linear damping of the pin.
pub const PIN_DAMPING: f32 = 40.0;

/// Angular damping applied while pinned.
pub const PIN_ANGULAR_DAMPING: f32 = 8.0;

/// Interval between integrator frame ticks (milliseconds).
pub const FRAME_INTERVAL_MS: u64 = 16;

// ==========================================================================
// Safe Area Defaults
// ==========================================================================

/// Height of a legacy status bar (points).
pub const STATUS_BAR_HEIGHT: f32 = 20.0;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Queue validation
    assert!(DEFAULT_PAUSE_BETWEEN_MESSAGES_SECS >= 0.0);
    assert!(pause_bounds::MAX_SECS >= DEFAULT_PAUSE_BETWEEN_MESSAGES_SECS);
    assert!(DEFAULT_AUTOMATIC_DURATION_SECS > 0.0);

    // Dim validation
    assert!(DEFAULT_DIM_GRAY_OPACITY >= 0.0);
    assert!(DEFAULT_DIM_GRAY_OPACITY <= 1.0);

    // Edge animator validation
    assert!(EDGE_SHOW_DURATION_SECS > 0.0);
    assert!(EDGE_HIDE_DURATION_SECS > 0.0);
    assert!(EDGE_SPRING_DAMPING > 0.0);
    assert!(EDGE_SPRING_DAMPING <= 1.0);
    assert!(DEFAULT_CLOSE_PERCENT_THRESHOLD > 0.0);
    assert!(DEFAULT_CLOSE_PERCENT_THRESHOLD < 1.0);

    // Physics animator validation
    assert!(PHYSICS_SHOW_DURATION_SECS > 0.0);
    assert!(PHYSICS_HIDE_DURATION_SECS > 0.0);
    assert!(PHYSICS_SHOW_DAMPING > 0.0);
    assert!(MAX_ESCAPE_SPEED > DEFAULT_FLING_SPEED_THRESHOLD);
    assert!(FRAME_INTERVAL_MS > 0);
};

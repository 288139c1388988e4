// SPDX-License-Identifier: MPL-2.0
//! Presentation newtypes.
//!
//! This module provides type-safe wrappers for tuning values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// Message Pause Bounds
// =============================================================================

/// Pause between messages bounds (0 to 10 seconds).
pub mod pause_bounds {
    /// Minimum pause in seconds.
    pub const MIN_SECS: f64 = 0.0;
    /// Maximum pause in seconds.
    pub const MAX_SECS: f64 = 10.0;
    /// Default pause in seconds.
    pub const DEFAULT_SECS: f64 = 0.5;
}

// =============================================================================
// MessagePause
// =============================================================================

/// Minimum pause between one message hiding and the next one showing.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (0–10 seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessagePause(f64);

impl MessagePause {
    /// Creates a new pause, clamping to the valid range.
    ///
    /// Non-finite values fall back to the default.
    #[must_use]
    pub fn new(secs: f64) -> Self {
        if secs.is_finite() {
            Self(secs.clamp(pause_bounds::MIN_SECS, pause_bounds::MAX_SECS))
        } else {
            Self::default()
        }
    }

    /// Returns the pause in seconds.
    #[must_use]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// Returns the pause as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0)
    }
}

impl Default for MessagePause {
    fn default() -> Self {
        Self(pause_bounds::DEFAULT_SECS)
    }
}

// =============================================================================
// ClosePercent
// =============================================================================

/// Fraction of a view's travel past which a drag dismisses it (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePercent(f32);

impl ClosePercent {
    /// Creates a new percent threshold, clamping to the valid range.
    #[must_use]
    pub fn new(fraction: f32) -> Self {
        if fraction.is_finite() {
            Self(fraction.clamp(0.0, 1.0))
        } else {
            Self::default()
        }
    }

    /// Returns the raw fraction.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ClosePercent {
    fn default() -> Self {
        Self(0.33)
    }
}

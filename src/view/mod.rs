// SPDX-License-Identifier: MPL-2.0
//! Message views and the surfaces they are presented on.
//!
//! The crate never draws anything. A [`MessageView`] only reports the size
//! it wants, and optionally exposes a fixed set of capabilities through
//! typed accessors:
//!
//! - [`Identifiable`] supplies the de-duplication id.
//! - [`MarginAdjustable`] tunes margins and bounce.
//! - [`BackgroundViewable`] reports where the visible background sits, which
//!   decides whether wrong-way drags rubber-band.
//!
//! Hosts ([`Host`]) are the application's containers. Each show creates a
//! fresh [`Overlay`] that the host attaches and renders from.

pub mod banner;
pub mod host;
pub mod layout;
mod overlay;

pub use banner::Banner;
pub use host::{
    ContainerResolver, HeadlessHost, Host, PresentationContext, RootResolver, WeakHost,
    WindowLevel,
};
pub use layout::{Anchor, Constraint, Edge, FrameLayout, Layout, Region, Relation};
pub use overlay::{Overlay, OverlaySpec};

pub use iced_core::{Color, Point, Rectangle, Size, Vector};

use crate::animation::{AnimationContext, SafeZoneConflicts};
use crate::config::{DEFAULT_BOUNCE_OFFSET, STATUS_BAR_HEIGHT};
use crate::domain::MessageId;
use std::sync::Arc;

/// Edge insets, positive values point inward.
pub type Insets = iced_core::Padding;

/// A message to present.
pub trait MessageView: Send + Sync + 'static {
    /// Size the view wants when offered `available` space.
    fn preferred_size(&self, available: Size) -> Size;

    fn identifiable(&self) -> Option<&dyn Identifiable> {
        None
    }

    fn margin_adjustable(&self) -> Option<&dyn MarginAdjustable> {
        None
    }

    fn background_viewable(&self) -> Option<&dyn BackgroundViewable> {
        None
    }
}

/// Views that declare their own de-duplication id.
pub trait Identifiable {
    fn id(&self) -> MessageId;
}

/// Views that fine-tune their layout margins.
pub trait MarginAdjustable {
    /// Extra margins added on top of the safe-area adjustment.
    fn layout_margin_additions(&self) -> Insets {
        Insets::ZERO
    }

    /// Whether safe-area insets are folded into the margins.
    fn respects_safe_area(&self) -> bool {
        true
    }

    /// How far the view overshoots into the container while bouncing.
    fn bounce_animation_offset(&self) -> f32 {
        DEFAULT_BOUNCE_OFFSET
    }
}

/// Views whose visible background does not fill their bounds.
pub trait BackgroundViewable {
    /// Frame of the visible background within a view of size `bounds`.
    fn background_frame(&self, bounds: Size) -> Rectangle;
}

/// Id of a view: its declared id, or one derived from its address.
#[must_use]
pub fn message_id(view: &Arc<dyn MessageView>) -> MessageId {
    view.identifiable()
        .map(Identifiable::id)
        .unwrap_or_else(|| MessageId::from_address(Arc::as_ptr(view)))
}

/// Margins an edge-attached view should use inside `context.container`.
///
/// Starts from the view's additions and, when the view respects the safe
/// area, adds the container's safe-area insets. A window sitting over a
/// legacy status bar gives back the bar height at the top so the message
/// covers it.
#[must_use]
pub fn default_margin_adjustment(
    adjustable: &dyn MarginAdjustable,
    context: &AnimationContext,
) -> Insets {
    let mut margins = adjustable.layout_margin_additions();
    if adjustable.respects_safe_area() {
        let safe = context.container.safe_area();
        let mut top = safe.top;
        if context
            .safe_zone_conflicts
            .contains(SafeZoneConflicts::OVER_STATUS_BAR)
        {
            top = (top - STATUS_BAR_HEIGHT).max(0.0);
        }
        margins.top += top;
        margins.bottom += safe.bottom;
        margins.left += safe.left;
        margins.right += safe.right;
    }
    margins
}

/// Whether `inner` is inset from `outer` on any side.
pub(crate) fn is_inset(outer: Size, inner: Rectangle) -> bool {
    const EPSILON: f32 = 0.5;
    inner.x > EPSILON
        || inner.y > EPSILON
        || inner.x + inner.width < outer.width - EPSILON
        || inner.y + inner.height < outer.height - EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl MessageView for Plain {
        fn preferred_size(&self, available: Size) -> Size {
            Size::new(available.width, 40.0)
        }
    }

    #[test]
    fn plain_views_get_address_ids() {
        let view: Arc<dyn MessageView> = Arc::new(Plain);
        let alias = Arc::clone(&view);
        assert_eq!(message_id(&view), message_id(&alias));
        let other: Arc<dyn MessageView> = Arc::new(Plain);
        assert_ne!(message_id(&view), message_id(&other));
    }

    #[test]
    fn identifiable_views_use_declared_id() {
        let view: Arc<dyn MessageView> = Arc::new(Banner::new(60.0).with_id("banner1"));
        assert_eq!(message_id(&view), MessageId::new("banner1"));
    }

    #[test]
    fn inset_detection() {
        let bounds = Size::new(100.0, 50.0);
        assert!(!is_inset(bounds, Rectangle::new(Point::ORIGIN, bounds)));
        assert!(is_inset(
            bounds,
            Rectangle::new(Point::new(10.0, 10.0), Size::new(80.0, 30.0))
        ));
    }
}

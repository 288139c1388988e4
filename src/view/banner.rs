// SPDX-License-Identifier: MPL-2.0
//! A ready-made full-width message view.

use super::{BackgroundViewable, Identifiable, Insets, MarginAdjustable, MessageView, Rectangle};
use crate::config::DEFAULT_BOUNCE_OFFSET;
use crate::domain::MessageId;
use iced_core::{Point, Size};

/// Full-width banner of fixed height.
///
/// Hosts that render their own content can use it as the layout stand-in
/// for that content.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    id: Option<MessageId>,
    height: f32,
    margins: Insets,
    respects_safe_area: bool,
    bounce_offset: f32,
    background_inset: Option<Insets>,
}

impl Banner {
    #[must_use]
    pub fn new(height: f32) -> Self {
        Self {
            id: None,
            height: height.max(0.0),
            margins: Insets::ZERO,
            respects_safe_area: true,
            bounce_offset: DEFAULT_BOUNCE_OFFSET,
            background_inset: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Insets) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn ignoring_safe_area(mut self) -> Self {
        self.respects_safe_area = false;
        self
    }

    #[must_use]
    pub fn with_bounce_offset(mut self, offset: f32) -> Self {
        self.bounce_offset = offset;
        self
    }

    /// Draws the visible background inset from the touchable bounds, like a
    /// card floating inside a larger hit area.
    #[must_use]
    pub fn with_background_inset(mut self, inset: Insets) -> Self {
        self.background_inset = Some(inset);
        self
    }
}

impl MessageView for Banner {
    fn preferred_size(&self, available: Size) -> Size {
        Size::new(available.width, self.height)
    }

    fn identifiable(&self) -> Option<&dyn Identifiable> {
        self.id.as_ref().map(|_| self as &dyn Identifiable)
    }

    fn margin_adjustable(&self) -> Option<&dyn MarginAdjustable> {
        Some(self)
    }

    fn background_viewable(&self) -> Option<&dyn BackgroundViewable> {
        self.background_inset.map(|_| self as &dyn BackgroundViewable)
    }
}

impl Identifiable for Banner {
    fn id(&self) -> MessageId {
        self.id
            .clone()
            .unwrap_or_else(|| MessageId::from_address(self as *const Self))
    }
}

impl MarginAdjustable for Banner {
    fn layout_margin_additions(&self) -> Insets {
        self.margins
    }

    fn respects_safe_area(&self) -> bool {
        self.respects_safe_area
    }

    fn bounce_animation_offset(&self) -> f32 {
        self.bounce_offset
    }
}

impl BackgroundViewable for Banner {
    fn background_frame(&self, bounds: Size) -> Rectangle {
        let inset = self.background_inset.unwrap_or(Insets::ZERO);
        Rectangle::new(
            Point::new(inset.left, inset.top),
            Size::new(
                (bounds.width - inset.left - inset.right).max(0.0),
                (bounds.height - inset.top - inset.bottom).max(0.0),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_fills_available_width() {
        let banner = Banner::new(64.0);
        assert_eq!(
            banner.preferred_size(Size::new(320.0, 600.0)),
            Size::new(320.0, 64.0)
        );
    }

    #[test]
    fn capabilities_follow_configuration() {
        let plain = Banner::new(50.0);
        assert!(plain.identifiable().is_none());
        assert!(plain.background_viewable().is_none());
        assert!(plain.margin_adjustable().is_some());

        let card = Banner::new(50.0)
            .with_id("card")
            .with_background_inset(Insets::new(8.0));
        assert_eq!(card.identifiable().map(|i| i.id()), Some("card".into()));
        let frame = card
            .background_viewable()
            .map(|b| b.background_frame(Size::new(100.0, 50.0)));
        assert_eq!(
            frame,
            Some(Rectangle::new(Point::new(8.0, 8.0), Size::new(84.0, 34.0)))
        );
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Abstract placement of a message view inside its container.
//!
//! Animators describe where a view goes as a short list of [`Constraint`]s
//! ("top edge 5 points below the margin", "leading and trailing flush with
//! the superview"). A [`Layout`] turns them into a frame. [`FrameLayout`] is
//! a direct solver sufficient for edge- and center-attached messages; hosts
//! with a real constraint engine can supply their own.

use super::{Insets, MessageView};
use iced_core::{Point, Rectangle, Size};
use std::fmt::Debug;

/// Edge of the view being constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Leading,
    Trailing,
    CenterY,
}

/// Reference rectangle a constraint is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    #[default]
    Superview,
    SafeArea,
    Margin,
}

/// Distance of an edge from its anchor, positive inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation {
    /// In points.
    Absolute(f32),
    /// As a fraction of the anchor's extent along the constrained axis.
    Relative(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub edge: Edge,
    pub relation: Relation,
    pub anchor: Anchor,
}

impl Constraint {
    /// `edge` sits `inset` points inside the superview.
    #[must_use]
    pub fn absolute(edge: Edge, inset: f32) -> Self {
        Self {
            edge,
            relation: Relation::Absolute(inset),
            anchor: Anchor::Superview,
        }
    }

    /// `edge` sits `fraction` of the superview's extent inside it.
    #[must_use]
    pub fn relative(edge: Edge, fraction: f32) -> Self {
        Self {
            edge,
            relation: Relation::Relative(fraction),
            anchor: Anchor::Superview,
        }
    }

    #[must_use]
    pub fn to(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Container geometry a layout solves against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub bounds: Rectangle,
    pub safe_area: Insets,
    pub margins: Insets,
}

impl Region {
    /// Rectangle of `anchor` inside the region.
    #[must_use]
    pub fn anchor_rect(&self, anchor: Anchor) -> Rectangle {
        match anchor {
            Anchor::Superview => self.bounds,
            Anchor::SafeArea => shrink(self.bounds, self.safe_area),
            Anchor::Margin => shrink(self.bounds, self.margins),
        }
    }
}

/// Turns constraints into a frame.
pub trait Layout: Send + Sync + Debug {
    fn place(
        &self,
        view: &dyn MessageView,
        region: &Region,
        constraints: &[Constraint],
    ) -> Rectangle;
}

/// Direct solver for edge and center attachment.
///
/// Horizontal: leading plus trailing stretches the view between them, a
/// single one pins that side at the preferred width, none centers it.
/// Vertical: the first of top, bottom or center-y wins; the height is
/// always the preferred height.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLayout;

impl Layout for FrameLayout {
    fn place(
        &self,
        view: &dyn MessageView,
        region: &Region,
        constraints: &[Constraint],
    ) -> Rectangle {
        let find = |edge: Edge| constraints.iter().find(|c| c.edge == edge);
        let bounds = region.bounds;

        let leading = find(Edge::Leading).map(|c| {
            let rect = region.anchor_rect(c.anchor);
            rect.x + inset(c.relation, rect.width)
        });
        let trailing = find(Edge::Trailing).map(|c| {
            let rect = region.anchor_rect(c.anchor);
            rect.x + rect.width - inset(c.relation, rect.width)
        });

        let stretched = match (leading, trailing) {
            (Some(left), Some(right)) => Some((left, (right - left).max(0.0))),
            _ => None,
        };
        let offered_width = stretched.map_or(bounds.width, |(_, width)| width);
        let preferred = view.preferred_size(Size::new(offered_width, bounds.height));

        let (x, width) = match (stretched, leading, trailing) {
            (Some(span), _, _) => span,
            (None, Some(left), None) => (left, preferred.width),
            (None, None, Some(right)) => (right - preferred.width, preferred.width),
            _ => (
                bounds.x + (bounds.width - preferred.width) / 2.0,
                preferred.width,
            ),
        };

        let height = preferred.height;
        let vertical = constraints
            .iter()
            .find(|c| matches!(c.edge, Edge::Top | Edge::Bottom | Edge::CenterY));
        let y = match vertical {
            Some(c) => {
                let rect = region.anchor_rect(c.anchor);
                let offset = inset(c.relation, rect.height);
                match c.edge {
                    Edge::Top => rect.y + offset,
                    Edge::Bottom => rect.y + rect.height - offset - height,
                    _ => rect.y + (rect.height - height) / 2.0 + offset,
                }
            }
            None => bounds.y,
        };

        Rectangle::new(Point::new(x, y), Size::new(width, height))
    }
}

fn inset(relation: Relation, extent: f32) -> f32 {
    match relation {
        Relation::Absolute(points) => points,
        Relation::Relative(fraction) => fraction * extent,
    }
}

fn shrink(rect: Rectangle, insets: Insets) -> Rectangle {
    Rectangle::new(
        Point::new(rect.x + insets.left, rect.y + insets.top),
        Size::new(
            (rect.width - insets.left - insets.right).max(0.0),
            (rect.height - insets.top - insets.bottom).max(0.0),
        ),
    )
}

// SPDX-License-Identifier: MPL-2.0
//! Per-show container holding one installed message view.
//!
//! A fresh overlay is created for every show and attached to the host. The
//! host renders from it (view frame, current appearance, dim color) and
//! forwards input to it. All animated state lives here so it can be sampled
//! at any instant.

use super::layout::{Constraint, Layout, Region};
use super::{Insets, MessageView};
use crate::animation::pan::{PanGesture, PanRecognizer};
use crate::animation::{AnimationDelegate, Appearance, Curve, Track};
use crate::domain::PresenterKey;
use crate::presentation::{DimMode, StatusBarStyle};
use crate::runtime::{lock, Completion, MainContext};
use iced_core::{Color, Point, Rectangle, Size};
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::time::Instant;

/// Host geometry and presentation options an overlay is created with.
#[derive(Debug, Clone, Copy)]
pub struct OverlaySpec {
    pub key: PresenterKey,
    pub bounds: Rectangle,
    pub safe_area: Insets,
    pub dim: DimMode,
    /// Opacity reached by the gray dim mode.
    pub dim_gray_opacity: f32,
    pub status_bar_style: Option<StatusBarStyle>,
}

pub struct Overlay {
    spec: OverlaySpec,
    main: MainContext,
    layout: Arc<dyn Layout>,
    state: Mutex<OverlayState>,
}

struct OverlayState {
    view: Option<Arc<dyn MessageView>>,
    frame: Rectangle,
    margins: Insets,
    appearance: Track<Appearance>,
    dim: Track<f32>,
    pan_target: Option<Weak<dyn PanRecognizer>>,
    tap_target: Option<Weak<dyn AnimationDelegate>>,
}

#[derive(Clone, Copy)]
enum TrackKind {
    Appearance,
    Dim,
}

impl Overlay {
    pub(crate) fn new(spec: OverlaySpec, main: MainContext, layout: Arc<dyn Layout>) -> Arc<Self> {
        Arc::new(Self {
            spec,
            main,
            layout,
            state: Mutex::new(OverlayState {
                view: None,
                frame: Rectangle::new(Point::ORIGIN, Size::ZERO),
                margins: Insets::ZERO,
                appearance: Track::new(Appearance::IDENTITY),
                dim: Track::new(0.0),
                pan_target: None,
                tap_target: None,
            }),
        })
    }

    #[must_use]
    pub fn key(&self) -> PresenterKey {
        self.spec.key
    }

    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        self.spec.bounds
    }

    #[must_use]
    pub fn safe_area(&self) -> Insets {
        self.spec.safe_area
    }

    #[must_use]
    pub fn dim_mode(&self) -> DimMode {
        self.spec.dim
    }

    #[must_use]
    pub fn status_bar_style(&self) -> Option<StatusBarStyle> {
        self.spec.status_bar_style
    }

    /// Whether touches outside the message reach the content underneath.
    #[must_use]
    pub fn passes_touches_through(&self) -> bool {
        !self.spec.dim.is_modal()
    }

    pub(crate) fn main_context(&self) -> &MainContext {
        &self.main
    }

    // ---------------------------------------------------------------------
    // Installed view
    // ---------------------------------------------------------------------

    /// Installs `view`, placing it with the overlay's layout.
    pub fn install(&self, view: Arc<dyn MessageView>, constraints: &[Constraint]) -> Rectangle {
        let mut state = lock(&self.state);
        let region = Region {
            bounds: self.spec.bounds,
            safe_area: self.spec.safe_area,
            margins: state.margins,
        };
        let frame = self.layout.place(view.as_ref(), &region, constraints);
        state.view = Some(view);
        state.frame = frame;
        frame
    }

    #[must_use]
    pub fn message_view(&self) -> Option<Arc<dyn MessageView>> {
        lock(&self.state).view.clone()
    }

    /// Resting frame of the installed view.
    #[must_use]
    pub fn frame(&self) -> Rectangle {
        lock(&self.state).frame
    }

    #[must_use]
    pub fn layout_margins(&self) -> Insets {
        lock(&self.state).margins
    }

    pub fn set_layout_margins(&self, margins: Insets) {
        lock(&self.state).margins = margins;
    }

    // ---------------------------------------------------------------------
    // Appearance
    // ---------------------------------------------------------------------

    /// Appearance of the view as currently seen on screen.
    #[must_use]
    pub fn appearance(&self) -> Appearance {
        lock(&self.state).appearance.current(Instant::now())
    }

    /// Appearance the view is resting at or heading to.
    #[must_use]
    pub fn target_appearance(&self) -> Appearance {
        lock(&self.state).appearance.target()
    }

    /// Jumps to `appearance`, interrupting any running transition.
    pub fn set_appearance(&self, appearance: Appearance) {
        lock(&self.state).appearance.set(appearance);
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        lock(&self.state).appearance.is_animating(Instant::now())
    }

    /// Animates from the current appearance to `to`.
    pub fn animate(self: &Arc<Self>, to: Appearance, duration: Duration, curve: Curve) -> Completion {
        let (generation, completion) =
            lock(&self.state)
                .appearance
                .begin(to, duration, curve, Instant::now());
        self.finish_after(TrackKind::Appearance, generation, duration);
        completion
    }

    /// Bounding box of the view as currently seen on screen.
    ///
    /// Rotation is ignored.
    #[must_use]
    pub fn presented_frame(&self) -> Rectangle {
        let state = lock(&self.state);
        let appearance = state.appearance.current(Instant::now());
        let frame = state.frame;
        let width = frame.width * appearance.scale;
        let height = frame.height * appearance.scale;
        let center = frame.center();
        Rectangle::new(
            Point::new(
                center.x - width / 2.0 + appearance.translation.x,
                center.y - height / 2.0 + appearance.translation.y,
            ),
            Size::new(width, height),
        )
    }

    /// Whether any part of the view is still inside the container.
    #[must_use]
    pub fn is_on_screen(&self) -> bool {
        let shown = self.presented_frame();
        let bounds = self.spec.bounds;
        shown.x < bounds.x + bounds.width
            && shown.x + shown.width > bounds.x
            && shown.y < bounds.y + bounds.height
            && shown.y + shown.height > bounds.y
    }

    // ---------------------------------------------------------------------
    // Dim
    // ---------------------------------------------------------------------

    /// Opacity the dim mode reaches when fully shown.
    #[must_use]
    pub fn dim_full_opacity(&self) -> f32 {
        match self.spec.dim {
            DimMode::None => 0.0,
            DimMode::Gray { .. } => self.spec.dim_gray_opacity,
            DimMode::Color { color, .. } => color.a,
            DimMode::Blur { alpha, .. } => alpha.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn dim_opacity(&self) -> f32 {
        lock(&self.state).dim.current(Instant::now())
    }

    /// Color to paint behind the message, if any.
    #[must_use]
    pub fn dim_color(&self) -> Option<Color> {
        let opacity = self.dim_opacity();
        let base = match self.spec.dim {
            DimMode::None => return None,
            DimMode::Gray { .. } | DimMode::Blur { .. } => Color::BLACK,
            DimMode::Color { color, .. } => Color { a: 1.0, ..color },
        };
        Some(Color { a: opacity, ..base })
    }

    /// Fades the dim overlay to `opacity`.
    pub fn animate_dim(self: &Arc<Self>, opacity: f32, duration: Duration) -> Completion {
        let (generation, completion) = lock(&self.state).dim.begin(
            opacity.clamp(0.0, 1.0),
            duration,
            Curve::Linear,
            Instant::now(),
        );
        self.finish_after(TrackKind::Dim, generation, duration);
        completion
    }

    fn finish_after(self: &Arc<Self>, kind: TrackKind, generation: u64, duration: Duration) {
        let overlay = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(overlay) = overlay.upgrade() {
                let mut state = lock(&overlay.state);
                match kind {
                    TrackKind::Appearance => state.appearance.finish(generation),
                    TrackKind::Dim => state.dim.finish(generation),
                }
            }
        });
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    pub fn set_pan_target(&self, target: Weak<dyn PanRecognizer>) {
        lock(&self.state).pan_target = Some(target);
    }

    pub(crate) fn set_tap_target(&self, target: Weak<dyn AnimationDelegate>) {
        lock(&self.state).tap_target = Some(target);
    }

    /// Forwards a drag on the message view.
    pub fn pan(self: &Arc<Self>, gesture: PanGesture) {
        let overlay = Arc::clone(self);
        self.main.post(move || {
            let target = lock(&overlay.state)
                .pan_target
                .as_ref()
                .and_then(Weak::upgrade);
            match target {
                Some(target) => target.pan(&gesture),
                None => tracing::trace!(key = ?overlay.key(), "pan without recognizer"),
            }
        });
    }

    /// Forwards a tap on the dimmed background.
    pub fn tap(self: &Arc<Self>) {
        if !self.spec.dim.is_interactive() {
            return;
        }
        let overlay = Arc::clone(self);
        self.main.post(move || {
            let target = lock(&overlay.state)
                .tap_target
                .as_ref()
                .and_then(Weak::upgrade);
            if let Some(delegate) = target {
                tracing::debug!(key = ?overlay.key(), "dim tapped, hiding");
                delegate.hide();
            }
        });
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("key", &self.spec.key)
            .field("bounds", &self.spec.bounds)
            .field("dim", &self.spec.dim)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use crate::view::{Banner, Edge, FrameLayout};

    fn overlay(dim: DimMode) -> Arc<Overlay> {
        Overlay::new(
            OverlaySpec {
                key: PresenterKey::new(),
                bounds: Rectangle::new(Point::ORIGIN, Size::new(300.0, 600.0)),
                safe_area: Insets::ZERO,
                dim,
                dim_gray_opacity: 0.3,
                status_bar_style: None,
            },
            MainContext::spawn(),
            Arc::new(FrameLayout),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn animation_completes_after_duration() {
        let overlay = overlay(DimMode::None);
        let completion = overlay.animate(
            Appearance::translated(0.0, -100.0),
            Duration::from_millis(200),
            Curve::Linear,
        );
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_abs_diff_eq!(overlay.appearance().translation.y, -50.0, epsilon = 1e-2);
        assert!(completion.await);
        assert_eq!(overlay.appearance(), Appearance::translated(0.0, -100.0));
    }

    #[tokio::test(start_paused = true)]
    async fn gray_dim_fades_to_configured_opacity() {
        let overlay = overlay(DimMode::Gray { interactive: true });
        assert!(overlay.animate_dim(overlay.dim_full_opacity(), Duration::from_millis(200)).await);
        let color = overlay.dim_color().expect("gray dim has a color");
        assert_abs_diff_eq!(color.a, 0.3, epsilon = 1e-6);
        assert!(!overlay.passes_touches_through());
    }

    #[tokio::test(start_paused = true)]
    async fn presented_frame_follows_translation() {
        let overlay = overlay(DimMode::None);
        overlay.install(
            Arc::new(Banner::new(80.0)),
            &[
                Constraint::absolute(Edge::Leading, 0.0),
                Constraint::absolute(Edge::Trailing, 0.0),
                Constraint::absolute(Edge::Top, 0.0),
            ],
        );
        assert!(overlay.is_on_screen());
        overlay.set_appearance(Appearance::translated(0.0, -80.0));
        assert!(!overlay.is_on_screen());
        assert_eq!(overlay.presented_frame().y, -80.0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_overlay_resolves_unfinished() {
        let overlay = overlay(DimMode::None);
        let completion =
            overlay.animate(Appearance::IDENTITY, Duration::from_secs(1), Curve::EaseIn);
        drop(overlay);
        assert!(!completion.await);
    }
}

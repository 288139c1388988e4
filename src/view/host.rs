// SPDX-License-Identifier: MPL-2.0
//! Containers messages are presented in, and how one is chosen.

use super::{Insets, Overlay};
use crate::domain::PresenterKey;
use crate::error::PresentationError;
use crate::runtime::lock;
use iced_core::Rectangle;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Stacking level of a window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowLevel {
    #[default]
    Normal,
    StatusBar,
    Alert,
    Custom(f32),
}

impl WindowLevel {
    /// Numeric level, higher is in front.
    #[must_use]
    pub fn raw(self) -> f32 {
        match self {
            WindowLevel::Normal => 0.0,
            WindowLevel::StatusBar => 1000.0,
            WindowLevel::Alert => 2000.0,
            WindowLevel::Custom(level) => level,
        }
    }

    #[must_use]
    pub fn is_above_normal(self) -> bool {
        self.raw() > WindowLevel::Normal.raw()
    }
}

/// An application container able to display overlays.
pub trait Host: Send + Sync {
    fn bounds(&self) -> Rectangle;

    fn safe_area(&self) -> Insets {
        Insets::ZERO
    }

    fn level(&self) -> WindowLevel {
        WindowLevel::Normal
    }

    /// Whether a navigation bar covers the top of this container.
    fn under_navigation_bar(&self) -> bool {
        false
    }

    /// Whether a tab bar covers the bottom of this container.
    fn under_tab_bar(&self) -> bool {
        false
    }

    /// Starts rendering `overlay` on top of the host's content.
    fn attach(&self, overlay: Arc<Overlay>);

    /// Stops rendering the overlay created for `key`.
    fn detach(&self, key: PresenterKey);
}

pub type WeakHost = Weak<dyn Host>;

/// Where a message should be presented.
#[derive(Clone, Default)]
pub enum PresentationContext {
    /// Let the resolver pick its root container.
    #[default]
    Automatic,
    /// A dedicated window at the given level.
    Window(WindowLevel),
    /// The container of a specific view controller.
    ViewController(WeakHost),
    /// A specific view.
    View(WeakHost),
}

impl fmt::Debug for PresentationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationContext::Automatic => f.write_str("Automatic"),
            PresentationContext::Window(level) => f.debug_tuple("Window").field(level).finish(),
            PresentationContext::ViewController(_) => f.write_str("ViewController(..)"),
            PresentationContext::View(_) => f.write_str("View(..)"),
        }
    }
}

/// Chooses the container for a presentation context.
pub trait ContainerResolver: Send + Sync {
    fn resolve(&self, context: &PresentationContext) -> Result<Arc<dyn Host>, PresentationError>;
}

type WindowFactory = dyn Fn(WindowLevel) -> Option<Arc<dyn Host>> + Send + Sync;

/// Resolver with a single root container.
///
/// Explicit targets resolve to themselves while alive. Window contexts ask
/// the window factory, falling back to the root.
pub struct RootResolver {
    root: WeakHost,
    windows: Option<Box<WindowFactory>>,
}

impl RootResolver {
    #[must_use]
    pub fn new(root: &Arc<dyn Host>) -> Self {
        Self {
            root: Arc::downgrade(root),
            windows: None,
        }
    }

    /// A resolver that has no root container yet.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            root: Weak::<HeadlessHost>::new(),
            windows: None,
        }
    }

    #[must_use]
    pub fn with_windows(
        mut self,
        factory: impl Fn(WindowLevel) -> Option<Arc<dyn Host>> + Send + Sync + 'static,
    ) -> Self {
        self.windows = Some(Box::new(factory));
        self
    }

    fn root(&self) -> Result<Arc<dyn Host>, PresentationError> {
        self.root.upgrade().ok_or(PresentationError::NoRootContainer)
    }
}

impl fmt::Debug for RootResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootResolver")
            .field("has_root", &(self.root.strong_count() > 0))
            .field("has_windows", &self.windows.is_some())
            .finish()
    }
}

impl ContainerResolver for RootResolver {
    fn resolve(&self, context: &PresentationContext) -> Result<Arc<dyn Host>, PresentationError> {
        match context {
            PresentationContext::Automatic => self.root(),
            PresentationContext::Window(level) => {
                match self.windows.as_ref().and_then(|factory| factory(*level)) {
                    Some(window) => Ok(window),
                    None => self.root(),
                }
            }
            PresentationContext::ViewController(target) | PresentationContext::View(target) => {
                target.upgrade().ok_or(PresentationError::TargetDropped)
            }
        }
    }
}

/// Host that renders nothing and records attached overlays.
///
/// Useful for servers, tests and any embedding that polls overlay state
/// instead of receiving draw calls.
#[derive(Debug)]
pub struct HeadlessHost {
    bounds: Rectangle,
    safe_area: Insets,
    level: WindowLevel,
    under_navigation_bar: bool,
    under_tab_bar: bool,
    attached: Mutex<Vec<Arc<Overlay>>>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            safe_area: Insets::ZERO,
            level: WindowLevel::Normal,
            under_navigation_bar: false,
            under_tab_bar: false,
            attached: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: WindowLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_bars(mut self, navigation: bool, tab: bool) -> Self {
        self.under_navigation_bar = navigation;
        self.under_tab_bar = tab;
        self
    }

    /// Overlays currently attached, oldest first.
    pub fn overlays(&self) -> Vec<Arc<Overlay>> {
        lock(&self.attached).clone()
    }

    pub fn attached_count(&self) -> usize {
        lock(&self.attached).len()
    }
}

impl Host for HeadlessHost {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn safe_area(&self) -> Insets {
        self.safe_area
    }

    fn level(&self) -> WindowLevel {
        self.level
    }

    fn under_navigation_bar(&self) -> bool {
        self.under_navigation_bar
    }

    fn under_tab_bar(&self) -> bool {
        self.under_tab_bar
    }

    fn attach(&self, overlay: Arc<Overlay>) {
        lock(&self.attached).push(overlay);
    }

    fn detach(&self, key: PresenterKey) {
        lock(&self.attached).retain(|overlay| overlay.key() != key);
    }
}

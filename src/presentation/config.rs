// SPDX-License-Identifier: MPL-2.0
//! Per-message presentation options.

use crate::animation::Animator;
use crate::domain::MessageId;
use crate::view::{Color, PresentationContext};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How the message enters and leaves the screen.
#[derive(Clone, Default)]
pub enum PresentationStyle {
    /// Slides down from the top edge.
    #[default]
    Top,
    /// Slides up from the bottom edge.
    Bottom,
    /// Grows in at the center of the container.
    Center,
    Custom(Arc<dyn Animator>),
}

impl fmt::Debug for PresentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationStyle::Top => f.write_str("Top"),
            PresentationStyle::Bottom => f.write_str("Bottom"),
            PresentationStyle::Center => f.write_str("Center"),
            PresentationStyle::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How long the message stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayDuration {
    /// The configured automatic duration.
    #[default]
    Automatic,
    /// Until hidden explicitly or interactively.
    Forever,
    Seconds(Duration),
    /// Until hidden, after an optional show delay and with a minimum time on
    /// screen once shown.
    Indefinite { delay: Duration, minimum: Duration },
}

impl DisplayDuration {
    /// Time before the message hides itself, if it ever does.
    #[must_use]
    pub fn pause_duration(&self, automatic: Duration) -> Option<Duration> {
        match self {
            DisplayDuration::Automatic => Some(automatic),
            DisplayDuration::Seconds(duration) => Some(*duration),
            DisplayDuration::Forever | DisplayDuration::Indefinite { .. } => None,
        }
    }

    /// Delay before a queued message is eligible to show.
    #[must_use]
    pub fn delay_show(&self) -> Option<Duration> {
        match self {
            DisplayDuration::Indefinite { delay, .. } => Some(*delay),
            _ => None,
        }
    }

    /// Minimum time on screen before a hide request is honored.
    #[must_use]
    pub fn minimum_shown(&self) -> Option<Duration> {
        match self {
            DisplayDuration::Indefinite { minimum, .. } => Some(*minimum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlurStyle {
    #[default]
    Dark,
    Light,
    ExtraLight,
}

/// Treatment of the content behind the message.
///
/// Every mode but `None` blocks touches to the content underneath; the
/// `interactive` flag makes tapping the background dismiss the message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DimMode {
    #[default]
    None,
    Gray { interactive: bool },
    Color { color: Color, interactive: bool },
    Blur {
        style: BlurStyle,
        alpha: f32,
        interactive: bool,
    },
}

impl DimMode {
    #[must_use]
    pub fn is_modal(&self) -> bool {
        !matches!(self, DimMode::None)
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match self {
            DimMode::None => false,
            DimMode::Gray { interactive }
            | DimMode::Color { interactive, .. }
            | DimMode::Blur { interactive, .. } => *interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBarStyle {
    Default,
    LightContent,
    DarkContent,
}

/// Lifecycle notification for one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    WillShow(MessageId),
    DidShow(MessageId),
    WillHide(MessageId),
    DidHide(MessageId),
}

impl Event {
    #[must_use]
    pub fn id(&self) -> &MessageId {
        match self {
            Event::WillShow(id) | Event::DidShow(id) | Event::WillHide(id) | Event::DidHide(id) => {
                id
            }
        }
    }
}

pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Options for showing one message.
#[derive(Clone)]
pub struct MessageConfig {
    pub presentation_style: PresentationStyle,
    pub presentation_context: PresentationContext,
    pub duration: DisplayDuration,
    pub dim_mode: DimMode,
    /// Whether the message can be dragged away.
    pub interactive_hide: bool,
    pub preferred_status_bar_style: Option<StatusBarStyle>,
    pub event_listeners: Vec<EventListener>,
    /// Drop the message if one with the same id is already queued or shown.
    pub ignore_duplicates: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            presentation_style: PresentationStyle::Top,
            presentation_context: PresentationContext::Automatic,
            duration: DisplayDuration::Automatic,
            dim_mode: DimMode::None,
            interactive_hide: true,
            preferred_status_bar_style: None,
            event_listeners: Vec::new(),
            ignore_duplicates: true,
        }
    }
}

impl MessageConfig {
    #[must_use]
    pub fn with_style(mut self, style: PresentationStyle) -> Self {
        self.presentation_style = style;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: PresentationContext) -> Self {
        self.presentation_context = context;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: DisplayDuration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_dim(mut self, dim_mode: DimMode) -> Self {
        self.dim_mode = dim_mode;
        self
    }

    #[must_use]
    pub fn with_interactive_hide(mut self, interactive: bool) -> Self {
        self.interactive_hide = interactive;
        self
    }

    #[must_use]
    pub fn with_status_bar_style(mut self, style: StatusBarStyle) -> Self {
        self.preferred_status_bar_style = Some(style);
        self
    }

    #[must_use]
    pub fn allowing_duplicates(mut self) -> Self {
        self.ignore_duplicates = false;
        self
    }

    /// Adds a listener for this message's lifecycle events.
    #[must_use]
    pub fn on_event(mut self, listener: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_listeners.push(Arc::new(listener));
        self
    }
}

impl fmt::Debug for MessageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageConfig")
            .field("presentation_style", &self.presentation_style)
            .field("presentation_context", &self.presentation_context)
            .field("duration", &self.duration)
            .field("dim_mode", &self.dim_mode)
            .field("interactive_hide", &self.interactive_hide)
            .field("preferred_status_bar_style", &self.preferred_status_bar_style)
            .field("event_listeners", &self.event_listeners.len())
            .field("ignore_duplicates", &self.ignore_duplicates)
            .finish()
    }
}

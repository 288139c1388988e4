// SPDX-License-Identifier: MPL-2.0
//! Per-message options and the presenter driving one message's lifecycle.

mod config;
mod presenter;

pub use config::{
    BlurStyle, DimMode, DisplayDuration, Event, EventListener, MessageConfig, PresentationStyle,
    StatusBarStyle,
};
pub use presenter::{Phase, Presenter};
pub(crate) use presenter::{Report, Services};

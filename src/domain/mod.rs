// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value types with ZERO external dependencies.
//!
//! This module contains pure domain types and value objects. It has no
//! dependencies on external crates (except `std`) to ensure testability.
//!
//! # Modules
//!
//! - [`identity`]: Message and presenter identities ([`MessageId`](identity::MessageId),
//!   [`PresenterKey`](identity::PresenterKey))
//! - [`newtypes`]: Clamped value objects ([`MessagePause`](newtypes::MessagePause),
//!   [`ClosePercent`](newtypes::ClosePercent))

pub mod identity;
pub mod newtypes;

// Re-export commonly used types
pub use identity::{MessageId, PresenterKey};
pub use newtypes::{ClosePercent, MessagePause};

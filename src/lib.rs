// SPDX-License-Identifier: MPL-2.0
//! `herald` queues transient message banners and drives their animations.
//!
//! It is headless: hosts supply the container surface and forward input,
//! while herald decides what is on screen, when it leaves, and how it moves.
//! At most one message is visible per [`manager::Manager`]; the rest wait in
//! FIFO order with de-duplication by [`domain::MessageId`].

#![doc(html_root_url = "https://docs.rs/herald/0.1.0")]

pub mod animation;
pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
pub mod presentation;
pub mod runtime;
pub mod view;

#[cfg(test)]
mod test_utils;

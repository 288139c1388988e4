// SPDX-License-Identifier: MPL-2.0
//! Test utilities shared by the unit tests.
//!
//! Re-exports the `approx` assertion macros for float comparison, which handle
//! the precision issues `assert_eq!` cannot, plus small fixtures for a
//! headless screen and manager, and a `tracing` subscriber for debugging
//! failures with `RUST_LOG=herald=trace`.

pub use approx::assert_abs_diff_eq;

use crate::manager::Manager;
use crate::view::{HeadlessHost, Host, Point, Rectangle, RootResolver, Size};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Bounds of a typical phone screen.
pub fn phone_screen() -> Rectangle {
    Rectangle::new(Point::ORIGIN, Size::new(375.0, 812.0))
}

/// A manager presenting into a fresh headless host covering [`phone_screen`].
pub fn headless_manager() -> (Manager, Arc<HeadlessHost>) {
    init_tracing();
    let host = Arc::new(HeadlessHost::new(phone_screen()));
    let root: Arc<dyn Host> = host.clone();
    (Manager::new(Arc::new(RootResolver::new(&root))), host)
}

/// Lets paused time run forward so posted jobs and timers fire.
pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}

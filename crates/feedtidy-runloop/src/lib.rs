//! # feedtidy RunLoop
//!
//! Schedules reconciliation passes over a live feed.
//!
//! - [`FeedController`]: deterministic state machine owning the session,
//!   the observers and a [`TimerQueue`] of one-shot tasks (bootstrap,
//!   discovery retries, debounce, rescan, activation)
//! - [`Driver`]: tokio loop selecting over host events, the next timer
//!   deadline and a shutdown token
//!
//! The controller takes `now` on every call, so tests drive it with a
//! virtual clock and the driver with paused tokio time.

pub mod controller;
pub mod driver;
pub mod error;
pub mod timer;

pub use controller::{ControllerState, FeedController};
pub use driver::Driver;
pub use error::{RunLoopError, RunLoopResult};
pub use timer::{TaskKind, TimerHandle, TimerQueue};

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;

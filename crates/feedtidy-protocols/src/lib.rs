//! # feedtidy Protocols
//!
//! Capability traits through which the reconciliation engine reaches the host
//! page. Contains only interface definitions and the small value types they
//! exchange - no implementations.
//!
//! ## Core Traits
//!
//! - [`Document`] - DOM reads and writes
//! - [`MutationSource`] - attach/detach mutation observers
//! - [`NavigationWatcher`] - current in-page location
//! - [`PaintScheduler`] - one-frame deferral (`after_next_paint`)
//! - [`FeedHost`] - everything above, implemented automatically

pub mod document;
pub mod error;
pub mod host;
pub mod types;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use host::{FeedHost, HostEvent, MutationSource, NavigationWatcher, PaintScheduler};
pub use types::*;

//! # feedtidy Core
//!
//! The reconciliation engine. Every pass re-reads the live feed, and for each
//! entry decides whether to expand its body preview, suppress it as a
//! duplicate, or leave it alone. Decisions are encoded on the nodes
//! themselves (attributes and inline styles) so that a repeated pass over an
//! unchanged feed writes nothing.
//!
//! The host list recycles nodes: the same node can show a different
//! notification on the next pass. Each node's last-seen signature lives in a
//! [`ReconciliationSession`]; when it changes, the node is reset before it is
//! evaluated again.
//!
//! ## Modules
//!
//! - [`text`] - normalization, body keys, signatures
//! - [`classify`] - mention / reaction classification
//! - [`ordering`] - on-screen order of entries
//! - [`entry`] - reading an entry out of the document
//! - [`session`] - per-navigation state and activation windows
//! - [`transform`] - the attribute/style writes
//! - [`engine`] - the pass itself
//! - [`style`] - one-time style sheet injection

pub mod classify;
pub mod engine;
pub mod entry;
pub mod ordering;
pub mod session;
pub mod style;
pub mod text;
pub mod transform;

pub use classify::{Classification, Classifier};
pub use engine::{EntrySnapshot, PassReport, Reconciler};
pub use entry::{EntryContract, FeedEntry};
pub use ordering::resolve_visual_order;
pub use session::{ActivationWindow, ReconciliationSession, SignatureChange};
pub use style::inject_style;

//! Value types shared between the engine and its hosts.

mod geometry;
mod node;
mod selector;

pub use geometry::BoundingBox;
pub use node::{NodeId, ObserveOptions, ObserverId};
pub use selector::Selector;

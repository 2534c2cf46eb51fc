//! On-screen order of entries.
//!
//! Virtualized lists do not keep DOM order in sync with what is drawn, so any
//! "first occurrence wins" rule has to work on rendered positions.

use feedtidy_protocols::{BoundingBox, Document, NodeId};
use tracing::trace;

/// Entries sorted top-to-bottom, then left-to-right.
///
/// Entries without a measurable box (detached, non-finite coordinates, zero
/// height) are left out of this ordering; they are not errors.
pub fn resolve_visual_order<D: Document>(doc: &D, entries: &[NodeId]) -> Vec<NodeId> {
    let mut positioned: Vec<(NodeId, BoundingBox)> = entries
        .iter()
        .filter_map(|node| match doc.bounding_client_rect(*node) {
            Some(rect) if rect.is_measurable() => Some((*node, rect)),
            _ => {
                trace!(entry = %node, "entry not laid out, left out of visual order");
                None
            }
        })
        .collect();

    positioned.sort_by(|(_, a), (_, b)| {
        a.top()
            .total_cmp(&b.top())
            .then_with(|| a.left().total_cmp(&b.left()))
    });

    positioned.into_iter().map(|(node, _)| node).collect()
}

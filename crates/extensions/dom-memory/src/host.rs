//! Observer, navigation and paint capabilities of [`MemoryDocument`].

use feedtidy_protocols::{MutationSource, NavigationWatcher, NodeId, ObserveOptions, ObserverId, PaintScheduler};
use tracing::trace;

use crate::document::MemoryDocument;

/// An attached observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverRecord {
    pub id: ObserverId,
    pub target: NodeId,
    pub options: ObserveOptions,
}

impl MemoryDocument {
    /// Observers currently attached, in attach order.
    pub fn observers(&self) -> &[ObserverRecord] {
        &self.observers
    }

    /// Observers attached to `target`.
    pub fn observers_on(&self, target: NodeId) -> Vec<ObserverId> {
        self.observers
            .iter()
            .filter(|o| o.target == target)
            .map(|o| o.id)
            .collect()
    }

    /// Change the location the way a history push would.
    pub fn navigate(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Number of `after_next_paint` requests not yet taken.
    pub fn pending_paint_requests(&self) -> usize {
        self.paint_requests
    }

    /// Consume one paint request; the caller then delivers `AfterPaint`.
    pub fn take_paint_request(&mut self) -> bool {
        if self.paint_requests == 0 {
            return false;
        }
        self.paint_requests -= 1;
        true
    }
}

impl MutationSource for MemoryDocument {
    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        let id = ObserverId::new(self.next_observer);
        self.next_observer += 1;
        self.observers.push(ObserverRecord {
            id,
            target,
            options,
        });
        trace!(observer = id.raw(), %target, "observer attached");
        id
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|o| o.id != observer);
    }
}

impl NavigationWatcher for MemoryDocument {
    fn current_location(&self) -> String {
        self.location.clone()
    }
}

impl PaintScheduler for MemoryDocument {
    fn request_after_next_paint(&mut self) {
        self.paint_requests += 1;
    }
}

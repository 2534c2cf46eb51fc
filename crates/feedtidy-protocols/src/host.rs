//! Host environment capabilities beyond the document itself.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::types::{NodeId, ObserveOptions, ObserverId};

/// Attaches and detaches mutation observers.
///
/// Observed mutations are delivered back to the controller as
/// [`HostEvent::Mutation`] carrying the observer id.
pub trait MutationSource {
    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId;

    /// Detaching an unknown or already detached observer is a no-op.
    fn disconnect(&mut self, observer: ObserverId);
}

/// Reports the in-page location.
///
/// Hosts wrap the history primitives (push/replace/pop) and emit
/// [`HostEvent::HistoryChanged`]; the controller compares locations itself.
pub trait NavigationWatcher {
    fn current_location(&self) -> String;
}

/// One-frame deferral used to measure layout after it has been committed.
pub trait PaintScheduler {
    /// Ask for a single [`HostEvent::AfterPaint`] once the next frame is painted.
    fn request_after_next_paint(&mut self);
}

/// Everything the controller needs from a host.
pub trait FeedHost: Document + MutationSource + NavigationWatcher + PaintScheduler {}

impl<T> FeedHost for T where T: Document + MutationSource + NavigationWatcher + PaintScheduler {}

/// Events a host delivers to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The page finished loading.
    Loaded,
    /// A mutation burst was observed by this observer.
    Mutation { observer: ObserverId },
    /// A history primitive ran or back/forward navigation happened.
    HistoryChanged,
    /// The frame requested through [`PaintScheduler`] has been painted.
    AfterPaint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_event_serialization() {
        let event = HostEvent::Mutation {
            observer: ObserverId::new(2),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"mutation","observer":2}"#);

        let parsed: HostEvent = serde_json::from_str(r#"{"type":"history_changed"}"#).unwrap();
        assert_eq!(parsed, HostEvent::HistoryChanged);
    }
}

//! Error types for host operations.

use thiserror::Error;

use crate::types::NodeId;

/// Errors reported by a [`Document`](crate::Document) implementation.
///
/// None of these are fatal to the engine: a node can disappear between the
/// query that found it and the write that touches it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node is not (or no longer) part of the document.
    #[error("Node {0} is detached")]
    Detached(NodeId),

    /// The host never knew about this node.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Structural operation that needs a parent on a parentless node.
    #[error("Node {0} has no parent")]
    NoParent(NodeId),

    /// Selector could not be parsed.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type for host operations.
pub type DomResult<T> = Result<T, DomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_display() {
        let err = DomError::Detached(NodeId::new(7));
        assert!(err.to_string().contains("#7"));
        assert!(err.to_string().contains("detached"));
    }

    #[test]
    fn test_invalid_selector_display() {
        let err = DomError::InvalidSelector {
            selector: "div p".to_string(),
            message: "descendant combinators are not supported".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("div p"));
        assert!(display.contains("combinators"));
    }
}

//! The DOM surface the engine reads and writes.

use crate::error::DomResult;
use crate::types::{BoundingBox, NodeId, Selector};

/// Synchronous access to the host document.
///
/// Reads never fail: a missing node simply reads as empty/absent. Writes
/// return [`DomResult`] so callers can log and move on when a node vanished
/// mid-pass.
pub trait Document {
    fn head(&self) -> Option<NodeId>;

    fn body(&self) -> Option<NodeId>;

    /// Whether the node is currently attached to the document.
    fn is_connected(&self, node: NodeId) -> bool;

    /// First descendant of `root` (document order) matching `selector`.
    fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId>;

    /// All descendants of `root` (document order) matching `selector`.
    fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId>;

    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Previous element sibling.
    fn previous_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Next element sibling.
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()>;

    /// Returns whether the class was present.
    fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<bool>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()>;

    /// Inline style property (`element.style`), not the computed style.
    fn style_property(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()>;

    fn remove_style_property(&mut self, node: NodeId, name: &str) -> DomResult<()>;

    /// Concatenated text of the subtree.
    fn text_content(&self, node: NodeId) -> String;

    /// Rendered text with line breaks between block children.
    fn inner_text(&self, node: NodeId) -> String;

    fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()>;

    fn bounding_client_rect(&self, node: NodeId) -> Option<BoundingBox>;

    /// Full content height, only meaningful after layout.
    fn scroll_height(&self, node: NodeId) -> Option<f64>;

    /// Visible box height, only meaningful after layout.
    fn client_height(&self, node: NodeId) -> Option<f64>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()>;

    /// Insert `node` directly after `reference` under the same parent.
    fn insert_after(&mut self, reference: NodeId, node: NodeId) -> DomResult<()>;

    /// Detach the node (and its subtree) from the document.
    fn remove_node(&mut self, node: NodeId) -> DomResult<()>;
}

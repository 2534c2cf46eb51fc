//! The element tree and its [`Document`] implementation.

use std::collections::{BTreeMap, HashMap};

use feedtidy_protocols::{BoundingBox, Document, DomError, DomResult, NodeId, Selector};

use crate::fixture::ElementSpec;
use crate::host::ObserverRecord;

const BLOCK_TAGS: &[&str] = &[
    "div", "p", "section", "article", "li", "ul", "ol", "header", "footer", "br",
];

#[derive(Debug, Clone)]
pub(crate) struct MemoryNode {
    pub(crate) tag: String,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) styles: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) rect: Option<BoundingBox>,
    pub(crate) scroll_height: Option<f64>,
    pub(crate) client_height: Option<f64>,
}

impl MemoryNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            rect: None,
            scroll_height: None,
            client_height: None,
        }
    }

    fn is_collapsed(&self) -> bool {
        let zero = |v: &String| {
            let v = v.trim();
            v == "0" || v == "0px"
        };
        self.styles.get("display").is_some_and(|v| v.trim() == "none")
            || self.styles.get("height").is_some_and(zero)
    }
}

/// An in-memory document with `<html>`, `<head>` and `<body>`.
///
/// Node ids are never reused, so a removed node can not alias a later one.
/// Every write that actually changes state bumps [`MemoryDocument::revision`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub(crate) nodes: HashMap<NodeId, MemoryNode>,
    next_id: u64,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    pub(crate) location: String,
    pub(crate) observers: Vec<ObserverRecord>,
    pub(crate) next_observer: u64,
    pub(crate) paint_requests: usize,
    revision: u64,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::with_location("about:blank")
    }

    pub fn with_location(location: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: HashMap::new(),
            next_id: 1,
            root: NodeId::new(0),
            head: NodeId::new(0),
            body: NodeId::new(0),
            location: location.into(),
            observers: Vec::new(),
            next_observer: 1,
            paint_requests: 0,
            revision: 0,
        };
        doc.root = doc.alloc("html");
        doc.head = doc.alloc("head");
        doc.body = doc.alloc("body");
        doc.link(doc.root, doc.head);
        doc.link(doc.root, doc.body);
        doc
    }

    pub fn head_id(&self) -> NodeId {
        self.head
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Count of state-changing writes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Build `spec` and append it under `parent`. Returns the new element.
    pub fn append_spec(&mut self, parent: NodeId, spec: &ElementSpec) -> NodeId {
        let id = self.alloc(&spec.tag);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.classes = spec.classes.clone();
            node.attributes = spec.attributes.clone();
            if let Some(ref element_id) = spec.id {
                node.attributes.insert("id".to_string(), element_id.clone());
            }
            node.styles = spec.styles.clone();
            node.text = spec.text.clone();
            node.rect = spec.rect;
            node.scroll_height = spec.scroll_height;
            node.client_height = spec.client_height;
        }
        self.link(parent, id);
        for child in &spec.children {
            self.append_spec(id, child);
        }
        self.revision += 1;
        id
    }

    /// Element children of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.tag.as_str())
    }

    /// Replace the own text of the first descendant matching `selector`,
    /// the way a host framework re-renders a recycled row.
    pub fn replace_text(&mut self, root: NodeId, selector: &Selector, text: &str) -> bool {
        match self.query_selector(root, selector) {
            Some(target) => self.set_text_content(target, text).is_ok(),
            None => false,
        }
    }

    /// Move the layout box of a node (host reflow).
    pub fn set_rect(&mut self, node: NodeId, rect: Option<BoundingBox>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.rect = rect;
            self.revision += 1;
        }
    }

    /// Change post-layout heights of a node.
    pub fn set_layout(&mut self, node: NodeId, scroll_height: f64, client_height: f64) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.scroll_height = Some(scroll_height);
            n.client_height = Some(client_height);
        }
    }

    /// All inline style properties of a node, for snapshots.
    pub fn styles(&self, node: NodeId) -> BTreeMap<String, String> {
        self.nodes
            .get(&node)
            .map(|n| n.styles.clone())
            .unwrap_or_default()
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, MemoryNode::new(tag));
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self
            .nodes
            .get(&node)
            .ok_or(DomError::UnknownNode(node))?
            .parent
            .ok_or(DomError::NoParent(node))?;
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = None;
        }
        Ok(parent)
    }

    fn node(&self, node: NodeId) -> DomResult<&MemoryNode> {
        self.nodes.get(&node).ok_or(DomError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> DomResult<&mut MemoryNode> {
        self.nodes.get_mut(&node).ok_or(DomError::UnknownNode(node))
    }

    fn matches(&self, node: &MemoryNode, selector: &Selector) -> bool {
        selector.matches(
            &node.tag,
            node.attributes.get("id").map(String::as_str),
            |class| node.classes.iter().any(|c| c == class),
        )
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&root) {
            for child in &node.children {
                out.push(*child);
                self.descendants(*child, out);
            }
        }
    }

    fn sibling(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.nodes.get(&node)?.parent?;
        let siblings = &self.nodes.get(&parent)?.children;
        let pos = siblings.iter().position(|c| *c == node)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }
}

impl Document for MemoryDocument {
    fn head(&self) -> Option<NodeId> {
        Some(self.head)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_selector_all(root, selector).into_iter().next()
    }

    fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        all.into_iter()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| self.matches(n, selector))
            })
            .collect()
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.root, &mut all);
        all.into_iter().find(|node| {
            self.nodes
                .get(node)
                .and_then(|n| n.attributes.get("id"))
                .is_some_and(|v| v == id)
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, -1)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling(node, 1)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if !n.classes.iter().any(|c| c == class) {
            n.classes.push(class.to_string());
            self.revision += 1;
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        let n = self.node_mut(node)?;
        let before = n.classes.len();
        n.classes.retain(|c| c != class);
        let removed = n.classes.len() != before;
        if removed {
            self.revision += 1;
        }
        Ok(removed)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.nodes.get(&node)?;
        if name == "class" {
            return Some(n.classes.join(" "));
        }
        n.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if name == "class" {
            let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            if n.classes != classes {
                n.classes = classes;
                self.revision += 1;
            }
            return Ok(());
        }
        if n.attributes.get(name).map(String::as_str) != Some(value) {
            n.attributes.insert(name.to_string(), value.to_string());
            self.revision += 1;
        }
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if n.attributes.remove(name).is_some() {
            self.revision += 1;
        }
        Ok(())
    }

    fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(&node)?.styles.get(name).cloned()
    }

    fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if n.styles.get(name).map(String::as_str) != Some(value) {
            n.styles.insert(name.to_string(), value.to_string());
            self.revision += 1;
        }
        Ok(())
    }

    fn remove_style_property(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        let n = self.node_mut(node)?;
        if n.styles.remove(name).is_some() {
            self.revision += 1;
        }
        Ok(())
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(n) = self.nodes.get(&node) else {
            return String::new();
        };
        let mut text = n.text.clone();
        for child in &n.children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    fn inner_text(&self, node: NodeId) -> String {
        let Some(n) = self.nodes.get(&node) else {
            return String::new();
        };
        if n.styles.get("display").is_some_and(|v| v.trim() == "none") {
            return String::new();
        }
        let mut text = n.text.clone();
        for child in &n.children {
            let block = self
                .nodes
                .get(child)
                .is_some_and(|c| BLOCK_TAGS.contains(&c.tag.as_str()));
            if block && !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.inner_text(*child));
        }
        text
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> DomResult<()> {
        let children = self.node(node)?.children.clone();
        for child in children {
            self.unlink(child)?;
        }
        let n = self.node_mut(node)?;
        n.text = text.to_string();
        self.revision += 1;
        Ok(())
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<BoundingBox> {
        if !self.is_connected(node) {
            return None;
        }
        let n = self.nodes.get(&node)?;
        let rect = n.rect?;
        if n.is_collapsed() {
            return Some(BoundingBox::new(rect.x, rect.y, rect.width, 0.0));
        }
        Some(rect)
    }

    fn scroll_height(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(&node)?.scroll_height
    }

    fn client_height(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(&node)?.client_height
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(tag)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.parent(child).is_some() {
            self.unlink(child)?;
        }
        self.link(parent, child);
        self.revision += 1;
        Ok(())
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) -> DomResult<()> {
        self.node(node)?;
        let parent = self
            .node(reference)?
            .parent
            .ok_or(DomError::NoParent(reference))?;
        if self.parent(node).is_some() {
            self.unlink(node)?;
        }
        let p = self.node_mut(parent)?;
        let pos = p
            .children
            .iter()
            .position(|c| *c == reference)
            .map_or(p.children.len(), |i| i + 1);
        p.children.insert(pos, node);
        self.node_mut(node)?.parent = Some(parent);
        self.revision += 1;
        Ok(())
    }

    fn remove_node(&mut self, node: NodeId) -> DomResult<()> {
        self.unlink(node)?;
        self.revision += 1;
        Ok(())
    }
}

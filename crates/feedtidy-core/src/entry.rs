//! Reading feed entries out of the document.

use feedtidy_config::SelectorConfig;
use feedtidy_protocols::{Document, DomResult, NodeId, Selector};

use crate::text::{compute_body_key, compute_signature, normalize};

/// Parsed host page contract.
#[derive(Debug, Clone)]
pub struct EntryContract {
    pub item_class: String,
    pub item: Selector,
    pub title: Selector,
    pub body: Selector,
    pub spacers: Vec<Vec<String>>,
}

impl EntryContract {
    pub fn from_config(selectors: &SelectorConfig) -> DomResult<Self> {
        Ok(Self {
            item_class: selectors.item_class.clone(),
            item: Selector::class(selectors.item_class.clone()),
            title: Selector::parse(&selectors.title)?,
            body: Selector::parse(&selectors.body)?,
            spacers: selectors.spacers.clone(),
        })
    }

    /// Entries under `root`; `root` itself when it is an entry.
    pub fn entries<D: Document>(&self, doc: &D, root: NodeId) -> Vec<NodeId> {
        if doc.has_class(root, &self.item_class) {
            return vec![root];
        }
        doc.query_selector_all(root, &self.item)
    }

    /// Whether `node` is one of the layout spacers rendered between entries.
    pub fn is_spacer<D: Document>(&self, doc: &D, node: NodeId) -> bool {
        self.spacers.iter().any(|rule| {
            !rule.is_empty() && rule.iter().all(|class| doc.has_class(node, class))
        })
    }
}

/// One entry as read in the current pass.
///
/// A missing title or body reads as empty; the entry then simply does not
/// match anything this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub node: NodeId,
    pub title_node: Option<NodeId>,
    pub body_node: Option<NodeId>,
    /// Normalized title text.
    pub title: String,
    /// Raw, line-preserving body text.
    pub body_text: String,
    pub body_key: String,
    pub signature: String,
}

impl FeedEntry {
    pub fn read<D: Document>(
        doc: &D,
        node: NodeId,
        contract: &EntryContract,
        key_lines: usize,
    ) -> Self {
        let title_node = doc.query_selector(node, &contract.title);
        let body_node = doc.query_selector(node, &contract.body);

        let title = title_node
            .map(|t| normalize(&doc.text_content(t)))
            .unwrap_or_default();
        let body_text = body_node
            .map(|b| {
                let text = doc.inner_text(b);
                if text.trim().is_empty() {
                    doc.text_content(b)
                } else {
                    text
                }
            })
            .unwrap_or_default();

        let body_key = compute_body_key(&body_text, key_lines);
        let signature = compute_signature(&title, &body_text, key_lines);

        Self {
            node,
            title_node,
            body_node,
            title,
            body_text,
            body_key,
            signature,
        }
    }
}

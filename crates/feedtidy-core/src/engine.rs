//! The reconciliation pass.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use feedtidy_config::{ExpansionMode, FeedConfig};
use feedtidy_protocols::{Document, DomResult, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::classify::{Classification, Classifier};
use crate::entry::{EntryContract, FeedEntry};
use crate::ordering::resolve_visual_order;
use crate::session::{ReconciliationSession, SignatureChange};
use crate::text::key_len;
use crate::transform::{self, is_flagged};

/// What one pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    pub entries: usize,
    pub resets: usize,
    pub expanded: usize,
    pub suppressed: usize,
    pub released: usize,
    pub spacers_removed: usize,
    pub evicted: usize,
    pub expansion_active: bool,
    pub dedupe_active: bool,
}

impl PassReport {
    /// Whether the pass changed anything on the page.
    pub fn is_noop(&self) -> bool {
        self.resets == 0
            && self.expanded == 0
            && self.suppressed == 0
            && self.released == 0
            && self.spacers_removed == 0
    }
}

/// Externally visible state of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    pub node: NodeId,
    pub title: String,
    pub body_key: String,
    pub classification: Classification,
    pub expanded: bool,
    pub hidden: bool,
    pub duplicate: bool,
    pub ellipsis: bool,
}

/// Stateless pass logic; all state lives in the [`ReconciliationSession`]
/// passed to each call and on the nodes themselves.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: FeedConfig,
    contract: EntryContract,
    classifier: Classifier,
}

impl Reconciler {
    pub fn new(config: FeedConfig) -> DomResult<Self> {
        let contract = EntryContract::from_config(&config.selectors)?;
        let classifier = Classifier::new(&config.markers);
        Ok(Self {
            config,
            contract,
            classifier,
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn contract(&self) -> &EntryContract {
        &self.contract
    }

    /// The feed container: parent of the first entry in the document.
    pub fn find_container<D: Document>(&self, doc: &D) -> Option<NodeId> {
        let body = doc.body()?;
        let first = doc.query_selector(body, &self.contract.item)?;
        doc.parent(first)
    }

    /// Run one pass over every entry under `root`.
    pub fn reconcile<D: Document>(
        &self,
        doc: &mut D,
        root: NodeId,
        session: &mut ReconciliationSession,
        now: Instant,
    ) -> PassReport {
        session.begin_pass();
        let key_lines = self.config.dedupe.key_lines;
        let nodes = self.contract.entries(&*doc, root);

        let mut report = PassReport {
            entries: nodes.len(),
            expansion_active: session.activation().expand_active(now),
            dedupe_active: session.activation().dedupe_active(now),
            ..PassReport::default()
        };

        let mut entries = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let entry = FeedEntry::read(&*doc, *node, &self.contract, key_lines);
            if session.record_signature(*node, entry.signature.clone()) == SignatureChange::Changed
            {
                debug!(entry = %node, "content changed under node, resetting");
                if let Err(e) = transform::reset(doc, &entry, &self.config) {
                    debug!(entry = %node, error = %e, "reset incomplete");
                }
                session.forget_suppressed_key(*node);
                report.resets += 1;
            }
            entries.push(entry);
        }

        if report.expansion_active {
            for entry in &entries {
                if self.expand_entry(doc, entry, session) {
                    report.expanded += 1;
                }
            }
        }

        if report.dedupe_active {
            self.dedupe(doc, &entries, session, &mut report);
        }

        report.evicted = session.retain_entries(&nodes);

        if !report.is_noop() {
            debug!(
                entries = report.entries,
                resets = report.resets,
                expanded = report.expanded,
                suppressed = report.suppressed,
                released = report.released,
                "pass applied changes"
            );
        }
        report
    }

    /// Post-paint step: add ellipsis markers to expanded bodies that
    /// overflow. Returns the number of markers added.
    pub fn measure_pending<D: Document>(
        &self,
        doc: &mut D,
        session: &mut ReconciliationSession,
    ) -> usize {
        let mut added = 0;
        for body in session.take_measurements() {
            match transform::append_ellipsis_if_truncated(doc, body, &self.config) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(e) => debug!(body = %body, error = %e, "ellipsis skipped"),
            }
        }
        added
    }

    /// Current state of every entry under `root`.
    pub fn snapshot<D: Document>(&self, doc: &D, root: NodeId) -> Vec<EntrySnapshot> {
        let attrs = &self.config.attributes;
        self.contract
            .entries(doc, root)
            .into_iter()
            .map(|node| {
                let entry =
                    FeedEntry::read(doc, node, &self.contract, self.config.dedupe.key_lines);
                let expanded = entry
                    .body_node
                    .is_some_and(|body| is_flagged(doc, body, &attrs.expanded));
                let ellipsis = entry.body_node.is_some_and(|body| {
                    doc.next_sibling(body)
                        .is_some_and(|next| is_flagged(doc, next, &attrs.ellipsis))
                });
                EntrySnapshot {
                    node,
                    classification: self.classifier.classify(&entry.title),
                    title: entry.title,
                    body_key: entry.body_key,
                    expanded,
                    hidden: is_flagged(doc, node, &attrs.hidden),
                    duplicate: is_flagged(doc, node, &attrs.duplicate),
                    ellipsis,
                }
            })
            .collect()
    }

    fn expand_entry<D: Document>(
        &self,
        doc: &mut D,
        entry: &FeedEntry,
        session: &mut ReconciliationSession,
    ) -> bool {
        let attrs = &self.config.attributes;

        if is_flagged(&*doc, entry.node, &attrs.hidden) {
            return false;
        }
        let Some(body) = entry.body_node else {
            return false;
        };
        if is_flagged(&*doc, body, &attrs.expanded) {
            return false;
        }
        if !self.classifier.classify(&entry.title).is_expand_eligible() {
            return false;
        }

        if let Err(e) = transform::expand(doc, body, &self.config) {
            debug!(entry = %entry.node, error = %e, "expansion skipped");
            return false;
        }
        if self.config.expansion.mode == ExpansionMode::Clamp {
            session.queue_measurement(body);
        }
        trace!(entry = %entry.node, "expanded");
        true
    }

    /// Key an entry takes part in dedupe with, if any.
    fn dedupe_key<'e>(&self, entry: &'e FeedEntry) -> Option<&'e str> {
        if !self.classifier.classify(&entry.title).is_dedupe_eligible() {
            return None;
        }
        if entry.body_key.is_empty() || key_len(&entry.body_key) < self.config.dedupe.min_key_chars
        {
            return None;
        }
        Some(entry.body_key.as_str())
    }

    /// Keep the first visible occurrence of every key, suppress the rest.
    ///
    /// Recomputed from scratch every pass. Entries suppressed earlier have a
    /// zero box and so drop out of the visual order; they stay suppressed
    /// only while a visible keeper for their key still exists.
    fn dedupe<D: Document>(
        &self,
        doc: &mut D,
        entries: &[FeedEntry],
        session: &mut ReconciliationSession,
        report: &mut PassReport,
    ) {
        let attrs = &self.config.attributes;
        let by_node: HashMap<NodeId, &FeedEntry> = entries.iter().map(|e| (e.node, e)).collect();
        let nodes: Vec<NodeId> = entries.iter().map(|e| e.node).collect();
        let order = resolve_visual_order(&*doc, &nodes);
        let ordered: HashSet<NodeId> = order.iter().copied().collect();

        let mut keepers: HashMap<&str, NodeId> = HashMap::new();
        for node in &order {
            let Some(&entry) = by_node.get(node) else {
                continue;
            };
            let Some(key) = self.dedupe_key(entry) else {
                continue;
            };

            match keepers.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(*node);
                    if is_flagged(&*doc, *node, &attrs.duplicate) {
                        self.release(doc, *node, session, report);
                    }
                }
                Entry::Occupied(keeper) => {
                    // Re-applied on flagged entries too: the host may have reset inline styles.
                    let newly = !is_flagged(&*doc, *node, &attrs.duplicate);
                    match transform::suppress(doc, *node, &self.config, &self.contract) {
                        Ok(spacers) => {
                            if newly {
                                debug!(entry = %node, keeper = %keeper.get(), "duplicate suppressed");
                                report.suppressed += 1;
                            }
                            report.spacers_removed += spacers;
                        }
                        Err(e) => {
                            debug!(entry = %node, error = %e, "suppression skipped");
                            continue;
                        }
                    }
                    session.remember_suppressed_key(*node, key);
                }
            }
        }

        for entry in entries {
            if ordered.contains(&entry.node) || !is_flagged(&*doc, entry.node, &attrs.duplicate) {
                continue;
            }
            let key = session
                .suppressed_key(entry.node)
                .map(str::to_string)
                .or_else(|| self.dedupe_key(entry).map(str::to_string));
            let has_keeper = key
                .as_deref()
                .and_then(|k| keepers.get(k))
                .is_some_and(|keeper| *keeper != entry.node);
            if !has_keeper {
                self.release(doc, entry.node, session, report);
            }
        }
    }

    fn release<D: Document>(
        &self,
        doc: &mut D,
        node: NodeId,
        session: &mut ReconciliationSession,
        report: &mut PassReport,
    ) {
        match transform::release(doc, node, &self.config) {
            Ok(()) => {
                debug!(entry = %node, "duplicate released");
                session.forget_suppressed_key(node);
                report.released += 1;
            }
            Err(e) => debug!(entry = %node, error = %e, "release skipped"),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

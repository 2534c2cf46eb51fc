//! Per-navigation reconciliation state.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use feedtidy_config::TimingConfig;
use feedtidy_protocols::NodeId;

/// Startup grace period: expansion and dedupe stay inert until these instants
/// so the host's own first layout is not mistaken for steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    pub expand_enabled_at: Instant,
    pub dedupe_enabled_at: Instant,
}

impl ActivationWindow {
    /// Expansion after `expand_delay`, dedupe `dedupe_delay` after that.
    pub fn starting_at(start: Instant, timing: &TimingConfig) -> Self {
        let expand_enabled_at = start + timing.expand_delay();
        Self {
            expand_enabled_at,
            dedupe_enabled_at: expand_enabled_at + timing.dedupe_delay(),
        }
    }

    /// Both steps active from `now`.
    pub fn immediate(now: Instant) -> Self {
        Self {
            expand_enabled_at: now,
            dedupe_enabled_at: now,
        }
    }

    pub fn expand_active(&self, now: Instant) -> bool {
        now >= self.expand_enabled_at
    }

    pub fn dedupe_active(&self, now: Instant) -> bool {
        now >= self.dedupe_enabled_at
    }
}

/// Outcome of recording a node's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureChange {
    /// First time this node is seen.
    New,
    Unchanged,
    /// The node now shows different content.
    Changed,
}

/// State carried between passes, replaced wholesale on navigation.
///
/// Node-keyed maps do not keep nodes alive; entries for nodes absent from a
/// pass are evicted at the end of that pass.
#[derive(Debug, Clone)]
pub struct ReconciliationSession {
    activation: ActivationWindow,
    signatures: HashMap<NodeId, String>,
    suppressed_keys: HashMap<NodeId, String>,
    pending_measurements: Vec<NodeId>,
    passes: u64,
}

impl ReconciliationSession {
    pub fn new(activation: ActivationWindow) -> Self {
        Self {
            activation,
            signatures: HashMap::new(),
            suppressed_keys: HashMap::new(),
            pending_measurements: Vec::new(),
            passes: 0,
        }
    }

    pub fn activation(&self) -> &ActivationWindow {
        &self.activation
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub(crate) fn begin_pass(&mut self) {
        self.passes += 1;
    }

    /// Store `signature` as the node's last-seen one and report how it
    /// compares with the previous.
    pub fn record_signature(&mut self, node: NodeId, signature: String) -> SignatureChange {
        let change = match self.signatures.get(&node) {
            None => SignatureChange::New,
            Some(previous) if *previous == signature => SignatureChange::Unchanged,
            Some(_) => SignatureChange::Changed,
        };
        if change != SignatureChange::Unchanged {
            self.signatures.insert(node, signature);
        }
        change
    }

    pub fn signature(&self, node: NodeId) -> Option<&str> {
        self.signatures.get(&node).map(String::as_str)
    }

    pub fn tracked_entries(&self) -> usize {
        self.signatures.len()
    }

    /// Body key a suppressed entry was suppressed for.
    pub fn suppressed_key(&self, node: NodeId) -> Option<&str> {
        self.suppressed_keys.get(&node).map(String::as_str)
    }

    pub(crate) fn remember_suppressed_key(&mut self, node: NodeId, key: &str) {
        if self.suppressed_keys.get(&node).map(String::as_str) != Some(key) {
            self.suppressed_keys.insert(node, key.to_string());
        }
    }

    pub(crate) fn forget_suppressed_key(&mut self, node: NodeId) {
        self.suppressed_keys.remove(&node);
    }

    pub(crate) fn queue_measurement(&mut self, body: NodeId) {
        if !self.pending_measurements.contains(&body) {
            self.pending_measurements.push(body);
        }
    }

    pub fn has_pending_measurements(&self) -> bool {
        !self.pending_measurements.is_empty()
    }

    pub(crate) fn take_measurements(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.pending_measurements)
    }

    /// Drop state for every node not in `present`. Returns how many entries
    /// were evicted.
    pub(crate) fn retain_entries(&mut self, present: &[NodeId]) -> usize {
        let present: HashSet<NodeId> = present.iter().copied().collect();
        let before = self.signatures.len();
        self.signatures.retain(|node, _| present.contains(node));
        self.suppressed_keys.retain(|node, _| present.contains(node));
        before - self.signatures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_activation_window_from_timing() {
        let start = Instant::now();
        let timing = TimingConfig {
            expand_delay_ms: 100,
            dedupe_delay_ms: 300,
            ..TimingConfig::default()
        };
        let window = ActivationWindow::starting_at(start, &timing);

        assert!(!window.expand_active(start));
        assert!(window.expand_active(start + Duration::from_millis(100)));
        assert!(!window.dedupe_active(start + Duration::from_millis(399)));
        assert!(window.dedupe_active(start + Duration::from_millis(400)));
    }

    #[test]
    fn test_immediate_window() {
        let now = Instant::now();
        let window = ActivationWindow::immediate(now);
        assert!(window.expand_active(now));
        assert!(window.dedupe_active(now));
    }

    #[test]
    fn test_record_signature() {
        let mut session = ReconciliationSession::new(ActivationWindow::immediate(Instant::now()));
        let node = NodeId::new(1);

        assert_eq!(session.record_signature(node, "a".into()), SignatureChange::New);
        assert_eq!(session.record_signature(node, "a".into()), SignatureChange::Unchanged);
        assert_eq!(session.record_signature(node, "b".into()), SignatureChange::Changed);
        assert_eq!(session.signature(node), Some("b"));
    }

    #[test]
    fn test_retain_entries_evicts_absent_nodes() {
        let mut session = ReconciliationSession::new(ActivationWindow::immediate(Instant::now()));
        let (a, b) = (NodeId::new(1), NodeId::new(2));
        session.record_signature(a, "a".into());
        session.record_signature(b, "b".into());
        session.remember_suppressed_key(b, "key");

        assert_eq!(session.retain_entries(&[a]), 1);
        assert_eq!(session.tracked_entries(), 1);
        assert!(session.suppressed_key(b).is_none());
    }

    #[test]
    fn test_measurements_are_deduplicated() {
        let mut session = ReconciliationSession::new(ActivationWindow::immediate(Instant::now()));
        let body = NodeId::new(9);
        session.queue_measurement(body);
        session.queue_measurement(body);
        assert!(session.has_pending_measurements());
        assert_eq!(session.take_measurements(), vec![body]);
        assert!(!session.has_pending_measurements());
    }
}

//! Scheduled one-shot tasks with cancel handles.
//!
//! The queue holds deadlines only; it never sleeps. The controller pops due
//! tasks for a given instant, which keeps scheduling deterministic under both
//! a real clock and a virtual one.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::time::Instant;

/// What a scheduled task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// First initialisation after the load delay.
    Bootstrap,
    /// Another attempt at finding the feed container.
    DiscoveryRetry,
    /// Trailing edge of a mutation burst.
    Debounce,
    /// Periodic pass, re-armed on every fire.
    Rescan,
    /// Pass at the instant expansion becomes active.
    ExpandActivation,
    /// Pass at the instant dedupe becomes active.
    DedupeActivation,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Bootstrap => "bootstrap",
            TaskKind::DiscoveryRetry => "discovery_retry",
            TaskKind::Debounce => "debounce",
            TaskKind::Rescan => "rescan",
            TaskKind::ExpandActivation => "expand_activation",
            TaskKind::DedupeActivation => "dedupe_activation",
        };
        f.write_str(name)
    }
}

/// Cancel handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct ScheduledTask {
    due: Instant,
    seq: u64,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first; equal deadlines fire in schedule order.
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of scheduled tasks.
///
/// Cancelled tasks are dropped lazily; the head of the heap is always live.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<ScheduledTask>,
    live: HashMap<u64, TaskKind>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due`.
    pub fn schedule(&mut self, kind: TaskKind, due: Instant) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledTask { due, seq });
        self.live.insert(seq, kind);
        TimerHandle(seq)
    }

    /// Cancel a pending task. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let removed = self.live.remove(&handle.0).is_some();
        self.prune();
        removed
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle.0)
    }

    /// Pop the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, TaskKind)> {
        let head = self.heap.peek()?;
        if head.due > now {
            return None;
        }
        let seq = head.seq;
        self.heap.pop();
        let kind = self.live.remove(&seq);
        self.prune();
        kind.map(|kind| (TimerHandle(seq), kind))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|task| task.due)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pending task kinds, earliest first.
    pub fn pending(&self) -> Vec<TaskKind> {
        let mut tasks: Vec<&ScheduledTask> = self
            .heap
            .iter()
            .filter(|t| self.live.contains_key(&t.seq))
            .collect();
        tasks.sort_by(|a, b| b.cmp(a));
        tasks
            .into_iter()
            .filter_map(|t| self.live.get(&t.seq).copied())
            .collect()
    }

    fn prune(&mut self) {
        while let Some(head) = self.heap.peek() {
            if self.live.contains_key(&head.seq) {
                break;
            }
            self.heap.pop();
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;

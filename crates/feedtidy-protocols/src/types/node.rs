//! Node and observer identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a DOM node.
///
/// Two ids are equal exactly when they refer to the same node object. A host
/// never hands out the same id for a different node, but the node behind an
/// id may be recycled to display different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for an attached mutation observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(u64);

impl ObserverId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Which mutations an observer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
}

impl ObserveOptions {
    /// Child-list changes anywhere below the target.
    pub const fn structure() -> Self {
        Self {
            child_list: true,
            attributes: false,
            character_data: false,
            subtree: true,
        }
    }

    /// Every kind of mutation anywhere below the target.
    pub const fn everything() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
        }
    }
}

use serde::{Deserialize, Serialize};

/// How nodes and leaves are located.
///
/// Both strategies return the same answers; they differ only in cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    /// Scan nodes in creation order and leaves in append order, first match wins.
    Linear,
    /// Hash index keyed by path, and by key within each node.
    #[default]
    Indexed,
}

/// Capacity bounds for a namespace.
///
/// Hitting a bound is reported the same way an allocation failure is: the
/// write that triggered it fails, and anything it already created stays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Total nodes, the root included.
    pub max_nodes: usize,
    /// Leaves under a single node.
    pub max_leaves_per_node: usize,
    /// Bytes in a single value.
    pub max_value_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: 1 << 20,
            max_leaves_per_node: 1 << 20,
            max_value_len: 1 << 20,
        }
    }
}

/// Whether connections share one namespace or each get their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationMode {
    /// Each connection works on a copy-on-write snapshot taken when it was
    /// accepted. Its writes are invisible to every other connection.
    #[default]
    Snapshot,
    /// All connections read and write one namespace behind a lock.
    Shared,
}

impl std::fmt::Display for IsolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snapshot => write!(f, "snapshot"),
            Self::Shared => write!(f, "shared"),
        }
    }
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Indexed => write!(f, "indexed"),
        }
    }
}

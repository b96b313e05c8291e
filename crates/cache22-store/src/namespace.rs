use std::collections::HashMap;

use bytes::Bytes;
use tracing::debug;

use crate::config::{Limits, Lookup};
use crate::error::{StoreError, StoreResult};
use crate::node::{Leaf, Node, NodeId};
use crate::path;

/// Whether a write created a leaf or replaced an existing value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    Updated,
}

/// What a successful [`Namespace::put`] did, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteSummary {
    pub outcome: PutOutcome,
    /// Canonical path of the node that owns the leaf.
    pub path: String,
    /// Key as stored, after clamping.
    pub key: String,
}

/// The node/leaf graph rooted at `/`.
///
/// Nodes live in an arena in creation order; index 0 is the root. Each node
/// keeps its children and its leaves in insertion order. Two hash indexes
/// (path to node, and key to leaf position per node) are always maintained,
/// and [`Lookup`] picks whether queries use them or scan.
///
/// Nodes and leaves are never removed. Cloning produces an independent
/// copy; values are reference-counted [`Bytes`], so a clone shares value
/// buffers until either side replaces them.
#[derive(Clone)]
pub struct Namespace {
    nodes: Vec<Node>,
    paths: HashMap<String, NodeId>,
    keys: Vec<HashMap<String, usize>>,
    lookup: Lookup,
    limits: Limits,
}

impl Namespace {
    /// A namespace holding only the root, with default lookup and limits.
    pub fn new() -> Self {
        Self::with_config(Lookup::default(), Limits::default())
    }

    pub fn with_config(lookup: Lookup, limits: Limits) -> Self {
        let mut paths = HashMap::new();
        paths.insert(path::ROOT_PATH.to_string(), NodeId::ROOT);
        Self {
            nodes: vec![Node::root()],
            paths,
            keys: vec![HashMap::new()],
            lookup,
            limits,
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.0]
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves across all nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(|n| n.leaves.len()).sum()
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Id of the node at `path`, if present.
    pub fn find_node_id(&self, path: &str) -> Option<NodeId> {
        let canonical = path::canonicalize(path);
        match self.lookup {
            Lookup::Linear => self
                .nodes
                .iter()
                .position(|n| n.path == canonical)
                .map(NodeId),
            Lookup::Indexed => self.paths.get(&canonical).copied(),
        }
    }

    /// The node at `path`, if present.
    pub fn find_node(&self, path: &str) -> Option<&Node> {
        self.find_node_id(path).map(|id| &self.nodes[id.0])
    }

    /// The leaf with `key` under the node at `path`, if both exist.
    pub fn find_leaf(&self, path: &str, key: &str) -> Option<&Leaf> {
        let id = self.find_node_id(path)?;
        let pos = self.leaf_position(id, path::clamp_key(key))?;
        Some(&self.nodes[id.0].leaves[pos])
    }

    /// Value stored under (`path`, `key`).
    pub fn lookup(&self, path: &str, key: &str) -> Option<&Bytes> {
        self.find_leaf(path, key).map(Leaf::value)
    }

    /// Leaves of the node at `path`, in append order.
    pub fn leaves(&self, path: &str) -> Option<&[Leaf]> {
        self.find_node(path).map(Node::leaves)
    }

    /// Nodes in depth-first order with their depth (root at 0).
    ///
    /// Children are visited in creation order.
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, NodeId::ROOT)];
        while let Some((depth, id)) = stack.pop() {
            let node = &self.nodes[id.0];
            out.push((depth, node));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        out
    }

    fn leaf_position(&self, id: NodeId, key: &str) -> Option<usize> {
        match self.lookup {
            Lookup::Linear => self.nodes[id.0].leaves.iter().position(|l| l.key == key),
            Lookup::Indexed => self.keys[id.0].get(key).copied(),
        }
    }

    fn check(&self, id: NodeId) -> StoreResult<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(StoreError::UnknownNode(id.0))
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Create a node at `path` and append it to `parent`'s children.
    ///
    /// Fails if the path is already taken or the node limit is reached.
    pub fn create_node(&mut self, parent: NodeId, path: &str) -> StoreResult<NodeId> {
        self.check(parent)?;
        let canonical = path::canonicalize(path);
        if self.paths.contains_key(&canonical) {
            return Err(StoreError::PathExists(canonical));
        }
        if self.nodes.len() >= self.limits.max_nodes {
            return Err(StoreError::NodeLimit {
                path: canonical,
                limit: self.limits.max_nodes,
            });
        }

        let id = NodeId(self.nodes.len());
        debug!(path = %canonical, parent = %parent, "creating node");
        self.nodes.push(Node::interior(parent, canonical.clone()));
        self.keys.push(HashMap::new());
        self.paths.insert(canonical, id);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Append a leaf to `node`'s chain, copying `key` and `value`.
    pub fn create_leaf(&mut self, node: NodeId, key: &str, value: &[u8]) -> StoreResult<&Leaf> {
        self.check(node)?;
        let key = path::clamp_key(key);
        let count = self.nodes[node.0].leaves.len();
        if count >= self.limits.max_leaves_per_node {
            return Err(StoreError::LeafLimit {
                path: self.nodes[node.0].path.clone(),
                key: key.to_string(),
                limit: self.limits.max_leaves_per_node,
            });
        }
        let value = copy_value(value, &self.limits)?;

        // First match wins, same as a linear scan.
        self.keys[node.0].entry(key.to_string()).or_insert(count);
        let leaves = &mut self.nodes[node.0].leaves;
        leaves.push(Leaf {
            owner: node,
            key: key.to_string(),
            value,
        });
        Ok(&leaves[count])
    }

    /// Resolve `path`, creating every missing segment from the root down.
    ///
    /// Nodes created before a failure are kept.
    pub fn ensure_path(&mut self, path: &str) -> StoreResult<NodeId> {
        let mut current = NodeId::ROOT;
        for prefix in path::prefixes(path) {
            current = match self.find_node_id(&prefix) {
                Some(id) => id,
                None => self.create_node(current, &prefix)?,
            };
        }
        Ok(current)
    }

    /// Store `value` under (`path`, `key`).
    ///
    /// An existing leaf has its buffer replaced by a freshly allocated one
    /// of exactly the new length; otherwise a leaf is appended.
    pub fn put(&mut self, path: &str, key: &str, value: &[u8]) -> StoreResult<WriteSummary> {
        let node = self.ensure_path(path)?;
        let key = path::clamp_key(key);
        let outcome = match self.leaf_position(node, key) {
            Some(pos) => {
                let buffer = copy_value(value, &self.limits)?;
                self.nodes[node.0].leaves[pos].value = buffer;
                PutOutcome::Updated
            }
            None => {
                self.create_leaf(node, key, value)?;
                PutOutcome::Created
            }
        };
        Ok(WriteSummary {
            outcome,
            path: self.nodes[node.0].path.clone(),
            key: key.to_string(),
        })
    }
}

/// Copy `value` into a buffer of exactly its length.
fn copy_value(value: &[u8], limits: &Limits) -> StoreResult<Bytes> {
    if value.len() > limits.max_value_len {
        return Err(StoreError::ValueTooLarge {
            len: value.len(),
            max: limits.max_value_len,
        });
    }
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(value.len())
        .map_err(|_| StoreError::Allocation {
            requested: value.len(),
        })?;
    buffer.extend_from_slice(value);
    Ok(Bytes::from(buffer))
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("node_count", &self.node_count())
            .field("leaf_count", &self.leaf_count())
            .field("lookup", &self.lookup)
            .finish()
    }
}

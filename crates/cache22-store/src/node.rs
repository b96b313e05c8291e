use bytes::Bytes;

/// Index of a node inside its [`Namespace`](crate::Namespace).
///
/// Ids are stable for the lifetime of the namespace (nodes are never
/// removed) and survive cloning, so an id taken from a snapshot names the
/// same node in any later copy of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type tag of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The single sentinel at `/`.
    Root,
    /// Any node created by a write.
    Interior,
}

/// One path segment in the namespace.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) path: String,
    pub(crate) parent: NodeId,
    pub(crate) children: Vec<NodeId>,
    pub(crate) leaves: Vec<Leaf>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            path: crate::path::ROOT_PATH.to_string(),
            parent: NodeId::ROOT,
            children: Vec::new(),
            leaves: Vec::new(),
        }
    }

    pub(crate) fn interior(parent: NodeId, path: String) -> Self {
        Self {
            kind: NodeKind::Interior,
            path,
            parent,
            children: Vec::new(),
            leaves: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Full canonical path, unique within the namespace.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Non-owning back-reference. The root is its own parent.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Child nodes in creation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Owned leaves in append order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }
}

/// One key/value entry owned by exactly one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub(crate) owner: NodeId,
    pub(crate) key: String,
    pub(crate) value: Bytes,
}

impl Leaf {
    /// The node owning this leaf.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw value bytes. Not required to be text.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Explicit value length in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

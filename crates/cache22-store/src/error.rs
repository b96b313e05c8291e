/// Errors from namespace mutations.
///
/// Lookups never fail; they return `None`. Only operations that allocate a
/// node, a leaf, or a value buffer can produce one of these.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The namespace already holds `limit` nodes.
    #[error("Failed to allocate memory for path node '{path}' (node limit {limit} reached).")]
    NodeLimit { path: String, limit: usize },

    /// The target node already owns `limit` leaves.
    #[error("Failed to allocate leaf '{key}' in path '{path}' (leaf limit {limit} reached).")]
    LeafLimit {
        path: String,
        key: String,
        limit: usize,
    },

    /// The value is longer than the configured maximum.
    #[error("Value of {len} bytes exceeds the maximum of {max} bytes.")]
    ValueTooLarge { len: usize, max: usize },

    /// The allocator refused the value buffer.
    #[error("Failed to allocate {requested} bytes for value buffer.")]
    Allocation { requested: usize },

    /// A node with this path already exists.
    #[error("Path '{0}' already exists.")]
    PathExists(String),

    /// A node id that does not belong to this namespace.
    #[error("Unknown node id {0}.")]
    UnknownNode(usize),
}

/// Result alias for namespace operations.
pub type StoreResult<T> = Result<T, StoreError>;

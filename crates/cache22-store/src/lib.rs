//! Path-addressed in-memory namespace for Cache22.
//!
//! The namespace is a tree of *nodes*, one per path segment, rooted at a
//! single sentinel whose path is `/`. Each node owns an ordered chain of
//! *leaves*, and each leaf holds one key and an opaque value buffer.
//!
//! # Key Types
//!
//! - [`Namespace`] -- the node/leaf graph and all traversal and mutation
//! - [`Node`] / [`Leaf`] -- read-only views of entries
//! - [`NamespaceHandle`] -- per-connection access under an [`IsolationMode`]
//! - [`Lookup`] / [`Limits`] -- lookup strategy and capacity bounds
//!
//! # Invariants
//!
//! 1. A canonical path names at most one node.
//! 2. Leaves under a node keep their append order; a repeated write to the
//!    same key replaces the value instead of appending.
//! 3. Nodes and leaves are never deleted.
//! 4. A failed write keeps whatever path segments it already created.

pub mod config;
pub mod error;
pub mod handle;
pub mod namespace;
pub mod node;
pub mod path;
pub mod render;

pub use config::{IsolationMode, Limits, Lookup};
pub use error::{StoreError, StoreResult};
pub use handle::NamespaceHandle;
pub use namespace::{Namespace, PutOutcome, WriteSummary};
pub use node::{Leaf, Node, NodeId, NodeKind};
pub use render::render_tree;

//! Plain-text dump of a whole namespace.

use crate::namespace::Namespace;
use crate::path;

/// Two spaces per level.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Append the full tree to `out`, depth-first from the root.
///
/// Each node prints its path indented by its depth; each of its leaves
/// prints one level deeper as `path/key ->'value'`, with the value written
/// as raw bytes.
pub fn render_tree(ns: &Namespace, out: &mut Vec<u8>) {
    for (depth, node) in ns.walk() {
        out.extend_from_slice(indent(depth).as_bytes());
        out.extend_from_slice(node.path().as_bytes());
        out.push(b'\n');

        let leaf_indent = indent(depth + 1);
        for leaf in node.leaves() {
            out.extend_from_slice(leaf_indent.as_bytes());
            out.extend_from_slice(path::join(node.path(), leaf.key()).as_bytes());
            out.extend_from_slice(b" ->'");
            out.extend_from_slice(leaf.value());
            out.extend_from_slice(b"'\n");
        }
    }
}

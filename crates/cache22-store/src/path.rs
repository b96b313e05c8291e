//! Path and key rules for the namespace.
//!
//! Every node is addressed by an absolute, `/`-delimited path. Paths are
//! canonicalized before they are stored or compared:
//!
//! - a leading `/` is implied (`a/b` is `/a/b`)
//! - empty segments are dropped (`/a//b/` is `/a/b`)
//! - `""` and `"/"` both name the root
//!
//! Paths and keys are bounded. Anything longer than [`MAX_PATH_LEN`] or
//! [`MAX_KEY_LEN`] bytes is truncated at the last character boundary that
//! fits.

/// Path of the root node.
pub const ROOT_PATH: &str = "/";

/// Maximum length of a canonical path, in bytes.
pub const MAX_PATH_LEN: usize = 255;

/// Maximum length of a leaf key, in bytes.
pub const MAX_KEY_LEN: usize = 127;

/// Truncate `s` to at most `max` bytes without splitting a character.
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Canonical form of `raw`, bounded to [`MAX_PATH_LEN`] bytes.
///
/// # Examples
///
/// ```
/// use cache22_store::path::canonicalize;
///
/// assert_eq!(canonicalize("a/b"), "/a/b");
/// assert_eq!(canonicalize("/a//b/"), "/a/b");
/// assert_eq!(canonicalize(""), "/");
/// ```
pub fn canonicalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push_str(ROOT_PATH);
    }
    let keep = truncate(&out, MAX_PATH_LEN).len();
    out.truncate(keep);
    // Truncation can leave a dangling separator.
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Bounded form of a leaf key.
pub fn clamp_key(key: &str) -> &str {
    truncate(key, MAX_KEY_LEN)
}

/// Segments of `path`, in order. The root has none.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Every accumulated prefix of `path`: `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`.
pub fn prefixes(path: &str) -> Vec<String> {
    let canonical = canonicalize(path);
    let mut acc = String::with_capacity(canonical.len());
    segments(&canonical)
        .map(|segment| {
            acc.push('/');
            acc.push_str(segment);
            acc.clone()
        })
        .collect()
}

/// Number of segments in `path`; the root is depth 0.
pub fn depth(path: &str) -> usize {
    segments(path).count()
}

/// Node path, `/`, key, as the tree dump prints a leaf. A root leaf comes
/// out as `//key`.
pub fn join(path: &str, key: &str) -> String {
    format!("{path}/{key}")
}

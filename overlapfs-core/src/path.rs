//! Slash-separated path helpers shared by every filesystem layer.
//!
//! Paths are always relative to the layer root, use `/` as separator and
//! never contain empty, `.` or `..` elements. The root itself is `"."`.

/// Check whether `name` is a valid layer path.
///
/// # Examples
/// ```
/// use overlapfs_core::path::valid_path;
/// assert!(valid_path("."));
/// assert!(valid_path("docs/hello.txt"));
/// assert!(!valid_path("/etc/passwd"));
/// assert!(!valid_path("docs/../secret"));
/// assert!(!valid_path("docs/"));
/// ```
pub fn valid_path(name: &str) -> bool {
    if name == "." {
        return true;
    }
    !name.is_empty()
        && name
            .split('/')
            .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

/// Join a directory and a name. The root directory contributes nothing.
pub fn join(dir: &str, name: &str) -> String {
    if dir == "." || dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Split a path into its directory and last element.
///
/// A path without a separator lives in `"."`.
pub fn split(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => {
            let dir = path[..pos].trim_end_matches('/');
            (if dir.is_empty() { "." } else { dir }, &path[pos + 1..])
        }
        None => (".", path),
    }
}

/// Last element of a path. The root is named `"."`.
pub fn base_name(path: &str) -> &str {
    split(path).1
}

/// Iterate over the proper ancestors of a path, nearest first, excluding the root.
pub(crate) fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .rev()
        .filter(|(_, c)| *c == '/')
        .map(move |(pos, _)| &path[..pos])
}

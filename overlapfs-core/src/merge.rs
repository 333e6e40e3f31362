//! Merge helper for overlay listings.

use std::collections::HashSet;

/// Fold `folded` into `kept`, dropping every element whose key is already
/// present, then sort by key.
///
/// On a key collision the element from `kept` wins. Keys compare byte-wise,
/// so the output order is independent of the input order.
///
/// # Examples
/// ```
/// use overlapfs_core::merge_unique;
/// let upper = vec!["b".to_string(), "a".to_string()];
/// let lower = vec!["c".to_string(), "a".to_string()];
/// assert_eq!(merge_unique(upper, lower, String::as_str), vec!["a", "b", "c"]);
/// ```
pub fn merge_unique<T, F>(kept: Vec<T>, folded: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: HashSet<String> = kept.iter().map(|item| key(item).to_string()).collect();
    let mut merged = kept;

    for item in folded {
        if seen.insert(key(&item).to_string()) {
            merged.push(item);
        }
    }

    merged.sort_by(|a, b| key(a).cmp(key(b)));
    merged
}

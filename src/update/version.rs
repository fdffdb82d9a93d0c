//! Dotted numeric version comparison.

use std::cmp::Ordering;

/// Compare two dotted version strings on their first three components.
///
/// Components are compared numerically; a missing or non-numeric component
/// counts as 0, so malformed input never fails.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    parse_version(a).cmp(&parse_version(b))
}

fn parse_version(version: &str) -> [u64; 3] {
    let mut parts = [0u64; 3];
    for (slot, part) in parts.iter_mut().zip(version.split('.')) {
        *slot = part.trim().parse().unwrap_or(0);
    }
    parts
}

//! Location path ↔ document key mapping.
//!
//! Both functions are pure. Keys are taken verbatim: no escaping,
//! normalization, or validation beyond the empty-key default.

use notepath_types::DocKey;

/// Derive the document key from the current location path.
///
/// Strips a single leading `/`. An empty remainder maps to `index`.
pub fn resolve_current_key(location_path: &str) -> DocKey {
    let rest = location_path.strip_prefix('/').unwrap_or(location_path);
    DocKey::new(rest)
}

/// Compute the location to navigate to from user-entered text.
///
/// Returns `None` (no navigation) when the input is empty after trimming.
pub fn build_navigation_target(user_input: &str) -> Option<String> {
    let trimmed = user_input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

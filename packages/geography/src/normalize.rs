//! Province name normalization.
//!
//! Province names come from two datasets that disagree on casing and
//! surrounding whitespace. Normalized names are only ever used as lookup
//! keys, never for display.

/// Canonicalizes a province name for comparison: trims surrounding
/// whitespace and lowercases.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns `true` if `name` still has content after normalization.
///
/// Empty names would match every province under substring comparison, so
/// they are never indexed or resolved.
#[must_use]
pub fn is_usable(name: &str) -> bool {
    !name.trim().is_empty()
}

/// Returns `true` if two normalized names are equal or one contains the
/// other.
#[must_use]
pub fn loosely_matches(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

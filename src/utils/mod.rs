//! Utility modules.

pub mod hash;
pub mod html;
pub mod path;

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "page")` -> `"0 pages"`
/// - `plural_count(1, "page")` -> `"1 page"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

//! Href inspection utilities.
//!
//! - Link type detection (scheme-qualified vs local)
//! - Splitting an href into path and fragment

/// Check if a link has a URL scheme (http:, mailto:, data:, etc.)
///
/// A valid scheme must:
/// - Start with an ASCII letter
/// - Only contain ASCII alphanumeric or `+`, `-`, `.` before the colon
///
/// # Examples
/// ```ignore
/// assert!(has_scheme("https://example.com"));
/// assert!(has_scheme("mailto:user@example.com"));
/// assert!(!has_scheme("/about"));
/// assert!(!has_scheme("./file.txt"));
/// ```
#[inline]
pub fn has_scheme(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        let scheme = &link[..pos];
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Check if a link is relative to the document it appears in.
///
/// Fragment-only links (`#top`) and scheme-qualified links are not.
#[inline]
pub fn is_document_relative(link: &str) -> bool {
    !has_scheme(link) && !link.starts_with('#')
}

/// Split an href on the first `#` into path and fragment.
///
/// A missing fragment and an empty fragment both yield `None`.
///
/// # Examples
/// ```ignore
/// assert_eq!(split_fragment("page.html#intro"), ("page.html", Some("intro")));
/// assert_eq!(split_fragment("page.html#"), ("page.html", None));
/// assert_eq!(split_fragment("#"), ("", None));
/// ```
#[inline]
pub fn split_fragment(href: &str) -> (&str, Option<&str>) {
    match href.split_once('#') {
        Some((path, fragment)) if !fragment.is_empty() => (path, Some(fragment)),
        Some((path, _)) => (path, None),
        None => (href, None),
    }
}

//! HTML and selector string helpers.
//!
//! - `escape_attr()` / `escape_text()` - entity escaping for serialization
//! - `is_void_element()` / `is_raw_text_element()` / `is_heading()` - tag classification
//! - `css_attr_value()` - quote a value for an attribute selector
//! - `js_template_literal()` - embed text inside a JS template literal

use std::borrow::Cow;

/// Get the HTML entity for a character that is special inside a quoted attribute.
#[inline]
fn attr_entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape an attribute value for output between double quotes.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match attr_entity(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape text content. Attribute-only entities are left alone.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match attr_entity(c).filter(|_| c != '"') {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Check if an HTML tag is a void element (no closing tag, no children).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text children are serialized without escaping.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}

/// Check if a tag is one of `h1`..`h6`.
#[inline]
pub fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Escape a value for use inside a double-quoted CSS attribute selector.
pub fn css_attr_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\\']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape text for interpolation inside a JavaScript template literal.
pub fn js_template_literal(text: &str) -> Cow<'_, str> {
    if !text.contains(['`', '\\', '$']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\\', "\\\\")
            .replace('`', "\\`")
            .replace("${", "\\${"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("normal"), "normal");
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_attr("<x>"), "&lt;x&gt;");
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; \"c\"");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tag_classification() {
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
        assert!(is_raw_text_element("script"));
        assert!(!is_raw_text_element("pre"));
        assert!(is_heading("h3"));
        assert!(!is_heading("header"));
    }

    #[test]
    fn test_css_attr_value() {
        assert_eq!(css_attr_value("page.html#x"), "page.html#x");
        assert_eq!(css_attr_value(r#"a"b"#), r#"a\"b"#);
    }

    #[test]
    fn test_js_template_literal() {
        assert_eq!(js_template_literal(".body"), ".body");
        assert_eq!(js_template_literal("`${x}`"), "\\`\\${x}\\`");
    }
}

//! Detached HTML fragments.
//!
//! Rendered page bodies are parsed once (html5ever, via `scraper`) into an
//! owned tree that can be cloned, pruned, re-attributed and serialized
//! independently of the source document. Tips are built by copying pieces of
//! this tree.
//!
//! - [`Document`] - a parsed page, used for CSS selection
//! - [`Fragment`] - a list of top-level nodes
//! - [`Element`] - a tag with attributes and children
//! - [`Located`] - an element together with its sibling context

mod parse;

use std::fmt::Write;

pub use parse::Document;

use crate::utils::html::{escape_attr, escape_text, is_raw_text_element, is_void_element};

/// A node in a detached fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Decoded text.
    Text(String),
}

impl Node {
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            Self::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String, raw_text: bool) {
        match self {
            Self::Element(elem) => elem.write_html(out),
            Self::Text(text) if raw_text => out.push_str(text),
            Self::Text(text) => out.push_str(&escape_text(text)),
        }
    }
}

/// An HTML element with decoded attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    /// Non-empty `id` attribute.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    #[inline]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    /// Element children, skipping text.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant (not `self`) matching `pred`, in document order.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<Located<'_>> {
        find_in(&self.children, &pred)
    }

    /// Remove every descendant element matching `pred`, along with its subtree.
    pub fn remove_descendants(&mut self, pred: &impl Fn(&Element) -> bool) {
        remove_in(&mut self.children, pred);
    }

    /// Visit `self` and every descendant element mutably.
    pub fn for_each_element_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(elem) = child {
                elem.for_each_element_mut(f);
            }
        }
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Serialize the element including itself (outer HTML).
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
        }
        out.push('>');

        if is_void_element(&self.name) {
            return;
        }

        let raw_text = is_raw_text_element(&self.name);
        for child in &self.children {
            child.write_html(out, raw_text);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// An element in the context of its siblings.
///
/// Gives access to the following siblings without parent pointers.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub element: &'a Element,
    siblings: &'a [Node],
    index: usize,
}

impl<'a> Located<'a> {
    /// Following sibling elements, skipping text nodes.
    pub fn next_element_siblings(&self) -> impl Iterator<Item = Located<'a>> + 'a {
        let siblings = self.siblings;
        siblings
            .iter()
            .enumerate()
            .skip(self.index + 1)
            .filter_map(move |(index, node)| {
                node.as_element().map(|element| Located {
                    element,
                    siblings,
                    index,
                })
            })
    }

    #[inline]
    pub fn next_element_sibling(&self) -> Option<Located<'a>> {
        self.next_element_siblings().next()
    }
}

/// A parsed, owned HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    /// Parse an HTML snippet in body context.
    pub fn parse(html: &str) -> Self {
        parse::parse_fragment(html)
    }

    /// Every element in document order, with sibling context.
    pub fn elements(&self) -> Vec<Located<'_>> {
        let mut out = Vec::new();
        walk(&self.nodes, &mut |located| out.push(located));
        out
    }

    /// First element matching `pred`, in document order.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<Located<'_>> {
        find_in(&self.nodes, &pred)
    }

    /// Visit every element mutably.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        for node in &mut self.nodes {
            if let Node::Element(elem) = node {
                elem.for_each_element_mut(&mut f);
            }
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out, false);
        }
        out
    }
}

fn walk<'a>(nodes: &'a [Node], f: &mut impl FnMut(Located<'a>)) {
    for (index, node) in nodes.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        f(Located {
            element,
            siblings: nodes,
            index,
        });
        walk(&element.children, f);
    }
}

fn find_in<'a>(nodes: &'a [Node], pred: &impl Fn(&Element) -> bool) -> Option<Located<'a>> {
    for (index, node) in nodes.iter().enumerate() {
        let Node::Element(element) = node else {
            continue;
        };
        if pred(element) {
            return Some(Located {
                element,
                siblings: nodes,
                index,
            });
        }
        if let Some(found) = find_in(&element.children, pred) {
            return Some(found);
        }
    }
    None
}

fn remove_in(nodes: &mut Vec<Node>, pred: &impl Fn(&Element) -> bool) {
    nodes.retain(|node| !matches!(node, Node::Element(elem) if pred(elem)));
    for node in nodes {
        if let Node::Element(elem) = node {
            remove_in(&mut elem.children, pred);
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(elem) => collect_text(&elem.children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_simple() {
        let html = r#"<p class="x">Hello <em>world</em></p>"#;
        assert_eq!(Fragment::parse(html).to_html(), html);
    }

    #[test]
    fn test_void_element_serialization() {
        let frag = Fragment::parse(r#"<p><img src="a.png"> text</p>"#);
        assert_eq!(frag.to_html(), r#"<p><img src="a.png"> text</p>"#);
    }

    #[test]
    fn test_attr_entities_decoded() {
        let frag = Fragment::parse(r#"<a href="?a=1&amp;b=2">x</a>"#);
        let a = frag.find(|e| e.name == "a").unwrap().element;
        assert_eq!(a.attr("href"), Some("?a=1&b=2"));
        assert!(frag.to_html().contains("?a=1&amp;b=2"));
    }

    #[test]
    fn test_set_attr_and_class() {
        let mut elem = Element::new("h1");
        elem.add_class("tippy-header");
        elem.set_attr("style", "margin-top: 0;");
        elem.add_class("tippy-header");
        assert_eq!(
            elem.to_html(),
            r#"<h1 class="tippy-header" style="margin-top: 0;"></h1>"#
        );

        let frag = Fragment::parse(r#"<h1 class="title">T</h1>"#);
        let mut h1 = frag.find(|e| e.name == "h1").unwrap().element.clone();
        h1.add_class("tippy-header");
        assert_eq!(h1.attr("class"), Some("title tippy-header"));
    }

    #[test]
    fn test_next_element_siblings_skip_text() {
        let frag = Fragment::parse("<div><h1>T</h1>\n<p>a</p>\n<p>b</p></div>");
        let h1 = frag.find(|e| e.name == "h1").unwrap();
        let names: Vec<_> = h1
            .next_element_siblings()
            .map(|s| s.element.name.as_str())
            .collect();
        assert_eq!(names, ["p", "p"]);
    }

    #[test]
    fn test_remove_descendants() {
        let frag = Fragment::parse(r##"<h2>Title<a class="headerlink" href="#t">¶</a></h2>"##);
        let mut h2 = frag.find(|e| e.name == "h2").unwrap().element.clone();
        h2.remove_descendants(&|e| e.has_class("headerlink"));
        assert_eq!(h2.to_html(), "<h2>Title</h2>");
    }

    #[test]
    fn test_text_content() {
        let frag = Fragment::parse("<p>a &amp; <b>b</b></p>");
        assert_eq!(frag.text_content(), "a & b");
    }

    #[test]
    fn test_text_escaped_on_output() {
        let frag = Fragment::parse("<p>a &lt; b &amp; c</p><script>if (a < b && c) {}</script>");
        assert_eq!(
            frag.to_html(),
            "<p>a &lt; b &amp; c</p><script>if (a < b && c) {}</script>"
        );
    }
}

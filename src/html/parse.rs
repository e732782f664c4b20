//! html5ever DOM (via `scraper`) to owned fragment conversion.

use scraper::{ElementRef, Html, Node as DomNode, Selector};

use super::{Element, Fragment, Node};

/// A rendered page, parsed once for tip selection.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "body")
    }

    /// Content of `<body>` as a detached fragment.
    pub fn body_fragment(&self) -> Fragment {
        let root = self.body().unwrap_or_else(|| self.html.root_element());
        Fragment {
            nodes: convert_children(root),
        }
    }

    /// Elements inside `<body>` matched by `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<Element> {
        let root = self.body().unwrap_or_else(|| self.html.root_element());
        root.select(selector).map(convert_element).collect()
    }
}

/// Parse an HTML snippet in body context.
pub(super) fn parse_fragment(html: &str) -> Fragment {
    let dom = Html::parse_fragment(html);
    Fragment {
        nodes: convert_children(dom.root_element()),
    }
}

/// Attributes keep their source order. Comments are dropped.
fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut out = Element::new(value.name());
    for (key, val) in value.attrs() {
        out.set_attr(key, val);
    }
    out.children = convert_children(element);
    out
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            DomNode::Text(text) => Some(Node::Text(String::from(&**text))),
            DomNode::Element(_) => ElementRef::wrap(child).map(|e| Node::Element(convert_element(e))),
            _ => None,
        })
        .collect()
}

//! Tip content extraction.
//!
//! Builds the HTML shown in a tooltip for every identifier on a page, plus
//! one tip for the page as a whole. Rules are applied in order; a later rule
//! overwrites an earlier one for the same identifier:
//!
//! 1. Page tip: first heading and its following paragraphs
//! 2. Elements matched by the tip selector, copied whole
//! 3. Definition terms, with a trimmed copy of their definition
//! 4. Sections, summarized like the page tip
//! 5. Display math blocks, without equation numbers

use rustc_hash::FxHashMap;

use crate::html::{Element, Fragment, Located, Node};
use crate::utils::html::is_heading;

/// Paragraphs kept from a definition body.
const MAX_DD_PARAGRAPHS: usize = 6;

/// Tip HTML for one page, keyed by canonical identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTips {
    page: Option<String>,
    by_id: FxHashMap<String, String>,
}

impl PageTips {
    /// Extract every tip from a rendered page body. `selected` holds the
    /// elements matched by the tip selector, in document order.
    pub fn extract(body: &Fragment, selected: &[Element]) -> Self {
        let mut tips = Self::default();

        if let Some(heading) = body.find(is_heading_element) {
            tips.page = Some(heading_summary(heading, true));
        }

        for element in selected {
            if let Some(id) = element.id() {
                tips.by_id.insert(id.to_string(), element.to_html());
            }
        }

        for located in body.elements() {
            let element = located.element;
            let Some(id) = element.id() else {
                continue;
            };

            let html = match element.name.as_str() {
                "dt" => Some(definition_tip(located)),
                "section" => element
                    .find(is_heading_element)
                    .map(|heading| heading_summary(heading, true)),
                "div" if is_math_block(element) => {
                    let mut copy = element.clone();
                    copy.remove_descendants(&|e| e.name == "span" && e.has_class("eqno"));
                    Some(copy.to_html())
                }
                _ => None,
            };

            if let Some(html) = html {
                tips.by_id.insert(id.to_string(), html);
            }
        }

        tips
    }

    /// Tip for the page itself.
    #[inline]
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// Tip for a canonical identifier.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.by_id.len() + usize::from(self.page.is_some())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn is_heading_element(element: &Element) -> bool {
    is_heading(&element.name)
}

fn is_math_block(element: &Element) -> bool {
    ["math", "notranslate", "nohighlight"]
        .iter()
        .all(|class| element.has_class(class))
}

/// Copy of `element` without in-page navigation decorations.
fn without_headerlinks(element: &Element) -> Element {
    let mut copy = element.clone();
    copy.remove_descendants(&|e| e.has_class("headerlink"));
    copy
}

/// A heading followed by the content that introduces it.
///
/// Following siblings are scanned for the first paragraph or section. A
/// paragraph contributes itself and one directly following paragraph. A
/// section contributes its own heading summary, chained recursively.
/// The outermost heading is restyled to sit flush at the top of the tip.
fn heading_summary(heading: Located<'_>, outermost: bool) -> String {
    let mut copy = without_headerlinks(heading.element);
    if outermost {
        copy.set_attr("style", "margin-top: 0;");
        copy.add_class("tippy-header");
    }
    let mut out = copy.to_html();

    for sibling in heading.next_element_siblings() {
        match sibling.element.name.as_str() {
            "section" => {
                if let Some(sub) = sibling.element.find(is_heading_element) {
                    out.push_str(&heading_summary(sub, false));
                }
                break;
            }
            "p" => {
                out.push_str(&without_headerlinks(sibling.element).to_html());
                if let Some(next) = sibling.next_element_sibling()
                    && next.element.name == "p"
                {
                    out.push_str(&without_headerlinks(next.element).to_html());
                }
                break;
            }
            _ => {}
        }
    }

    out
}

/// A definition term, followed by a trimmed copy of its definition.
fn definition_tip(term: Located<'_>) -> String {
    let mut out = without_headerlinks(term.element).to_html();

    if let Some(next) = term.next_element_sibling()
        && next.element.name == "dd"
    {
        let mut dd = next.element.clone();
        dd.children = next
            .element
            .element_children()
            .take_while(|child| child.name == "p")
            .take(MAX_DD_PARAGRAPHS)
            .map(|child| Node::Element(without_headerlinks(child)))
            .collect();
        out.push_str(&dd.to_html());
    }

    out
}

//! Per-page selector maps.
//!
//! A page's map binds CSS selectors for its anchors to tip HTML. Entries are
//! added per source, then cross-page and same-page references, and finally
//! custom tips, so a later entry for the same selector wins.

use std::collections::BTreeMap;

use crate::config::TipSettings;
use crate::external::ExternalTips;
use crate::html::Fragment;
use crate::page::{DOI_PATH, PageArtifact, WIKI_PATH};
use crate::utils::html::css_attr_value;
use crate::utils::path::{posix, route::is_document_relative};

use super::Site;

/// Selector → tip HTML, ordered by selector.
pub type SelectorMap = BTreeMap<String, String>;

/// `a[href="<href>"]`
fn exact(href: &str) -> String {
    format!(r#"a[href="{}"]"#, css_attr_value(href))
}

/// `a[href^="<prefix>"]`
fn prefixed(prefix: &str) -> String {
    format!(r#"a[href^="{}"]"#, css_attr_value(prefix))
}

/// Build the selector map for `page`.
pub fn selector_map(
    site: &Site,
    page: &PageArtifact,
    settings: &TipSettings,
    external: &ExternalTips,
) -> SelectorMap {
    let mut map = SelectorMap::new();
    let refs = &page.refs;

    for title in &refs.external.wiki {
        if let Some(html) = external.wiki.get(title) {
            map.insert(exact(&format!("{WIKI_PATH}{title}")), html.to_string());
            map.insert(prefixed(&format!("{WIKI_PATH}{title}#")), html.to_string());
        }
    }
    for doi in &refs.external.doi {
        if let Some(html) = external.doi.get(doi) {
            map.insert(exact(&format!("{DOI_PATH}{doi}")), html.to_string());
        }
    }
    for url in &refs.external.rtd {
        if let Some(html) = external.rtd.get(url) {
            map.insert(exact(url), html.to_string());
        }
    }

    let page_dir = posix::dirname(&page.name);
    for pending in &refs.pending {
        let anchor = pending.anchor.as_deref();

        let Some(ref_name) = pending.page.as_deref() else {
            match anchor {
                None => {
                    if let Some(html) = page.tips.page() {
                        map.insert(exact("#"), html.to_string());
                    }
                }
                Some(target) => {
                    if let Some(html) = page.tip_for(target) {
                        map.insert(exact(&format!("#{target}")), html.to_string());
                    }
                }
            }
            continue;
        };

        let Some(target_page) = site.get(ref_name) else {
            continue;
        };
        let relpage = posix::normpath(&posix::relpath(ref_name, page_dir));
        let relfolder = posix::dirname(&relpage);

        let (selector, html) = match anchor {
            None => (exact(&format!("{relpage}.html")), target_page.tips.page()),
            Some(target) => (
                exact(&format!("{relpage}.html#{target}")),
                target_page.tip_for(target),
            ),
        };
        if let Some(html) = html {
            map.insert(selector, rewrite_local_attrs(html, relfolder));
        }
    }

    for href in &refs.custom {
        if let Some(html) = settings.custom_tips.get(href) {
            map.insert(exact(href), html.clone());
        }
    }

    map
}

/// Re-base document-relative `href` and `src` values by `relfolder`.
///
/// Tip HTML borrowed from another page carries links relative to that page;
/// prefixing them with the folder of the source page, as seen from the
/// current one, keeps them pointing at the same files.
pub fn rewrite_local_attrs(html: &str, relfolder: &str) -> String {
    if relfolder.is_empty() {
        return html.to_string();
    }

    let mut fragment = Fragment::parse(html);
    fragment.for_each_element_mut(|element| {
        for key in ["href", "src"] {
            let rebased = element
                .attr(key)
                .filter(|value| is_document_relative(value))
                .map(|value| posix::normpath(&posix::join(relfolder, value)));
            if let Some(value) = rebased {
                element.set_attr(key, value);
            }
        }
    });
    fragment.to_html()
}

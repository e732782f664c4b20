//! Reference scanning.
//!
//! Every `<a href>` on a page is classified once, in priority order:
//!
//! | Link                                | Recorded as            |
//! |-------------------------------------|------------------------|
//! | exact custom tip key                | custom ref             |
//! | full match of a skip regex          | nothing                |
//! | `https://doi.org/<doi>`             | DOI key                |
//! | hosted-docs prefix                  | hosted-docs key (href) |
//! | `#target`, `#`                      | same-page ref          |
//! | `https://en.wikipedia.org/wiki/<t>` | wiki key               |
//! | `<known page>.html[#target]`        | cross-page ref         |

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::config::TipSettings;
use crate::html::Fragment;
use crate::utils::path::{posix, route::split_fragment};

pub const WIKI_PATH: &str = "https://en.wikipedia.org/wiki/";
pub const DOI_PATH: &str = "https://doi.org/";

/// Names of every page in the site.
pub type PageNames = FxHashSet<String>;

/// A link to a page-local target. `page: None` is the current page;
/// `anchor: None` is the page itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageRef {
    pub page: Option<String>,
    pub anchor: Option<String>,
}

impl PageRef {
    pub fn new(page: Option<&str>, anchor: Option<&str>) -> Self {
        Self {
            page: page.map(str::to_string),
            anchor: anchor.map(str::to_string),
        }
    }
}

/// Keys referenced on a page, per external source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalKeys {
    pub wiki: BTreeSet<String>,
    pub doi: BTreeSet<String>,
    pub rtd: BTreeSet<String>,
}

/// Everything a page links to that may need a tooltip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRefs {
    pub pending: BTreeSet<PageRef>,
    pub custom: BTreeSet<String>,
    pub external: ExternalKeys,
}

/// Classification of a single href.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Link<'a> {
    Custom,
    Doi(&'a str),
    Rtd,
    Wiki(&'a str),
    Local(PageRef),
}

impl PageRefs {
    /// Scan all anchors in `body`, a rendering of `page`.
    pub fn scan(body: &Fragment, page: &str, settings: &TipSettings, pages: &PageNames) -> Self {
        let page_dir = posix::dirname(page);
        let mut refs = Self::default();

        for located in body.elements() {
            let element = located.element;
            if element.name != "a" {
                continue;
            }
            let Some(href) = element.attr("href") else {
                continue;
            };

            match classify(href, page_dir, settings, pages) {
                Some(Link::Custom) => {
                    refs.custom.insert(href.to_string());
                }
                Some(Link::Doi(doi)) => {
                    refs.external.doi.insert(doi.to_string());
                }
                Some(Link::Rtd) => {
                    refs.external.rtd.insert(href.to_string());
                }
                Some(Link::Wiki(title)) => {
                    refs.external.wiki.insert(title.to_string());
                }
                Some(Link::Local(r)) => {
                    refs.pending.insert(r);
                }
                None => {}
            }
        }

        refs
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
            && self.custom.is_empty()
            && self.external.wiki.is_empty()
            && self.external.doi.is_empty()
            && self.external.rtd.is_empty()
    }
}

fn classify<'a>(
    href: &'a str,
    page_dir: &str,
    settings: &TipSettings,
    pages: &PageNames,
) -> Option<Link<'a>> {
    if settings.custom_tips.contains_key(href) {
        return Some(Link::Custom);
    }
    if settings.is_skipped(href) {
        return None;
    }
    if settings.enable_doitips
        && let Some(doi) = href.strip_prefix(DOI_PATH)
    {
        return Some(Link::Doi(doi));
    }
    if settings.rtd_urls.iter().any(|prefix| href.starts_with(prefix.as_str())) {
        return Some(Link::Rtd);
    }

    let (path, anchor) = split_fragment(href);
    if path.is_empty() {
        return Some(Link::Local(PageRef::new(None, anchor)));
    }
    if settings.enable_wikitips
        && let Some(title) = path.strip_prefix(WIKI_PATH)
    {
        return Some(Link::Wiki(title));
    }

    let target = path.strip_suffix(".html")?;
    let name = posix::normpath(&posix::join(page_dir, target));
    pages
        .contains(&name)
        .then(|| Link::Local(PageRef::new(Some(&name), anchor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigDiagnostics, MathRenderer, TipsConfig};

    fn settings(extra: &str) -> TipSettings {
        let config: TipsConfig = toml::from_str(extra).unwrap();
        config
            .compile(MathRenderer::Mathjax, &mut ConfigDiagnostics::new())
            .unwrap()
    }

    fn pages() -> PageNames {
        ["index", "guide/install", "guide/usage", "api"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn scan(html: &str, page: &str, settings: &TipSettings) -> PageRefs {
        PageRefs::scan(&Fragment::parse(html), page, settings, &pages())
    }

    #[test]
    fn test_local_refs() {
        let refs = scan(
            r##"<a href="#">top</a><a href="#intro">i</a><a href="usage.html#opts">u</a>
                <a href="../api.html">api</a><a href="install.html#">x</a>"##,
            "guide/install",
            &settings(""),
        );
        let expected: BTreeSet<_> = [
            PageRef::new(None, None),
            PageRef::new(None, Some("intro")),
            PageRef::new(Some("guide/usage"), Some("opts")),
            PageRef::new(Some("api"), None),
            PageRef::new(Some("guide/install"), None),
        ]
        .into_iter()
        .collect();
        assert_eq!(refs.pending, expected);
    }

    #[test]
    fn test_unknown_pages_and_other_links_dropped() {
        let refs = scan(
            r#"<a href="missing.html#x">m</a><a href="https://example.com">e</a>
               <a href="file.pdf">f</a><a>no href</a>"#,
            "index",
            &settings(""),
        );
        assert!(refs.is_empty());
    }

    #[test]
    fn test_external_keys() {
        let refs = scan(
            r#"<a href="https://en.wikipedia.org/wiki/Rust_(programming_language)#History">w</a>
               <a href="https://doi.org/10.1000/xyz">d</a>
               <a href="https://docs.example.org/en/latest/api.html#f">r</a>"#,
            "index",
            &settings(r#"rtd_urls = ["https://docs.example.org/en/latest"]"#),
        );
        assert_eq!(
            refs.external.wiki.iter().collect::<Vec<_>>(),
            ["Rust_(programming_language)"]
        );
        assert_eq!(refs.external.doi.iter().collect::<Vec<_>>(), ["10.1000/xyz"]);
        assert_eq!(
            refs.external.rtd.iter().collect::<Vec<_>>(),
            ["https://docs.example.org/en/latest/api.html#f"]
        );
    }

    #[test]
    fn test_sources_disabled() {
        let refs = scan(
            r#"<a href="https://en.wikipedia.org/wiki/Rust">w</a><a href="https://doi.org/10.1/x">d</a>"#,
            "index",
            &settings("enable_wikitips = false\nenable_doitips = false"),
        );
        assert!(refs.is_empty());
    }

    #[test]
    fn test_custom_wins_over_doi() {
        let refs = scan(
            r#"<a href="https://doi.org/10.1/x">d</a>"#,
            "index",
            &settings("[custom_tips]\n\"https://doi.org/10.1/x\" = \"<b>custom</b>\""),
        );
        assert!(refs.custom.contains("https://doi.org/10.1/x"));
        assert!(refs.external.doi.is_empty());
    }

    #[test]
    fn test_skip_regex() {
        let refs = scan(
            r##"<a href="#private">p</a><a href="#public">q</a>"##,
            "index",
            &settings(r##"skip_urls = ["#priv.*"]"##),
        );
        assert_eq!(
            refs.pending.into_iter().collect::<Vec<_>>(),
            [PageRef::new(None, Some("public"))]
        );
    }
}

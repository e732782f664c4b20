//! Per-page scanning (phase 1).
//!
//! Each page with a document tree is scanned once into an immutable
//! [`PageArtifact`]: its identifier aliases, tip HTML, outgoing references
//! and script location. Pages are scanned independently of each other.

mod doctree;
mod output;
mod refs;
mod tips;

pub use doctree::{DocNode, IdAliases};
pub use output::{STATIC_DIR, SCRIPT_DIR, ScriptPath};
pub use refs::{DOI_PATH, ExternalKeys, PageNames, PageRefs, WIKI_PATH};
pub use tips::PageTips;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::TipSettings;
use crate::html::Document;

/// Suffix of the document tree sidecar next to each rendered page.
pub const DOCTREE_SUFFIX: &str = ".doctree.json";

/// A rendered page discovered in the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    /// `/`-separated name without extension (`guide/install`)
    pub name: String,
    pub html: PathBuf,
}

impl PageInput {
    pub fn new(name: impl Into<String>, html: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
        }
    }

    /// `guide/install.html` -> `guide/install.doctree.json`
    pub fn doctree_path(&self) -> PathBuf {
        let file = self
            .html
            .file_stem()
            .map(|stem| format!("{}{DOCTREE_SUFFIX}", stem.to_string_lossy()))
            .unwrap_or_else(|| DOCTREE_SUFFIX.to_string());
        self.html.with_file_name(file)
    }
}

/// Everything phase 2 needs to know about one page.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    pub name: String,
    pub aliases: IdAliases,
    pub tips: PageTips,
    pub refs: PageRefs,
    pub script: ScriptPath,
}

impl PageArtifact {
    /// Tip for `anchor` on this page, resolved through the alias table.
    pub fn tip_for(&self, anchor: &str) -> Option<&str> {
        self.aliases
            .resolve(anchor)
            .and_then(|canonical| self.tips.get(canonical))
    }
}

/// Scan one page. Pages without a document tree yield `None`.
pub fn scan_page(
    input: &PageInput,
    settings: &TipSettings,
    pages: &PageNames,
    build_id: &str,
) -> Result<Option<PageArtifact>> {
    let doctree_path = input.doctree_path();
    if !doctree_path.is_file() {
        crate::debug!("scan"; "{}: no document tree, skipped", input.name);
        return Ok(None);
    }

    let tree = DocNode::load(&doctree_path)?;
    let html = std::fs::read_to_string(&input.html)
        .with_context(|| format!("Failed to read {}", input.html.display()))?;

    Ok(Some(scan_rendered(&input.name, &tree, &html, settings, pages, build_id)))
}

/// Scan an already-loaded page.
pub fn scan_rendered(
    name: &str,
    tree: &DocNode,
    html: &str,
    settings: &TipSettings,
    pages: &PageNames,
    build_id: &str,
) -> PageArtifact {
    let doc = Document::parse(html);
    let body = doc.body_fragment();
    let selected = doc.select(&settings.tip_selector);

    PageArtifact {
        name: name.to_string(),
        aliases: IdAliases::from_tree(tree),
        tips: PageTips::extract(&body, &selected),
        refs: PageRefs::scan(&body, name, settings, pages),
        script: ScriptPath::new(name, build_id),
    }
}

/// Whether `path` is a document tree sidecar rather than a page.
pub fn is_doctree_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(DOCTREE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refs::PageRef;
    use std::fs;
    use tempfile::TempDir;

    const ID: &str = "0123456789abcdef";

    fn pages() -> PageNames {
        ["index", "guide/install"].into_iter().map(String::from).collect()
    }

    #[test]
    fn test_doctree_path() {
        let input = PageInput::new("guide/install", "/site/content/guide/install.html");
        assert_eq!(
            input.doctree_path(),
            PathBuf::from("/site/content/guide/install.doctree.json")
        );
        assert!(is_doctree_file(&input.doctree_path()));
        assert!(!is_doctree_file(&input.html));
    }

    #[test]
    fn test_page_without_doctree_skipped() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("index.html");
        fs::write(&html, "<h1>Home</h1>").unwrap();

        let input = PageInput::new("index", &html);
        let artifact = scan_page(&input, &TipSettings::default(), &pages(), ID).unwrap();
        assert!(artifact.is_none());
    }

    #[test]
    fn test_scan_page_with_doctree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        let html = dir.path().join("guide/install.html");
        fs::write(
            &html,
            r##"<html><head><title>x</title></head><body>
                <section id="install"><span id="setup"></span><h1>Install</h1><p>Steps.</p>
                <a href="#setup">s</a><a href="../index.html">home</a></section>
            </body></html>"##,
        )
        .unwrap();
        fs::write(
            dir.path().join("guide/install.doctree.json"),
            r#"{"children": [{"ids": ["install", "setup"]}]}"#,
        )
        .unwrap();

        let input = PageInput::new("guide/install", &html);
        let artifact = scan_page(&input, &TipSettings::default(), &pages(), ID)
            .unwrap()
            .unwrap();

        assert_eq!(artifact.name, "guide/install");
        assert!(artifact.tips.page().unwrap().contains("Install"));
        assert_eq!(artifact.tip_for("setup"), artifact.tips.get("install"));
        assert!(artifact.tip_for("setup").is_some());
        assert!(artifact.refs.pending.contains(&PageRef::new(None, Some("setup"))));
        assert!(artifact.refs.pending.contains(&PageRef::new(Some("index"), None)));
        assert_eq!(artifact.script.static_relative(), format!("tippy/guide/install.{ID}.js"));
    }

    #[test]
    fn test_head_is_not_scanned() {
        let tree = DocNode::default();
        let artifact = scan_rendered(
            "index",
            &tree,
            r#"<html><head><title>Not body</title><link rel="next" href="guide/install.html"></head><body><h2>Real</h2></body></html>"#,
            &TipSettings::default(),
            &pages(),
            ID,
        );
        assert!(artifact.tips.page().unwrap().contains("Real"));
        assert!(artifact.refs.pending.is_empty());
    }
}

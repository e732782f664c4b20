//! Document trees and identifier aliasing.
//!
//! The host renders an element carrying several identifiers with only the
//! first one on the element itself; the others become empty marker spans.
//! Links may use any of them, so each identifier is mapped back to the
//! first (canonical) one before tips are looked up.

use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// A node of the host's document tree. Only identifiers matter here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocNode {
    #[serde(default)]
    ids: Option<Vec<String>>,
    #[serde(default)]
    pub children: Vec<DocNode>,
}

impl DocNode {
    #[cfg(test)]
    pub fn with_ids(ids: &[&str], children: Vec<DocNode>) -> Self {
        Self {
            ids: Some(ids.iter().map(|s| s.to_string()).collect()),
            children,
        }
    }

    /// Identifier list, if this node carries one.
    #[inline]
    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    /// Read a `<page>.doctree.json` sidecar.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document tree {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid document tree {}", path.display()))
    }

    /// Visit this node and all descendants, depth first.
    fn walk<'a>(&'a self, f: &mut impl FnMut(&'a DocNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// Identifier → canonical identifier, for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAliases(FxHashMap<String, String>);

impl IdAliases {
    /// Build the alias table for a document tree.
    pub fn from_tree(root: &DocNode) -> Self {
        let mut map = FxHashMap::default();
        root.walk(&mut |node| {
            let Some([first, rest @ ..]) = node.ids() else {
                return;
            };
            map.insert(first.clone(), first.clone());
            for id in rest {
                map.insert(id.clone(), first.clone());
            }
        });
        Self(map)
    }

    /// Canonical identifier for `id`, if it exists on the page.
    #[inline]
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> DocNode {
        DocNode::with_ids(
            &[],
            vec![
                DocNode::with_ids(
                    &["intro", "getting-started", "index-0"],
                    vec![DocNode::with_ids(&["note"], vec![])],
                ),
                DocNode::default(),
            ],
        )
    }

    #[test]
    fn test_aliases_map_to_first() {
        let aliases = IdAliases::from_tree(&sample());
        assert_eq!(aliases.resolve("intro"), Some("intro"));
        assert_eq!(aliases.resolve("getting-started"), Some("intro"));
        assert_eq!(aliases.resolve("index-0"), Some("intro"));
        assert_eq!(aliases.resolve("note"), Some("note"));
        assert_eq!(aliases.resolve("missing"), None);
        assert_eq!(aliases.len(), 4);
    }

    #[test]
    fn test_alias_idempotent() {
        let aliases = IdAliases::from_tree(&sample());
        for id in ["intro", "getting-started", "index-0", "note"] {
            let canonical = aliases.resolve(id).unwrap();
            assert_eq!(aliases.resolve(canonical), Some(canonical));
        }
    }

    #[test]
    fn test_nodes_without_ids_skipped() {
        let tree: DocNode =
            serde_json::from_str(r#"{"children": [{"ids": []}, {"children": [{"ids": ["x"]}]}]}"#)
                .unwrap();
        let aliases = IdAliases::from_tree(&tree);
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.resolve("x"), Some("x"));
    }

    #[test]
    fn test_load_sidecar() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.doctree.json");
        std::fs::write(&path, r#"{"ids": ["top"], "children": []}"#).unwrap();
        let tree = DocNode::load(&path).unwrap();
        assert_eq!(tree.ids(), Some(&["top".to_string()][..]));

        std::fs::write(&path, "not json").unwrap();
        assert!(DocNode::load(&path).is_err());
    }
}

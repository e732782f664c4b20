//! Persistent key → tip HTML caches.
//!
//! Each source keeps a flat JSON object in the output directory. Entries are
//! only ever added, so a key fetched once is never fetched again.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One source's cache, bound to its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TipCache {
    /// Load `path`, starting empty if it does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache {}", path.display()))?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt cache {}", path.display()))?;

        crate::debug!("cache"; "restored {} entries from {}", entries.len(), file_name(&path));
        Ok(Self { path, entries })
    }

    /// Write all entries back to the cache file.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write cache {}", self.path.display()))?;

        crate::debug!("cache"; "saved {} entries to {}", self.entries.len(), file_name(&self.path));
        Ok(())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, html: impl Into<String>) {
        self.entries.insert(key.into(), html.into());
    }

    /// Keys from `wanted` that are not cached yet.
    pub fn missing<'a>(&self, wanted: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
        wanted
            .into_iter()
            .filter(|key| !self.contains(key))
            .map(String::as_str)
            .collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = TipCache::load(dir.path().join("tippy_wiki_cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/tippy_doi_cache.json");

        let mut cache = TipCache::load(&path).unwrap();
        cache.insert("10.1/a", "<div>A</div>");
        cache.persist().unwrap();

        let reloaded = TipCache::load(&path).unwrap();
        assert_eq!(reloaded.get("10.1/a"), Some("<div>A</div>"));
        assert_eq!(reloaded, cache);
    }

    #[test]
    fn test_reads_flat_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tippy_rtd_cache.json");
        fs::write(&path, r#"{"https://x/a.html": "<p>a</p>"}"#).unwrap();

        let cache = TipCache::load(&path).unwrap();
        assert!(cache.contains("https://x/a.html"));

        let wanted: Vec<String> = vec!["https://x/a.html".into(), "https://x/b.html".into()];
        assert_eq!(cache.missing(&wanted), ["https://x/b.html"]);
    }

    #[test]
    fn test_corrupt_cache_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tippy_wiki_cache.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(TipCache::load(&path).is_err());
    }
}

//! Host-facing manifest: which scripts each page loads, and whether its
//! tooltips need math typesetting.
//!
//! ```json
//! {
//!   "guide/install": {
//!     "scripts": ["https://unpkg.com/tippy.js@6", "tippy/guide/install.<id>.js"],
//!     "has_math": false
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::TipSettings;
use crate::page::ScriptPath;

/// Manifest file name in the output directory.
pub const MANIFEST_FILE: &str = "tippy_manifest.json";

/// One page's manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Loaded deferred, in order; the page script is last and relative to
    /// the static directory.
    pub scripts: Vec<String>,
    pub has_math: bool,
}

impl PageEntry {
    pub fn new(settings: &TipSettings, script: &ScriptPath, has_math: bool) -> Self {
        let mut scripts = settings.js_files.clone();
        scripts.push(script.static_relative());
        Self { scripts, has_math }
    }
}

/// Page name → entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(BTreeMap<String, PageEntry>);

impl Manifest {
    pub fn insert(&mut self, page: &str, entry: PageEntry) {
        self.0.insert(page.to_string(), entry);
    }

    #[cfg(test)]
    pub fn get(&self, page: &str) -> Option<&PageEntry> {
        self.0.get(page)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn path(output: &Path) -> PathBuf {
        output.join(MANIFEST_FILE)
    }

    pub fn write(&self, output: &Path) -> Result<()> {
        fs::create_dir_all(output)?;
        let path = Self::path(output);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    #[cfg(test)]
    pub fn read(output: &Path) -> Result<Self> {
        let path = Self::path(output);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid manifest {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_scripts_order() {
        let script = ScriptPath::new("guide/install", "0123456789abcdef");
        let entry = PageEntry::new(&TipSettings::default(), &script, true);
        assert_eq!(
            entry.scripts,
            [
                "https://unpkg.com/@popperjs/core@2",
                "https://unpkg.com/tippy.js@6",
                "tippy/guide/install.0123456789abcdef.js",
            ]
        );
        assert!(entry.has_math);
    }

    #[test]
    fn test_write_format() {
        let dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        manifest.insert(
            "index",
            PageEntry {
                scripts: vec!["tippy/index.0123456789abcdef.js".into()],
                has_math: false,
            },
        );
        manifest.write(dir.path()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "index": {"scripts": ["tippy/index.0123456789abcdef.js"], "has_math": false}
            })
        );
        assert_eq!(Manifest::read(dir.path()).unwrap(), manifest);
    }
}

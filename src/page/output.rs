//! Per-page script locations.
//!
//! Scripts live at `<output>/_static/tippy/<page>.<build id>.js`. The build
//! id changes every build so browsers never reuse a stale script; scripts
//! from earlier builds are removed when the new one is written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::utils::hash::BUILD_ID_LEN;

/// Static files directory under the output root.
pub const STATIC_DIR: &str = "_static";
/// Tip scripts directory under [`STATIC_DIR`].
pub const SCRIPT_DIR: &str = "tippy";

/// Location of one page's tip script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPath {
    page: String,
    build_id: String,
}

impl ScriptPath {
    pub fn new(page: &str, build_id: &str) -> Self {
        Self {
            page: page.to_string(),
            build_id: build_id.to_string(),
        }
    }

    /// Path relative to the static directory, as pages load it.
    pub fn static_relative(&self) -> String {
        format!("{SCRIPT_DIR}/{}.{}.js", self.page, self.build_id)
    }

    /// Absolute file path under `output`.
    pub fn resolve(&self, output: &Path) -> PathBuf {
        let mut path = output.join(STATIC_DIR);
        path.extend(self.static_relative().split('/'));
        path
    }

    /// Scripts written for this page by earlier builds.
    pub fn stale_files(&self, output: &Path) -> Result<Vec<PathBuf>> {
        let current = self.resolve(output);
        let Some(dir) = current.parent() else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let stem = self.page.rsplit('/').next().unwrap_or(&self.page);
        let pattern = Regex::new(&format!(
            r"^{}\.[0-9a-f]{{{BUILD_ID_LEN}}}\.js$",
            regex::escape(stem)
        ))?;

        let mut stale = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| pattern.is_match(name));
            if matches && path != current && path.is_file() {
                stale.push(path);
            }
        }
        stale.sort();
        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ID: &str = "0123456789abcdef";

    #[test]
    fn test_paths() {
        let script = ScriptPath::new("guide/install", ID);
        assert_eq!(script.static_relative(), format!("tippy/guide/install.{ID}.js"));
        assert_eq!(
            script.resolve(Path::new("/out")),
            PathBuf::from(format!("/out/_static/tippy/guide/install.{ID}.js"))
        );
    }

    #[test]
    fn test_stale_files_only_same_page() {
        let dir = TempDir::new().unwrap();
        let scripts = dir.path().join("_static/tippy/guide");
        fs::create_dir_all(&scripts).unwrap();
        for name in [
            "install.aaaaaaaaaaaaaaaa.js",
            &format!("install.{ID}.js"),
            "install-extra.bbbbbbbbbbbbbbbb.js",
            "usage.cccccccccccccccc.js",
            "install.notahexbuildid!.js",
        ] {
            fs::write(scripts.join(name), "").unwrap();
        }

        let stale = ScriptPath::new("guide/install", ID).stale_files(dir.path()).unwrap();
        assert_eq!(stale, [scripts.join("install.aaaaaaaaaaaaaaaa.js")]);
    }

    #[test]
    fn test_stale_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        let stale = ScriptPath::new("index", ID).stale_files(dir.path()).unwrap();
        assert!(stale.is_empty());
    }
}

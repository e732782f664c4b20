//! Filesystem path helpers.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `page_name` - content file path to `/`-separated page name

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Derive a page name from a rendered page path relative to the content dir.
///
/// `guide/install.html` -> `guide/install`. Returns `None` for files that are
/// not `.html` pages or whose components are not valid UTF-8.
pub fn page_name(relative: &Path) -> Option<String> {
    if relative.extension()? != "html" {
        return None;
    }

    let stem = relative.with_extension("");
    let mut parts = Vec::new();
    for comp in stem.components() {
        match comp {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_page_name() {
        assert_eq!(page_name(Path::new("index.html")), Some("index".into()));
        assert_eq!(
            page_name(Path::new("guide/install.html")),
            Some("guide/install".into())
        );
        assert_eq!(page_name(Path::new("guide/install.doctree.json")), None);
        assert_eq!(page_name(Path::new("../escape.html")), None);
    }
}

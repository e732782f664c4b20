//! Tooltip build orchestration.
//!
//! Build pipeline phases:
//! - **Collect** - Find rendered pages and the set of page names
//! - **Scan** - Parallel per-page scan into artifacts (phase 1)
//! - **Fetch** - Fill external tip caches for referenced keys
//! - **Emit** - Resolve selector maps, write scripts and the manifest (phase 2)
//!
//! A failure in any page scan fails the build before anything is written.

use crate::{
    config::{SiteConfig, TipSettings},
    external::{ExternalTips, Fetch, HttpFetcher},
    log,
    page::{PageArtifact, PageInput, PageNames, is_doctree_file, scan_page},
    site::{Site, SiteBuilder},
    utils::{hash, path::fs::page_name, plural_count},
};
use anyhow::{Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::path::Path;

/// Build tooltips for the whole site.
pub fn build_site(config: &SiteConfig, settings: &TipSettings) -> Result<()> {
    if config.build.offline {
        return run_build(config, settings, None);
    }
    let fetcher = HttpFetcher::new();
    run_build(config, settings, Some(&fetcher as &dyn Fetch))
}

/// Run the pipeline; `fetcher: None` uses cached external tips only.
fn run_build(config: &SiteConfig, settings: &TipSettings, fetcher: Option<&dyn Fetch>) -> Result<()> {
    let content = &config.build.content;
    let output = &config.build.output;
    if !content.is_dir() {
        bail!("content directory {} does not exist", content.display());
    }

    // Collect
    let inputs = collect_pages(content);
    let names: PageNames = inputs.iter().map(|input| input.name.clone()).collect();
    log!("build"; "found {} in {}", plural_count(inputs.len(), "page"), content.display());

    // Scan (phase 1)
    let build_id = hash::build_id();
    let site = scan_pages(&inputs, settings, &names, &build_id)?;
    if site.is_empty() {
        log!("warning"; "no page has a document tree, only the manifest is written");
    } else {
        crate::debug!("build"; "{} with a document tree", plural_count(site.len(), "page"));
    }

    // Fetch
    let mut external = ExternalTips::load(output)?;
    match fetcher {
        Some(fetcher) => {
            let stats = external.refresh(&site.external_keys(), settings, fetcher);
            if stats.failed > 0 {
                log!("warning"; "{} could not be fetched", plural_count(stats.failed, "external tip"));
            }
        }
        None => crate::debug!("build"; "offline, using cached external tips only"),
    }
    external.persist()?;

    // Emit (phase 2)
    let summary = site.emit(output, settings, &external)?;
    log!(
        "build";
        "wrote {} ({} empty) to {}",
        plural_count(summary.written, "script"),
        summary.empty,
        output.display()
    );
    if summary.removed > 0 {
        crate::debug!("build"; "removed {}", plural_count(summary.removed, "stale script"));
    }
    Ok(())
}

/// Every `*.html` page under `content`, sorted by page name.
fn collect_pages(content: &Path) -> Vec<PageInput> {
    let mut inputs: Vec<PageInput> = WalkDir::new(content)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| !is_doctree_file(path))
        .filter_map(|path| {
            let relative = path.strip_prefix(content).ok()?;
            let name = page_name(relative)?;
            Some(PageInput::new(name, path))
        })
        .collect();
    inputs.sort_by(|a, b| a.name.cmp(&b.name));
    inputs
}

/// Scan all pages in parallel. Any failed page fails the whole scan.
fn scan_pages(
    inputs: &[PageInput],
    settings: &TipSettings,
    names: &PageNames,
    build_id: &str,
) -> Result<Site> {
    let results: Vec<(&PageInput, Result<Option<PageArtifact>>)> = inputs
        .par_iter()
        .map(|input| (input, scan_page(input, settings, names, build_id)))
        .collect();

    let mut builder = SiteBuilder::new();
    let mut failed = 0;
    for (input, result) in results {
        match result {
            Ok(Some(artifact)) => builder.insert(artifact),
            Ok(None) => {}
            Err(err) => {
                failed += 1;
                log!("error"; "{}: {:#}", input.name, err);
            }
        }
    }

    if failed > 0 {
        bail!("{} failed, no tooltips written", plural_count(failed, "page"));
    }
    Ok(builder.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Manifest;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.build.content = root.join("content");
        config.build.output = root.join("public");
        config.build.offline = true;
        config
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scripts(output: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(output.join("_static/tippy"))
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_collect_pages() {
        let dir = TempDir::new().unwrap();
        let content = dir.path();
        write(content, "index.html", "");
        write(content, "index.doctree.json", "{}");
        write(content, "guide/install.html", "");
        write(content, "style.css", "");

        let names: Vec<String> = collect_pages(content).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["guide/install", "index"]);
    }

    #[test]
    fn test_build_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "content/index.html",
            r#"<body><h1>Home</h1><p>See <a href="guide/install.html#req">requirements</a>.</p></body>"#,
        );
        write(root, "content/index.doctree.json", r#"{"children": []}"#);
        write(
            root,
            "content/guide/install.html",
            r#"<body><h1>Install</h1><p id="req">Python 3.</p></body>"#,
        );
        write(root, "content/guide/install.doctree.json", r#"{"children": [{"ids": ["req"]}]}"#);
        // No document tree: listed as a page name but never scanned
        write(root, "content/search.html", "<h1>Search</h1>");

        let config = config(root);
        run_build(&config, &TipSettings::default(), None).unwrap();

        let output = root.join("public");
        let manifest = Manifest::read(&output).unwrap();
        assert_eq!(manifest.len(), 2);
        assert!(manifest.get("search").is_none());

        let files = scripts(&output);
        assert_eq!(files.len(), 2);
        let index_js = files
            .iter()
            .find(|p| p.file_name().unwrap().to_string_lossy().starts_with("index."))
            .unwrap();
        let js = fs::read_to_string(index_js).unwrap();
        assert!(js.contains("guide/install.html#req"));
        assert!(js.contains("Python 3."));

        for source in ["wiki", "doi", "rtd"] {
            assert!(output.join(format!("tippy_{source}_cache.json")).is_file());
        }
    }

    #[test]
    fn test_rebuild_removes_previous_scripts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "content/index.html", "<h1>Home</h1>");
        write(root, "content/index.doctree.json", "{}");

        let config = config(root);
        run_build(&config, &TipSettings::default(), None).unwrap();
        let first = scripts(&root.join("public"));
        run_build(&config, &TipSettings::default(), None).unwrap();
        let second = scripts(&root.join("public"));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_failed_scan_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "content/index.html", "<h1>Home</h1>");
        write(root, "content/index.doctree.json", "{}");
        write(root, "content/broken.html", "<h1>Broken</h1>");
        write(root, "content/broken.doctree.json", "not json");

        let config = config(root);
        assert!(run_build(&config, &TipSettings::default(), None).is_err());
        assert!(!Manifest::path(&root.join("public")).exists());
        assert!(!root.join("public/_static/tippy").exists());
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path());
        let err = run_build(&config, &TipSettings::default(), None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}

//! Site-wide resolution and emission (phase 2).
//!
//! Phase 1 fills a [`SiteBuilder`] with one [`PageArtifact`] per page. Once
//! every page is in, the builder is frozen into a read-only [`Site`], which
//! resolves each page's selector map against the whole site and writes the
//! scripts plus the manifest.

mod emit;
mod manifest;
mod resolve;

pub use emit::{EmitSummary, has_math, render_script, write_script};
pub use manifest::{Manifest, PageEntry};
pub use resolve::{SelectorMap, selector_map};

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::config::TipSettings;
use crate::external::ExternalTips;
use crate::page::{ExternalKeys, PageArtifact};
use crate::utils::plural_count;

/// Collects page artifacts during phase 1.
#[derive(Debug, Default)]
pub struct SiteBuilder {
    pages: BTreeMap<String, PageArtifact>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scanned page. A page scanned twice keeps the latest artifact.
    pub fn insert(&mut self, artifact: PageArtifact) {
        self.pages.insert(artifact.name.clone(), artifact);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn freeze(self) -> Site {
        Site { pages: self.pages }
    }
}

impl Extend<PageArtifact> for SiteBuilder {
    fn extend<I: IntoIterator<Item = PageArtifact>>(&mut self, iter: I) {
        for artifact in iter {
            self.insert(artifact);
        }
    }
}

/// Every scanned page, read-only.
#[derive(Debug)]
pub struct Site {
    pages: BTreeMap<String, PageArtifact>,
}

impl Site {
    pub fn get(&self, name: &str) -> Option<&PageArtifact> {
        self.pages.get(name)
    }

    /// Pages in name order.
    pub fn pages(&self) -> impl Iterator<Item = &PageArtifact> {
        self.pages.values()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Union of the external keys referenced anywhere in the site.
    pub fn external_keys(&self) -> ExternalKeys {
        let mut keys = ExternalKeys::default();
        for page in self.pages.values() {
            let external = &page.refs.external;
            keys.wiki.extend(external.wiki.iter().cloned());
            keys.doi.extend(external.doi.iter().cloned());
            keys.rtd.extend(external.rtd.iter().cloned());
        }
        keys
    }

    /// Resolve and write every page's script, then the manifest.
    pub fn emit(
        &self,
        output: &Path,
        settings: &TipSettings,
        external: &ExternalTips,
    ) -> Result<EmitSummary> {
        let mut summary = EmitSummary::default();
        let mut manifest = Manifest::default();

        for page in self.pages() {
            let map = selector_map(self, page, settings, external);
            let math = has_math(&map, settings);
            let script = render_script(&map, settings, math)?;
            write_script(output, &page.script, &script, &mut summary)?;
            crate::debug!("emit"; "{}: {}", page.name, plural_count(map.len(), "tip"));

            manifest.insert(&page.name, PageEntry::new(settings, &page.script, math));
        }

        manifest.write(output)?;
        crate::debug!("emit"; "manifest lists {}", plural_count(self.len(), "page"));
        Ok(summary)
    }
}

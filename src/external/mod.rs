//! External tip sources: Wikipedia, DOI records and hosted documentation.
//!
//! | Module  | Purpose                                   |
//! |---------|-------------------------------------------|
//! | `cache` | Persistent per-source key → HTML caches   |
//! | `http`  | [`Fetch`] trait and the HTTP implementation |
//! | `wiki`  | Page summaries                            |
//! | `doi`   | Record fetch and template rendering       |
//! | `rtd`   | Embedded documentation sections           |
//!
//! Caches are loaded before the write phase, filled with every key the site
//! references but the cache lacks, and written back. A key that fails to
//! fetch is logged and stays absent, so the next build retries it.

mod cache;
pub mod doi;
mod http;
mod rtd;
mod wiki;

pub use cache::TipCache;
pub use doi::{JinjaRenderer, RecordRenderer};
pub use http::{Fetch, FetchError, HttpFetcher};

use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use anyhow::Result;

use crate::config::TipSettings;
use crate::logger::ProgressLine;
use crate::page::ExternalKeys;

/// An external tip source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Wiki,
    Doi,
    Rtd,
}

impl Source {
    pub const ALL: [Self; 3] = [Self::Wiki, Self::Doi, Self::Rtd];

    /// Cache file name in the output directory.
    pub const fn cache_file(self) -> &'static str {
        match self {
            Self::Wiki => "tippy_wiki_cache.json",
            Self::Doi => "tippy_doi_cache.json",
            Self::Rtd => "tippy_rtd_cache.json",
        }
    }

    /// Log prefix for warnings about this source.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Wiki => "tippy.wiki",
            Self::Doi => "tippy.doi",
            Self::Rtd => "tippy.rtd",
        }
    }

    const fn counter(self) -> &'static str {
        match self {
            Self::Wiki => "wiki",
            Self::Doi => "doi",
            Self::Rtd => "rtd",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Wiki => "Wikipedia",
            Self::Doi => "DOI",
            Self::Rtd => "RTD",
        }
    }
}

/// Outcome of one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub fetched: usize,
    pub failed: usize,
}

/// The three source caches for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTips {
    pub wiki: TipCache,
    pub doi: TipCache,
    pub rtd: TipCache,
}

impl ExternalTips {
    /// Load all caches from `output`.
    pub fn load(output: &Path) -> Result<Self> {
        Ok(Self {
            wiki: TipCache::load(output.join(Source::Wiki.cache_file()))?,
            doi: TipCache::load(output.join(Source::Doi.cache_file()))?,
            rtd: TipCache::load(output.join(Source::Rtd.cache_file()))?,
        })
    }

    /// Write all caches back, whether or not anything changed.
    pub fn persist(&self) -> Result<()> {
        for source in Source::ALL {
            self.cache(source).persist()?;
        }
        Ok(())
    }

    pub fn cache(&self, source: Source) -> &TipCache {
        match source {
            Source::Wiki => &self.wiki,
            Source::Doi => &self.doi,
            Source::Rtd => &self.rtd,
        }
    }

    /// Fetch every wanted key that is not cached yet. Sources run one after
    /// another; keys within a source are fetched sequentially.
    pub fn refresh(
        &mut self,
        wanted: &ExternalKeys,
        settings: &TipSettings,
        fetcher: &dyn Fetch,
    ) -> FetchStats {
        let wiki_missing = owned(self.wiki.missing(&wanted.wiki));
        let doi_missing = owned(self.doi.missing(&wanted.doi));
        let rtd_missing = owned(self.rtd.missing(&wanted.rtd));

        let total = wiki_missing.len() + doi_missing.len() + rtd_missing.len();
        if total == 0 {
            return FetchStats::default();
        }

        let progress = ProgressLine::new(
            "fetch",
            &[
                (Source::Wiki.counter(), wiki_missing.len()),
                (Source::Doi.counter(), doi_missing.len()),
                (Source::Rtd.counter(), rtd_missing.len()),
            ],
        );
        let mut stats = FetchStats::default();

        fill(&mut self.wiki, Source::Wiki, &wiki_missing, &progress, &mut stats, |title| {
            let data = fetcher
                .get_json(&wiki::summary_url(title))
                .map_err(fetch_failed(Source::Wiki, title))?;
            wiki::render_summary(&data)
                .map(Some)
                .map_err(fetch_failed(Source::Wiki, title))
        });

        match JinjaRenderer::new(settings.doi_template.as_str()) {
            Ok(renderer) => {
                fill(&mut self.doi, Source::Doi, &doi_missing, &progress, &mut stats, |name| {
                    let url = doi::record_url(&settings.doi_api, name);
                    let data = fetcher
                        .get_json(&url)
                        .map_err(fetch_failed(Source::Doi, name))?;
                    renderer.render(&data).map(Some).map_err(|err| {
                        format!("Could not render DOI template for {name}: {}", error_chain(&err))
                    })
                });
            }
            Err(err) => {
                crate::log!(Source::Doi.tag(); "skipping DOI tips: {}", error_chain(&err));
                stats.failed += doi_missing.len();
            }
        }

        fill(&mut self.rtd, Source::Rtd, &rtd_missing, &progress, &mut stats, |url| {
            let data = fetcher
                .get_json(&rtd::embed_url(url))
                .map_err(fetch_failed(Source::Rtd, url))?;
            rtd::extract_content(&data).map_err(fetch_failed(Source::Rtd, url))
        });

        progress.finish();
        stats
    }
}

/// Run `produce` for each key, storing successes and logging failures.
/// `Ok(None)` means the source had nothing worth showing.
fn fill(
    cache: &mut TipCache,
    source: Source,
    keys: &BTreeSet<String>,
    progress: &ProgressLine,
    stats: &mut FetchStats,
    mut produce: impl FnMut(&str) -> Result<Option<String>, String>,
) {
    for key in keys {
        match produce(key) {
            Ok(Some(html)) => {
                cache.insert(key.as_str(), html);
                stats.fetched += 1;
            }
            Ok(None) => {
                crate::debug!(source.tag(); "no content for {key}");
            }
            Err(message) => {
                crate::log!(source.tag(); "{message}");
                stats.failed += 1;
            }
        }
        progress.inc(source.counter());
    }
}

fn owned(keys: Vec<&str>) -> BTreeSet<String> {
    keys.into_iter().map(str::to_string).collect()
}

fn fetch_failed(source: Source, key: &str) -> impl FnOnce(FetchError) -> String + '_ {
    move |err| {
        format!(
            "Could not fetch {} data for {key}: {}",
            source.label(),
            error_chain(&err)
        )
    }
}

/// `outer: inner: root` from an error and its sources.
fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        out.push_str(": ");
        out.push_str(&source.to_string());
        current = source.source();
    }
    out
}

//! Removal of everything a build writes to the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    config::SiteConfig,
    external::Source,
    log,
    page::{SCRIPT_DIR, STATIC_DIR},
    site::Manifest,
    utils::plural_count,
};

/// Delete the caches, the manifest and the script directory.
pub fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    let mut removed = 0;

    for file in generated_files(output) {
        if file.is_file() {
            fs::remove_file(&file).with_context(|| format!("Failed to remove {}", file.display()))?;
            removed += 1;
        }
    }

    let scripts = output.join(STATIC_DIR).join(SCRIPT_DIR);
    if scripts.is_dir() {
        fs::remove_dir_all(&scripts)
            .with_context(|| format!("Failed to remove {}", scripts.display()))?;
        removed += 1;
    }

    log!("clean"; "removed {} from {}", plural_count(removed, "item"), output.display());
    Ok(())
}

fn generated_files(output: &Path) -> Vec<PathBuf> {
    Source::ALL
        .iter()
        .map(|source| output.join(source.cache_file()))
        .chain([Manifest::path(output)])
        .collect()
}

//! Script rendering and writing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::TipSettings;
use crate::embed::script::{TIP_SCRIPT, TipScriptVars};
use crate::html::Fragment;
use crate::page::ScriptPath;
use crate::utils::html::js_template_literal;

use super::SelectorMap;

/// Files touched by one emit pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub written: usize,
    /// Scripts written empty because the page had no tips.
    pub empty: usize,
    pub removed: usize,
}

/// Whether the page's tips need math typesetting.
pub fn has_math(map: &SelectorMap, settings: &TipSettings) -> bool {
    settings.math
        && map
            .values()
            .any(|html| Fragment::parse(html).find(|e| e.has_class("math")).is_some())
}

/// Render the binding script for a page. An empty map renders as nothing.
pub fn render_script(map: &SelectorMap, settings: &TipSettings, math: bool) -> Result<String> {
    if map.is_empty() {
        return Ok(String::new());
    }

    let add_class = match settings.add_class.as_str() {
        "" => None,
        class => Some(serde_json::to_string(class)?),
    };

    Ok(TIP_SCRIPT.render(&TipScriptVars {
        selector_to_html: serde_json::to_string(map)?,
        skip_classes: serde_json::to_string(&settings.skip_anchor_classes)?,
        parent_selector: js_template_literal(&settings.anchor_parent_selector).into_owned(),
        add_class,
        props: settings.props_js.clone(),
        math,
    }))
}

/// Write `content` to the page's script file, removing scripts left by
/// earlier builds of the same page.
pub fn write_script(
    output: &Path,
    script: &ScriptPath,
    content: &str,
    summary: &mut EmitSummary,
) -> Result<()> {
    for stale in script.stale_files(output)? {
        fs::remove_file(&stale)
            .with_context(|| format!("Failed to remove stale script {}", stale.display()))?;
        summary.removed += 1;
    }

    let path = script.resolve(output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    summary.written += 1;
    if content.is_empty() {
        summary.empty += 1;
    }
    Ok(())
}

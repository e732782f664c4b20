//! `[tips]` section: what gets a tooltip and how it looks.
//!
//! [`TipsConfig`] mirrors the TOML; [`TipSettings`] is the validated form
//! the build actually runs on (regexes compiled, selector parsed, props
//! rendered to JavaScript).

use std::collections::BTreeMap;

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::props::TooltipProps;
use super::{ConfigDiagnostics, FieldPath, MathRenderer};
use crate::external::JinjaRenderer;

/// Crossref record template; `data` is the fetched JSON document.
pub const DEFAULT_DOI_TEMPLATE: &str = r#"{% set attrs = data.message %}
<div>
    <h3>{{ attrs.title[0] }}</h3>
    {% if attrs.author is defined %}
    <p><b>Authors:</b> {{ attrs.author | map_join('given', 'family') | join(', ') }}</p>
    {% endif %}
    <p><b>Publisher:</b> {{ attrs.publisher }}</p>
    <p><b>Published:</b> {{ attrs.created['date-parts'][0] | join('-') }}</p>
</div>
"#;

pub const DEFAULT_TIP_SELECTOR: &str =
    "figure, table, img, p, aside, div.admonition, div.literal-block-wrapper";

/// `[tips]` as written in `hovertip.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsConfig {
    /// Tooltip library prop overrides.
    pub props: toml::Table,
    /// Regexes; an href fully matching any of them gets no tooltip.
    pub skip_urls: Vec<String>,
    /// Anchors carrying one of these classes are never bound.
    pub skip_anchor_classes: Vec<String>,
    /// Restricts binding to anchors under this selector.
    pub anchor_parent_selector: String,
    /// Literal href → tooltip HTML, overriding everything else.
    pub custom_tips: BTreeMap<String, String>,
    /// Elements with an id matched by this selector become tips.
    pub tip_selector: String,
    pub enable_wikitips: bool,
    pub enable_doitips: bool,
    /// Hosted documentation prefixes served by the embed API.
    pub rtd_urls: Vec<String>,
    pub doi_api: String,
    pub doi_template: String,
    pub enable_mathjax: bool,
    /// Scripts every page loads before its own tip script.
    pub js_files: Vec<String>,
    /// Extra class stamped onto every bound anchor.
    pub add_class: String,
}

impl Default for TipsConfig {
    fn default() -> Self {
        Self {
            props: toml::Table::new(),
            skip_urls: Vec::new(),
            skip_anchor_classes: vec!["headerlink".into(), "sd-stretched-link".into()],
            anchor_parent_selector: String::new(),
            custom_tips: BTreeMap::new(),
            tip_selector: DEFAULT_TIP_SELECTOR.to_string(),
            enable_wikitips: true,
            enable_doitips: true,
            rtd_urls: Vec::new(),
            doi_api: "https://api.crossref.org/works/".to_string(),
            doi_template: DEFAULT_DOI_TEMPLATE.to_string(),
            enable_mathjax: false,
            js_files: vec![
                "https://unpkg.com/@popperjs/core@2".into(),
                "https://unpkg.com/tippy.js@6".into(),
            ],
            add_class: String::new(),
        }
    }
}

/// Validated tip settings for one build.
#[derive(Debug, Clone)]
pub struct TipSettings {
    pub custom_tips: BTreeMap<String, String>,
    pub skip_urls: Vec<Regex>,
    pub skip_anchor_classes: Vec<String>,
    pub anchor_parent_selector: String,
    pub tip_selector: Selector,
    pub enable_wikitips: bool,
    pub enable_doitips: bool,
    pub rtd_urls: Vec<String>,
    pub doi_api: String,
    pub doi_template: String,
    /// Math typesetting in tooltips (mathjax enabled and rendered by mathjax).
    pub math: bool,
    pub js_files: Vec<String>,
    pub add_class: String,
    pub props: TooltipProps,
    /// `props` compiled once to a JavaScript fragment.
    pub props_js: String,
}

impl TipSettings {
    /// Whether `href` fully matches one of the skip regexes.
    pub fn is_skipped(&self, href: &str) -> bool {
        self.skip_urls.iter().any(|re| re.is_match(href))
    }
}

#[cfg(test)]
impl Default for TipSettings {
    fn default() -> Self {
        let mut diag = ConfigDiagnostics::new();
        TipsConfig::default()
            .compile(MathRenderer::Mathjax, &mut diag)
            .unwrap()
    }
}

impl TipsConfig {
    /// Validate and compile. Returns `None` if any diagnostic was recorded.
    pub fn compile(&self, renderer: MathRenderer, diag: &mut ConfigDiagnostics) -> Option<TipSettings> {
        let before = diag.len();

        let props = TooltipProps::from_table(&self.props, diag);

        let skip_urls: Vec<Regex> = self
            .skip_urls
            .iter()
            .filter_map(|pattern| match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(re) => Some(re),
                Err(err) => {
                    diag.error(
                        FieldPath::new("tips.skip_urls"),
                        format!("invalid regex `{pattern}`: {err}"),
                    );
                    None
                }
            })
            .collect();

        let tip_selector = match Selector::parse(&self.tip_selector) {
            Ok(selector) => Some(selector),
            Err(err) => {
                diag.error(
                    FieldPath::new("tips.tip_selector"),
                    format!("invalid selector `{}`: {err}", self.tip_selector),
                );
                None
            }
        };

        if self.enable_mathjax && renderer != MathRenderer::Mathjax {
            diag.error_with_hint(
                FieldPath::new("tips.enable_mathjax"),
                "math typesetting in tooltips requires the mathjax renderer",
                "build with `--math-renderer mathjax` or set `enable_mathjax = false`",
            );
        }

        if self.enable_doitips && self.doi_api.is_empty() {
            diag.error(FieldPath::new("tips.doi_api"), "must not be empty when DOI tips are enabled");
        }
        if self.enable_doitips
            && let Err(err) = JinjaRenderer::new(self.doi_template.as_str())
        {
            let detail = std::error::Error::source(&err)
                .map(|source| source.to_string())
                .unwrap_or_default();
            diag.error(FieldPath::new("tips.doi_template"), format!("{err}: {detail}"));
        }

        if diag.len() > before {
            return None;
        }

        Some(TipSettings {
            custom_tips: self.custom_tips.clone(),
            skip_urls,
            skip_anchor_classes: self.skip_anchor_classes.clone(),
            anchor_parent_selector: self.anchor_parent_selector.clone(),
            tip_selector: tip_selector?,
            enable_wikitips: self.enable_wikitips,
            enable_doitips: self.enable_doitips,
            rtd_urls: self.rtd_urls.clone(),
            doi_api: self.doi_api.clone(),
            doi_template: self.doi_template.clone(),
            math: self.enable_mathjax && renderer == MathRenderer::Mathjax,
            js_files: self.js_files.clone(),
            add_class: self.add_class.clone(),
            props_js: props.to_js(),
            props,
        })
    }
}

//! Site configuration management for `hovertip.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── types/     # ConfigError, diagnostics, field paths
//! ├── props.rs   # [tips.props] validation and JS compilation
//! ├── tips.rs    # [tips] section and its validated form
//! └── mod.rs     # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section   | Purpose                                        |
//! |-----------|------------------------------------------------|
//! | `[build]` | Content/output directories, math renderer      |
//! | `[tips]`  | Tip selection, external sources, tooltip props |

pub mod props;
pub mod tips;
pub mod types;

pub use tips::{TipSettings, TipsConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// sections
// ============================================================================

/// Math renderer used by the host pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MathRenderer {
    #[default]
    Mathjax,
    None,
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Rendered pages (and their `.doctree.json` sidecars)
    pub content: PathBuf,
    /// Scripts, caches and the manifest are written here
    pub output: PathBuf,
    pub math_renderer: MathRenderer,
    /// Skip network fetches; only cached external tips are used
    pub offline: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("public"),
            math_renderer: MathRenderer::Mathjax,
            offline: false,
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hovertip.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when running on defaults
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (parent of the config file, or cwd)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub tips: TipsConfig,
}

impl SiteConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// The config file is searched upward from cwd. Without one, defaults
    /// apply and the project root is cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_command_options(cli);
        config.normalize_paths();
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Apply command-specific CLI overrides.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => {
                crate::logger::set_verbose(build_args.verbose);
                Self::update_option(&mut self.build.content, build_args.content.as_ref());
                Self::update_option(&mut self.build.output, build_args.output.as_ref());
                Self::update_option(
                    &mut self.build.math_renderer,
                    build_args.math_renderer.as_ref(),
                );
                self.build.offline |= build_args.offline;
            }
            Commands::Clean { output } => {
                Self::update_option(&mut self.build.output, output.as_ref());
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve build directories against the project root.
    fn normalize_paths(&mut self) {
        let root = crate::utils::path::normalize_path(&self.root);
        self.build.content = crate::utils::path::normalize_path(&root.join(&self.build.content));
        self.build.output = crate::utils::path::normalize_path(&root.join(&self.build.output));
        self.root = root;
    }

    /// Validate the configuration and compile the tip settings.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<TipSettings, ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let settings = self.tips.compile(self.build.math_renderer, &mut diag);

        match settings {
            Some(settings) if diag.is_empty() => Ok(settings),
            _ => Err(ConfigError::Diagnostics(diag)),
        }
    }
}

/// Find config file by searching upward from `start`.
///
/// ```text
/// /home/user/docs/content/guide/  ← cwd
/// /home/user/docs/hovertip.toml   ← found!
/// ```
fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

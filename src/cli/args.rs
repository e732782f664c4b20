//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MathRenderer;

/// Rich hover tooltips for static documentation sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hovertip.toml)
    #[arg(short = 'C', long, default_value = "hovertip.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate tooltip scripts for every rendered page
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Remove generated scripts, caches and the manifest
    Clean {
        /// Output directory path (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Content directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Math renderer the pages are rendered with
    #[arg(long = "math-renderer", value_enum)]
    pub math_renderer: Option<MathRenderer>,

    /// Use cached external tips only, never fetch
    #[arg(long)]
    pub offline: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let cli = Cli::parse_from([
            "hovertip",
            "build",
            "-c",
            "docs/_build/html",
            "--math-renderer",
            "none",
            "--offline",
            "-v",
        ]);
        assert_eq!(cli.config, PathBuf::from("hovertip.toml"));
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.content, Some(PathBuf::from("docs/_build/html")));
        assert_eq!(build_args.output, None);
        assert_eq!(build_args.math_renderer, Some(MathRenderer::None));
        assert!(build_args.offline && build_args.verbose);
    }

    #[test]
    fn test_clean_with_config() {
        let cli = Cli::parse_from(["hovertip", "-C", "site.toml", "clean", "-o", "out"]);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(matches!(
            cli.command,
            Commands::Clean { output: Some(ref p) } if p == &PathBuf::from("out")
        ));
    }
}

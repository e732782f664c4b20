//! Command-line interface module.

mod args;
pub mod build;
pub mod clean;

pub use args::{Cli, Commands};

//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`)
//! - [`posix`]: `/`-separated page-name arithmetic (`normpath`, `relpath`, ...)
//! - [`route`]: Href inspection (`has_scheme`, `split_fragment`)

pub mod fs;
pub mod posix;
pub mod route;

pub use fs::normalize_path;

//! Configuration utility types.
//!
//! | Module  | Purpose                              |
//! |---------|--------------------------------------|
//! | `error` | Configuration errors and diagnostics |
//! | `field` | Field paths for diagnostics          |

mod error;
mod field;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;

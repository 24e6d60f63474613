//! Application glue module
//!
//! Configuration and the per-file report built around the decoder.

mod config;
mod report;

pub use config::{Config, ConfigError, OutputFormat};
pub use report::Report;

//! Per-file decode report
//!
//! Bundles the input's identity with everything the decoder recovered so
//! it can be written as text or JSON.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::config::Config;
use crate::parser::{decode, DecodeError};
use crate::program::{Listing, Program};

/// Decode results for one cassette file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Name the input was read from
    pub source: String,
    /// Input size in bytes
    pub file_size: usize,
    /// Programs decoded before any error
    pub programs: Vec<Program>,
    /// The error that stopped decoding, if any
    pub error: Option<DecodeError>,
}

impl Report {
    /// Decode `bytes` and build the report
    pub fn from_bytes(source: impl Into<String>, bytes: &[u8]) -> Self {
        let decoded = decode(bytes);
        Self {
            source: source.into(),
            file_size: bytes.len(),
            programs: decoded.programs,
            error: decoded.error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Render as text
    pub fn to_text(&self, config: &Config) -> String {
        let mut out = String::new();
        let heavy_rule = "=".repeat(config.rule_width);

        let _ = writeln!(out, "{heavy_rule}");
        if config.show_banner {
            let _ = writeln!(out, "{}", banner());
            out.push('\n');
        }
        let _ = writeln!(out, "Input file: {}", self.source);
        let _ = writeln!(
            out,
            "File size: {:>6} (0x{:04X})",
            crate::program::group_thousands(self.file_size as u64),
            self.file_size
        );

        for (i, program) in self.programs.iter().enumerate() {
            let listing = Listing::new(program, i + 1)
                .rule_width(config.rule_width)
                .show_metadata(config.show_metadata)
                .show_lines(config.show_lines);
            out.push_str(&listing.render());
        }

        if let Some(err) = &self.error {
            out.push('\n');
            let _ = writeln!(out, "error: {err}");
        }

        let _ = writeln!(out, "{heavy_rule}");
        out
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn banner() -> String {
    format!(
        "{} {}\nTRS-80 Level I BASIC cassette decoder",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

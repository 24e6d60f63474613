//! Human-readable program listing
//!
//! Renders one decoded program as a ruled metadata block followed by its
//! statements, one `"<number> <text>"` row each.

use std::fmt::Write;

use super::model::Program;

/// Width the metadata labels are right-aligned to
const LABEL_WIDTH: usize = 20;

/// Text rendering of a single program
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    program: &'a Program,
    /// 1-based position of the program within its cassette
    number: usize,
    rule_width: usize,
    show_metadata: bool,
    show_lines: bool,
}

impl<'a> Listing<'a> {
    pub fn new(program: &'a Program, number: usize) -> Self {
        Self {
            program,
            number,
            rule_width: 80,
            show_metadata: true,
            show_lines: true,
        }
    }

    pub fn rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }

    pub fn show_metadata(mut self, show: bool) -> Self {
        self.show_metadata = show;
        self
    }

    pub fn show_lines(mut self, show: bool) -> Self {
        self.show_lines = show;
        self
    }

    /// Render to a string, every row newline-terminated
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(self.rule_width);
        let p = self.program;

        out.push('\n');
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Program #{}", self.number);
        let _ = writeln!(out, "{rule}");

        if self.show_metadata {
            count_row(&mut out, "Pre-sync Count:", p.pre_sync_count());
            count_row(&mut out, "Sync Count:", p.sync_count());
            byte_row(&mut out, "File Type:", p.file_type());
            word_row(&mut out, "Program Start Addr:", u32::from(p.start_address()));
            word_row(&mut out, "Program End Addr:", u32::from(p.end_address()));
            word_row(&mut out, "Program Length:", p.program_length());
            byte_row(&mut out, "Checksum:", p.checksum);
            let _ = writeln!(out, "{rule}");
        }

        if self.show_lines {
            for line in &p.lines {
                let _ = writeln!(out, "{line}");
            }
        }

        out
    }
}

fn count_row(out: &mut String, label: &str, value: usize) {
    let _ = writeln!(out, "{label:>width$} {value:>6}   (0x{value:02X})", width = LABEL_WIDTH);
}

fn byte_row(out: &mut String, label: &str, value: u8) {
    let _ = writeln!(out, "{label:>width$} {value:>6}   (0x{value:02X})", width = LABEL_WIDTH);
}

fn word_row(out: &mut String, label: &str, value: u32) {
    let decimal = group_thousands(u64::from(value));
    let _ = writeln!(out, "{label:>width$} {decimal:>6} (0x{value:04X})", width = LABEL_WIDTH);
}

/// Format `n` with comma thousands separators
pub(crate) fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

//! Decoded program records

use serde::{Deserialize, Serialize};

/// Leader and sync-run counts observed in front of a program header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncRun {
    /// Non-zero bytes skipped before the null run
    pub pre_sync_count: usize,
    /// Consecutive zero bytes forming the sync run
    pub sync_count: usize,
}

/// The fixed five-byte header that follows the sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramHeader {
    /// Format marker byte (0xA5 on real tapes)
    pub file_type: u8,
    /// Load address of the first program byte
    pub start_address: u16,
    /// Load address of the last program byte
    pub end_address: u16,
}

impl ProgramHeader {
    /// Number of bytes in the load range, inclusive of both ends.
    ///
    /// Saturates at zero for a header whose end precedes its start; such a
    /// header never makes it past validation.
    pub fn program_length(&self) -> u32 {
        if self.end_address < self.start_address {
            return 0;
        }
        u32::from(self.end_address - self.start_address) + 1
    }
}

/// A single numbered BASIC statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub number: u16,
    pub text: String,
}

impl Line {
    pub fn new(number: u16, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.number, self.text)
    }
}

/// One program image recovered from the cassette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Byte offset of the first leader byte in the input
    pub offset: usize,
    pub sync: SyncRun,
    pub header: ProgramHeader,
    /// Statements in on-tape order
    pub lines: Vec<Line>,
    /// Trailing byte after the statements; captured, never verified
    pub checksum: u8,
}

impl Program {
    pub fn pre_sync_count(&self) -> usize {
        self.sync.pre_sync_count
    }

    pub fn sync_count(&self) -> usize {
        self.sync.sync_count
    }

    pub fn file_type(&self) -> u8 {
        self.header.file_type
    }

    pub fn start_address(&self) -> u16 {
        self.header.start_address
    }

    pub fn end_address(&self) -> u16 {
        self.header.end_address
    }

    pub fn program_length(&self) -> u32 {
        self.header.program_length()
    }

    /// The program as `"<number> <text>"` rows
    pub fn listing_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::to_string).collect()
    }
}

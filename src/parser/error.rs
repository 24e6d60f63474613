//! Decode error types

use std::fmt;

use thiserror::Error;

/// Decoder stage that was running when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    /// Scanning the leader and sync run
    Locate,
    /// Reading file type and load addresses
    Header,
    /// Peeking at the first statement during validation
    Validate,
    /// Reading a statement's line number
    LineNumber,
    /// Scanning a statement's text for its terminator
    LineText,
    /// Reading the trailing checksum byte
    Checksum,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Locate => "sync run",
            Stage::Header => "program header",
            Stage::Validate => "first statement",
            Stage::LineNumber => "line number",
            Stage::LineText => "line text",
            Stage::Checksum => "checksum",
        };
        f.write_str(name)
    }
}

/// Header check that rejected the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MismatchReason {
    /// End address lies below the start address
    EndBeforeStart { start: u16, end: u16 },
    /// Start address is the Level II `0xD3D3` marker
    ReservedStartAddress,
    /// First statement does not begin with an uppercase letter or space
    NotBasicText { byte: u8 },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::EndBeforeStart { start, end } => {
                write!(f, "end address 0x{end:04X} precedes start address 0x{start:04X}")
            },
            MismatchReason::ReservedStartAddress => {
                f.write_str("start address 0xD3D3 marks a Level II BASIC header")
            },
            MismatchReason::NotBasicText { byte } => {
                write!(f, "first statement begins with byte 0x{byte:02X}")
            },
        }
    }
}

/// Fatal decode error; the run stops at the first one
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DecodeError {
    /// A read needed more bytes than remain
    #[error("unexpected end of input at offset {offset} while reading {stage}")]
    BufferExhausted { offset: usize, stage: Stage },

    /// Header validation failed
    #[error("not a Level I BASIC cassette (offset {offset}): {reason}")]
    FormatMismatch {
        offset: usize,
        reason: MismatchReason,
    },
}

impl DecodeError {
    /// Byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::BufferExhausted { offset, .. } => *offset,
            DecodeError::FormatMismatch { offset, .. } => *offset,
        }
    }

    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, DecodeError::FormatMismatch { .. })
    }
}

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

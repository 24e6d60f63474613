//! Cassette image decoder
//!
//! Turns the raw bytes of a Level I BASIC `.cas` file into decoded
//! programs. The decoder does no I/O; callers hand it the whole file.

mod cursor;
mod decoder;
mod error;
mod stages;

pub use cursor::ByteCursor;
pub use decoder::{decode, Decoded, Decoder};
pub use error::{DecodeError, MismatchReason, Result, Stage};
pub use stages::{
    decode_program, locate_program, read_checksum, read_header, read_lines, validate_header,
    HEADER_LEN, LEVEL2_MARKER, LINE_TERMINATOR,
};

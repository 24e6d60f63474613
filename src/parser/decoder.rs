//! Run driver
//!
//! Walks a whole cassette image program by program. The cursor is shared
//! across programs and never rewound: each program's leader is measured
//! from the byte after the previous program's checksum.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cursor::ByteCursor;
use super::error::{DecodeError, Result};
use super::stages::decode_program;
use crate::program::Program;

/// Iterator over the programs in a cassette image.
///
/// Yields programs in tape order. The first error is yielded once and ends
/// the iteration; nothing after a failed program is attempted.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    cursor: ByteCursor<'a>,
    failed: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(bytes),
            failed: false,
        }
    }

}

impl Iterator for Decoder<'_> {
    type Item = Result<Program>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_at_end() {
            return None;
        }

        let result = decode_program(&mut self.cursor);
        if let Err(err) = &result {
            warn!(%err, "stopping decode");
            self.failed = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Decoder<'_> {}

/// Outcome of a full decode run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decoded {
    /// Programs completed before any error
    pub programs: Vec<Program>,
    /// The error that ended the run, if any
    pub error: Option<DecodeError>,
}

impl Decoded {
    /// Drop partial results in favor of the error, if there is one
    pub fn into_result(self) -> Result<Vec<Program>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.programs),
        }
    }
}

/// Decode every program in `bytes`, keeping those finished before a failure
pub fn decode(bytes: &[u8]) -> Decoded {
    let mut decoded = Decoded::default();

    for result in Decoder::new(bytes) {
        match result {
            Ok(program) => decoded.programs.push(program),
            Err(err) => decoded.error = Some(err),
        }
    }

    decoded
}

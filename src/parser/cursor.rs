//! Forward-only byte cursor
//!
//! Every read is bounds-checked and reports the decoder stage on failure,
//! so running off the end of a cassette image is always a typed error.

use super::error::{DecodeError, Result, Stage};

/// Cursor over an immutable cassette image
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current offset into the image
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn exhausted(&self, stage: Stage) -> DecodeError {
        DecodeError::BufferExhausted {
            offset: self.offset,
            stage,
        }
    }

    /// Look at the byte `distance` positions ahead without moving
    pub fn peek_at(&self, distance: usize, stage: Stage) -> Result<u8> {
        self.offset
            .checked_add(distance)
            .and_then(|i| self.bytes.get(i))
            .copied()
            .ok_or_else(|| self.exhausted(stage))
    }

    pub fn peek(&self, stage: Stage) -> Result<u8> {
        self.peek_at(0, stage)
    }

    pub fn read_u8(&mut self, stage: Stage) -> Result<u8> {
        let byte = self.peek(stage)?;
        self.offset += 1;
        Ok(byte)
    }

    fn read_pair(&mut self, stage: Stage) -> Result<[u8; 2]> {
        if self.remaining() < 2 {
            return Err(self.exhausted(stage));
        }
        let pair = [self.bytes[self.offset], self.bytes[self.offset + 1]];
        self.offset += 2;
        Ok(pair)
    }

    /// High byte first
    pub fn read_u16_be(&mut self, stage: Stage) -> Result<u16> {
        self.read_pair(stage).map(u16::from_be_bytes)
    }

    /// Low byte first
    pub fn read_u16_le(&mut self, stage: Stage) -> Result<u16> {
        self.read_pair(stage).map(u16::from_le_bytes)
    }

    /// Consume bytes up to `terminator`, returning them without it.
    /// The terminator itself is consumed.
    pub fn read_until(&mut self, terminator: u8, stage: Stage) -> Result<&'a [u8]> {
        let bytes = self.bytes;
        let rest = &bytes[self.offset..];
        match rest.iter().position(|&b| b == terminator) {
            Some(len) => {
                self.offset += len + 1;
                Ok(&rest[..len])
            },
            None => {
                self.offset = self.bytes.len();
                Err(self.exhausted(stage))
            },
        }
    }

    /// Skip bytes while `pred` holds, returning how many were skipped.
    /// Stops at the end of the image without error.
    pub fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let skipped = self.bytes[self.offset..]
            .iter()
            .take_while(|&&b| pred(b))
            .count();
        self.offset += skipped;
        skipped
    }
}

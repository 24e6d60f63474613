//! Test-side cassette encoder
//!
//! Lays programs out the way a Level I cassette stores them so the decoder
//! can be checked against known inputs. The load range is sized so that the
//! statements exactly fill it.

/// One program image to encode
#[derive(Debug, Clone)]
pub struct ProgramImage {
    /// Non-zero bytes before the sync run
    pub leader: Vec<u8>,
    /// Number of zero bytes in the sync run
    pub sync: usize,
    pub file_type: u8,
    pub start_address: u16,
    pub lines: Vec<(u16, String)>,
    pub checksum: u8,
}

impl ProgramImage {
    pub fn new(lines: &[(u16, &str)]) -> Self {
        Self {
            leader: Vec::new(),
            sync: 2,
            file_type: 0xA5,
            start_address: 0x4200,
            lines: lines.iter().map(|&(n, t)| (n, t.to_string())).collect(),
            checksum: 0x5A,
        }
    }

    /// Bytes taken by the statement records
    pub fn body_len(&self) -> usize {
        self.lines.iter().map(|(_, text)| text.len() + 3).sum()
    }

    pub fn end_address(&self) -> u16 {
        self.start_address + self.body_len() as u16 - 1
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.leader);
        out.extend(std::iter::repeat(0x00).take(self.sync));
        out.push(self.file_type);
        out.extend_from_slice(&self.start_address.to_be_bytes());
        out.extend_from_slice(&self.end_address().to_be_bytes());
        for (number, text) in &self.lines {
            out.extend_from_slice(&number.to_le_bytes());
            out.extend_from_slice(text.as_bytes());
            out.push(0x0D);
        }
        out.push(self.checksum);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }
}

/// Concatenate several program images into one cassette
pub fn encode_all(images: &[ProgramImage]) -> Vec<u8> {
    let mut out = Vec::new();
    for image in images {
        image.encode_into(&mut out);
    }
    out
}

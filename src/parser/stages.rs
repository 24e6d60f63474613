//! Per-program decode stages
//!
//! Each stage takes the cursor explicitly and leaves it just past what it
//! consumed. `decode_program` chains them for one program image:
//!
//! ```text
//! [non-zero]*  leader          locate_program
//! [0x00]+      sync run        locate_program
//! u8           file type       read_header
//! u16 BE       start address   read_header
//! u16 BE       end address     read_header
//! (u16 LE, text, 0x0D)*        read_lines
//! u8           checksum        read_checksum
//! ```

use tracing::{debug, trace};

use super::cursor::ByteCursor;
use super::error::{DecodeError, MismatchReason, Result, Stage};
use crate::program::{Line, Program, ProgramHeader, SyncRun};

/// Ends every statement's text
pub const LINE_TERMINATOR: u8 = 0x0D;

/// Start address used by Level II BASIC headers (`D3 D3 D3` + name)
pub const LEVEL2_MARKER: u16 = 0xD3D3;

/// Header size after the sync run
pub const HEADER_LEN: usize = 5;

/// Skip the leader and the sync run in front of a program header
pub fn locate_program(cursor: &mut ByteCursor<'_>) -> Result<SyncRun> {
    let pre_sync_count = cursor.skip_while(|b| b != 0x00);
    let sync_count = cursor.skip_while(|b| b == 0x00);

    if cursor.is_at_end() {
        return Err(DecodeError::BufferExhausted {
            offset: cursor.position(),
            stage: Stage::Locate,
        });
    }

    Ok(SyncRun {
        pre_sync_count,
        sync_count,
    })
}

/// Read file type and big-endian load addresses
pub fn read_header(cursor: &mut ByteCursor<'_>) -> Result<ProgramHeader> {
    if cursor.remaining() < HEADER_LEN {
        return Err(DecodeError::BufferExhausted {
            offset: cursor.position(),
            stage: Stage::Header,
        });
    }

    let file_type = cursor.read_u8(Stage::Header)?;
    let start_address = cursor.read_u16_be(Stage::Header)?;
    let end_address = cursor.read_u16_be(Stage::Header)?;

    Ok(ProgramHeader {
        file_type,
        start_address,
        end_address,
    })
}

/// Reject headers that do not introduce Level I BASIC text.
///
/// The cursor must sit on the first statement; it is not moved.
pub fn validate_header(cursor: &ByteCursor<'_>, header: &ProgramHeader) -> Result<()> {
    let mismatch = |reason| DecodeError::FormatMismatch {
        offset: cursor.position(),
        reason,
    };

    if header.end_address < header.start_address {
        return Err(mismatch(MismatchReason::EndBeforeStart {
            start: header.start_address,
            end: header.end_address,
        }));
    }

    if header.start_address == LEVEL2_MARKER {
        return Err(mismatch(MismatchReason::ReservedStartAddress));
    }

    // Skip the first statement's line number
    let first = cursor.peek_at(2, Stage::Validate)?;
    if !is_statement_start(first) {
        return Err(mismatch(MismatchReason::NotBasicText { byte: first }));
    }

    Ok(())
}

fn is_statement_start(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b' '
}

/// Read statements until the header's byte budget is spent.
///
/// The budget is `program_length - 1` bytes from the first statement; the
/// final byte of the load range is the checksum.
pub fn read_lines(cursor: &mut ByteCursor<'_>, header: &ProgramHeader) -> Result<Vec<Line>> {
    let budget = header.program_length().saturating_sub(1) as usize;
    let end = cursor.position() + budget;
    let mut lines = Vec::new();

    while cursor.position() < end {
        let number = cursor.read_u16_le(Stage::LineNumber)?;
        let text: String = cursor
            .read_until(LINE_TERMINATOR, Stage::LineText)?
            .iter()
            .map(|&b| char::from(b))
            .collect();

        trace!(number, text = %text, "decoded line");
        lines.push(Line { number, text });
    }

    Ok(lines)
}

/// Capture the trailing checksum byte. Not verified.
pub fn read_checksum(cursor: &mut ByteCursor<'_>) -> Result<u8> {
    cursor.read_u8(Stage::Checksum)
}

/// Decode one complete program image starting at the cursor
pub fn decode_program(cursor: &mut ByteCursor<'_>) -> Result<Program> {
    let offset = cursor.position();

    let sync = locate_program(cursor)?;
    let header = read_header(cursor)?;
    debug!(
        offset,
        pre_sync = sync.pre_sync_count,
        sync = sync.sync_count,
        file_type = header.file_type,
        start = header.start_address,
        end = header.end_address,
        "located program"
    );

    validate_header(cursor, &header)?;
    let lines = read_lines(cursor, &header)?;
    let checksum = read_checksum(cursor)?;

    debug!(
        lines = lines.len(),
        checksum,
        next = cursor.position(),
        "completed program"
    );

    Ok(Program {
        offset,
        sync,
        header,
        lines,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &[u8] = b"\x00\x00\xA5\x30\x00\x30\x09\x0A\x00PRINT \"HI\"\x0D\xFF";

    fn header(start: u16, end: u16) -> ProgramHeader {
        ProgramHeader {
            file_type: 0xA5,
            start_address: start,
            end_address: end,
        }
    }

    #[test]
    fn test_locate_counts_leader_and_sync() {
        let data = [0x55, 0x55, 0x55, 0x00, 0x00, 0xA5];
        let mut cursor = ByteCursor::new(&data);
        let sync = locate_program(&mut cursor).unwrap();

        assert_eq!(sync.pre_sync_count, 3);
        assert_eq!(sync.sync_count, 2);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_locate_single_zero_sync() {
        let data = [0x00, 0xA5];
        let mut cursor = ByteCursor::new(&data);
        let sync = locate_program(&mut cursor).unwrap();

        assert_eq!(sync.pre_sync_count, 0);
        assert_eq!(sync.sync_count, 1);
    }

    #[test]
    fn test_locate_without_sync_exhausts() {
        let data = [0xA5, 0x30];
        let mut cursor = ByteCursor::new(&data);
        let err = locate_program(&mut cursor).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferExhausted {
                offset: 2,
                stage: Stage::Locate
            }
        );
    }

    #[test]
    fn test_locate_trailing_nulls_exhaust() {
        let data = [0x00, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&data);
        let err = locate_program(&mut cursor).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::BufferExhausted {
                stage: Stage::Locate,
                ..
            }
        ));
    }

    #[test]
    fn test_read_header_big_endian() {
        let data = [0xA5, 0x42, 0x00, 0x42, 0x80];
        let mut cursor = ByteCursor::new(&data);
        let header = read_header(&mut cursor).unwrap();

        assert_eq!(header.file_type, 0xA5);
        assert_eq!(header.start_address, 0x4200);
        assert_eq!(header.end_address, 0x4280);
        assert_eq!(cursor.position(), HEADER_LEN);
    }

    #[test]
    fn test_read_header_short() {
        let data = [0xA5, 0x42, 0x00, 0x42];
        let mut cursor = ByteCursor::new(&data);
        let err = read_header(&mut cursor).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferExhausted {
                offset: 0,
                stage: Stage::Header
            }
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_validate_accepts_letter_and_space() {
        for first in [b'A', b'Z', b' '] {
            let data = [0x0A, 0x00, first];
            let cursor = ByteCursor::new(&data);
            assert!(validate_header(&cursor, &header(0x3000, 0x3010)).is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_other_first_bytes() {
        for first in [b'a', b'0', b'@', b'[', 0x0D, 0x80] {
            let data = [0x0A, 0x00, first];
            let cursor = ByteCursor::new(&data);
            let err = validate_header(&cursor, &header(0x3000, 0x3010)).unwrap_err();
            assert_eq!(
                err,
                DecodeError::FormatMismatch {
                    offset: 0,
                    reason: MismatchReason::NotBasicText { byte: first }
                }
            );
        }
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let data = [0x0A, 0x00, b'P'];
        let cursor = ByteCursor::new(&data);
        let err = validate_header(&cursor, &header(0x3010, 0x3000)).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::FormatMismatch {
                reason: MismatchReason::EndBeforeStart { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_level2_marker() {
        let data = [0x0A, 0x00, b'P'];
        let cursor = ByteCursor::new(&data);
        let err = validate_header(&cursor, &header(0xD3D3, 0xE000)).unwrap_err();

        assert_eq!(
            err,
            DecodeError::FormatMismatch {
                offset: 0,
                reason: MismatchReason::ReservedStartAddress
            }
        );
    }

    #[test]
    fn test_validate_peek_past_end() {
        let data = [0x0A, 0x00];
        let cursor = ByteCursor::new(&data);
        let err = validate_header(&cursor, &header(0x3000, 0x3010)).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferExhausted {
                offset: 0,
                stage: Stage::Validate
            }
        );
    }

    #[test]
    fn test_read_lines_little_endian_numbers() {
        let data = b"\x0A\x00CLS\x0D\xE8\x03END\x0D";
        let mut cursor = ByteCursor::new(data);
        let lines = read_lines(&mut cursor, &header(0x3000, 0x300B)).unwrap();

        assert_eq!(lines, vec![Line::new(10, "CLS"), Line::new(1000, "END")]);
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn test_read_lines_continues_one_byte_short_of_budget() {
        // First record ends at offset 6, one short of the 7-byte budget
        let data = b"\x0A\x00CLS\x0D\x14\x00END\x0D";
        let mut cursor = ByteCursor::new(data);
        let lines = read_lines(&mut cursor, &header(0x3000, 0x3007)).unwrap();

        assert_eq!(lines, vec![Line::new(10, "CLS"), Line::new(20, "END")]);
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn test_read_lines_stops_exactly_at_budget() {
        // First record ends at offset 6, exactly the 6-byte budget
        let data = b"\x0A\x00CLS\x0D\x14\x00END\x0D";
        let mut cursor = ByteCursor::new(data);
        let lines = read_lines(&mut cursor, &header(0x3000, 0x3006)).unwrap();

        assert_eq!(lines, vec![Line::new(10, "CLS")]);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_read_lines_stops_past_budget() {
        // Budget of 5 bytes covers only the first record
        let data = b"\x0A\x00CLS\x0D\x14\x00END\x0D";
        let mut cursor = ByteCursor::new(data);
        let lines = read_lines(&mut cursor, &header(0x3000, 0x3005)).unwrap();

        assert_eq!(lines, vec![Line::new(10, "CLS")]);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_read_lines_unterminated() {
        let data = b"\x0A\x00PRINT";
        let mut cursor = ByteCursor::new(data);
        let err = read_lines(&mut cursor, &header(0x3000, 0x3010)).unwrap_err();

        assert!(matches!(
            err,
            DecodeError::BufferExhausted {
                stage: Stage::LineText,
                ..
            }
        ));
    }

    #[test]
    fn test_read_lines_high_bytes_widen() {
        let data = b"\x01\x00A\xBF\x0D";
        let mut cursor = ByteCursor::new(data);
        let lines = read_lines(&mut cursor, &header(0x3000, 0x3004)).unwrap();

        assert_eq!(lines[0].text, "A\u{BF}");
    }

    #[test]
    fn test_decode_program_example() {
        let mut cursor = ByteCursor::new(EXAMPLE);
        let program = decode_program(&mut cursor).unwrap();

        assert_eq!(program.offset, 0);
        assert_eq!(program.pre_sync_count(), 0);
        assert_eq!(program.sync_count(), 2);
        assert_eq!(program.file_type(), 0xA5);
        assert_eq!(program.start_address(), 0x3000);
        assert_eq!(program.end_address(), 0x3009);
        assert_eq!(program.program_length(), 10);
        assert_eq!(program.lines, vec![Line::new(10, "PRINT \"HI\"")]);
        assert_eq!(program.checksum, 0xFF);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_decode_program_missing_checksum() {
        let mut cursor = ByteCursor::new(&EXAMPLE[..EXAMPLE.len() - 1]);
        let err = decode_program(&mut cursor).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferExhausted {
                offset: EXAMPLE.len() - 1,
                stage: Stage::Checksum
            }
        );
    }
}

//! TRS-80 Level I BASIC Cassette Decoder
//!
//! Recovers BASIC programs from `.cas` cassette images. A single image may
//! hold several programs back to back; each is returned with its header
//! metadata and its numbered statements.
//!
//! - `parser`: byte cursor, per-program stages and the run driver
//! - `program`: decoded program model and text listing
//! - `app`: configuration and per-file reports
//!
//! ```
//! let bytes = b"\x00\x00\xA5\x30\x00\x30\x09\x0A\x00PRINT \"HI\"\x0D\xFF";
//! let programs = l1cas::decode(bytes).into_result().unwrap();
//! assert_eq!(programs[0].listing_lines(), vec!["10 PRINT \"HI\""]);
//! ```

pub mod app;
pub mod parser;
pub mod program;

pub use parser::{decode, DecodeError, Decoded, Decoder};
pub use program::{Line, Program};

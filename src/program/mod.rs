//! Program Model
//!
//! Decoded cassette programs and their human-readable listing. Everything
//! here owns its data; nothing borrows from the input buffer, so the raw
//! bytes can be dropped as soon as decoding finishes.

mod listing;
mod model;

pub(crate) use listing::group_thousands;
pub use listing::Listing;
pub use model::{Line, Program, ProgramHeader, SyncRun};

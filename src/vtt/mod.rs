//! WebVTT reconstruction
//!
//! Turns decoded fragment samples back into WebVTT text: cue payload
//! parsing, the per-sample timeline, cue block assembly, and the
//! cross-segment deduplication pass.

pub mod assembler;
pub mod cue;
pub mod dedup;
pub mod timeline;

pub use assembler::{assemble, VTT_HEADER};
pub use cue::{parse_cue, Cue};
pub use dedup::deduplicate;
pub use timeline::{build_timeline, TimelineEntry, Timestamp};

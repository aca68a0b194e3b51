//! `sidx` (segment index) decoding
//!
//! The only thing the extractor needs from the segment index is the
//! time-in-stream anchor; the rest of the fixed layout is decoded so that a
//! truncated box is reported instead of producing a bogus anchor.

use super::boxes::{be_u16, be_u32};
use crate::error::Result;

/// Timing anchor decoded once per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidxInfo {
    /// Units per second for the reference entries.
    pub timescale: u32,
    /// Milliseconds from stream start to this segment's first sample.
    pub time_in_stream: u32,
    pub earliest_presentation_time: u32,
    pub first_offset: u32,
    pub reference_count: u16,
}

/// Decode the fixed-layout prefix of a `sidx` box body.
///
/// Layout: five big-endian u32 words (version/flags, reference id,
/// timescale, time-in-stream, reserved), earliest presentation time, first
/// offset, a reserved u16, and the reference count. Reading past the end of
/// the content is a fatal decode error.
pub fn decode_sidx(content: &[u8]) -> Result<SidxInfo> {
    let _version_flags = be_u32(content, 0, "sidx")?;
    let _reference_id = be_u32(content, 4, "sidx")?;
    let timescale = be_u32(content, 8, "sidx")?;
    let time_in_stream = be_u32(content, 12, "sidx")?;
    let _reserved = be_u32(content, 16, "sidx")?;
    let earliest_presentation_time = be_u32(content, 20, "sidx")?;
    let first_offset = be_u32(content, 24, "sidx")?;
    let _reserved16 = be_u16(content, 28, "sidx")?;
    let reference_count = be_u16(content, 30, "sidx")?;

    Ok(SidxInfo {
        timescale,
        time_in_stream,
        earliest_presentation_time,
        first_offset,
        reference_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::fixtures::sidx_content;

    #[test]
    fn test_decode_sidx() {
        let content = sidx_content(30_000);
        let info = decode_sidx(&content).unwrap();
        assert_eq!(info.timescale, 1000);
        assert_eq!(info.time_in_stream, 30_000);
        assert_eq!(info.reference_count, 1);
    }

    #[test]
    fn test_truncated_sidx_is_fatal() {
        let content = sidx_content(30_000);
        assert!(decode_sidx(&content[..20]).is_err());
        assert!(decode_sidx(&[]).is_err());
    }
}

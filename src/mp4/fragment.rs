//! `moof` (movie fragment) decoding
//!
//! A movie fragment carries its sequence number (`mfhd`) and one track
//! fragment (`traf`) holding the track header (`tfhd`), the base decode time
//! (`tfdt`) and the ordered sample run list (`trun`). Only the fields the
//! subtitle pipeline needs are decoded; `trun` flags are carried as opaque
//! bytes.

use super::boxes::{be_u16, be_u32, read_boxes, take4};
use crate::error::{BoxError, Result};

/// One timed sample from a `trun` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSample {
    /// Sample duration in milliseconds.
    pub duration_ms: u32,
    /// Opaque 4-byte value copied verbatim from the run record. Reinterpreted
    /// big-endian it is the total length of the sample's record inside
    /// `mdat` (size word included); as raw bytes it doubles as the pattern
    /// the legacy marker scan looks for.
    pub flag_marker: [u8; 4],
}

impl TrackSample {
    /// Total length of this sample's record in `mdat`, size word included.
    pub fn record_len(&self) -> usize {
        u32::from_be_bytes(self.flag_marker) as usize
    }
}

/// Decoded `tfhd` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackFragmentHeader {
    pub data_source: u16,
    pub length: u16,
    pub track_id: u32,
    pub sample_number: u32,
    /// Present only when the box carries more than the fixed 12-byte prefix.
    pub bytes_per_compression: Option<u16>,
    pub samples_per_compression: Option<u16>,
}

/// Decoded `tfdt` box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfdtBox {
    pub version: u8,
    pub base_media_decode_time: u64,
}

/// Decoded `trun` box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrunBox {
    /// Opaque flags word, not decoded further.
    pub flags: [u8; 4],
    pub sample_count: u32,
    pub data_offset: u32,
    pub samples: Vec<TrackSample>,
}

/// Per-fragment metadata with the ordered sample list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentInfo {
    pub sequence_number: u32,
    pub track_id: u32,
    pub sample_number: u32,
    pub base_media_decode_time: u64,
    pub samples: Vec<TrackSample>,
}

/// Decode a `moof` box body into [`FragmentInfo`].
///
/// Every `trun` in the `traf` contributes its samples, in file order.
pub fn decode_moof(content: &[u8]) -> Result<FragmentInfo> {
    let boxes = read_boxes(content)?;

    let mfhd = boxes.first(b"mfhd").ok_or(BoxError::Missing("mfhd"))?;
    let sequence_number = be_u32(mfhd.content, 0, "mfhd")?;

    let traf = boxes.first(b"traf").ok_or(BoxError::Missing("traf"))?;
    let traf_boxes = read_boxes(traf.content)?;

    let tfhd_box = traf_boxes.first(b"tfhd").ok_or(BoxError::Missing("tfhd"))?;
    let tfhd = decode_tfhd(tfhd_box.content)?;

    let tfdt_box = traf_boxes.first(b"tfdt").ok_or(BoxError::Missing("tfdt"))?;
    let tfdt = decode_tfdt(tfdt_box.content)?;

    let mut samples = Vec::new();
    let mut declared: u64 = 0;
    let mut saw_trun = false;
    for trun in traf_boxes.all(b"trun") {
        saw_trun = true;
        let run = decode_trun(trun.content)?;
        declared += u64::from(run.sample_count);
        samples.extend(run.samples);
    }
    if !saw_trun {
        return Err(BoxError::Missing("trun").into());
    }
    if declared != samples.len() as u64 {
        tracing::debug!(
            declared,
            actual = samples.len(),
            "trun sample count disagrees with record count"
        );
    }

    Ok(FragmentInfo {
        sequence_number,
        track_id: tfhd.track_id,
        sample_number: tfhd.sample_number,
        base_media_decode_time: tfdt.base_media_decode_time,
        samples,
    })
}

/// Decode a `tfhd` box body.
///
/// Fixed 12-byte prefix; the two compression fields are present only when
/// enough bytes remain beyond it.
pub fn decode_tfhd(content: &[u8]) -> Result<TrackFragmentHeader> {
    let data_source = be_u16(content, 0, "tfhd")?;
    let length = be_u16(content, 2, "tfhd")?;
    let track_id = be_u32(content, 4, "tfhd")?;
    let sample_number = be_u32(content, 8, "tfhd")?;

    let mut bytes_per_compression = None;
    let mut samples_per_compression = None;
    if content.len() > 12 {
        if content.len() >= 14 {
            bytes_per_compression = Some(be_u16(content, 12, "tfhd")?);
        }
        if content.len() >= 16 {
            samples_per_compression = Some(be_u16(content, 14, "tfhd")?);
        }
    }

    Ok(TrackFragmentHeader {
        data_source,
        length,
        track_id,
        sample_number,
        bytes_per_compression,
        samples_per_compression,
    })
}

/// Decode a `tfdt` box body: a version byte followed by the base media
/// decode time as a big-endian unsigned value of whatever width remains.
pub fn decode_tfdt(content: &[u8]) -> Result<TfdtBox> {
    let version = *content.first().ok_or(BoxError::Truncated {
        tag: "tfdt",
        need: 1,
        have: 0,
    })?;
    let rest = &content[1..];

    let significant = if rest.len() > 8 {
        let (high, low) = rest.split_at(rest.len() - 8);
        if high.iter().any(|&b| b != 0) {
            return Err(BoxError::ValueTooWide { tag: "tfdt" }.into());
        }
        low
    } else {
        rest
    };
    let base_media_decode_time = significant
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

    Ok(TfdtBox {
        version,
        base_media_decode_time,
    })
}

/// Decode a `trun` box body.
///
/// After the 12-byte prefix the content is a run of 8-byte sample records:
/// a u32 duration in milliseconds and 4 opaque marker bytes. A remainder
/// that is not a whole record is malformed input, not something to truncate
/// silently.
pub fn decode_trun(content: &[u8]) -> Result<TrunBox> {
    let flags = take4(content, 0, "trun")?;
    let sample_count = be_u32(content, 4, "trun")?;
    let data_offset = be_u32(content, 8, "trun")?;

    let records = &content[12..];
    let remainder = records.len() % 8;
    if remainder != 0 {
        return Err(BoxError::TrailingSampleBytes(remainder).into());
    }

    let samples = records
        .chunks_exact(8)
        .map(|record| TrackSample {
            duration_ms: u32::from_be_bytes([record[0], record[1], record[2], record[3]]),
            flag_marker: [record[4], record[5], record[6], record[7]],
        })
        .collect();

    Ok(TrunBox {
        flags,
        sample_count,
        data_offset,
        samples,
    })
}

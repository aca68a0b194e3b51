//! Per-segment decode pipeline
//!
//! One DASH segment file is decoded in isolation: top-level boxes, the
//! `sidx` anchor, then each `moof`+`mdat` fragment pair in order. The
//! running timeline offset is anchored once at the segment's
//! time-in-stream and carried across fragments.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{BoxError, Result, VttError};
use crate::mp4::{decode_moof, decode_sidx, read_boxes, slice_samples};
use crate::vtt::{assemble, build_timeline, parse_cue};

/// One loaded segment file.
#[derive(Debug, Clone)]
pub struct DashSegment {
    content: Bytes,
}

impl DashSegment {
    /// Load a segment file into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VttError::NotFound(path.to_path_buf()));
        }
        let content = Bytes::from(std::fs::read(path)?);
        Ok(Self { content })
    }

    /// Wrap an in-memory segment.
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Decode the segment into its WebVTT cue blocks (no header).
    ///
    /// A segment without a `styp` (an init segment, say) carries no
    /// fragments and contributes nothing. A missing `sidx` is fatal: there
    /// is no timeline anchor to place the cues with.
    pub fn to_vtt(&self) -> Result<String> {
        let boxes = read_boxes(&self.content)?;
        tracing::debug!(
            tags = ?boxes.iter().map(|b| b.tag_str()).collect::<Vec<_>>(),
            "top-level boxes"
        );

        let sidx_box = boxes.first(b"sidx").ok_or(BoxError::Missing("sidx"))?;
        let sidx = decode_sidx(sidx_box.content)?;
        tracing::debug!(
            timescale = sidx.timescale,
            anchor_ms = sidx.time_in_stream,
            ept = sidx.earliest_presentation_time,
            first_offset = sidx.first_offset,
            references = sidx.reference_count,
            "segment index"
        );

        if boxes.first(b"styp").is_none() {
            tracing::debug!("segment has no styp, skipping");
            return Ok(String::new());
        }

        let moof_count = boxes.all(b"moof").count();
        let mdat_count = boxes.all(b"mdat").count();
        if mdat_count < moof_count {
            return Err(BoxError::Missing("mdat").into());
        }
        if mdat_count > moof_count {
            tracing::warn!(moof_count, mdat_count, "unpaired mdat boxes ignored");
        }

        let mut anchor_ms = u64::from(sidx.time_in_stream);
        let mut out = String::new();
        for (moof, mdat) in boxes.all(b"moof").zip(boxes.all(b"mdat")) {
            let fragment = decode_moof(moof.content)?;
            let payloads = slice_samples(mdat.content, &fragment.samples)?;
            let cues = payloads
                .iter()
                .map(|payload| parse_cue(payload))
                .collect::<Result<Vec<_>>>()?;
            let timeline = build_timeline(&fragment.samples, anchor_ms);
            tracing::debug!(
                sequence = fragment.sequence_number,
                track = fragment.track_id,
                samples = fragment.samples.len(),
                "decoded fragment"
            );
            anchor_ms = timeline.last().map(|entry| entry.end_ms).unwrap_or(anchor_ms);
            out.push_str(&assemble(&timeline, &cues)?);
        }
        Ok(out)
    }
}

/// Extract the numeric segment index from a file name.
///
/// The index is whatever follows the last `'='`, then the last `'-'`, up to
/// the first `'.'` — which covers both `qsm=1000-30000.dash` style names
/// and plain `00030000.mp4` ones.
pub fn segment_index(name: &str) -> Result<u64> {
    let tail = name.rsplit('=').next().unwrap_or(name);
    let tail = tail.rsplit('-').next().unwrap_or(tail);
    let digits = tail.split('.').next().unwrap_or(tail);
    digits
        .parse()
        .map_err(|_| VttError::InvalidSegmentName(name.to_string()))
}

/// List a directory's segment files, ascending by segment index.
pub fn ordered_segments(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(VttError::NotFound(dir.to_path_buf()));
    }

    let mut segments = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name
            .to_str()
            .ok_or_else(|| VttError::InvalidSegmentName(name.to_string_lossy().into_owned()))?;
        segments.push((segment_index(name)?, path));
    }
    segments.sort_by_key(|(index, _)| *index);

    Ok(segments.into_iter().map(|(_, path)| path).collect())
}

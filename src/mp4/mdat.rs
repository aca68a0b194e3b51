//! `mdat` sample slicing
//!
//! The media block of a subtitle fragment is a run of sample records, each
//! `[u32 big-endian record length][payload]`, where the record length is the
//! very value carried as the sample's opaque `trun` marker. The default
//! slicer walks the block by cumulative offsets and checks each in-block
//! size word against the marker.
//!
//! The `marker-scan` cargo feature restores the legacy behavior of
//! *searching* for the marker bytes instead. That treats an arbitrary 4-byte
//! value as a locatable pattern: if the same bytes happen to occur inside an
//! earlier sample's text payload the scan finds a false match, which is why
//! it is no longer the default.

use crate::error::{BoxError, Result};

use super::fragment::TrackSample;

/// Split an `mdat` body into one payload slice per sample, in sample order.
///
/// The payload excludes the 4-byte size word; its length is the marker value
/// minus 4. The returned vector always has exactly `samples.len()` entries.
pub fn slice_samples<'a>(mdat: &'a [u8], samples: &[TrackSample]) -> Result<Vec<&'a [u8]>> {
    #[cfg(feature = "marker-scan")]
    {
        slice_by_marker_scan(mdat, samples)
    }
    #[cfg(not(feature = "marker-scan"))]
    {
        slice_by_offset(mdat, samples)
    }
}

/// Cumulative-offset slicing.
///
/// Each sample's record starts where the previous one ended; the in-block
/// size word must equal the sample's `trun` marker.
pub fn slice_by_offset<'a>(mdat: &'a [u8], samples: &[TrackSample]) -> Result<Vec<&'a [u8]>> {
    let mut payloads = Vec::with_capacity(samples.len());
    let mut cursor = 0usize;

    for (index, sample) in samples.iter().enumerate() {
        let record_len = sample.record_len();
        if record_len < 4 {
            return Err(BoxError::MarkerTooSmall {
                index,
                len: record_len,
            }
            .into());
        }
        let size_word = mdat.get(cursor..cursor + 4).ok_or(BoxError::SampleOverrun {
            index,
            len: record_len,
        })?;
        if size_word != sample.flag_marker {
            return Err(BoxError::MarkerMismatch { index }.into());
        }
        let payload = mdat
            .get(cursor + 4..cursor + record_len)
            .ok_or(BoxError::SampleOverrun {
                index,
                len: record_len,
            })?;
        payloads.push(payload);
        cursor += record_len;
    }

    if cursor != mdat.len() {
        tracing::warn!(
            consumed = cursor,
            total = mdat.len(),
            "mdat has unconsumed trailing bytes"
        );
    }
    Ok(payloads)
}

/// Legacy marker-scan slicing.
///
/// Finds each sample's marker bytes from the current search cursor; the
/// payload starts 4 bytes after the match. Total consumed length is verified
/// against the block length afterwards, since a false match inside a payload
/// would silently shift every following sample.
pub fn slice_by_marker_scan<'a>(mdat: &'a [u8], samples: &[TrackSample]) -> Result<Vec<&'a [u8]>> {
    let mut payloads = Vec::with_capacity(samples.len());
    let mut cursor = 0usize;

    for (index, sample) in samples.iter().enumerate() {
        let record_len = sample.record_len();
        if record_len < 4 {
            return Err(BoxError::MarkerTooSmall {
                index,
                len: record_len,
            }
            .into());
        }
        let found = mdat
            .get(cursor..)
            .and_then(|tail| {
                tail.windows(4)
                    .position(|window| window == sample.flag_marker)
            })
            .ok_or(BoxError::MarkerNotFound {
                index,
                marker: sample.flag_marker,
            })?;
        let start = cursor + found + 4;
        let end = start + record_len - 4;
        let payload = mdat.get(start..end).ok_or(BoxError::SampleOverrun {
            index,
            len: record_len,
        })?;
        payloads.push(payload);
        cursor = end;
    }

    if cursor != mdat.len() {
        tracing::warn!(
            consumed = cursor,
            total = mdat.len(),
            "marker scan did not consume the whole mdat; a marker may have matched inside a payload"
        );
    }
    Ok(payloads)
}

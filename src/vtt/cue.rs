//! Cue payload parsing
//!
//! One `mdat` sample payload is either a `vtte` box (an empty cue, clearing
//! the screen) or a `vttc` box carrying the cue settings and text. The
//! layout decoded here is the pragmatic subset real streams carry rather
//! than the full ISOBMFF child-box grammar: the first child is read through
//! its size word as the settings region, and the text is located by
//! searching for the `payl` tag.

use crate::error::{BoxError, Result, VttError};
use crate::mp4::boxes::be_u32;

/// Tag of a cue sample with text.
const CUE_TAG: &[u8; 4] = b"vttc";
/// Tag of a cue-clearing sample.
const EMPTY_CUE_TAG: &[u8; 4] = b"vtte";
/// Settings sub-box tag, stripped out of the decoded style region.
const SETTINGS_TAG: &str = "sttg";
/// Payload sub-box tag; the 4 bytes before it are the payload length.
const PAYLOAD_TAG: &[u8; 4] = b"payl";
/// Source-id sub-box tag; when it trails the payload, the sub-box is cut.
const SOURCE_ID_TAG: &[u8; 4] = b"vsid";

/// One parsed cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// A cue-clearing instruction; contributes no output.
    Empty,
    /// A visible cue.
    Text { text: String, style: String },
}

impl Cue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cue::Empty)
    }
}

/// Parse one sample payload into a [`Cue`].
///
/// Any leading tag other than `vttc`/`vtte` is a fatal error.
pub fn parse_cue(sample: &[u8]) -> Result<Cue> {
    let mut tag = [0u8; 4];
    let head = sample.get(..4).unwrap_or(sample);
    tag[..head.len()].copy_from_slice(head);

    if &tag == EMPTY_CUE_TAG {
        return Ok(Cue::Empty);
    }
    if &tag != CUE_TAG {
        return Err(VttError::UnexpectedCueType(tag));
    }

    // The settings child follows the tag; its size word is at [4..8] and its
    // region spans size - 4 bytes from offset 8 (the 'sttg' tag included).
    let header_size = be_u32(sample, 4, "vttc")? as usize;
    let style_end = (8 + header_size.saturating_sub(4)).min(sample.len());
    let style_bytes = sample.get(8..style_end).unwrap_or(&[]);
    let style = String::from_utf8(style_bytes.to_vec())
        .map_err(VttError::InvalidCueText)?
        .replace(SETTINGS_TAG, "");

    let payl_at = find(sample, PAYLOAD_TAG).ok_or(BoxError::NoPayload)?;
    if payl_at < 4 {
        return Err(BoxError::NoPayload.into());
    }
    let payload_size = be_u32(sample, payl_at - 4, "payl")? as usize;
    let start = payl_at + 4;
    let end = (start + payload_size).min(sample.len());
    let mut payload = sample.get(start..end).unwrap_or(&[]);

    if payload.ends_with(SOURCE_ID_TAG) {
        payload = &payload[..payload.len().saturating_sub(8)];
    }

    // Anything after the last '>' is assumed to be a dangling closing-tag
    // fragment and dropped. A payload whose legitimate text contains '>'
    // loses its tail here.
    if let Some(from_end) = payload.iter().rev().position(|&b| b == b'>') {
        if from_end > 0 {
            payload = &payload[..payload.len() - from_end];
        }
    }

    let text = String::from_utf8(payload.to_vec()).map_err(VttError::InvalidCueText)?;
    Ok(Cue::Text { text, style })
}

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8; 4]) -> Option<usize> {
    haystack.windows(4).position(|window| window == needle)
}

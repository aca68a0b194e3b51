//! Test fixtures
//!
//! Builders for synthetic DASH subtitle segments, mirroring the layout the
//! decoders expect: top-level `styp`/`sidx`/`moof`/`mdat`, with `vttc` and
//! `vtte` sample records inside the media block.

/// Encode one box: `[u32 size][tag][content]`.
pub fn encode_box(tag: &[u8; 4], content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + content.len());
    out.extend_from_slice(&((8 + content.len()) as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(content);
    out
}

/// `sidx` body with the given time-in-stream anchor (milliseconds),
/// timescale 1000 and one reference.
pub fn sidx_content(time_in_stream: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u32.to_be_bytes()); // version/flags
    out.extend_from_slice(&1u32.to_be_bytes()); // reference id
    out.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    out.extend_from_slice(&time_in_stream.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.extend_from_slice(&time_in_stream.to_be_bytes()); // earliest presentation time
    out.extend_from_slice(&0u32.to_be_bytes()); // first offset
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&1u16.to_be_bytes()); // reference count
    out
}

/// `trun` body for `(duration_ms, record_len)` samples.
pub fn trun_content(samples: &[(u32, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0u8; 4]); // flags
    out.extend_from_slice(&(samples.len() as u32).to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // data offset
    for &(duration_ms, record_len) in samples {
        out.extend_from_slice(&duration_ms.to_be_bytes());
        out.extend_from_slice(&record_len.to_be_bytes());
    }
    out
}

/// `moof` body: `mfhd` plus a `traf` carrying `tfhd`, `tfdt` and one `trun`.
pub fn moof_content(sequence: u32, base_decode_time: u32, samples: &[(u32, u32)]) -> Vec<u8> {
    let mfhd = encode_box(b"mfhd", &sequence.to_be_bytes());

    let mut tfhd = Vec::new();
    tfhd.extend_from_slice(&0u16.to_be_bytes()); // data source
    tfhd.extend_from_slice(&4u16.to_be_bytes()); // length
    tfhd.extend_from_slice(&1u32.to_be_bytes()); // track id
    tfhd.extend_from_slice(&1u32.to_be_bytes()); // sample number

    let mut tfdt = vec![0u8, 0, 0, 0]; // version + flags
    tfdt.extend_from_slice(&base_decode_time.to_be_bytes());

    let mut traf = encode_box(b"tfhd", &tfhd);
    traf.extend_from_slice(&encode_box(b"tfdt", &tfdt));
    traf.extend_from_slice(&encode_box(b"trun", &trun_content(samples)));

    let mut out = mfhd;
    out.extend_from_slice(&encode_box(b"traf", &traf));
    out
}

/// One `vttc` sample record with settings and payload children.
pub fn cue_record(text: &str, style: &str) -> Vec<u8> {
    let mut children = encode_box(b"sttg", style.as_bytes());
    children.extend_from_slice(&encode_box(b"payl", text.as_bytes()));
    encode_box(b"vttc", &children)
}

/// A `vttc` record with a trailing `vsid` source-id child.
pub fn cue_record_with_source_id(text: &str, style: &str, source_id: u32) -> Vec<u8> {
    let mut children = encode_box(b"sttg", style.as_bytes());
    children.extend_from_slice(&encode_box(b"payl", text.as_bytes()));
    children.extend_from_slice(&encode_box(b"vsid", &source_id.to_be_bytes()));
    encode_box(b"vttc", &children)
}

/// One `vtte` (empty cue) sample record.
pub fn empty_cue_record() -> Vec<u8> {
    encode_box(b"vtte", &[])
}

/// One cue of a synthetic segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentCue<'a> {
    pub duration_ms: u32,
    /// `None` builds a cue-clearing `vtte` sample.
    pub text: Option<&'a str>,
}

impl<'a> SegmentCue<'a> {
    pub fn text(duration_ms: u32, text: &'a str) -> Self {
        Self {
            duration_ms,
            text: Some(text),
        }
    }

    pub fn empty(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            text: None,
        }
    }
}

/// A complete one-fragment segment file anchored at the given
/// time-in-stream (milliseconds).
pub fn segment_bytes(time_in_stream: u32, cues: &[SegmentCue<'_>]) -> Vec<u8> {
    let mut mdat = Vec::new();
    let mut samples = Vec::new();
    for cue in cues {
        let record = match cue.text {
            Some(text) => cue_record(text, ""),
            None => empty_cue_record(),
        };
        samples.push((cue.duration_ms, record.len() as u32));
        mdat.extend_from_slice(&record);
    }

    let mut out = encode_box(b"styp", b"msdh");
    out.extend_from_slice(&encode_box(b"sidx", &sidx_content(time_in_stream)));
    out.extend_from_slice(&encode_box(
        b"moof",
        &moof_content(1, time_in_stream, &samples),
    ));
    out.extend_from_slice(&encode_box(b"mdat", &mdat));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_box_layout() {
        let encoded = encode_box(b"styp", b"msdh");
        assert_eq!(encoded.len(), 12);
        assert_eq!(&encoded[..4], &12u32.to_be_bytes());
        assert_eq!(&encoded[4..8], b"styp");
        assert_eq!(&encoded[8..], b"msdh");
    }

    #[test]
    fn test_segment_bytes_structure() {
        let bytes = segment_bytes(0, &[SegmentCue::text(1000, "hi")]);
        let boxes = crate::mp4::read_boxes(&bytes).unwrap();
        assert!(boxes.first(b"styp").is_some());
        assert!(boxes.first(b"sidx").is_some());
        assert!(boxes.first(b"moof").is_some());
        assert!(boxes.first(b"mdat").is_some());
    }
}

//! End-to-end tests over the whole pipeline: synthetic segment files on
//! disk in, one merged and deduplicated `.vtt` document out.

#[cfg(test)]
mod tests {
    use crate::extract::extract_vtt_from_dash;
    use crate::integration::fixtures::{segment_bytes, SegmentCue};

    #[test]
    fn test_two_segments_with_overlap() {
        let dir = tempfile::tempdir().unwrap();

        // The "B" cue straddles the segment boundary, so it reappears at
        // the head of the second segment and must be collapsed into one
        // block spanning both copies.
        let first = segment_bytes(
            0,
            &[SegmentCue::text(1000, "A"), SegmentCue::text(1000, "B")],
        );
        let second = segment_bytes(
            1000,
            &[SegmentCue::text(1500, "B"), SegmentCue::text(1000, "C")],
        );
        std::fs::write(dir.path().join("00000000.mp4"), &first).unwrap();
        std::fs::write(dir.path().join("00010000.mp4"), &second).unwrap();

        let out = dir.path().join("merged.vtt");
        extract_vtt_from_dash(dir.path(), &out).unwrap();

        let merged = std::fs::read_to_string(&out).unwrap();
        let expected = "WEBVTT\n\
                        \n0:00:00.000 --> 0:00:01.000 \nA\n\
                        \n0:00:01.000 --> 0:00:02.500 \nB\n\
                        \n0:00:02.500 --> 0:00:03.500 \nC\n\n";
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_empty_cues_leave_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let segment = segment_bytes(
            0,
            &[
                SegmentCue::text(1000, "A"),
                SegmentCue::empty(2000),
                SegmentCue::text(1000, "B"),
            ],
        );
        std::fs::write(dir.path().join("00000000.mp4"), &segment).unwrap();

        let out = dir.path().join("merged.vtt");
        extract_vtt_from_dash(dir.path(), &out).unwrap();

        let merged = std::fs::read_to_string(&out).unwrap();
        assert!(merged.contains("0:00:00.000 --> 0:00:01.000 \nA"));
        assert!(merged.contains("0:00:03.000 --> 0:00:04.000 \nB"));
        // nothing rendered for the cleared interval
        assert!(!merged.contains("0:00:01.000 --> 0:00:03.000"));
    }

    #[test]
    fn test_segments_decoded_in_index_order() {
        let dir = tempfile::tempdir().unwrap();

        // Written out of order on purpose; the index in the file name wins.
        let late = segment_bytes(2000, &[SegmentCue::text(1000, "second")]);
        let early = segment_bytes(0, &[SegmentCue::text(1000, "first")]);
        std::fs::write(dir.path().join("00010000.mp4"), &late).unwrap();
        std::fs::write(dir.path().join("00000000.mp4"), &early).unwrap();

        let out = dir.path().join("merged.vtt");
        extract_vtt_from_dash(dir.path(), &out).unwrap();

        let merged = std::fs::read_to_string(&out).unwrap();
        let first_at = merged.find("first").unwrap();
        let second_at = merged.find("second").unwrap();
        assert!(first_at < second_at);
    }
}

//! End-to-end extraction
//!
//! Decodes every segment in a DASH folder in ascending index order,
//! concatenates their cue blocks after the WebVTT header, runs the
//! cross-segment deduplication pass, and writes the result.

use std::path::Path;

use crate::error::Result;
use crate::segment::{ordered_segments, DashSegment};
use crate::vtt::{deduplicate, VTT_HEADER};

/// Build one merged `.vtt` file from a folder of DASH segments.
pub fn extract_vtt_from_dash(input: &Path, output: &Path) -> Result<()> {
    let files = ordered_segments(input)?;
    tracing::info!("found {} segments in {}", files.len(), input.display());

    let mut vtt = String::from(VTT_HEADER);
    for path in &files {
        tracing::info!("decoding {}", path.display());
        let segment = DashSegment::open(path)?;
        vtt.push_str(&segment.to_vtt()?);
    }

    let deduped = deduplicate(&vtt);
    std::fs::write(output, deduped)?;
    tracing::info!("wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_folder_yields_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("subs.vtt");
        extract_vtt_from_dash(dir.path(), &out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), VTT_HEADER);
    }
}

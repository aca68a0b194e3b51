//! Cue block assembly
//!
//! Zips one fragment's timeline with its parsed cues into WebVTT cue
//! blocks. Empty cues contribute nothing.

use crate::error::{Result, VttError};

use super::cue::Cue;
use super::timeline::{TimelineEntry, Timestamp};

/// File header every WebVTT document starts with.
pub const VTT_HEADER: &str = "WEBVTT\n";

/// Render the cue blocks for one fragment.
///
/// Each non-empty cue becomes
/// `\n{start} --> {end} {style}\n{text}\n`. The timeline and cue lists
/// must be the same length; a mismatch means the fragment metadata and the
/// media block disagreed about the sample count.
pub fn assemble(timeline: &[TimelineEntry], cues: &[Cue]) -> Result<String> {
    if timeline.len() != cues.len() {
        return Err(VttError::SampleCountMismatch {
            cues: cues.len(),
            samples: timeline.len(),
        });
    }

    let mut out = String::new();
    for (entry, cue) in timeline.iter().zip(cues) {
        let Cue::Text { text, style } = cue else {
            continue;
        };
        let start = Timestamp::from_millis(entry.start_ms)?;
        let end = Timestamp::from_millis(entry.end_ms)?;
        out.push_str(&format!("\n{start} --> {end} {style}\n{text}\n"));
    }
    Ok(out)
}

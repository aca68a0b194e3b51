use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the extractor
#[derive(Error, Debug)]
pub enum VttError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Input not found: {0}")]
    NotFound(PathBuf),

    #[error("Malformed box: {0}")]
    MalformedBox(#[from] BoxError),

    #[error("Unexpected cue box type: {0:?}")]
    UnexpectedCueType([u8; 4]),

    #[error("Cue text is not valid UTF-8: {0}")]
    InvalidCueText(#[from] std::string::FromUtf8Error),

    #[error("Timestamp overflow: day count {0} out of range")]
    DurationOverflow(i64),

    #[error("Timestamp invariant violated: {0}")]
    DurationInvariant(String),

    #[error("Cannot extract a segment index from file name: {0}")]
    InvalidSegmentName(String),

    #[error("Sample count mismatch: {cues} cue payloads for {samples} trun samples")]
    SampleCountMismatch { cues: usize, samples: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Box-level decode errors; always fatal for the segment being decoded
#[derive(Error, Debug)]
pub enum BoxError {
    #[error("box tag at offset {0} is not valid UTF-8")]
    InvalidTag(usize),

    #[error("'{tag}' content truncated: need {need} bytes, {have} available")]
    Truncated {
        tag: &'static str,
        need: usize,
        have: usize,
    },

    #[error("required '{0}' box missing")]
    Missing(&'static str),

    #[error("trun sample records truncated: {0} trailing bytes")]
    TrailingSampleBytes(usize),

    #[error("mdat sample {index}: size marker mismatch")]
    MarkerMismatch { index: usize },

    #[error("mdat sample {index}: marker {marker:02x?} not found")]
    MarkerNotFound { index: usize, marker: [u8; 4] },

    #[error("mdat sample {index}: marker value {len} cannot cover its own size word")]
    MarkerTooSmall { index: usize, len: usize },

    #[error("mdat sample {index}: payload of {len} bytes exceeds remaining content")]
    SampleOverrun { index: usize, len: usize },

    #[error("'{tag}' value does not fit in 64 bits")]
    ValueTooWide { tag: &'static str },

    #[error("cue sample has no 'payl' sub-box")]
    NoPayload,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VttError>;

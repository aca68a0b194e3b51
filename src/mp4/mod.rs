//! Fragmented-MP4 (ISOBMFF) decoding
//!
//! This module decodes the handful of boxes a DASH subtitle segment is made
//! of: the top-level tokenizer, the `sidx` timing anchor, the `moof` fragment
//! metadata tree, and the `mdat` sample payload slicer.

pub mod boxes;
pub mod fragment;
pub mod mdat;
pub mod sidx;

pub use boxes::{read_boxes, BoxList, Mp4Box};
pub use fragment::{decode_moof, FragmentInfo, TrackSample};
pub use mdat::slice_samples;
pub use sidx::{decode_sidx, SidxInfo};

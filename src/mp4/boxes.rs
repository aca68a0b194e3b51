//! ISOBMFF box tokenizer
//!
//! Splits a byte buffer into its top-level boxes. Nested containers (`moof`,
//! `traf`) are re-entered by running the same scan over a box's content.

use crate::error::{BoxError, Result};

/// One decoded box.
///
/// The declared size includes the 8-byte header, so
/// `size as usize == 8 + content.len()` always holds for boxes produced by
/// [`read_boxes`].
#[derive(Debug, Clone, Copy)]
pub struct Mp4Box<'a> {
    /// Four-character tag, validated as UTF-8 during the scan.
    pub tag: [u8; 4],
    /// Box body (everything after the size word and tag).
    pub content: &'a [u8],
    /// Declared size, header included.
    pub size: u32,
    /// Offset of the byte following this box within the scanned window.
    pub next_offset: usize,
}

impl<'a> Mp4Box<'a> {
    /// The tag as text.
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????")
    }
}

/// Ordered collection of sibling boxes.
///
/// Boxes are kept in file order. Real streams may carry several siblings
/// with the same tag (e.g. multiple `trun` in a `traf`), so a tag-keyed map
/// would silently drop all but the last; callers pick between [`first`] for
/// boxes that occur once and [`all`] for repeatable ones.
///
/// [`first`]: BoxList::first
/// [`all`]: BoxList::all
#[derive(Debug, Default)]
pub struct BoxList<'a> {
    boxes: Vec<Mp4Box<'a>>,
}

impl<'a> BoxList<'a> {
    /// First box with the given tag, in file order.
    pub fn first(&self, tag: &[u8; 4]) -> Option<&Mp4Box<'a>> {
        self.boxes.iter().find(|b| &b.tag == tag)
    }

    /// Every box with the given tag, in file order.
    pub fn all(&self, tag: &[u8; 4]) -> impl Iterator<Item = &Mp4Box<'a>> + '_ {
        let tag = *tag;
        self.boxes.iter().filter(move |b| b.tag == tag)
    }

    /// All boxes, in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Mp4Box<'a>> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Tokenize every top-level box in `buf`.
pub fn read_boxes(buf: &[u8]) -> Result<BoxList<'_>> {
    read_boxes_in(buf, 0, buf.len())
}

/// Tokenize every top-level box in `buf[start..stop)`.
///
/// Each box is `[u32 big-endian size][4-byte tag][size - 8 bytes content]`.
/// A header or body that would run past the window ends the scan; that is
/// the normal end-of-boxes condition, not an error. A tag that is not valid
/// UTF-8 is a fatal decode error.
pub fn read_boxes_in(buf: &[u8], start: usize, stop: usize) -> Result<BoxList<'_>> {
    let stop = stop.min(buf.len());
    let mut boxes = Vec::new();
    let mut cursor = start;

    while cursor < stop {
        if cursor + 8 > stop {
            break;
        }
        let size = match take4_at(buf, cursor) {
            Some(word) => u32::from_be_bytes(word),
            None => break,
        };
        if (size as usize) < 8 {
            // A size that cannot cover its own header would stall the scan.
            tracing::warn!("box at offset {} declares size {}, stopping scan", cursor, size);
            break;
        }
        let tag = match take4_at(buf, cursor + 4) {
            Some(tag) => tag,
            None => break,
        };
        if std::str::from_utf8(&tag).is_err() {
            return Err(BoxError::InvalidTag(cursor + 4).into());
        }
        let body_end = cursor + size as usize;
        if body_end > stop {
            break;
        }
        let decoded = Mp4Box {
            tag,
            content: &buf[cursor + 8..body_end],
            size,
            next_offset: body_end,
        };
        cursor = decoded.next_offset;
        boxes.push(decoded);
    }

    Ok(BoxList { boxes })
}

/// Read 4 bytes at `at`, if available.
fn take4_at(buf: &[u8], at: usize) -> Option<[u8; 4]> {
    buf.get(at..at + 4)?.try_into().ok()
}

/// Read a big-endian u32 at `at` within a box's content.
pub(crate) fn be_u32(content: &[u8], at: usize, tag: &'static str) -> Result<u32> {
    let bytes: [u8; 4] = content
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(BoxError::Truncated {
            tag,
            need: at + 4,
            have: content.len(),
        })?;
    Ok(u32::from_be_bytes(bytes))
}

/// Read a big-endian u16 at `at` within a box's content.
pub(crate) fn be_u16(content: &[u8], at: usize, tag: &'static str) -> Result<u16> {
    let bytes: [u8; 2] = content
        .get(at..at + 2)
        .and_then(|b| b.try_into().ok())
        .ok_or(BoxError::Truncated {
            tag,
            need: at + 2,
            have: content.len(),
        })?;
    Ok(u16::from_be_bytes(bytes))
}

/// Read 4 raw bytes at `at` within a box's content.
pub(crate) fn take4(content: &[u8], at: usize, tag: &'static str) -> Result<[u8; 4]> {
    content
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            BoxError::Truncated {
                tag,
                need: at + 4,
                have: content.len(),
            }
            .into()
        })
}

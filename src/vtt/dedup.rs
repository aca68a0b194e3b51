//! Cross-segment deduplication
//!
//! DASH segments overlap deliberately: the cue that closes one segment opens
//! the next. After the per-segment blocks are concatenated, this pass
//! re-parses the document around the `" --> "` separators and drops the
//! earlier copy of each adjacent pair of entries with identical text, so the
//! surviving cue carries the later segment's time range.

use super::assembler::VTT_HEADER;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// One reconstructed cue entry: start, end, text (style line included).
type Entry<'a> = (&'a str, &'a str, &'a str);

/// Deduplicate the concatenated document and re-emit it.
///
/// The input is the header plus every per-segment block in segment order;
/// the output is the header plus each surviving entry as
/// `\n{start} --> {end}{text}\n`.
///
/// A pair whose timestamps cannot be located at all is dropped with a
/// warning; a located entry whose text boundary cannot be found keeps an
/// empty text. Neither case aborts the pass.
pub fn deduplicate(subtitles: &str) -> String {
    let timestamp = regex!(r"\d+:\d+:\d+.\d+");
    let pieces: Vec<&str> = subtitles.split(" --> ").collect();

    let mut entries: Vec<Entry<'_>> = Vec::new();
    for i in 1..pieces.len() {
        let left = pieces[i - 1];
        let right = pieces[i];

        // The left piece may carry a prior entry's end time before this
        // entry's start time; the last match is the start.
        let start = timestamp.find_iter(left).last();
        let ends: Vec<&str> = timestamp.find_iter(right).map(|m| m.as_str()).collect();
        let (Some(start), Some(&end)) = (start, ends.first()) else {
            tracing::warn!("split issue in deduplication around entry {}", i);
            continue;
        };

        let text = match right.find(end) {
            Some(at) => {
                let after = &right[at + end.len()..];
                if ends.len() == 2 {
                    // cut before the next entry's start time
                    match after.find(&format!("\n\n{}", ends[1])) {
                        Some(stop) => &after[..stop],
                        None => {
                            tracing::warn!("split issue in deduplication around entry {}", i);
                            ""
                        }
                    }
                } else {
                    after
                }
            }
            None => "",
        };
        entries.push((start.as_str(), end, text));
    }

    let mut out = String::from(VTT_HEADER);
    for (i, &(start, end, text)) in entries.iter().enumerate() {
        // identical text in the next entry: this is the overlap copy
        if entries.get(i + 1).is_some_and(|next| next.2 == text) {
            continue;
        }
        out.push_str(&format!("\n{start} --> {end}{text}\n"));
    }
    out
}

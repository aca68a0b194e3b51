//! Timeline reconstruction and timestamp formatting
//!
//! Sample durations are relative; the segment's `sidx` anchor turns them
//! into absolute offsets. [`Timestamp`] normalizes a duration quantity into
//! a canonical `(days, seconds, microseconds)` triple and renders the
//! `H:MM:SS.mmm` form WebVTT timing lines use.

use std::fmt;

use crate::error::{Result, VttError};
use crate::mp4::TrackSample;

/// Absolute time range of one sample, milliseconds from stream start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Convert per-sample durations into absolute `(start, end)` offsets.
///
/// One entry per sample, in order; each entry starts where the previous one
/// ended, beginning at `anchor_ms`.
pub fn build_timeline(samples: &[TrackSample], anchor_ms: u64) -> Vec<TimelineEntry> {
    let mut offset = anchor_ms;
    samples
        .iter()
        .map(|sample| {
            let start_ms = offset;
            offset += u64::from(sample.duration_ms);
            TimelineEntry {
                start_ms,
                end_ms: offset,
            }
        })
        .collect()
}

/// Canonical normalized duration: days, in-day seconds, sub-second
/// microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    days: i64,
    seconds: u32,
    micros: u32,
}

impl Timestamp {
    /// Normalize a mixed quantity of possibly fractional components.
    ///
    /// Whole and fractional parts are carried separately so that the only
    /// imprecision is the one already present in the fractional inputs.
    /// The two invariant checks bound the fractional intermediates; they
    /// cannot trigger for plain millisecond inputs and exist to catch
    /// normalization bugs, not malformed streams.
    pub fn from_components(
        days: f64,
        hours: f64,
        minutes: f64,
        seconds: f64,
        milliseconds: f64,
        microseconds: f64,
    ) -> Result<Self> {
        let total_seconds = seconds + minutes * 60.0 + hours * 3600.0;
        let total_micros = microseconds + milliseconds * 1000.0;

        let (d_days, d_secs, d_frac) = split_days(days);
        let (s_days, s_secs, s_frac) = split_seconds(total_seconds);

        let frac_seconds = d_frac + s_frac;
        if frac_seconds.abs() > 2.0 {
            return Err(VttError::DurationInvariant(format!(
                "fractional seconds {frac_seconds} exceed 2.0"
            )));
        }
        let frac_micros = frac_seconds * 1e6;
        if frac_micros.abs() >= 2.1e6 {
            return Err(VttError::DurationInvariant(format!(
                "fractional microseconds {frac_micros} exceed 2.1e6"
            )));
        }

        let (u_days, u_secs, u_micros) = split_micros(total_micros);

        // Final carry of the fractional remainders into whole units.
        let micros = u_micros + frac_micros;
        let mut carry_secs = (micros / 1e6).floor() as i64;
        let mut micros = (micros - (carry_secs as f64) * 1e6).round() as i64;
        if micros >= 1_000_000 {
            micros -= 1_000_000;
            carry_secs += 1;
        }

        let total = d_secs + s_secs + u_secs + carry_secs;
        let carry_days = total.div_euclid(86_400);
        let in_day_seconds = total.rem_euclid(86_400);

        let day_count = d_days + s_days + u_days + carry_days;
        if day_count.abs() > 999_999_999 {
            return Err(VttError::DurationOverflow(day_count));
        }

        Ok(Self {
            days: day_count,
            seconds: in_day_seconds as u32,
            micros: micros as u32,
        })
    }

    /// Normalize a plain millisecond offset.
    pub fn from_millis(ms: u64) -> Result<Self> {
        Self::from_components(0.0, 0.0, 0.0, 0.0, ms as f64, 0.0)
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    /// In-day seconds, `0..86_400`.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Sub-second microseconds, `0..1_000_000`.
    pub fn microseconds(&self) -> u32 {
        self.micros
    }
}

impl fmt::Display for Timestamp {
    /// `H:MM:SS.mmm` — hours unpadded and taken from the in-day seconds,
    /// milliseconds truncated from the microseconds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let ss = self.seconds % 60;
        let hh = minutes / 60;
        let mm = minutes % 60;
        write!(f, "{}:{:02}:{:02}.{:03}", hh, mm, ss, self.micros / 1000)
    }
}

/// Split days into whole days, whole seconds from the fractional day, and
/// the remaining fractional second.
fn split_days(days: f64) -> (i64, i64, f64) {
    let frac_seconds = days.fract() * 86_400.0;
    (
        days.trunc() as i64,
        frac_seconds.trunc() as i64,
        frac_seconds.fract(),
    )
}

/// Split seconds into whole days, remaining whole seconds, and the
/// fractional second.
fn split_seconds(seconds: f64) -> (i64, i64, f64) {
    let whole = seconds.trunc() as i64;
    (
        whole.div_euclid(86_400),
        whole.rem_euclid(86_400),
        seconds.fract(),
    )
}

/// Split microseconds into whole days, remaining whole seconds, and the
/// microsecond remainder (which keeps any fractional part).
fn split_micros(micros: f64) -> (i64, i64, f64) {
    let secs = (micros / 1e6).floor();
    let rem = micros - secs * 1e6;
    let days = (secs / 86_400.0).floor();
    let in_day_secs = secs - days * 86_400.0;
    (days as i64, in_day_secs as i64, rem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(duration_ms: u32) -> TrackSample {
        TrackSample {
            duration_ms,
            flag_marker: [0; 4],
        }
    }

    #[test]
    fn test_build_timeline() {
        let samples = [sample(1500), sample(2000), sample(500)];
        let timeline = build_timeline(&samples, 30_000);

        assert_eq!(timeline.len(), samples.len());
        assert_eq!(timeline[0].start_ms, 30_000);
        for (entry, sample) in timeline.iter().zip(&samples) {
            assert_eq!(entry.end_ms, entry.start_ms + u64::from(sample.duration_ms));
        }
        for pair in timeline.windows(2) {
            assert_eq!(pair[1].start_ms, pair[0].end_ms);
        }
    }

    #[test]
    fn test_build_timeline_empty() {
        assert!(build_timeline(&[], 0).is_empty());
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(Timestamp::from_millis(1500).unwrap().to_string(), "0:00:01.500");
        assert_eq!(
            Timestamp::from_millis(3_661_000).unwrap().to_string(),
            "1:01:01.000"
        );
        assert_eq!(Timestamp::from_millis(0).unwrap().to_string(), "0:00:00.000");
    }

    #[test]
    fn test_milliseconds_truncated_not_rounded() {
        let ts = Timestamp::from_components(0.0, 0.0, 0.0, 0.0, 0.0, 1_999.0).unwrap();
        assert_eq!(ts.to_string(), "0:00:00.001");
    }

    #[test]
    fn test_fractional_days_carry() {
        let ts = Timestamp::from_components(1.6357, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(ts.days(), 1);
        assert_eq!(ts.seconds(), 54_924);
        assert_eq!(ts.microseconds(), 480_000);
    }

    #[test]
    fn test_mixed_components() {
        let ts = Timestamp::from_components(0.0, 1.0, 1.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(ts.to_string(), "1:01:01.000");

        let ts = Timestamp::from_components(0.0, 0.0, 0.0, 1.5, 250.0, 0.0).unwrap();
        assert_eq!(ts.seconds(), 1);
        assert_eq!(ts.microseconds(), 750_000);
    }

    #[test]
    fn test_microsecond_carry_into_seconds() {
        let ts = Timestamp::from_components(0.0, 0.0, 0.0, 0.9, 0.0, 150_000.0).unwrap();
        assert_eq!(ts.seconds(), 1);
        assert_eq!(ts.microseconds(), 50_000);
    }

    #[test]
    fn test_day_overflow() {
        let days = 1_000_000_000.0;
        assert!(matches!(
            Timestamp::from_components(days, 0.0, 0.0, 0.0, 0.0, 0.0),
            Err(VttError::DurationOverflow(_))
        ));
    }

    #[test]
    fn test_days_not_rendered() {
        let ts = Timestamp::from_components(2.0, 1.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(ts.days(), 2);
        assert_eq!(ts.to_string(), "1:00:00.000");
    }
}

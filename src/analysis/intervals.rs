//! Beat-derived cue intervals
//!
//! Consecutive beats are grouped `beats_per_cue` at a time into coarse,
//! non-overlapping spans that together cover the whole track.

use super::traits::frames_to_time;
use crate::model::Interval;

/// Spans at or below this length (seconds) are dropped as beat jitter
pub const MIN_INTERVAL_SPAN: f64 = 1e-3;

/// Default number of beats grouped into one cue
pub const DEFAULT_BEATS_PER_CUE: usize = 4;

/// Group beat frames into intervals covering `[0, duration]`
///
/// With fewer than two usable beats the whole track becomes a single
/// interval. Otherwise each stride of `beats_per_cue` beats (clamped to at
/// least 1) spans from its first beat to the first beat of the next stride,
/// or to the last beat for the final stride. The first start is pulled back
/// to 0 and the last end is stretched to `duration` when the beat tracker
/// misses the head or tail of the track.
pub fn derive_intervals(
    beat_frames: &[usize],
    sample_rate: u32,
    hop_length: usize,
    duration: f64,
    beats_per_cue: usize,
) -> Vec<Interval> {
    let full = vec![Interval::new(0.0, duration)];
    if beat_frames.is_empty() || sample_rate == 0 {
        return full;
    }

    let times: Vec<f64> = beat_frames
        .iter()
        .map(|&frame| frames_to_time(frame, sample_rate, hop_length))
        .collect();
    let stride = beats_per_cue.max(1);
    let last = times.len() - 1;

    let mut intervals: Vec<Interval> = (0..last)
        .step_by(stride)
        .map(|i| Interval::new(times[i], times[(i + stride).min(last)]))
        .filter(|interval| interval.span() > MIN_INTERVAL_SPAN)
        .collect();

    log::debug!(
        "Derived {} intervals from {} beats ({} beats per cue)",
        intervals.len(),
        times.len(),
        stride
    );

    let (Some(first), Some(tail)) = (intervals.first().copied(), intervals.last_mut()) else {
        return full;
    };

    if tail.end < duration {
        tail.end = duration;
    }
    if first.start > 0.0 {
        intervals[0].start = 0.0;
    }

    intervals
}

/// Clip caller-supplied intervals to `[0, duration]`, keeping order
///
/// Intervals left empty or inverted after clipping are dropped.
pub fn clip_intervals(intervals: &[Interval], duration: f64) -> Vec<Interval> {
    intervals
        .iter()
        .filter_map(|interval| interval.clip(duration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // One frame per half second keeps beat times exact
    const SR: u32 = 2;
    const HOP: usize = 1;

    fn spans(intervals: &[Interval]) -> Vec<(f64, f64)> {
        intervals.iter().map(|i| (i.start, i.end)).collect()
    }

    #[test]
    fn test_empty_beats_fall_back_to_full_track() {
        let intervals = derive_intervals(&[], 22050, 512, 10.0, 4);
        assert_eq!(spans(&intervals), vec![(0.0, 10.0)]);
    }

    #[test]
    fn test_groups_beats_and_stretches_tail() {
        // beat times 0.0, 0.5, ..., 3.0
        let frames: Vec<usize> = (0..=6).collect();
        let intervals = derive_intervals(&frames, SR, HOP, 3.2, 4);
        assert_eq!(spans(&intervals), vec![(0.0, 2.0), (2.0, 3.2)]);
    }

    #[test]
    fn test_single_beat_gives_full_track() {
        let intervals = derive_intervals(&[7], SR, HOP, 8.0, 4);
        assert_eq!(spans(&intervals), vec![(0.0, 8.0)]);
    }

    #[test]
    fn test_late_first_beat_starts_at_zero() {
        // beat times 1.0, 1.5, 2.0, 2.5
        let frames = [2, 3, 4, 5];
        let intervals = derive_intervals(&frames, SR, HOP, 4.0, 2);
        assert_eq!(spans(&intervals), vec![(0.0, 2.0), (2.0, 4.0)]);
    }

    #[test]
    fn test_drops_degenerate_spans() {
        // duplicated frames produce zero-length candidates
        let frames = [0, 0, 4, 4, 8];
        let intervals = derive_intervals(&frames, SR, HOP, 5.0, 1);
        assert_eq!(spans(&intervals), vec![(0.0, 2.0), (2.0, 5.0)]);
    }

    #[test]
    fn test_all_degenerate_falls_back() {
        let intervals = derive_intervals(&[3, 3, 3], SR, HOP, 6.0, 1);
        assert_eq!(spans(&intervals), vec![(0.0, 6.0)]);
    }

    #[test]
    fn test_zero_beats_per_cue_is_clamped() {
        let frames = [0, 1, 2];
        let intervals = derive_intervals(&frames, SR, HOP, 1.0, 0);
        assert_eq!(spans(&intervals), vec![(0.0, 0.5), (0.5, 1.0)]);
    }

    #[test]
    fn test_intervals_do_not_overlap() {
        let frames: Vec<usize> = (0..37).map(|i| i * 3).collect();
        let intervals = derive_intervals(&frames, SR, HOP, 60.0, 4);
        assert_eq!(intervals.first().unwrap().start, 0.0);
        assert_eq!(intervals.last().unwrap().end, 60.0);
        assert!(intervals.windows(2).all(|w| w[0].end <= w[1].start));
    }

    #[test]
    fn test_clip_intervals_keeps_order() {
        let input = [
            Interval::new(5.0, 7.0),
            Interval::new(-2.0, 1.0),
            Interval::new(3.0, 3.0),
            Interval::new(9.0, 12.0),
            Interval::new(11.0, 15.0),
        ];
        let clipped = clip_intervals(&input, 10.0);
        assert_eq!(
            spans(&clipped),
            vec![(5.0, 7.0), (0.0, 1.0), (9.0, 10.0)]
        );
    }

    #[test]
    fn test_clip_intervals_drops_nan_bounds() {
        let input = [
            Interval::new(f64::NAN, 5.0),
            Interval::new(f64::NAN, f64::NAN),
            Interval::new(2.0, 4.0),
        ];
        assert_eq!(spans(&clip_intervals(&input, 10.0)), vec![(2.0, 4.0)]);
    }
}

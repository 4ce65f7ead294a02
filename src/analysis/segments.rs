//! Cue extraction from a decoded sample buffer

use super::traits::estimate_duration;
use super::waveform::downsample;
use crate::error::Result;
use crate::model::{Cue, Interval};

/// Cut one cue per usable interval out of `samples`
///
/// Each interval is clipped to the buffer, converted to sample indices by
/// flooring `time * sample_rate`, and its slice downsampled to at most
/// `max_shape_points`. Intervals that end up empty are skipped. Cues are
/// named `cue_{i}` after their position in `intervals`, so skipped entries
/// leave gaps in the numbering.
pub fn extract_cues(
    samples: &[f32],
    sample_rate: u32,
    intervals: &[Interval],
    max_shape_points: usize,
) -> Result<Vec<Cue>> {
    let total_duration = estimate_duration(samples, sample_rate);
    let mut cues = Vec::with_capacity(intervals.len());

    for (ordinal, interval) in intervals.iter().enumerate() {
        let Some(clipped) = interval.clip(total_duration) else {
            log::debug!(
                "Skipping interval {} ({:.3}s-{:.3}s): empty after clipping",
                ordinal,
                interval.start,
                interval.end
            );
            continue;
        };

        let start_index = sample_index(clipped.start, sample_rate);
        let end_index = sample_index(clipped.end, sample_rate).min(samples.len());
        if end_index <= start_index {
            log::debug!("Skipping interval {}: no samples in range", ordinal);
            continue;
        }

        let shape = downsample(&samples[start_index..end_index], max_shape_points);
        cues.push(Cue::new(
            format!("cue_{}", ordinal),
            clipped.start,
            clipped.end,
            shape,
        )?);
    }

    log::debug!(
        "Extracted {} cues from {} intervals",
        cues.len(),
        intervals.len()
    );

    Ok(cues)
}

#[inline]
fn sample_index(time: f64, sample_rate: u32) -> usize {
    (time * sample_rate as f64).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 100;

    fn buffer(seconds: usize) -> Vec<f32> {
        (0..seconds * SR as usize).map(|i| i as f32).collect()
    }

    #[test]
    fn test_extracts_slices_in_order() {
        let samples = buffer(4);
        let intervals = [Interval::new(0.0, 1.0), Interval::new(1.0, 2.5)];
        let cues = extract_cues(&samples, SR, &intervals, 0).unwrap();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].name(), "cue_0");
        assert_eq!(cues[0].shape().len(), 100);
        assert_eq!(cues[0].shape()[0], 0.0);
        assert_eq!(cues[1].name(), "cue_1");
        assert_eq!(cues[1].shape().len(), 150);
        assert_eq!(cues[1].shape()[0], 100.0);
        assert_eq!(*cues[1].shape().last().unwrap(), 249.0);
    }

    #[test]
    fn test_clips_to_buffer_and_keeps_name_gaps() {
        let samples = buffer(3);
        let intervals = [
            Interval::new(-1.0, 0.5),
            Interval::new(5.0, 6.0),
            Interval::new(2.0, 9.0),
        ];
        let cues = extract_cues(&samples, SR, &intervals, 0).unwrap();

        let names: Vec<&str> = cues.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["cue_0", "cue_2"]);
        assert_eq!(cues[0].start(), 0.0);
        assert_eq!(cues[1].end(), 3.0);
        assert_eq!(cues[1].shape().len(), 100);
    }

    #[test]
    fn test_skips_sub_sample_interval() {
        let samples = buffer(1);
        // both bounds floor to sample 10
        let intervals = [Interval::new(0.101, 0.105)];
        let cues = extract_cues(&samples, SR, &intervals, 0).unwrap();
        assert!(cues.is_empty());
    }

    #[test]
    fn test_shapes_are_bounded() {
        let samples = buffer(10);
        let intervals = [Interval::new(0.0, 10.0)];
        let cues = extract_cues(&samples, SR, &intervals, 64).unwrap();
        assert_eq!(cues[0].shape().len(), 64);
        assert_eq!(cues[0].shape()[0], 0.0);
        assert_eq!(cues[0].shape()[63], 999.0);
    }

    #[test]
    fn test_cues_stay_within_track() {
        let samples = buffer(2);
        let intervals = [
            Interval::new(0.0, 0.7),
            Interval::new(0.7, 1.9),
            Interval::new(1.9, 4.0),
        ];
        for cue in extract_cues(&samples, SR, &intervals, 16).unwrap() {
            assert!(cue.start() >= 0.0);
            assert!(cue.start() < cue.end());
            assert!(cue.end() <= 2.0);
        }
    }
}

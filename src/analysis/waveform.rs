//! Waveform downsampling for cue shapes
//!
//! Shapes are reduced by picking evenly spaced samples, so the same input
//! always yields the same output and the first and last samples survive.

/// Default maximum number of points kept per cue shape
pub const DEFAULT_MAX_SHAPE_POINTS: usize = 2048;

/// Reduce `samples` to at most `max_points` values
///
/// `max_points == 0` means unbounded and returns the input unchanged, as
/// does any input already short enough.
///
/// Otherwise exactly `max_points` indices are spaced linearly over
/// `[0, len - 1]`. Index `k` is `trunc(k * (len - 1) / (max_points - 1))`
/// and the last one is pinned to `len - 1`. Truncation biases picks toward
/// the lower neighbour, and indices may repeat when `max_points` is close
/// to `len`.
pub fn downsample(samples: &[f32], max_points: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    if max_points == 0 || samples.len() <= max_points {
        return samples.to_vec();
    }
    if max_points == 1 {
        return vec![samples[0]];
    }

    let last = samples.len() - 1;
    let step = last as f64 / (max_points - 1) as f64;

    (0..max_points)
        .map(|k| {
            let index = if k == max_points - 1 {
                last
            } else {
                ((k as f64 * step) as usize).min(last)
            };
            samples[index]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(downsample(&[], 16).is_empty());
        assert!(downsample(&[], 0).is_empty());
    }

    #[test]
    fn test_short_input_unchanged() {
        let input = ramp(10);
        assert_eq!(downsample(&input, 10), input);
        assert_eq!(downsample(&input, 64), input);
        assert_eq!(downsample(&input, 0), input);
    }

    #[test]
    fn test_length_law_keeps_endpoints() {
        let input = ramp(5000);
        let out = downsample(&input, DEFAULT_MAX_SHAPE_POINTS);
        assert_eq!(out.len(), 2048);
        assert_eq!(out[0], input[0]);
        assert_eq!(out[2047], input[4999]);
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_truncating_index_rule() {
        // step = 9 / 3 = 3 -> indices 0, 3, 6, 9
        assert_eq!(downsample(&ramp(10), 4), vec![0.0, 3.0, 6.0, 9.0]);
        // step = 4 / 3 -> 0, 1.33, 2.67, 4 truncated to 0, 1, 2, 4
        assert_eq!(downsample(&ramp(5), 4), vec![0.0, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_single_point() {
        assert_eq!(downsample(&ramp(100), 1), vec![0.0]);
    }

    #[test]
    fn test_deterministic() {
        let input: Vec<f32> = (0..3001).map(|i| ((i as f32) * 0.37).sin()).collect();
        assert_eq!(downsample(&input, 333), downsample(&input, 333));
    }
}

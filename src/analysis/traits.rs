//! Collaborator trait definitions and data structures

use crate::error::Result;
use std::path::Path;

/// Sample rate used for tempo-only loading
pub const FAST_SAMPLE_RATE: u32 = 22050;

/// Samples per analysis frame when converting beat frames to seconds
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// How much fidelity the decoder should keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMode {
    /// Native sample rate, needed when cues are extracted
    Full,

    /// Reduced-rate mono audio, enough for tempo estimation
    Fast {
        /// Target sample rate in Hz
        sample_rate: u32,
    },
}

impl QualityMode {
    /// Fast mode at the default reduced rate
    pub fn fast() -> Self {
        QualityMode::Fast {
            sample_rate: FAST_SAMPLE_RATE,
        }
    }

    /// Sample rate the decoder must resample to, if any
    pub fn target_sample_rate(&self) -> Option<u32> {
        match self {
            QualityMode::Full => None,
            QualityMode::Fast { sample_rate } => Some(*sample_rate),
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, QualityMode::Full)
    }
}

/// Mono samples plus the rate they were decoded at
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        estimate_duration(&self.samples, self.sample_rate)
    }
}

/// Tempo estimate with the beat positions it was derived from
#[derive(Debug, Clone)]
pub struct BeatTrack {
    /// Estimated BPM
    pub bpm: f32,

    /// Beat positions as frame indices, monotonically increasing
    pub beat_frames: Vec<usize>,

    /// Samples per frame used for `beat_frames`
    pub hop_length: usize,
}

/// Audio decoder trait - allows swapping symphonia for in-memory fakes
pub trait AudioDecoder: Send + Sync {
    /// Decode a file to mono samples
    ///
    /// Fails with `NotFound` for a missing path and `Analysis` for corrupt
    /// or unsupported input.
    fn decode(&self, path: &Path, mode: QualityMode) -> Result<DecodedAudio>;
}

/// Beat tracker trait - tempo and beat detection is delegated to implementors
pub trait BeatTracker: Send + Sync {
    fn estimate_tempo_and_beats(&self, samples: &[f32], sample_rate: u32) -> Result<BeatTrack>;
}

/// Duration in seconds of a sample buffer (0 for a zero rate)
pub fn estimate_duration(samples: &[f32], sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    samples.len() as f64 / sample_rate as f64
}

/// Convert a frame index to seconds
#[inline]
pub fn frames_to_time(frame: usize, sample_rate: u32, hop_length: usize) -> f64 {
    (frame * hop_length) as f64 / sample_rate as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_duration() {
        assert_eq!(estimate_duration(&[0.0; 44100], 22050), 2.0);
        assert_eq!(estimate_duration(&[0.0; 10], 0), 0.0);
    }

    #[test]
    fn test_frames_to_time() {
        // 43 frames of 512 samples at 22050 Hz is just under one second
        assert!((frames_to_time(43, 22050, 512) - 0.998_458).abs() < 1e-5);
        assert_eq!(frames_to_time(3, 4, 2), 1.5);
    }

    #[test]
    fn test_quality_mode_target_rate() {
        assert_eq!(QualityMode::Full.target_sample_rate(), None);
        assert_eq!(QualityMode::fast().target_sample_rate(), Some(22050));
    }
}

//! Tempo and beat tracking using stratum-dsp
//!
//! stratum-dsp reports beats in seconds; they are quantized to frames of
//! `hop_length` samples so downstream code sees plain frame indices.
//! The tempo is reported raw; octave folding is up to the analyzer config.

use super::traits::{BeatTrack, BeatTracker, DEFAULT_HOP_LENGTH};
use crate::error::{AnalysisError, Result};
use std::path::PathBuf;
use stratum_dsp::{analyze_audio, AnalysisConfig};

/// Beat tracker backed by stratum-dsp
#[derive(Debug, Clone)]
pub struct StratumBeatTracker {
    /// Samples per reported beat frame
    hop_length: usize,
}

impl StratumBeatTracker {
    pub fn new() -> Self {
        Self {
            hop_length: DEFAULT_HOP_LENGTH,
        }
    }

    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = hop_length.max(1);
        self
    }
}

impl Default for StratumBeatTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatTracker for StratumBeatTracker {
    fn estimate_tempo_and_beats(&self, samples: &[f32], sample_rate: u32) -> Result<BeatTrack> {
        log::debug!(
            "Tracking beats with stratum-dsp ({} samples, {}Hz)",
            samples.len(),
            sample_rate
        );

        let result = analyze_audio(samples, sample_rate, AnalysisConfig::default()).map_err(
            |e| AnalysisError::analysis(PathBuf::new(), format!("Tempo estimation failed: {:?}", e)),
        )?;

        if result.bpm <= 0.0 {
            return Err(AnalysisError::analysis(
                PathBuf::new(),
                "Could not detect BPM",
            ));
        }

        let bpm = result.bpm;
        let beat_frames = seconds_to_frames(&result.beat_grid.beats, sample_rate, self.hop_length);

        log::debug!(
            "Detected BPM {:.1} (confidence {:.2}), {} beats",
            bpm,
            result.bpm_confidence,
            beat_frames.len()
        );

        Ok(BeatTrack {
            bpm,
            beat_frames,
            hop_length: self.hop_length,
        })
    }
}

/// Quantize beat times to frame indices, keeping them strictly increasing
fn seconds_to_frames(beats: &[f32], sample_rate: u32, hop_length: usize) -> Vec<usize> {
    let frames_per_second = sample_rate as f64 / hop_length as f64;
    let mut frames: Vec<usize> = Vec::with_capacity(beats.len());

    for &beat in beats {
        if !beat.is_finite() || beat < 0.0 {
            continue;
        }
        let frame = (beat as f64 * frames_per_second).round() as usize;
        if frames.last().map_or(true, |&prev| frame > prev) {
            frames.push(frame);
        }
    }

    frames
}

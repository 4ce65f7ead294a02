//! In-memory collaborators
//!
//! Deterministic stand-ins for the decoder and beat tracker. They do no
//! audio work, which makes the pipeline testable without real files and
//! lets callers supply a tempo they already know.

use super::traits::{AudioDecoder, BeatTrack, BeatTracker, DecodedAudio, QualityMode};
use crate::error::{AnalysisError, Result};
use std::path::Path;

/// Decoder that serves a fixed buffer for every existing path
///
/// The buffer is treated as full-quality audio. In fast mode it is
/// reported at the requested rate with a proportionally shortened length,
/// so the track duration stays the same.
#[derive(Debug, Clone)]
pub struct StubDecoder {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl StubDecoder {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A silent buffer of the given length in seconds
    pub fn silence(seconds: f64, sample_rate: u32) -> Self {
        let len = (seconds * sample_rate as f64).round() as usize;
        Self::new(vec![0.0; len], sample_rate)
    }
}

impl AudioDecoder for StubDecoder {
    fn decode(&self, path: &Path, mode: QualityMode) -> Result<DecodedAudio> {
        if !path.exists() {
            return Err(AnalysisError::NotFound(path.to_path_buf()));
        }
        if self.samples.is_empty() || self.sample_rate == 0 {
            return Err(AnalysisError::analysis(path, "No audio samples decoded"));
        }

        log::debug!("Stub decode for {:?} ({:?})", path, mode);

        match mode.target_sample_rate() {
            Some(target) if target != self.sample_rate => {
                let step = self.sample_rate as f64 / target as f64;
                let len = (self.samples.len() as f64 / step) as usize;
                let samples = (0..len)
                    .map(|i| self.samples[((i as f64 * step) as usize).min(self.samples.len() - 1)])
                    .collect();
                Ok(DecodedAudio::new(samples, target))
            }
            _ => Ok(DecodedAudio::new(self.samples.clone(), self.sample_rate)),
        }
    }
}

/// Beat tracker that reports a fixed tempo
///
/// Beats are either given explicitly or laid out evenly at the tempo.
#[derive(Debug, Clone)]
pub struct StubBeatTracker {
    bpm: f32,
    beat_times: Option<Vec<f64>>,
    hop_length: usize,
}

impl StubBeatTracker {
    /// Evenly spaced beats at `bpm`, starting at zero
    pub fn new(bpm: f32) -> Self {
        Self {
            bpm,
            beat_times: None,
            hop_length: 1,
        }
    }

    /// Report these beat times (seconds) instead of a regular grid
    pub fn with_beat_times(mut self, times: Vec<f64>) -> Self {
        self.beat_times = Some(times);
        self
    }

    /// Report no beats at all
    pub fn without_beats(self) -> Self {
        self.with_beat_times(Vec::new())
    }
}

impl BeatTracker for StubBeatTracker {
    fn estimate_tempo_and_beats(&self, samples: &[f32], sample_rate: u32) -> Result<BeatTrack> {
        if self.bpm <= 0.0 {
            return Err(AnalysisError::analysis(
                std::path::PathBuf::new(),
                "Could not detect BPM",
            ));
        }

        let to_frame = |t: f64| (t * sample_rate as f64 / self.hop_length as f64).round() as usize;

        let beat_frames = match &self.beat_times {
            Some(times) => times.iter().map(|&t| to_frame(t)).collect(),
            None => {
                let duration = samples.len() as f64 / sample_rate.max(1) as f64;
                let period = 60.0 / self.bpm as f64;
                let count = (duration / period).floor() as usize;
                (0..=count)
                    .map(|i| to_frame(i as f64 * period))
                    .take_while(|&frame| frame * self.hop_length < samples.len())
                    .collect()
            }
        };

        Ok(BeatTrack {
            bpm: self.bpm,
            beat_frames,
            hop_length: self.hop_length,
        })
    }
}

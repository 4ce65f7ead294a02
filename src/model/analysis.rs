use super::cue::Cue;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Outcome of analyzing one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnalysisResult")]
pub struct AnalysisResult {
    bpm: f32,
    duration: f64,
    sample_rate: u32,
    cues: Vec<Cue>,
}

impl AnalysisResult {
    /// Build a result, rejecting non-positive values and cues past the end of the track
    pub fn new(bpm: f32, duration: f64, sample_rate: u32, cues: Vec<Cue>) -> Result<Self> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(AnalysisError::validation(format!(
                "BPM must be positive, got {}",
                bpm
            )));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(AnalysisError::validation(format!(
                "duration must be positive, got {}",
                duration
            )));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::validation("sample rate must be positive"));
        }
        if let Some(cue) = cues.iter().find(|c| c.end() > duration) {
            return Err(AnalysisError::validation(format!(
                "cue '{}' ends at {:.3}s, past the track end {:.3}s",
                cue.name(),
                cue.end(),
                duration
            )));
        }

        Ok(Self {
            bpm,
            duration,
            sample_rate,
            cues,
        })
    }

    /// Estimated tempo in beats per minute
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Track duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample rate the audio was decoded at
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }
}

#[derive(Deserialize)]
struct RawAnalysisResult {
    bpm: f32,
    duration: f64,
    sample_rate: u32,
    #[serde(default)]
    cues: Vec<Cue>,
}

impl TryFrom<RawAnalysisResult> for AnalysisResult {
    type Error = AnalysisError;

    fn try_from(raw: RawAnalysisResult) -> Result<Self> {
        AnalysisResult::new(raw.bpm, raw.duration, raw.sample_rate, raw.cues)
    }
}

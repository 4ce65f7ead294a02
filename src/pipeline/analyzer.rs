//! Analysis orchestration
//!
//! Picks the decode quality, runs the beat tracker, resolves which
//! intervals become cues and assembles the validated result.

use super::config::{AnalysisRequest, AnalyzerConfig};
use crate::analysis::{
    clip_intervals, derive_intervals, extract_cues, AudioDecoder, BeatTrack, BeatTracker,
    QualityMode, StratumBeatTracker, SymphoniaDecoder,
};
use crate::error::{AnalysisError, Result};
use crate::model::{AnalysisResult, Cue, Interval};
use std::path::Path;

/// Runs the analysis pipeline with injected collaborators
///
/// Holds no per-call state, so one analyzer can serve many threads.
pub struct Analyzer<D: AudioDecoder, B: BeatTracker> {
    config: AnalyzerConfig,
    decoder: D,
    tracker: B,
}

impl Analyzer<SymphoniaDecoder, StratumBeatTracker> {
    /// symphonia decoding with stratum-dsp beat tracking
    pub fn with_defaults() -> Self {
        Self::new(SymphoniaDecoder::new(), StratumBeatTracker::new())
    }
}

impl<D: AudioDecoder, B: BeatTracker> Analyzer<D, B> {
    pub fn new(decoder: D, tracker: B) -> Self {
        Self {
            config: AnalyzerConfig::default(),
            decoder,
            tracker,
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Request with auto cues and this analyzer's configured defaults
    pub fn default_request(&self) -> AnalysisRequest {
        self.config.request()
    }

    /// Analyze one file: tempo, duration and the requested cues
    pub fn analyze(&self, path: &Path, request: &AnalysisRequest) -> Result<AnalysisResult> {
        if !path.exists() {
            return Err(AnalysisError::NotFound(path.to_path_buf()));
        }

        let mode = request.quality_mode(self.config.fast_sample_rate);
        log::debug!("Analyzing {:?} in {:?} mode", path, mode);

        let audio = self
            .decoder
            .decode(path, mode)
            .map_err(|e| e.with_path(path))?;
        let beats = self
            .tracker
            .estimate_tempo_and_beats(&audio.samples, audio.sample_rate)
            .map_err(|e| e.with_path(path))?;
        let bpm = self.config.normalize_bpm(beats.bpm);
        let duration = audio.duration();

        let intervals = resolve_intervals(request, &beats, audio.sample_rate, duration);
        let cues = if intervals.is_empty() {
            Vec::new()
        } else {
            extract_cues(
                &audio.samples,
                audio.sample_rate,
                &intervals,
                request.max_shape_points,
            )?
        };

        let result = AnalysisResult::new(bpm, duration, audio.sample_rate, cues)?;

        log::info!(
            "Analyzed {:?}: BPM={:.1}, duration={:.1}s, {} cues",
            path,
            result.bpm(),
            result.duration(),
            result.cues().len()
        );

        Ok(result)
    }

    /// Estimated tempo only, decoded at the fast rate
    pub fn extract_tempo(&self, path: &Path) -> Result<f32> {
        let request = AnalysisRequest::tempo_only().with_quality(QualityMode::Fast {
            sample_rate: self.config.fast_sample_rate,
        });
        Ok(self.analyze(path, &request)?.bpm())
    }

    /// Cues for exactly the given intervals, at full fidelity
    pub fn compute_cues(
        &self,
        path: &Path,
        intervals: &[Interval],
        max_shape_points: usize,
    ) -> Result<Vec<Cue>> {
        let request = AnalysisRequest::new()
            .with_intervals(intervals.to_vec())
            .with_auto_cues(false)
            .with_max_shape_points(max_shape_points)
            .with_quality(QualityMode::Full);
        Ok(self.analyze(path, &request)?.into_cues())
    }
}

/// Explicit intervals win over beat-derived ones; neither means no cues
fn resolve_intervals(
    request: &AnalysisRequest,
    beats: &BeatTrack,
    sample_rate: u32,
    duration: f64,
) -> Vec<Interval> {
    match &request.intervals {
        Some(explicit) if !explicit.is_empty() => {
            let clipped = clip_intervals(explicit, duration);
            if clipped.len() < explicit.len() {
                log::debug!(
                    "Dropped {} of {} requested intervals outside the track",
                    explicit.len() - clipped.len(),
                    explicit.len()
                );
            }
            clipped
        }
        _ if request.auto_cues => derive_intervals(
            &beats.beat_frames,
            sample_rate,
            beats.hop_length,
            duration,
            request.beats_per_cue,
        ),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beat_track(frames: Vec<usize>) -> BeatTrack {
        BeatTrack {
            bpm: 120.0,
            beat_frames: frames,
            hop_length: 1,
        }
    }

    #[test]
    fn test_explicit_intervals_take_precedence() {
        let request = AnalysisRequest::new().with_intervals(vec![
            Interval::new(1.0, 2.0),
            Interval::new(3.0, 1.0),
            Interval::new(8.0, 20.0),
        ]);
        let intervals = resolve_intervals(&request, &beat_track(vec![0, 5, 10]), 10, 10.0);
        assert_eq!(
            intervals,
            vec![Interval::new(1.0, 2.0), Interval::new(8.0, 10.0)]
        );
    }

    #[test]
    fn test_auto_cues_from_beats() {
        let request = AnalysisRequest::new().with_beats_per_cue(2);
        // beats at 0, 1, 2, 3 seconds
        let intervals = resolve_intervals(&request, &beat_track(vec![0, 10, 20, 30]), 10, 4.0);
        assert_eq!(
            intervals,
            vec![Interval::new(0.0, 2.0), Interval::new(2.0, 4.0)]
        );
    }

    #[test]
    fn test_no_cues_requested() {
        let request = AnalysisRequest::tempo_only();
        assert!(resolve_intervals(&request, &beat_track(vec![0, 10]), 10, 4.0).is_empty());
    }

    #[test]
    fn test_empty_explicit_falls_through_to_auto() {
        let request = AnalysisRequest::new().with_intervals(Vec::new());
        let intervals = resolve_intervals(&request, &beat_track(Vec::new()), 10, 4.0);
        assert_eq!(intervals, vec![Interval::new(0.0, 4.0)]);
    }
}

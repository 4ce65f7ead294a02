//! Analysis configuration

use crate::analysis::{QualityMode, DEFAULT_BEATS_PER_CUE, DEFAULT_MAX_SHAPE_POINTS, FAST_SAMPLE_RATE};
use crate::model::Interval;

/// Default lower bound for BPM normalization
pub const DEFAULT_MIN_BPM: f32 = 70.0;

/// Default upper bound for BPM normalization
pub const DEFAULT_MAX_BPM: f32 = 170.0;

/// Settings shared by every analysis an [`Analyzer`](super::Analyzer) runs
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Sample rate used when only the tempo is needed
    pub fast_sample_rate: u32,

    /// Lower bound of the BPM normalization range
    pub min_bpm: f32,

    /// Upper bound of the BPM normalization range
    pub max_bpm: f32,

    /// Default beats per auto cue for requests built from this config
    pub beats_per_cue: usize,

    /// Default shape size for requests built from this config
    pub max_shape_points: usize,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self {
            fast_sample_rate: FAST_SAMPLE_RATE,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            beats_per_cue: DEFAULT_BEATS_PER_CUE,
            max_shape_points: DEFAULT_MAX_SHAPE_POINTS,
        }
    }

    /// Set the reduced sample rate for tempo-only loading
    pub fn with_fast_sample_rate(mut self, sample_rate: u32) -> Self {
        self.fast_sample_rate = sample_rate.max(1);
        self
    }

    /// Fold detected tempos into `[min, max]` by doubling or halving
    ///
    /// Pass zero for either bound to report tempos unchanged.
    pub fn with_bpm_range(mut self, min: f32, max: f32) -> Self {
        self.min_bpm = min;
        self.max_bpm = max;
        self
    }

    pub fn with_beats_per_cue(mut self, beats: usize) -> Self {
        self.beats_per_cue = beats;
        self
    }

    pub fn with_max_shape_points(mut self, points: usize) -> Self {
        self.max_shape_points = points;
        self
    }

    /// A full request (auto cues on) carrying this config's defaults
    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest::new()
            .with_beats_per_cue(self.beats_per_cue)
            .with_max_shape_points(self.max_shape_points)
    }

    /// Double or halve `bpm` until it falls inside the configured range
    pub fn normalize_bpm(&self, bpm: f32) -> f32 {
        let (min, max) = (self.min_bpm, self.max_bpm);
        if min <= 0.0 || max <= 0.0 || !(bpm > 0.0) {
            return bpm;
        }

        let mut folded = bpm;
        while folded < min && folded * 2.0 <= max {
            folded *= 2.0;
        }
        while folded > max && folded / 2.0 >= min {
            folded /= 2.0;
        }
        if folded != bpm {
            log::debug!("BPM {:.1} folded to {:.1} ({}-{})", bpm, folded, min, max);
        }
        folded
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single analysis call should produce
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Cue intervals chosen by the caller; take precedence over auto cues
    pub intervals: Option<Vec<Interval>>,

    /// Derive cues from the beat grid when no intervals are given
    pub auto_cues: bool,

    /// Beats grouped into one auto cue (values below 1 count as 1)
    pub beats_per_cue: usize,

    /// Maximum points per cue shape (0 = keep every sample)
    pub max_shape_points: usize,

    /// Decode at this quality regardless of what the request needs
    pub quality_override: Option<QualityMode>,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self {
            intervals: None,
            auto_cues: true,
            beats_per_cue: DEFAULT_BEATS_PER_CUE,
            max_shape_points: DEFAULT_MAX_SHAPE_POINTS,
            quality_override: None,
        }
    }

    /// Tempo only: no cues, decoded at the fast rate
    pub fn tempo_only() -> Self {
        Self::new().with_auto_cues(false)
    }

    /// Extract cues for exactly these intervals
    pub fn with_intervals(mut self, intervals: Vec<Interval>) -> Self {
        self.intervals = Some(intervals);
        self
    }

    pub fn with_auto_cues(mut self, enable: bool) -> Self {
        self.auto_cues = enable;
        self
    }

    pub fn with_beats_per_cue(mut self, beats: usize) -> Self {
        self.beats_per_cue = beats;
        self
    }

    pub fn with_max_shape_points(mut self, points: usize) -> Self {
        self.max_shape_points = points;
        self
    }

    /// Force a decode quality
    pub fn with_quality(mut self, mode: QualityMode) -> Self {
        self.quality_override = Some(mode);
        self
    }

    /// True when the caller supplied at least one interval
    pub fn has_explicit_intervals(&self) -> bool {
        self.intervals.as_ref().is_some_and(|i| !i.is_empty())
    }

    /// Cues need full-fidelity audio; tempo alone does not
    pub fn quality_mode(&self, fast_sample_rate: u32) -> QualityMode {
        if let Some(mode) = self.quality_override {
            return mode;
        }
        if self.has_explicit_intervals() || self.auto_cues {
            QualityMode::Full
        } else {
            QualityMode::Fast {
                sample_rate: fast_sample_rate,
            }
        }
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self::new()
    }
}

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// A `(start, end)` time span in seconds
///
/// Intervals coming from callers are not validated; the pipeline clips
/// them to the track and drops empty ones before extracting cues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the span in seconds (negative for inverted intervals)
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Clip to `[0, limit]`, returning None if nothing is left
    ///
    /// Inverted or NaN intervals are dropped before clipping.
    pub fn clip(&self, limit: f64) -> Option<Interval> {
        if !(self.end > self.start) {
            return None;
        }
        let start = self.start.max(0.0);
        let end = self.end.min(limit);
        if end > start {
            Some(Interval { start, end })
        } else {
            None
        }
    }
}

impl From<(f64, f64)> for Interval {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

/// A named, time-bounded segment with a reduced waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCue")]
pub struct Cue {
    name: String,
    start: f64,
    end: f64,
    shape: Vec<f32>,
}

impl Cue {
    /// Create a cue, rejecting negative starts and empty or inverted spans
    pub fn new(name: impl Into<String>, start: f64, end: f64, shape: Vec<f32>) -> Result<Self> {
        let name = name.into();
        if !start.is_finite() || !end.is_finite() {
            return Err(AnalysisError::validation(format!(
                "cue '{}' has non-finite bounds ({}, {})",
                name, start, end
            )));
        }
        if start < 0.0 {
            return Err(AnalysisError::validation(format!(
                "cue '{}' starts before zero ({})",
                name, start
            )));
        }
        if end <= start {
            return Err(AnalysisError::validation(format!(
                "cue '{}' must end after it starts ({} <= {})",
                name, end, start
            )));
        }

        Ok(Self {
            name,
            start,
            end,
            shape,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start time in seconds
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Downsampled waveform of the segment
    pub fn shape(&self) -> &[f32] {
        &self.shape
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Unchecked wire form, validated through [`Cue::new`] on deserialize
#[derive(Deserialize)]
struct RawCue {
    name: String,
    start: f64,
    end: f64,
    #[serde(default)]
    shape: Vec<f32>,
}

impl TryFrom<RawCue> for Cue {
    type Error = AnalysisError;

    fn try_from(raw: RawCue) -> Result<Self> {
        Cue::new(raw.name, raw.start, raw.end, raw.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_rejects_inverted_span() {
        assert!(Cue::new("cue_0", 2.0, 1.0, vec![]).is_err());
        assert!(Cue::new("cue_0", 1.0, 1.0, vec![]).is_err());
        assert!(Cue::new("cue_0", -0.5, 1.0, vec![]).is_err());
        assert!(Cue::new("cue_0", 0.0, f64::NAN, vec![]).is_err());
    }

    #[test]
    fn test_cue_accessors() {
        let cue = Cue::new("cue_3", 1.5, 4.0, vec![0.1, -0.2]).unwrap();
        assert_eq!(cue.name(), "cue_3");
        assert_eq!(cue.start(), 1.5);
        assert_eq!(cue.end(), 4.0);
        assert!((cue.duration() - 2.5).abs() < 1e-12);
        assert_eq!(cue.shape(), &[0.1, -0.2]);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Cue = serde_json::from_str(r#"{"name":"cue_0","start":0.0,"end":1.0,"shape":[0.5]}"#)
            .unwrap();
        assert_eq!(ok.shape(), &[0.5]);

        let bad = serde_json::from_str::<Cue>(r#"{"name":"cue_0","start":2.0,"end":1.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_interval_clip() {
        assert_eq!(
            Interval::new(-1.0, 5.0).clip(3.0),
            Some(Interval::new(0.0, 3.0))
        );
        assert_eq!(Interval::new(4.0, 6.0).clip(3.0), None);
        assert_eq!(Interval::new(2.0, 1.0).clip(3.0), None);
    }

    #[test]
    fn test_interval_clip_drops_nan() {
        assert_eq!(Interval::new(f64::NAN, 5.0).clip(10.0), None);
        assert_eq!(Interval::new(1.0, f64::NAN).clip(10.0), None);
        assert_eq!(Interval::new(f64::NAN, f64::NAN).clip(10.0), None);
    }
}

//! beatcue - tempo and beat-aligned cue extraction
//!
//! This library turns an audio file into an estimated tempo, its duration
//! and a list of cues: time-bounded segments carrying a downsampled
//! waveform, ready for display in an editing or DJ tool.

pub mod analysis;
pub mod error;
pub mod model;
pub mod pipeline;

pub use error::{AnalysisError, Result};
pub use model::{AnalysisResult, Cue, Interval};
pub use pipeline::{AnalysisRequest, Analyzer, AnalyzerConfig};

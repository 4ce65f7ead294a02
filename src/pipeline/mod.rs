//! Analysis pipeline: orchestration, configuration and batching

pub mod analyzer;
pub mod batch;
pub mod config;

pub use analyzer::Analyzer;
pub use batch::{discover_audio_files, BatchOutcome, BatchRunner};
pub use config::{AnalysisRequest, AnalyzerConfig, DEFAULT_MAX_BPM, DEFAULT_MIN_BPM};

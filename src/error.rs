//! Error types for the analysis pipeline
//!
//! Three kinds reach callers:
//! - Not-found: the input path does not exist
//! - Analysis: decoding or tempo estimation failed
//! - Validation: a cue or result violated its invariants
//!
//! `Config` only comes from batch setup, never from a single analysis.
//! None of them are retried internally.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for all analysis operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Audio file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Analysis failed for '{}': {reason}", .path.display())]
    Analysis { path: PathBuf, reason: String },

    #[error("Invalid analysis data: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Create an analysis failure for the given file
    pub fn analysis(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnalysisError::Analysis {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation failure
    pub fn validation(reason: impl Into<String>) -> Self {
        AnalysisError::Validation(reason.into())
    }

    /// Fill in the file for analysis failures raised without one
    pub fn with_path(self, file: &Path) -> Self {
        match self {
            AnalysisError::Analysis { path, reason } if path.as_os_str().is_empty() => {
                AnalysisError::Analysis {
                    path: file.to_path_buf(),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Returns true if the input file was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisError::NotFound(_))
    }
}

/// Wrap collaborator errors (usually `anyhow`) as analysis failures
pub trait AnalysisContext<T> {
    /// Attach the file being processed and convert to [`AnalysisError::Analysis`]
    fn for_file(self, path: &Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> AnalysisContext<T> for std::result::Result<T, E> {
    fn for_file(self, path: &Path) -> Result<T> {
        // {:#} keeps the whole anyhow context chain on one line
        self.map_err(|e| AnalysisError::analysis(path, format!("{:#}", e)))
    }
}

//! Batch analysis over many files
//!
//! Files run on a dedicated rayon pool with a fixed number of workers so
//! that peak memory stays bounded. One file failing never stops the batch.

use super::analyzer::Analyzer;
use super::config::AnalysisRequest;
use crate::analysis::{AudioDecoder, BeatTracker};
use crate::error::{AnalysisError, Result};
use crate::model::AnalysisResult;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions picked up when scanning directories
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac"];

/// Result of analyzing one file in a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<AnalysisResult>,
}

/// Runs analyses on a fixed-size worker pool
#[derive(Debug, Clone)]
pub struct BatchRunner {
    workers: usize,
}

impl BatchRunner {
    /// Create a runner with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analyze every path, returning outcomes in input order
    pub fn run<D: AudioDecoder, B: BeatTracker>(
        &self,
        analyzer: &Analyzer<D, B>,
        paths: &[PathBuf],
        request: &AnalysisRequest,
    ) -> Result<Vec<BatchOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| {
                AnalysisError::Config(format!("Failed to configure thread pool: {}", e))
            })?;

        log::info!(
            "Analyzing {} files with {} workers",
            paths.len(),
            self.workers
        );

        let outcomes: Vec<BatchOutcome> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let result = analyzer.analyze(path, request);
                    if let Err(e) = &result {
                        log::warn!("Skipping {:?}: {}", path, e);
                    }
                    BatchOutcome {
                        path: path.clone(),
                        result,
                    }
                })
                .collect()
        });

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        log::info!(
            "Batch complete: {} analyzed, {} failed",
            outcomes.len() - failed,
            failed
        );

        Ok(outcomes)
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(std::thread::available_parallelism().map_or(1, |n| n.get()))
    }
}

/// Expand inputs into audio files
///
/// Files are taken as given. Directories are scanned for known audio
/// extensions, one level deep unless `recursive`. Results from each
/// directory are sorted by path.
pub fn discover_audio_files(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(AnalysisError::NotFound(input.clone()));
        }

        if input.is_file() {
            files.push(input.clone());
            continue;
        }

        let walker = if recursive {
            WalkDir::new(input)
        } else {
            WalkDir::new(input).max_depth(1)
        };

        let mut found: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_audio_file(p))
            .collect();
        found.sort();

        log::debug!("Discovered {} audio files in {:?}", found.len(), input);
        files.extend(found);
    }

    Ok(files)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a/b/track.MP3")));
        assert!(is_audio_file(Path::new("track.flac")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.wav"), b"x").unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.flac"), b"x").unwrap();

        let shallow = discover_audio_files(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(
            shallow,
            vec![dir.path().join("a.mp3"), dir.path().join("b.wav")]
        );

        let deep = discover_audio_files(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_discover_missing_input() {
        let err = discover_audio_files(&[PathBuf::from("/nonexistent/dir")], true).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        assert_eq!(BatchRunner::new(0).workers(), 1);
    }
}

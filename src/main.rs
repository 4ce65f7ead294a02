use anyhow::{Context, Result};
use beatcue::analysis::{StratumBeatTracker, SymphoniaDecoder};
use beatcue::pipeline::{discover_audio_files, BatchRunner};
use beatcue::{AnalysisRequest, Analyzer, AnalyzerConfig, Interval};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beatcue")]
#[command(about = "Estimate tempo and extract beat-aligned cues from audio files", long_about = None)]
struct Args {
    /// Audio files or directories to analyze
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Extract a cue for START:END seconds (can be specified multiple times)
    #[arg(short = 'i', long = "interval", value_parser = parse_interval)]
    intervals: Vec<Interval>,

    /// Only estimate the tempo (fast, no cues)
    #[arg(long, conflicts_with_all = ["intervals", "no_auto_cues"])]
    tempo_only: bool,

    /// Don't derive cues from the beat grid
    #[arg(long)]
    no_auto_cues: bool,

    /// Beats grouped into one automatic cue
    #[arg(long, default_value = "4")]
    beats_per_cue: usize,

    /// Maximum waveform points per cue (0 keeps every sample)
    #[arg(long, default_value = "2048")]
    max_points: usize,

    /// Minimum BPM for detection range (default: 70)
    #[arg(long, default_value = "70")]
    min_bpm: f32,

    /// Maximum BPM for detection range (default: 170)
    #[arg(long, default_value = "170")]
    max_bpm: f32,

    /// Sample rate used for tempo-only analysis
    #[arg(long, default_value = "22050")]
    fast_rate: u32,

    /// Number of files analyzed at once
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Scan directories recursively
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_interval(value: &str) -> Result<Interval, String> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got '{}'", value))?;
    let start: f64 = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid start '{}': {}", start, e))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid end '{}': {}", end, e))?;
    Ok(Interval::new(start, end))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let inputs: Vec<PathBuf> = args
        .inputs
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()))
        .collect();

    let files = discover_audio_files(&inputs, args.recursive)?;
    if files.is_empty() {
        anyhow::bail!("No audio files found in {:?}", inputs);
    }

    let config = AnalyzerConfig::new()
        .with_fast_sample_rate(args.fast_rate)
        .with_bpm_range(args.min_bpm, args.max_bpm)
        .with_beats_per_cue(args.beats_per_cue)
        .with_max_shape_points(args.max_points);
    log::debug!("BPM detection range: {}-{} BPM", config.min_bpm, config.max_bpm);
    let analyzer =
        Analyzer::new(SymphoniaDecoder::new(), StratumBeatTracker::new()).with_config(config);

    let request = if args.tempo_only {
        AnalysisRequest::tempo_only()
    } else {
        analyzer
            .default_request()
            .with_intervals(args.intervals)
            .with_auto_cues(!args.no_auto_cues)
    };

    let output = if let [path] = files.as_slice() {
        if args.tempo_only {
            let bpm = analyzer.extract_tempo(path)?;
            json!({ "path": path, "bpm": bpm })
        } else {
            let result = analyzer.analyze(path, &request)?;
            serde_json::to_value(&result).context("Failed to serialize analysis")?
        }
    } else {
        let runner = args.jobs.map(BatchRunner::new).unwrap_or_default();
        let outcomes = runner.run(&analyzer, &files, &request)?;
        let entries: Vec<serde_json::Value> = outcomes
            .into_iter()
            .map(|outcome| match outcome.result {
                Ok(result) => json!({ "path": outcome.path, "analysis": result }),
                Err(e) => json!({ "path": outcome.path, "error": e.to_string() }),
            })
            .collect();
        serde_json::Value::Array(entries)
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to format output")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("1.5:3").unwrap(), Interval::new(1.5, 3.0));
        assert_eq!(parse_interval(" 0 : 2.25 ").unwrap(), Interval::new(0.0, 2.25));
        assert!(parse_interval("1.5").is_err());
        assert!(parse_interval("a:b").is_err());
    }

    #[test]
    fn test_tempo_only_rejects_cue_flags() {
        assert!(Args::try_parse_from(["beatcue", "--tempo-only", "a.mp3"]).is_ok());
        assert!(Args::try_parse_from(["beatcue", "--tempo-only", "-i", "0:1", "a.mp3"]).is_err());
        assert!(Args::try_parse_from(["beatcue", "--tempo-only", "--no-auto-cues", "a.mp3"]).is_err());
        assert!(Args::try_parse_from(["beatcue", "--no-auto-cues", "-i", "0:1", "a.mp3"]).is_ok());
    }
}

//! Audio decoding using symphonia
//!
//! Files are decoded to mono f32 samples by averaging channels. In fast
//! mode the result is resampled down to the requested rate with rubato,
//! whose FFT resampler low-passes before decimating.

use super::traits::{AudioDecoder, DecodedAudio, QualityMode};
use crate::error::{AnalysisContext, AnalysisError, Result};
use anyhow::Context;
use rubato::{FftFixedInOut, Resampler};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Input frames per rubato chunk
const RESAMPLE_CHUNK: usize = 1024;

/// Fraction of the declared frame count that must decode for a stream to count as complete
const MIN_DECODED_RATIO: f64 = 0.9;

/// Decoder backed by symphonia's default codec registry
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    /// Stop decoding after this many seconds (None = whole file)
    max_seconds: Option<u32>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self { max_seconds: None }
    }

    /// Only decode the first `seconds` of each file
    pub fn with_max_duration(mut self, seconds: u32) -> Self {
        self.max_seconds = Some(seconds);
        self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path, mode: QualityMode) -> Result<DecodedAudio> {
        if !path.exists() {
            return Err(AnalysisError::NotFound(path.to_path_buf()));
        }

        let (samples, native_rate) = decode_to_mono(path, self.max_seconds).for_file(path)?;
        if samples.is_empty() {
            return Err(AnalysisError::analysis(path, "No audio samples decoded"));
        }

        let audio = match mode.target_sample_rate() {
            Some(target) if target != native_rate => {
                log::debug!("Resampling {}Hz -> {}Hz for fast analysis", native_rate, target);
                DecodedAudio::new(resample(&samples, native_rate, target), target)
            }
            _ => DecodedAudio::new(samples, native_rate),
        };

        log::debug!(
            "Decoded {:?}: {} samples ({:.1}s) at {}Hz ({:?})",
            path,
            audio.samples.len(),
            audio.duration(),
            audio.sample_rate,
            mode
        );

        Ok(audio)
    }
}

/// Open `path` and decode its first audio track to mono
///
/// Read errors other than end-of-stream fail the whole decode, as does a
/// stream that ends well short of the frame count its header declares.
fn decode_to_mono(path: &Path, max_seconds: Option<u32>) -> anyhow::Result<(Vec<f32>, u32)> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {:?}", path))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Failed to probe audio format: {:?}", path))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let declared_frames = track.codec_params.n_frames;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("No sample rate in audio track")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let limit = max_seconds.map(|s| sample_rate as usize * s as usize);
    let samples = read_track(format.as_mut(), decoder.as_mut(), track_id, limit)?;

    if let (Some(declared), None) = (declared_frames, limit) {
        let decoded = samples.len() as f64;
        if declared > 0 && decoded < declared as f64 * MIN_DECODED_RATIO {
            anyhow::bail!(
                "Audio stream ended early: decoded {} of {} frames",
                samples.len(),
                declared
            );
        }
    }

    Ok((samples, sample_rate))
}

/// Pull packets for `track_id` until end of stream or `limit` frames
fn read_track(
    format: &mut dyn FormatReader,
    decoder: &mut dyn Decoder,
    track_id: u32,
    limit: Option<usize>,
) -> anyhow::Result<Vec<f32>> {
    let mut mono: Vec<f32> = Vec::new();
    let mut bad_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e).context("Failed to read audio packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        // A damaged frame inside an otherwise readable stream is skipped
        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                bad_packets += 1;
                continue;
            }
            Err(e) => return Err(e).context("Failed to decode audio packet"),
        };

        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        mix_to_mono(buf.samples(), spec.channels.count(), &mut mono);

        if let Some(max) = limit {
            if mono.len() >= max {
                mono.truncate(max);
                break;
            }
        }
    }

    if mono.is_empty() && bad_packets > 0 {
        anyhow::bail!("All {} audio packets failed to decode", bad_packets);
    }

    Ok(mono)
}

/// Average interleaved frames into `out`
fn mix_to_mono(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

/// Band-limited resampling through rubato
///
/// The output is trimmed of the resampler's delay and has exactly
/// `len * to_rate / from_rate` samples. Falls back to [`resample_linear`]
/// if rubato cannot be set up or fails mid-stream.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let expected = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize;

    let mut resampler =
        match FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, RESAMPLE_CHUNK, 1) {
            Ok(r) => r,
            Err(e) => {
                log::debug!("Rubato initialization failed ({}), using linear fallback", e);
                return resample_linear(samples, from_rate, to_rate);
            }
        };

    let delay = resampler.output_delay();
    let chunk_len = resampler.input_frames_next();
    let mut output: Vec<f32> = Vec::with_capacity(expected + delay + chunk_len);
    let mut pos = 0;

    // Keep feeding (zero-padded past the end) until the delayed tail is flushed
    while output.len() < expected + delay {
        let mut chunk: Vec<f32> = samples
            .iter()
            .skip(pos)
            .take(chunk_len)
            .copied()
            .collect();
        chunk.resize(chunk_len, 0.0);
        pos += chunk_len;

        match resampler.process(&[chunk], None) {
            Ok(channels) => match channels.into_iter().next() {
                Some(channel) => output.extend(channel),
                None => break,
            },
            Err(e) => {
                log::debug!("Rubato processing failed ({}), using linear fallback", e);
                return resample_linear(samples, from_rate, to_rate);
            }
        }
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);
    output
}

/// Linear interpolation, used only when rubato is unavailable
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio) as usize;

    (0..output_len)
        .map(|i| {
            let src_pos = i as f64 * ratio;
            let idx = src_pos as usize;
            let frac = (src_pos - idx as f64) as f32;
            match (samples.get(idx), samples.get(idx + 1)) {
                (Some(&a), Some(&b)) => a * (1.0 - frac) + b * frac,
                (Some(&a), None) => a,
                _ => 0.0,
            }
        })
        .collect()
}

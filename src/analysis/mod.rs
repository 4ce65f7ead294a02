//! Audio analysis layer
//!
//! The pure pipeline stages (interval derivation, segment extraction and
//! downsampling) live next to the collaborator traits they are fed by.
//! Decoding is done with symphonia and tempo/beat tracking with
//! stratum-dsp, both behind traits so stubs can stand in for them.

mod decoder;
mod intervals;
mod segments;
mod stratum;
mod stub;
mod traits;
mod waveform;

pub use decoder::SymphoniaDecoder;
pub use intervals::{clip_intervals, derive_intervals, DEFAULT_BEATS_PER_CUE, MIN_INTERVAL_SPAN};
pub use segments::extract_cues;
pub use stratum::StratumBeatTracker;
pub use stub::{StubBeatTracker, StubDecoder};
pub use traits::{
    estimate_duration, frames_to_time, AudioDecoder, BeatTrack, BeatTracker, DecodedAudio,
    QualityMode, DEFAULT_HOP_LENGTH, FAST_SAMPLE_RATE,
};
pub use waveform::{downsample, DEFAULT_MAX_SHAPE_POINTS};

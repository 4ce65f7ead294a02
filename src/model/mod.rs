//! Data model for analysis output
//!
//! Every type here is built fresh per analysis and returned by value.
//! Constructors validate their invariants so invalid cues or results
//! never leave the crate.

mod analysis;
mod cue;

pub use analysis::AnalysisResult;
pub use cue::{Cue, Interval};

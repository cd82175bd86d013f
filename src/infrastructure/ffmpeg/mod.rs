pub mod args;
pub mod runner;

pub use runner::{Ffmpeg, TranscodeError, TranscodeOutcome};

//! Transcript sources - caption tracks with timing data
//!
//! A source either returns the whole [`Transcript`] or one of the terminal
//! [`FetchError`] variants. Nothing here retries.

pub mod file;
pub mod youtube;

use thiserror::Error;

use crate::types::Transcript;

pub use file::FileTranscriptSource;
pub use youtube::YoutubeTranscriptSource;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transcripts are disabled for this video")]
    TranscriptsDisabled,
    #[error("no transcript available for this video")]
    NoTranscriptFound,
    #[error("transcript fetch failed: {0}")]
    Unknown(String),
}

pub trait TranscriptSource {
    fn fetch(&self, video_id: &str) -> Result<Transcript, FetchError>;
}

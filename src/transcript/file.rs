use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{FetchError, TranscriptSource};
use crate::types::{Segment, Transcript};

/// Reads raw caption segments (`[{"text", "start", "duration"}]`) from disk.
///
/// The video id is only used for logging; every fetch returns the file.
#[derive(Debug, Clone)]
pub struct FileTranscriptSource {
    path: PathBuf,
}

impl FileTranscriptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TranscriptSource for FileTranscriptSource {
    fn fetch(&self, video_id: &str) -> Result<Transcript, FetchError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            FetchError::Unknown(format!("failed to read {:?}: {}", self.path, e))
        })?;
        let segments = parse_segments(&raw)?;
        debug!(
            video_id,
            segments = segments.len(),
            path = %self.path.display(),
            "loaded transcript from file"
        );
        Ok(Transcript::new(segments))
    }
}

fn parse_segments(raw: &str) -> Result<Vec<Segment>, FetchError> {
    let segments: Vec<Segment> = serde_json::from_str(raw)
        .map_err(|e| FetchError::Unknown(format!("invalid transcript JSON: {}", e)))?;
    if let Some(bad) = segments
        .iter()
        .find(|segment| segment.start_time < 0.0 || segment.duration < 0.0)
    {
        return Err(FetchError::Unknown(format!(
            "segment at {:.3}s has negative timing",
            bad.start_time
        )));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_segments() {
        let raw = r#"[
            {"text": "hello", "start": 0.0, "duration": 1.5},
            {"text": "world", "start": 1.5}
        ]"#;
        let segments = parse_segments(raw).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].duration, 0.0);
    }

    #[test]
    fn rejects_negative_timing() {
        let raw = r#"[{"text": "x", "start": -1.0, "duration": 1.0}]"#;
        assert!(matches!(parse_segments(raw), Err(FetchError::Unknown(_))));
    }

    #[test]
    fn missing_file_is_unknown_error() {
        let source = FileTranscriptSource::new("does/not/exist.json");
        assert!(matches!(source.fetch("abc"), Err(FetchError::Unknown(_))));
    }
}

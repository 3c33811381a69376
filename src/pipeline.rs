//! URL to summary, end to end.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::SummaryProvider;
use crate::summarizer::{RecursiveSummarizer, SummarizeError};
use crate::transcript::{FetchError, TranscriptSource};
use crate::types::{KeyMoment, VideoDetails, KEY_MOMENT_LIMIT, KEY_MOMENT_STRIDE};
use crate::video_id;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("could not parse video id from URL {0:?}")]
    InvalidUrl(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("transcript for {video_id} is empty")]
    EmptyTranscript { video_id: String },
    #[error("summarization failed: {0}")]
    Summarization(#[from] SummarizeError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub summary: String,
    pub language: Option<String>,
    pub language_code: Option<String>,
    pub is_generated: Option<bool>,
    pub chunk_count: usize,
    pub partial_count: usize,
    pub merged: bool,
    pub key_moments: Vec<KeyMoment>,
    pub details: Option<VideoDetails>,
    /// The transcript text that was summarized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

impl VideoSummary {
    /// `{title}_summary.txt`, falling back to the video id when the title is
    /// unknown or has no usable characters.
    pub fn summary_file_name(&self) -> String {
        let title = self
            .details
            .as_ref()
            .map(|details| sanitize_file_stem(&details.title))
            .filter(|stem| !stem.is_empty());
        format!("{}_summary.txt", title.as_deref().unwrap_or(&self.video_id))
    }
}

fn sanitize_file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}

pub fn summarize_video<S, P>(
    url: &str,
    source: &S,
    summarizer: &RecursiveSummarizer<'_, P>,
) -> Result<VideoSummary, PipelineError>
where
    S: TranscriptSource + ?Sized,
    P: SummaryProvider + ?Sized,
{
    let video_id =
        video_id::resolve(url).ok_or_else(|| PipelineError::InvalidUrl(url.to_string()))?;
    info!(%video_id, "fetching transcript");

    let transcript = source.fetch(&video_id)?;
    let full_text = transcript.full_text();
    if full_text.is_empty() {
        return Err(PipelineError::EmptyTranscript { video_id });
    }
    info!(
        %video_id,
        segments = transcript.segments.len(),
        chars = full_text.len(),
        "transcript ready"
    );

    if transcript.details.is_none() {
        debug!(%video_id, "no video details available");
    }

    let run = summarizer.run(&full_text)?;
    Ok(VideoSummary {
        summary: run.summary,
        chunk_count: run.chunk_count,
        partial_count: run.partials.len(),
        merged: run.merged,
        key_moments: transcript.key_moments(KEY_MOMENT_STRIDE, KEY_MOMENT_LIMIT),
        language: transcript.language,
        language_code: transcript.language_code,
        is_generated: transcript.is_generated,
        details: transcript.details,
        full_text: Some(full_text),
        video_id,
    })
}

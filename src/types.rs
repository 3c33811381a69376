//! Core types for the tubesum summarization pipeline

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";
/// Stays under BART's 1024 token encoder limit with headroom.
pub const DEFAULT_CHUNK_TOKEN_BUDGET: usize = 880;

/// Every n-th segment is sampled as a key moment.
pub const KEY_MOMENT_STRIDE: usize = 10;
pub const KEY_MOMENT_LIMIT: usize = 10;

/// Fetched caption track with timing information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    /// Human readable language name, e.g. "English (auto-generated)"
    pub language: Option<String>,
    pub language_code: Option<String>,
    pub is_generated: Option<bool>,
    /// Title, channel and length, when the source knows them
    pub details: Option<VideoDetails>,
}

/// Descriptive metadata shown next to the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoDetails {
    pub title: String,
    pub author: String,
    pub length_seconds: u64,
    pub thumbnail_url: Option<String>,
}

impl VideoDetails {
    pub fn length_minutes(&self) -> u64 {
        self.length_seconds / 60
    }
}

/// One caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(rename = "start")]
    pub start_time: f64, // seconds
    #[serde(default)]
    pub duration: f64, // seconds
}

impl Transcript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    /// Segment texts, each trimmed, joined by single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Samples every `stride`-th segment, keeping at most `limit` of them.
    pub fn key_moments(&self, stride: usize, limit: usize) -> Vec<KeyMoment> {
        self.segments
            .iter()
            .step_by(stride.max(1))
            .take(limit)
            .map(|segment| KeyMoment {
                start_time: segment.start_time,
                text: segment.text.trim().to_string(),
            })
            .collect()
    }
}

/// A transcript position worth surfacing next to the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMoment {
    pub start_time: f64,
    pub text: String,
}

impl KeyMoment {
    /// `m:ss` label for the start time.
    pub fn timestamp_label(&self) -> String {
        let total = self.start_time.max(0.0) as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Output length limits handed to the provider, in model tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub max_length: u32,
    pub min_length: u32,
}

impl SummaryBounds {
    pub const fn new(max_length: u32, min_length: u32) -> Self {
        Self {
            max_length,
            min_length,
        }
    }

    fn validate(&self, label: &str) -> Result<()> {
        ensure!(self.max_length > 0, "{} max_length must be positive", label);
        ensure!(
            self.min_length <= self.max_length,
            "{} min_length ({}) must not exceed max_length ({})",
            label,
            self.min_length,
            self.max_length
        );
        Ok(())
    }
}

/// Tunables for chunking and the summarization passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub model: String,
    #[serde(alias = "chunkTokenBudget")]
    pub chunk_token_budget: usize,
    /// Per-chunk summary bounds
    pub chunk_bounds: SummaryBounds,
    /// Bounds for the single pass over the joined partial summaries
    pub merge_bounds: SummaryBounds,
    /// Bounds for each half of a chunk the provider rejected as too large
    pub retry_bounds: SummaryBounds,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            chunk_token_budget: DEFAULT_CHUNK_TOKEN_BUDGET,
            chunk_bounds: SummaryBounds::new(220, 60),
            merge_bounds: SummaryBounds::new(240, 80),
            retry_bounds: SummaryBounds::new(200, 40),
        }
    }
}

impl SummarizerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.model.trim().is_empty(), "model identifier is empty");
        ensure!(
            self.chunk_token_budget > 0,
            "chunk_token_budget must be greater than zero"
        );
        self.chunk_bounds.validate("chunk_bounds")?;
        self.merge_bounds.validate("merge_bounds")?;
        self.retry_bounds.validate("retry_bounds")?;
        Ok(())
    }
}

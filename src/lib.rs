//! tubesum - video transcript summarization
//!
//! Fetches a caption track, splits it into token-bounded chunks and folds the
//! per-chunk summaries into one final summary.

pub mod chunking;
pub mod config;
pub mod pipeline;
pub mod provider;
pub mod summarizer;
pub mod transcript;
pub mod types;
pub mod video_id;

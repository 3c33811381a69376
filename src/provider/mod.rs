//! Summarization model capability.
//!
//! The summarizer only needs two things from a model: a tokenizer to size
//! chunks and a bounded summarize call. [`SummaryProvider`] is that seam.

pub mod context;
pub mod inference_api;
pub mod lead;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SummaryBounds;

pub use context::ProviderContext;
pub use inference_api::InferenceApiProvider;
pub use lead::LeadProvider;

pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
/// BART encoder position limit.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 1024;

/// Failures a provider reports back to the summarizer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The encoded input exceeded the model's hard limit.
    #[error("input exceeds model capacity: {0}")]
    Overflow(String),
    #[error("summarization failed: {0}")]
    Failed(String),
}

impl ProviderError {
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow(_))
    }
}

pub trait SummaryProvider: Send + Sync {
    /// Identifier the provider was loaded for.
    fn model_id(&self) -> &str;

    /// Token ids for `text`, without special tokens.
    fn encode(&self, text: &str) -> Vec<u32>;

    fn count_tokens(&self, text: &str) -> usize {
        self.encode(text).len()
    }

    fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Hosted inference endpoint
    #[default]
    InferenceApi,
    /// Offline leading-words baseline
    Lead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub max_input_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            endpoint: DEFAULT_INFERENCE_URL.to_string(),
            api_token: None,
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            timeout_secs: 120,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Build the provider configured in `settings` for `model_id`.
pub fn load_provider(
    settings: &ProviderSettings,
    model_id: &str,
) -> Result<Arc<dyn SummaryProvider>, ProviderError> {
    match settings.kind {
        ProviderKind::InferenceApi => Ok(Arc::new(InferenceApiProvider::new(settings, model_id)?)),
        ProviderKind::Lead => Ok(Arc::new(LeadProvider::new(settings.max_input_tokens))),
    }
}

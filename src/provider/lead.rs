//! Offline baseline provider.
//!
//! Treats every whitespace-separated word as one token and "summarizes" by
//! keeping the leading words. Deterministic, so it works without network
//! access and gives the summarizer something predictable to drive.

use super::{ProviderError, SummaryProvider};
use crate::types::SummaryBounds;

pub const LEAD_MODEL_ID: &str = "lead";

#[derive(Debug, Clone)]
pub struct LeadProvider {
    max_input_tokens: usize,
}

impl LeadProvider {
    pub fn new(max_input_tokens: usize) -> Self {
        Self { max_input_tokens }
    }
}

impl SummaryProvider for LeadProvider {
    fn model_id(&self) -> &str {
        LEAD_MODEL_ID
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        (0..text.split_whitespace().count() as u32).collect()
    }

    fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, ProviderError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > self.max_input_tokens {
            return Err(ProviderError::Overflow(format!(
                "{} words exceed limit of {}",
                words.len(),
                self.max_input_tokens
            )));
        }
        let keep = words.len().min(bounds.max_length as usize);
        Ok(words[..keep].join(" "))
    }
}

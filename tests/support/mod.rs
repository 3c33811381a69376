#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tubesum::provider::{ProviderError, SummaryProvider};
use tubesum::types::SummaryBounds;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub text: String,
    pub bounds: SummaryBounds,
}

/// Word-per-token provider that records every call.
///
/// Summaries look like `S(first..last)` so tests can see which text produced
/// which partial and in what order.
#[derive(Default)]
pub struct ScriptedProvider {
    calls: Mutex<Vec<Call>>,
    overflow_marker: Option<String>,
    overflow_budget: usize,
    overflows: AtomicUsize,
    fail_marker: Option<String>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report overflow for inputs containing `marker`, at most `times` times.
    pub fn overflow_on(mut self, marker: &str, times: usize) -> Self {
        self.overflow_marker = Some(marker.to_string());
        self.overflow_budget = times;
        self
    }

    /// Fail every input containing `marker`.
    pub fn fail_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn summary_of(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    format!("S({}..{})", words[0], words[words.len() - 1])
}

impl SummaryProvider for ScriptedProvider {
    fn model_id(&self) -> &str {
        "scripted"
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        text.split_whitespace().map(|_| 7).collect()
    }

    fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(Call {
            text: text.to_string(),
            bounds,
        });
        if let Some(marker) = &self.overflow_marker {
            if text.contains(marker.as_str())
                && self.overflows.fetch_add(1, Ordering::SeqCst) < self.overflow_budget
            {
                return Err(ProviderError::Overflow("index out of range in self".into()));
            }
        }
        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(ProviderError::Failed("model crashed".into()));
            }
        }
        Ok(summary_of(text))
    }
}

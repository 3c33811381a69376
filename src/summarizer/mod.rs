//! Chunk, summarize each chunk, then fold the partials into one summary.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chunking::chunk_text;
use crate::provider::{ProviderError, SummaryProvider};
use crate::types::SummarizerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("transcript has no content to summarize")]
    EmptyInput,
    /// Bisection could not bring the chunk under the model limit.
    #[error("chunk {chunk} still exceeds the model limit after splitting ({words} words)")]
    Overflow { chunk: usize, words: usize },
    #[error("summarizing chunk {chunk} failed: {source}")]
    Provider {
        chunk: usize,
        #[source]
        source: ProviderError,
    },
    #[error("merging partial summaries failed: {0}")]
    Merge(#[source] ProviderError),
}

/// Everything produced by one summarization request.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRun {
    pub summary: String,
    pub chunk_count: usize,
    pub partials: Vec<String>,
    /// Whether the merge pass ran.
    pub merged: bool,
    /// Chunks that overflowed and were bisected.
    pub recovered_overflows: usize,
}

pub struct RecursiveSummarizer<'p, P: SummaryProvider + ?Sized> {
    provider: &'p P,
    config: SummarizerConfig,
}

impl<'p, P: SummaryProvider + ?Sized> RecursiveSummarizer<'p, P> {
    pub fn new(provider: &'p P, config: SummarizerConfig) -> Self {
        Self { provider, config }
    }

    pub fn summarize(&self, full_text: &str) -> Result<String, SummarizeError> {
        self.run(full_text).map(|run| run.summary)
    }

    pub fn run(&self, full_text: &str) -> Result<SummaryRun, SummarizeError> {
        let chunks = chunk_text(
            full_text,
            |text: &str| self.provider.count_tokens(text),
            self.config.chunk_token_budget,
        );
        if chunks.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        info!(
            chunks = chunks.len(),
            budget = self.config.chunk_token_budget,
            model = self.provider.model_id(),
            "summarizing transcript"
        );

        let mut partials = Vec::with_capacity(chunks.len());
        let mut recovered_overflows = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            match self.provider.summarize(chunk, self.config.chunk_bounds) {
                Ok(text) => partials.push(text.trim().to_string()),
                Err(ProviderError::Overflow(detail)) => {
                    warn!(chunk = index, %detail, "chunk overflowed model limit; bisecting");
                    self.summarize_halves(index, chunk, &mut partials)?;
                    recovered_overflows += 1;
                }
                Err(source) => {
                    return Err(SummarizeError::Provider {
                        chunk: index,
                        source,
                    })
                }
            }
            debug!(chunk = index, partials = partials.len(), "chunk summarized");
        }

        if partials.len() == 1 {
            return Ok(SummaryRun {
                summary: partials[0].clone(),
                chunk_count: chunks.len(),
                partials,
                merged: false,
                recovered_overflows,
            });
        }

        // Single merge pass; the joined partials are not re-chunked.
        let combined = partials.join(" ");
        let summary = self
            .provider
            .summarize(&combined, self.config.merge_bounds)
            .map_err(SummarizeError::Merge)?
            .trim()
            .to_string();
        info!(partials = partials.len(), "merged partial summaries");
        Ok(SummaryRun {
            summary,
            chunk_count: chunks.len(),
            partials,
            merged: true,
            recovered_overflows,
        })
    }

    /// Split `chunk` at its middle word and summarize both halves in order.
    fn summarize_halves(
        &self,
        index: usize,
        chunk: &str,
        partials: &mut Vec<String>,
    ) -> Result<(), SummarizeError> {
        let words: Vec<&str> = chunk.split_whitespace().collect();
        if words.len() < 2 {
            return Err(SummarizeError::Overflow {
                chunk: index,
                words: words.len(),
            });
        }
        let (head, tail) = words.split_at(words.len() / 2);
        for half in [head, tail] {
            let text = half.join(" ");
            match self.provider.summarize(&text, self.config.retry_bounds) {
                Ok(summary) => partials.push(summary.trim().to_string()),
                Err(ProviderError::Overflow(_)) => {
                    return Err(SummarizeError::Overflow {
                        chunk: index,
                        words: half.len(),
                    })
                }
                Err(source) => {
                    return Err(SummarizeError::Provider {
                        chunk: index,
                        source,
                    })
                }
            }
        }
        Ok(())
    }
}

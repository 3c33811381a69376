//! Hosted seq2seq summarization over HTTP.
//!
//! Talks to a Hugging Face style inference endpoint: `POST {endpoint}/{model}`
//! with the text and generation parameters, answered by
//! `[{"summary_text": "..."}]`. Token counting runs locally with the GPT-2
//! byte-level BPE, which is the vocabulary BART checkpoints use.

use std::sync::OnceLock;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tiktoken_rs::CoreBPE;
use tracing::{debug, warn};

use super::{ProviderError, ProviderSettings, SummaryProvider};
use crate::types::SummaryBounds;

/// BOS and EOS added by the model around every input.
const SPECIAL_TOKENS: usize = 2;

static GPT2_BPE: OnceLock<Result<CoreBPE, String>> = OnceLock::new();

fn gpt2_bpe() -> Result<&'static CoreBPE, ProviderError> {
    GPT2_BPE
        .get_or_init(|| tiktoken_rs::r50k_base().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ProviderError::Failed(format!("tokenizer initialization failed: {}", e)))
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct InferenceApiProvider {
    model_id: String,
    url: String,
    api_token: Option<String>,
    max_input_tokens: usize,
    client: Client,
    bpe: &'static CoreBPE,
}

impl InferenceApiProvider {
    pub fn new(settings: &ProviderSettings, model_id: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        Ok(Self {
            model_id: model_id.to_string(),
            url: format!("{}/{}", settings.endpoint.trim_end_matches('/'), model_id),
            api_token: settings.api_token.clone(),
            max_input_tokens: settings.max_input_tokens,
            client,
            bpe: gpt2_bpe()?,
        })
    }
}

/// Rejects inputs that would not fit once the special tokens are added.
fn check_capacity(tokens: usize, max_input_tokens: usize) -> Result<(), ProviderError> {
    let total = tokens + SPECIAL_TOKENS;
    if total > max_input_tokens {
        return Err(ProviderError::Overflow(format!(
            "{} tokens exceed limit of {}",
            total, max_input_tokens
        )));
    }
    Ok(())
}

impl SummaryProvider for InferenceApiProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe
            .encode_ordinary(text)
            .into_iter()
            .map(|id| id as u32)
            .collect()
    }

    fn summarize(&self, text: &str, bounds: SummaryBounds) -> Result<String, ProviderError> {
        check_capacity(self.count_tokens(text), self.max_input_tokens)?;
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": bounds.max_length,
                "min_length": bounds.min_length,
                "do_sample": false,
            },
            "options": { "wait_for_model": true },
        });
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        debug!(
            model = %self.model_id,
            chars = text.len(),
            max_length = bounds.max_length,
            min_length = bounds.min_length,
            "requesting summary"
        );
        let response = request
            .send()
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        let status = response.status();
        let raw = response
            .text()
            .map_err(|e| ProviderError::Failed(e.to_string()))?;
        if !status.is_success() {
            let failure = classify_failure(status, &raw);
            warn!(model = %self.model_id, %status, error = %failure, "inference request rejected");
            return Err(failure);
        }
        parse_summary(&raw)
    }
}

/// Map a rejected response to overflow or a plain failure.
fn classify_failure(status: StatusCode, raw: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(raw)
        .map(|body| body.error)
        .unwrap_or_else(|_| raw.trim().to_string());
    if status == StatusCode::PAYLOAD_TOO_LARGE
        || message.to_ascii_lowercase().contains("index out of range")
    {
        ProviderError::Overflow(message)
    } else {
        ProviderError::Failed(format!("{}: {}", status, message))
    }
}

fn parse_summary(raw: &str) -> Result<String, ProviderError> {
    let mut outputs: Vec<SummaryResponse> = serde_json::from_str(raw)
        .map_err(|e| ProviderError::Failed(format!("unexpected response body: {}", e)))?;
    if outputs.is_empty() {
        return Err(ProviderError::Failed("response contained no summary".to_string()));
    }
    Ok(outputs.swap_remove(0).summary_text.trim().to_string())
}

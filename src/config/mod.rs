use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::provider::ProviderSettings;
use crate::types::SummarizerConfig;

pub const MODEL_ENV: &str = "TUBESUM_MODEL";
pub const INFERENCE_URL_ENV: &str = "TUBESUM_INFERENCE_URL";
pub const API_TOKEN_ENV: &str = "HF_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption languages, most preferred first
    pub languages: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            timeout_secs: 30,
        }
    }
}

impl TranscriptSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub summarizer: SummarizerConfig,
    pub provider: ProviderSettings,
    pub transcript: TranscriptSettings,
}

impl AppConfig {
    /// Defaults, overlaid by the JSON file at `path` if given, then by the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let data = fs::read_to_string(p)
                    .with_context(|| format!("failed to read config file {:?}", p))?;
                Self::from_json(&data)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse config JSON")
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(model) = lookup(MODEL_ENV) {
            self.summarizer.model = model;
        }
        if let Some(endpoint) = lookup(INFERENCE_URL_ENV) {
            self.provider.endpoint = endpoint;
        }
        if let Some(token) = lookup(API_TOKEN_ENV) {
            self.provider.api_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.summarizer
            .validate()
            .context("invalid summarizer settings")?;
        ensure!(
            self.provider.max_input_tokens > 0,
            "provider max_input_tokens must be positive"
        );
        ensure!(
            self.summarizer.chunk_token_budget <= self.provider.max_input_tokens,
            "chunk_token_budget ({}) exceeds provider max_input_tokens ({})",
            self.summarizer.chunk_token_budget,
            self.provider.max_input_tokens
        );
        ensure!(
            !self.transcript.languages.is_empty(),
            "at least one transcript language is required"
        );
        Ok(())
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::{ProviderError, SummaryProvider};

/// Loaded providers keyed by model identifier.
///
/// Built once by the caller and passed down. A provider is loaded at most
/// once per identifier and never evicted.
#[derive(Default)]
pub struct ProviderContext {
    providers: Mutex<HashMap<String, Arc<dyn SummaryProvider>>>,
}

impl ProviderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached provider for `model_id`, loading it on first use.
    ///
    /// The lock is held while `load` runs so concurrent first calls load once.
    pub fn get_or_try_init<F>(
        &self,
        model_id: &str,
        load: F,
    ) -> Result<Arc<dyn SummaryProvider>, ProviderError>
    where
        F: FnOnce(&str) -> Result<Arc<dyn SummaryProvider>, ProviderError>,
    {
        let mut providers = self
            .providers
            .lock()
            .map_err(|_| ProviderError::Failed("provider cache lock poisoned".to_string()))?;
        if let Some(provider) = providers.get(model_id) {
            return Ok(Arc::clone(provider));
        }
        info!(model = model_id, "loading summarization provider");
        let provider = load(model_id)?;
        providers.insert(model_id.to_string(), Arc::clone(&provider));
        Ok(provider)
    }
}

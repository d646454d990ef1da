use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::store::{ContentStore, EmptyStateProvider, NoContent, SampleContent};
use crate::utils::html::ContentSanitizer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub empty_state: Arc<dyn EmptyStateProvider>,
    pub sanitizer: ContentSanitizer,
    pub config: Config,
}

impl AppState {
    /// Wires the providers that follow from `config` around an existing store.
    pub fn new(store: Arc<dyn ContentStore>, config: Config) -> Self {
        let empty_state: Arc<dyn EmptyStateProvider> = if config.demo_content {
            Arc::new(SampleContent)
        } else {
            Arc::new(NoContent)
        };

        Self {
            store,
            empty_state,
            sanitizer: ContentSanitizer::new(config.sanitize_max_input_bytes),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn ContentStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn EmptyStateProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.empty_state.clone()
    }
}

impl FromRef<AppState> for ContentSanitizer {
    fn from_ref(state: &AppState) -> Self {
        state.sanitizer
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

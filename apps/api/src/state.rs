use std::sync::Arc;

use crate::generation::generator::GenerationSettings;
use crate::storage::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document store. Default: LocalDirStore. Swap via STORAGE_BACKEND.
    pub store: Arc<dyn DocumentStore>,
    pub generation: GenerationSettings,
}

use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentExtractor;
use crate::intake::session::SessionStore;
use crate::profile::extractor::ProfileExtractor;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document extractor. Default: NativeDocumentExtractor.
    pub documents: Arc<dyn DocumentExtractor>,
    /// Pluggable profile extractor. Default: LlmProfileExtractor (Gemini).
    pub profiles: Arc<dyn ProfileExtractor>,
    pub store: Arc<RecordStore>,
    pub sessions: SessionStore,
    pub config: Config,
}

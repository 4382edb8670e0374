use std::sync::Arc;

use tokio::sync::Mutex;

use crate::exploration::session::ExplorationState;
use crate::llm_client::GenerativeBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Production: `GeminiClient`. Tests swap in a
    /// scripted fake.
    pub llm: Arc<dyn GenerativeBackend>,
    /// The single exploration session. The mutex is held for a whole render
    /// pass, so writes are serialized and passes never interleave.
    pub exploration: Arc<Mutex<ExplorationState>>,
}

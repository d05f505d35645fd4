use std::sync::Arc;

use crate::export::Exporter;
use crate::session::SessionRegistry;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Signed-in users and their live editing sessions.
    pub sessions: SessionRegistry,
    /// Durable resume storage. Each session gets a handle on sign-in.
    pub store: Arc<dyn ResumeStore>,
    pub exporter: Arc<dyn Exporter>,
}

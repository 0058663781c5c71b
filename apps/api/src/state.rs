use std::sync::Arc;

use crate::export::DocumentExporter;
use crate::generation::Resolvers;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub resolvers: Arc<Resolvers>,
    /// `None` when the configuration has no `export.path`; the export route
    /// then answers with `EXPORT_NOT_CONFIGURED`.
    pub exporter: Option<Arc<DocumentExporter>>,
}

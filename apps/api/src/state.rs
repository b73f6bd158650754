use std::sync::Arc;

use crate::analysis::pipeline::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup: skill index, entity extractor and generator.
    pub analyzer: Arc<ResumeAnalyzer>,
}

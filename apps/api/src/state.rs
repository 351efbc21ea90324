use std::sync::Arc;

use crate::compliance::ComplianceAssessmentService;
use crate::render::DocumentRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    /// Owns the injected completion client and its timeout/retry policy.
    pub assessor: Arc<ComplianceAssessmentService>,
    pub renderer: Arc<DocumentRenderer>,
}

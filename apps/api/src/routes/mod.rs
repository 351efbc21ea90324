pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::compliance::handlers as compliance;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render/:format", post(render::handle_render))
        .route("/generateDocx", post(render::handle_generate_docx))
        .route("/generatePdf", post(render::handle_generate_pdf))
        // Compliance API
        .route("/api/v1/compliance/assess", post(compliance::handle_assess))
        .route("/checkCompliance", post(compliance::handle_assess))
        .with_state(state)
}

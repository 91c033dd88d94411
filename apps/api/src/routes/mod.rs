pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate-resume", post(handlers::handle_generate))
        .route("/resumes/:filename", get(handlers::handle_download))
        .with_state(state)
}

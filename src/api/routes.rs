//! API route definitions
//!
//! - GET  /health        - storage reachability
//! - POST /generate-plan - analyze and plan (persisted)
//! - GET  /land-status   - default parcel summary
//! - GET  /plans         - recent plan records

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/generate-plan", post(handlers::generate_plan))
        .route("/land-status", get(handlers::land_status))
        .route("/plans", get(handlers::recent_plans))
        .with_state(state)
}

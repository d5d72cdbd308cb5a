//! REST API module using Axum
//!
//! Exposes the regeneration pipeline over HTTP for the land-management
//! front end. See [`routes`] for the endpoint list.

pub mod errors;
pub mod handlers;
mod routes;

pub use errors::ApiError;
pub use handlers::ApiState;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::defaults;

/// Build a CORS layer accepting only `origins`.
///
/// Requests without an `Origin` header (curl, server-to-server) are unaffected.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.trim().parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    info!(origins = ?origins, "CORS: allowing configured origins");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = build_cors_layer(&state.config.server.allowed_origins);

    routes::api_routes(state)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(defaults::MAX_REQUEST_BODY_BYTES)),
        )
}

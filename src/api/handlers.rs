//! API route handlers
//!
//! - `/health`: storage reachability
//! - `/generate-plan`: run the analysis pipeline and persist the plan
//! - `/land-status`: degradation summary for the default parcel
//! - `/plans`: recently generated plans

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::errors::{codes, ApiError};
use crate::config::TerraConfig;
use crate::pipeline::PlanPipeline;
use crate::storage::PlanStorage;
use crate::types::{Coordinates, LandStatus, PlanRecord, RegenerationPlan};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone, Debug)]
pub struct ApiState {
    /// Analyzer + planner
    pub pipeline: PlanPipeline,
    /// Plan/parcel store; `None` when the database could not be opened
    pub storage: Option<PlanStorage>,
    /// Effective configuration
    pub config: Arc<TerraConfig>,
}

impl ApiState {
    pub fn new(config: TerraConfig, storage: Option<PlanStorage>) -> Self {
        Self {
            pipeline: PlanPipeline::from_config(&config),
            storage,
            config: Arc::new(config),
        }
    }

    fn storage(&self) -> Result<&PlanStorage, ApiError> {
        self.storage.as_ref().ok_or(ApiError::StorageUnavailable)
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db: &'static str,
}

/// GET /health
pub async fn health_check(State(state): State<ApiState>) -> Response {
    match state.storage().and_then(|s| s.ping().map_err(ApiError::from)) {
        Ok(()) => Json(HealthResponse {
            status: "ok",
            db: "connected",
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "error",
                    db: "unreachable",
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Plan Generation
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl GeneratePlanRequest {
    /// Parse a request body. An empty body means "no coordinates"; anything
    /// else must be a well-formed request.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }
}

/// POST /generate-plan
///
/// The body is optional. Malformed JSON or mistyped coordinates are a 400,
/// bodies over the configured limit a 413.
pub async fn generate_plan(
    State(state): State<ApiState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<RegenerationPlan>, ApiError> {
    let body = body.map_err(|rejection| ApiError::BodyRejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let coordinates = GeneratePlanRequest::from_body(&body)?
        .coordinates
        .unwrap_or_default();
    info!(lat = ?coordinates.lat, lng = ?coordinates.lng, "Generating regeneration plan");

    let timeout = Duration::from_secs(state.config.analysis.timeout_secs);
    let report = state.pipeline.run_with_timeout(coordinates, timeout).await?;

    match &state.storage {
        Some(storage) => {
            let record = PlanRecord::pending(
                state.config.storage.default_parcel_id,
                &report.plan,
                state.config.storage.default_timeline_months,
            );
            // A failed save never fails the request
            match storage.store_plan(&record) {
                Ok(saved) => debug!(id = saved.id, "Plan persisted"),
                Err(e) => warn!(error = %e, "Failed to persist plan, returning it anyway"),
            }
        }
        None => debug!("Storage not open, plan not persisted"),
    }

    Ok(Json(report.plan))
}

// ============================================================================
// Land Status
// ============================================================================

/// GET /land-status
pub async fn land_status(State(state): State<ApiState>) -> Result<Json<LandStatus>, ApiError> {
    let parcel_id = state.config.storage.default_parcel_id;
    let status = match state.storage()?.get_parcel(parcel_id)? {
        Some(parcel) => LandStatus::for_parcel(&parcel),
        None => {
            debug!(parcel_id, "Parcel not registered");
            LandStatus::unknown()
        }
    };
    Ok(Json(status))
}

// ============================================================================
// Plan History
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PlansQuery {
    pub limit: Option<usize>,
}

/// GET /plans?limit=N
pub async fn recent_plans(
    State(state): State<ApiState>,
    Query(query): Query<PlansQuery>,
) -> Result<Json<Vec<PlanRecord>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(state.config.storage.recent_plans_limit);
    Ok(Json(state.storage()?.recent_plans(limit)?))
}

// ============================================================================
// Fallback
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
}

/// Any unmatched route.
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: codes::NOT_FOUND,
            path: uri.path().to_string(),
        }),
    )
        .into_response()
}

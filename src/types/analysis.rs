//! Analysis types: Coordinates, AnalysisResult

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site coordinates as supplied by the caller.
///
/// Either component may be absent; absent values serialize as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Coordinates {
    pub const fn new(lat: Option<f64>, lng: Option<f64>) -> Self {
        Self { lat, lng }
    }
}

/// Indicators extracted from a satellite tile.
///
/// Values are nominally in [0, 1] but nothing enforces it. Missing numeric
/// fields deserialize as `0.0` and a missing timestamp as the current time,
/// so partial analyses from external tools still feed the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Normalized Difference Vegetation Index
    #[serde(default)]
    pub ndvi: f64,
    /// Volumetric soil moisture fraction
    #[serde(default)]
    pub soil_moisture: f64,
    /// Soil-loss likelihood score
    #[serde(default)]
    pub erosion_risk: f64,
    /// When the analysis was produced (UTC, ISO-8601 on the wire)
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Build an analysis stamped with the current time.
    pub fn new(ndvi: f64, soil_moisture: f64, erosion_risk: f64) -> Self {
        Self {
            ndvi,
            soil_moisture,
            erosion_risk,
            timestamp: Utc::now(),
        }
    }
}

//! Tile Analysis
//!
//! Turns a satellite tile reference into an [`AnalysisResult`]. The only
//! implementation today is [`StubAnalyzer`], which returns fixed indicators.
//! A raster-backed analyzer (GDAL/rasterio-style reads plus model inference)
//! plugs in behind [`TileAnalyzer`] without touching the planner or the API.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::defaults;
use crate::types::AnalysisResult;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Tile not readable ({path}): {message}")]
    TileUnreadable { path: String, message: String },

    #[error("Inference failed: {0}")]
    Inference(String),
}

// ============================================================================
// Analyzer Trait
// ============================================================================

/// Anything that can derive vegetation, moisture and erosion indicators from a tile.
///
/// Implementations may block (raster reads, model inference); async callers
/// run them on the blocking pool.
pub trait TileAnalyzer: Send + Sync {
    fn analyze(&self, tile: &Path) -> Result<AnalysisResult, AnalysisError>;

    /// Human-readable name for logging (e.g. "stub").
    fn analyzer_name(&self) -> &str;
}

// ============================================================================
// Stub Analyzer
// ============================================================================

/// Returns fixed indicators stamped with the current time.
///
/// The tile reference is accepted but never opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAnalyzer;

impl TileAnalyzer for StubAnalyzer {
    fn analyze(&self, tile: &Path) -> Result<AnalysisResult, AnalysisError> {
        debug!(tile = %tile.display(), "Stub analysis, tile not read");
        Ok(analyze_satellite_tile(tile))
    }

    fn analyzer_name(&self) -> &str {
        "stub"
    }
}

/// Infallible stub analysis of `tile`.
pub fn analyze_satellite_tile(_tile: &Path) -> AnalysisResult {
    AnalysisResult::new(
        defaults::STUB_NDVI,
        defaults::STUB_SOIL_MOISTURE,
        defaults::STUB_EROSION_RISK,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_stub_returns_fixed_indicators() {
        let analysis = StubAnalyzer
            .analyze(Path::new(defaults::PLACEHOLDER_TILE))
            .unwrap();
        assert_eq!(analysis.ndvi, 0.62);
        assert_eq!(analysis.soil_moisture, 0.28);
        assert_eq!(analysis.erosion_risk, 0.15);
    }

    #[test]
    fn test_stub_ignores_tile_path() {
        let a = analyze_satellite_tile(Path::new("a.tif"));
        let b = analyze_satellite_tile(Path::new("/does/not/exist.tif"));
        assert_eq!(
            (a.ndvi, a.soil_moisture, a.erosion_risk),
            (b.ndvi, b.soil_moisture, b.erosion_risk)
        );
    }

    #[test]
    fn test_stub_timestamp_is_current() {
        let before = Utc::now();
        let analysis = analyze_satellite_tile(Path::new("dummy.tif"));
        let after = Utc::now();
        assert!(analysis.timestamp >= before && analysis.timestamp <= after);
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::TileUnreadable {
            path: "x.tif".to_string(),
            message: "no such file".to_string(),
        };
        assert_eq!(err.to_string(), "Tile not readable (x.tif): no such file");
    }
}

//! Analysis-to-plan pipeline
//!
//! ```text
//! STEP 1: Tile analysis   (TileAnalyzer, placeholder tile)
//! STEP 2: Plan generation (RegenerationPlanner decision table)
//! STEP 3: Report          (PlanReport {coordinates, analysis, plan})
//! ```
//!
//! Coordinates are carried into the report but do not select a tile yet:
//! every run analyzes the configured placeholder tile.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::{AnalysisError, StubAnalyzer, TileAnalyzer};
use crate::config::TerraConfig;
use crate::planning::RegenerationPlanner;
use crate::types::{Coordinates, PlanReport};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Analysis task aborted: {0}")]
    TaskAborted(String),
}

/// Shared analyzer + planner pair.
///
/// Cheap to clone; the HTTP layer holds one per router.
#[derive(Clone)]
pub struct PlanPipeline {
    analyzer: Arc<dyn TileAnalyzer>,
    planner: Arc<RegenerationPlanner>,
    tile: PathBuf,
}

impl PlanPipeline {
    pub fn new(
        analyzer: Arc<dyn TileAnalyzer>,
        planner: RegenerationPlanner,
        tile: PathBuf,
    ) -> Self {
        Self {
            analyzer,
            planner: Arc::new(planner),
            tile,
        }
    }

    /// Stub analyzer with planning rules and tile taken from `config`.
    pub fn from_config(config: &TerraConfig) -> Self {
        Self::new(
            Arc::new(StubAnalyzer),
            RegenerationPlanner::new(config.planning.clone()),
            PathBuf::from(&config.analysis.tile_path),
        )
    }

    /// Run analysis and planning synchronously on the calling thread.
    pub fn run(&self, coordinates: Coordinates) -> Result<PlanReport, AnalysisError> {
        debug!(
            analyzer = self.analyzer.analyzer_name(),
            tile = %self.tile.display(),
            lat = ?coordinates.lat,
            lng = ?coordinates.lng,
            "Running plan pipeline"
        );
        let analysis = self.analyzer.analyze(&self.tile)?;
        let plan = self.planner.generate(&analysis);
        Ok(PlanReport {
            coordinates,
            analysis,
            plan,
        })
    }

    /// Run on the blocking pool, giving up after `timeout`.
    ///
    /// On timeout the blocking task is left to finish on its own; its result
    /// is discarded.
    pub async fn run_with_timeout(
        &self,
        coordinates: Coordinates,
        timeout: Duration,
    ) -> Result<PlanReport, PipelineError> {
        let pipeline = self.clone();
        let task = tokio::task::spawn_blocking(move || pipeline.run(coordinates));

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result.map_err(PipelineError::from),
            Ok(Err(join_err)) => Err(PipelineError::TaskAborted(join_err.to_string())),
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs_f64(), "Analysis timed out");
                Err(PipelineError::Timeout(timeout))
            }
        }
    }
}

impl std::fmt::Debug for PlanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanPipeline")
            .field("analyzer", &self.analyzer.analyzer_name())
            .field("tile", &self.tile)
            .finish_non_exhaustive()
    }
}

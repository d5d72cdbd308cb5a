//! TerraGenesis: Land Regeneration Planning
//!
//! Turns satellite-tile indicators into soil, vegetation and water
//! remediation plans.
//!
//! ## Architecture
//!
//! - **Analysis**: `TileAnalyzer` trait; the current `StubAnalyzer` returns fixed indicators
//! - **Planning**: threshold decision table from indicators to strategy texts
//! - **Pipeline**: analyzer + planner, sync or on the blocking pool with a timeout
//! - **Storage**: Sled-backed plan records and land parcels
//! - **API**: Axum service for plan generation, land status and health

pub mod analysis;
pub mod api;
pub mod config;
pub mod pipeline;
pub mod planning;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::TerraConfig;

// Re-export commonly used types
pub use types::{
    AnalysisResult, Coordinates, ImplementationStatus, LandParcel, LandStatus, PlanRecord,
    PlanReport, RegenerationPlan,
};

// Re-export pipeline components
pub use analysis::{analyze_satellite_tile, AnalysisError, StubAnalyzer, TileAnalyzer};
pub use pipeline::{PipelineError, PlanPipeline};
pub use planning::{generate_regeneration_plan, RegenerationPlanner};

// Re-export storage
pub use storage::{PlanStorage, StorageError};

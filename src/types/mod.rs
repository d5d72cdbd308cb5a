//! Shared data structures for the land regeneration pipeline
//!
//! - AnalysisResult: per-tile vegetation, moisture and erosion indicators
//! - RegenerationPlan: soil/vegetation/water strategies derived from an analysis
//! - PlanReport: the `{coordinates, analysis, plan}` record the CLI prints
//! - PlanRecord, LandParcel, LandStatus: persisted and served by the HTTP layer

mod analysis;
mod plan;
mod land;

pub use analysis::*;
pub use plan::*;
pub use land::*;

//! Plan types: RegenerationPlan, PlanReport, PlanRecord, ImplementationStatus

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalysisResult, Coordinates};

/// Remediation strategies for one site, derived from a single analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationPlan {
    pub soil_strategy: String,
    pub vegetation_strategy: String,
    pub water_strategy: String,
    pub timeline: String,
}

/// One complete pipeline run: where, what was measured, what to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub coordinates: Coordinates,
    pub analysis: AnalysisResult,
    pub plan: RegenerationPlan,
}

/// Lifecycle of a persisted plan.
///
/// Plans are stored as `Pending`; later states are set by field-team tooling
/// writing to the same store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

impl std::fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImplementationStatus::Pending => write!(f, "pending"),
            ImplementationStatus::InProgress => write!(f, "in_progress"),
            ImplementationStatus::Completed => write!(f, "completed"),
            ImplementationStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// A regeneration plan as stored against a land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Assigned by storage; monotonically increasing
    pub id: u64,
    pub parcel_id: u64,
    pub creation_date: NaiveDate,
    pub implementation_status: ImplementationStatus,
    pub soil_strategy: String,
    pub vegetation_strategy: String,
    pub water_strategy: String,
    pub timeline_months: u32,
    /// Exact creation instant, kept alongside the calendar date
    pub created_at: DateTime<Utc>,
}

impl PlanRecord {
    /// Build an unsaved record (id 0) for `parcel_id` from a freshly generated plan.
    pub fn pending(parcel_id: u64, plan: &RegenerationPlan, timeline_months: u32) -> Self {
        let created_at = Utc::now();
        Self {
            id: 0,
            parcel_id,
            creation_date: created_at.date_naive(),
            implementation_status: ImplementationStatus::Pending,
            soil_strategy: plan.soil_strategy.clone(),
            vegetation_strategy: plan.vegetation_strategy.clone(),
            water_strategy: plan.water_strategy.clone(),
            timeline_months,
            created_at,
        }
    }
}

//! System-wide default constants.
//!
//! Every value here is the built-in default for a field in `TerraConfig`.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Planning Rules
// ============================================================================

/// NDVI below this value switches the vegetation strategy to fast cover.
pub const LOW_NDVI_THRESHOLD: f64 = 0.3;

/// Erosion risk above this value appends the erosion-control clause.
pub const HIGH_EROSION_THRESHOLD: f64 = 0.5;

pub const SOIL_STRATEGY: &str = "Apply organic compost and reduced tillage";

pub const VEGETATION_STRATEGY: &str = "Introduce native grasses and nitrogen-fixing cover crops";

pub const WATER_STRATEGY: &str = "Construct check dams and swales";

pub const TIMELINE: &str = "Phase 1 (0-3 months), Phase 2 (3-12 months), Phase 3 (12+ months)";

/// Vegetation strategy used when NDVI is below `LOW_NDVI_THRESHOLD`.
pub const LOW_NDVI_VEGETATION_STRATEGY: &str =
    "Priority: fast-establishing cover crops and nurse trees";

/// Appended verbatim to the soil strategy when erosion risk is high.
pub const EROSION_CONTROL_CLAUSE: &str = "; implement contour bunds and erosion control";

// ============================================================================
// Analysis Stub
// ============================================================================

/// Tile reference handed to the analyzer until real tile lookup exists.
pub const PLACEHOLDER_TILE: &str = "dummy.tif";

pub const STUB_NDVI: f64 = 0.62;

pub const STUB_SOIL_MOISTURE: f64 = 0.28;

pub const STUB_EROSION_RISK: f64 = 0.15;

/// Maximum time a single analysis may run inside the HTTP service (seconds).
pub const ANALYSIS_TIMEOUT_SECS: u64 = 20;

// ============================================================================
// HTTP Service
// ============================================================================

pub const SERVER_ADDR: &str = "0.0.0.0:3000";

/// Browser origins allowed by the CORS layer.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://localhost:3000",
];

/// Largest accepted request body (bytes).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// ============================================================================
// Storage
// ============================================================================

pub const STORAGE_PATH: &str = "./data/terragenesis.db";

/// Parcel that `/generate-plan` and `/land-status` operate on.
pub const DEFAULT_PARCEL_ID: u64 = 1;

/// Timeline length recorded with persisted plans (months).
pub const DEFAULT_TIMELINE_MONTHS: u32 = 12;

/// Number of plan records returned by `history` and `/plans`.
pub const RECENT_PLANS_LIMIT: usize = 10;

// ============================================================================
// Land Status Placeholders
// ============================================================================

/// Degradation level reported when no parcel has been registered.
pub const UNKNOWN_DEGRADATION_LEVEL: &str = "unknown";

/// Degradation level reported for a parcel that has none recorded.
pub const FALLBACK_DEGRADATION_LEVEL: &str = "moderate";

/// Placeholder soil index until it is derived from stored analyses.
pub const PLACEHOLDER_SOIL_INDEX: u32 = 68;

/// Placeholder count of remediation actions for a registered parcel.
pub const PLACEHOLDER_ACTION_COUNT: u32 = 4;

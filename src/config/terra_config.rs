//! TerraGenesis Configuration - planning rules, analysis, server and storage settings
//!
//! Every tunable that drives the planner or the service is a field here.
//! Each struct implements `Default` with the values in `defaults.rs`, so a
//! missing config file yields exactly the built-in behaviour.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// File name searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "terragenesis.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a TerraGenesis deployment.
///
/// Load with `TerraConfig::load()` which searches:
/// 1. An explicit path (`--config` or `$TERRAGENESIS_CONFIG`)
/// 2. `./terragenesis.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraConfig {
    /// Plan generation thresholds and strategy texts
    #[serde(default)]
    pub planning: PlanningConfig,

    /// Tile analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Plan and parcel storage
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TerraConfig {
    /// Load configuration.
    ///
    /// An explicit path must load cleanly; failures there are returned. The
    /// local `terragenesis.toml` is best-effort and falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "Loaded config from explicit path");
            return Ok(config);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
                    return Ok(config);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings and never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate the configuration.
    ///
    /// Rules:
    /// - Thresholds must be finite and within [0, 1]
    /// - Strategy texts must be non-empty (the erosion clause may be empty)
    /// - Timeouts, limits and the recorded timeline length must be > 0
    /// - `server.addr` must parse as a socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (mut errors, warnings) = super::validation::validate_value_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        let s = &self.planning.strategies;
        for (name, text) in [
            ("planning.strategies.soil", &s.soil),
            ("planning.strategies.vegetation", &s.vegetation),
            ("planning.strategies.water", &s.water),
            ("planning.strategies.timeline", &s.timeline),
            ("planning.strategies.low_ndvi_vegetation", &s.low_ndvi_vegetation),
        ] {
            if text.trim().is_empty() {
                errors.push(format!("{name}: must not be empty"));
            }
        }

        if self.analysis.timeout_secs == 0 {
            errors.push("analysis.timeout_secs: must be > 0".to_string());
        }
        if self.analysis.tile_path.trim().is_empty() {
            errors.push("analysis.tile_path: must not be empty".to_string());
        }
        if self.storage.recent_plans_limit == 0 {
            errors.push("storage.recent_plans_limit: must be > 0".to_string());
        }
        if self.storage.default_timeline_months == 0 {
            errors.push("storage.default_timeline_months: must be > 0".to_string());
        }
        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr: '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Planning
// ============================================================================

/// Decision-table thresholds for the regeneration planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// NDVI strictly below this triggers the fast-cover vegetation strategy
    pub low_ndvi_threshold: f64,
    /// Erosion risk strictly above this appends the erosion-control clause
    pub high_erosion_threshold: f64,
    /// Recommendation texts
    pub strategies: StrategyTexts,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            low_ndvi_threshold: defaults::LOW_NDVI_THRESHOLD,
            high_erosion_threshold: defaults::HIGH_EROSION_THRESHOLD,
            strategies: StrategyTexts::default(),
        }
    }
}

/// Free-text recommendations emitted by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyTexts {
    pub soil: String,
    pub vegetation: String,
    pub water: String,
    pub timeline: String,
    /// Replaces `vegetation` when NDVI is low
    pub low_ndvi_vegetation: String,
    /// Appended to `soil` when erosion risk is high
    pub erosion_control_clause: String,
}

impl Default for StrategyTexts {
    fn default() -> Self {
        Self {
            soil: defaults::SOIL_STRATEGY.to_string(),
            vegetation: defaults::VEGETATION_STRATEGY.to_string(),
            water: defaults::WATER_STRATEGY.to_string(),
            timeline: defaults::TIMELINE.to_string(),
            low_ndvi_vegetation: defaults::LOW_NDVI_VEGETATION_STRATEGY.to_string(),
            erosion_control_clause: defaults::EROSION_CONTROL_CLAUSE.to_string(),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tile reference passed to the analyzer
    pub tile_path: String,
    /// Upper bound on a single analysis inside the HTTP service (seconds)
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tile_path: defaults::PLACEHOLDER_TILE.to_string(),
            timeout_secs: defaults::ANALYSIS_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:3000"
    pub addr: String,
    /// Origins accepted by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
            allowed_origins: defaults::ALLOWED_ORIGINS
                .iter()
                .map(|o| (*o).to_string())
                .collect(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sled database directory
    pub path: PathBuf,
    /// Parcel that generated plans are attached to
    pub default_parcel_id: u64,
    /// Timeline length recorded with persisted plans (months)
    pub default_timeline_months: u32,
    /// Records returned by `history` and `/plans` when no limit is given
    pub recent_plans_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::STORAGE_PATH),
            default_parcel_id: defaults::DEFAULT_PARCEL_ID,
            default_timeline_months: defaults::DEFAULT_TIMELINE_MONTHS,
            recent_plans_limit: defaults::RECENT_PLANS_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(TerraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = TerraConfig::from_toml_str(
            r#"
[planning]
low_ndvi_threshold = 0.25
"#,
        )
        .unwrap();
        assert_eq!(config.planning.low_ndvi_threshold, 0.25);
        assert_eq!(config.planning.high_erosion_threshold, 0.5);
        assert_eq!(config.planning.strategies, StrategyTexts::default());
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = TerraConfig::from_toml_str(
            r#"
[planning]
high_erosion_threshold = 1.5
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("high_erosion_threshold"));
    }

    #[test]
    fn test_empty_strategy_rejected() {
        let mut config = TerraConfig::default();
        config.planning.strategies.water = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("planning.strategies.water"));
    }

    #[test]
    fn test_bad_server_addr_rejected() {
        let mut config = TerraConfig::default();
        config.server.addr = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = TerraConfig::default();
        config.analysis.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeline_months_rejected() {
        let mut config = TerraConfig::default();
        config.storage.default_timeline_months = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("storage.default_timeline_months"));
    }

    #[test]
    fn test_toml_roundtrip_preserves_config() {
        let mut config = TerraConfig::default();
        config.storage.default_parcel_id = 7;
        let text = config.to_toml().unwrap();
        let parsed = TerraConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = TerraConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }

    #[test]
    fn test_load_from_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[planning\nlow_ndvi_threshold = ").unwrap();
        let err = TerraConfig::load_from_file(&path).unwrap_err();
        match err {
            ConfigError::Parse(p, _) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other}"),
        }
    }
}

//! Config Validation Tests
//!
//! Exercise typo detection, range validation and file loading
//! independently from the rest of the pipeline.

use terragenesis::config::validation::{
    known_config_keys, suggest_correction, validate_unknown_keys, validate_value_ranges,
};
use terragenesis::config::{ConfigError, TerraConfig};
use terragenesis::{AnalysisResult, RegenerationPlanner};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_strategy_key_warns_with_suggestion() {
    let toml_str = r#"
[planning.strategies]
vegitation = "Plant vetiver"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("vegitation"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("planning.strategies.vegetation")
    );
}

#[test]
fn typo_in_server_section_warns() {
    let toml_str = r#"
[server]
adr = "127.0.0.1:8080"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("server.addr"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[planning]
low_ndvi_threshold = 0.25
high_erosion_threshold = 0.6

[planning.strategies]
soil = "Apply biochar"
vegetation = "Reseed native grasses"
water = "Build half-moon basins"
timeline = "Phase 1 (0-6 months)"
low_ndvi_vegetation = "Plant nurse trees first"
erosion_control_clause = "; add stone lines"

[analysis]
tile_path = "tiles/site-42.tif"
timeout_secs = 30

[server]
addr = "127.0.0.1:8080"
allowed_origins = ["https://terragenesis.example"]

[storage]
path = "/var/lib/terragenesis"
default_parcel_id = 2
default_timeline_months = 18
recent_plans_limit = 25
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);

    let config = TerraConfig::from_toml_str(toml_str).unwrap();
    assert_eq!(config.planning.low_ndvi_threshold, 0.25);
    assert_eq!(config.analysis.timeout_secs, 30);
    assert_eq!(config.storage.default_parcel_id, 2);
    assert_eq!(config.server.allowed_origins.len(), 1);
}

#[test]
fn every_known_key_is_leaf_or_section_of_default_config() {
    let toml_str = TerraConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Serialized defaults contain unknown keys: {:?}",
        warnings
    );
    assert!(known_config_keys().contains("planning.strategies.erosion_control_clause"));
}

#[test]
fn far_off_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("completely_unrelated_key", &known), None);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn negative_threshold_is_error() {
    let mut config = TerraConfig::default();
    config.planning.low_ndvi_threshold = -0.1;
    let (errors, _warnings) = validate_value_ranges(&config);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("planning.low_ndvi_threshold"));
}

#[test]
fn validation_error_lists_every_problem() {
    let toml_str = r#"
[planning]
low_ndvi_threshold = 2.0

[analysis]
timeout_secs = 0

[storage]
recent_plans_limit = 0
"#;
    match TerraConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3, "{errors:?}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_parse_error() {
    let toml_str = r#"
[planning]
low_ndvi_threshold = "low"
"#;
    assert!(matches!(
        TerraConfig::from_toml_str(toml_str),
        Err(ConfigError::Parse(_, _))
    ));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn explicit_config_file_drives_planner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("terragenesis.toml");
    std::fs::write(
        &path,
        r#"
[planning]
high_erosion_threshold = 0.1

[planning.strategies]
erosion_control_clause = "; terrace the slope"
"#,
    )
    .unwrap();

    let config = TerraConfig::load(Some(&path)).unwrap();
    let plan = RegenerationPlanner::new(config.planning)
        .generate(&AnalysisResult::new(0.62, 0.28, 0.15));
    assert_eq!(
        plan.soil_strategy,
        "Apply organic compost and reduced tillage; terrace the slope"
    );
}

#[test]
fn explicit_invalid_config_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[server]\naddr = \"not an address\"\n").unwrap();
    assert!(matches!(
        TerraConfig::load(Some(&path)),
        Err(ConfigError::Validation(_))
    ));
}

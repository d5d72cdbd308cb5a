//! Config validation: unknown-key detection with Levenshtein suggestions
//! and value range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `TerraConfig`.
///
/// Maintained by hand to match the struct hierarchy in terra_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [planning]
        "planning",
        "planning.low_ndvi_threshold",
        "planning.high_erosion_threshold",
        // [planning.strategies]
        "planning.strategies",
        "planning.strategies.soil",
        "planning.strategies.vegetation",
        "planning.strategies.water",
        "planning.strategies.timeline",
        "planning.strategies.low_ndvi_vegetation",
        "planning.strategies.erosion_control_clause",
        // [analysis]
        "analysis",
        "analysis.tile_path",
        "analysis.timeout_secs",
        // [server]
        "server",
        "server.addr",
        "server.allowed_origins",
        // [storage]
        "storage",
        "storage.path",
        "storage.default_parcel_id",
        "storage.default_timeline_months",
        "storage.recent_plans_limit",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are reported by serde
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Value Range Validation
// ============================================================================

/// Validate value ranges on a parsed `TerraConfig`.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_value_ranges(
    config: &super::TerraConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let p = &config.planning;
    for (name, value) in [
        ("planning.low_ndvi_threshold", p.low_ndvi_threshold),
        ("planning.high_erosion_threshold", p.high_erosion_threshold),
    ] {
        // NaN comparisons silently pass, so check finiteness first
        if !value.is_finite() {
            errors.push(format!("{name}: must be finite (got {value})"));
        } else if !(0.0..=1.0).contains(&value) {
            errors.push(format!("{name} = {value:.3} is outside the index range (0-1)"));
        }
    }

    for origin in &config.server.allowed_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            warnings.push(ValidationWarning {
                field: "server.allowed_origins".to_string(),
                message: format!(
                    "allowed origin '{origin}' has no http(s) scheme and will never match"
                ),
                suggestion: None,
            });
        }
    }

    if config.server.allowed_origins.is_empty() {
        warnings.push(ValidationWarning {
            field: "server.allowed_origins".to_string(),
            message: "server.allowed_origins is empty; browsers on other origins are refused"
                .to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerraConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("ndvi", "ndvi"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("eroson", "erosion"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [planning]
            [planning.strategies]
            soil = "mulch"
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"planning".to_string()));
        assert!(keys.contains(&"planning.strategies".to_string()));
        assert!(keys.contains(&"planning.strategies.soil".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
[planning]
low_ndvi_treshold = 0.2
"#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "planning.low_ndvi_treshold");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("planning.low_ndvi_threshold")
        );
        assert!(warnings[0].to_string().contains("did you mean"));
    }

    #[test]
    fn test_unknown_section_produces_warning_without_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
[raster_backend]
driver = "gdal"
"#,
        );
        assert!(warnings.iter().any(|w| w.field == "raster_backend"));
        assert!(warnings.iter().all(|w| w.suggestion.is_none()));
    }

    #[test]
    fn test_unparseable_toml_yields_no_warnings() {
        assert!(validate_unknown_keys("[[[").is_empty());
    }

    #[test]
    fn test_nan_threshold_is_error() {
        let mut config = TerraConfig::default();
        config.planning.low_ndvi_threshold = f64::NAN;
        let (errors, _) = validate_value_ranges(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("finite"));
    }

    #[test]
    fn test_schemeless_origin_warns() {
        let mut config = TerraConfig::default();
        config.server.allowed_origins = vec!["localhost:5500".to_string()];
        let (errors, warnings) = validate_value_ranges(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}

//! Land parcel types: LandParcel, LandStatus

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// A tracked area of land under regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandParcel {
    pub id: u64,
    /// Free-text degradation label, e.g. "severe"
    #[serde(default)]
    pub degradation_level: Option<String>,
}

/// Summary served by `/land-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandStatus {
    pub degradation_level: String,
    pub soil_index: Option<u32>,
    pub action_count: u32,
}

impl LandStatus {
    /// Status reported when the parcel has never been registered.
    pub fn unknown() -> Self {
        Self {
            degradation_level: defaults::UNKNOWN_DEGRADATION_LEVEL.to_string(),
            soil_index: None,
            action_count: 0,
        }
    }

    /// Status for a registered parcel.
    ///
    /// Soil index and action count are placeholders until they are derived
    /// from stored analyses.
    pub fn for_parcel(parcel: &LandParcel) -> Self {
        Self {
            degradation_level: parcel
                .degradation_level
                .clone()
                .filter(|level| !level.is_empty())
                .unwrap_or_else(|| defaults::FALLBACK_DEGRADATION_LEVEL.to_string()),
            soil_index: Some(defaults::PLACEHOLDER_SOIL_INDEX),
            action_count: defaults::PLACEHOLDER_ACTION_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_shape() {
        let value = serde_json::to_value(LandStatus::unknown()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "degradation_level": "unknown",
                "soil_index": null,
                "action_count": 0
            })
        );
    }

    #[test]
    fn test_parcel_without_level_reports_moderate() {
        let status = LandStatus::for_parcel(&LandParcel {
            id: 1,
            degradation_level: None,
        });
        assert_eq!(status.degradation_level, "moderate");
        assert_eq!(status.soil_index, Some(68));
        assert_eq!(status.action_count, 4);
    }

    #[test]
    fn test_parcel_level_is_preserved() {
        let status = LandStatus::for_parcel(&LandParcel {
            id: 1,
            degradation_level: Some("severe".to_string()),
        });
        assert_eq!(status.degradation_level, "severe");
    }
}

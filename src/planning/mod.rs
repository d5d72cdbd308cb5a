//! Rule-based regeneration planning
//!
//! Maps an [`AnalysisResult`] through a small decision table:
//!
//! | Condition                     | Effect                                      |
//! |-------------------------------|---------------------------------------------|
//! | `ndvi < low_ndvi_threshold`   | vegetation strategy replaced by fast cover  |
//! | `erosion_risk > high_erosion` | erosion-control clause appended to soil     |
//!
//! Everything else takes the default text. Thresholds and texts come from
//! [`PlanningConfig`]; its defaults reproduce the built-in table exactly.
//! Generation is a pure function of the analysis values.

use tracing::debug;

use crate::config::PlanningConfig;
use crate::types::{AnalysisResult, RegenerationPlan};

/// Applies the planning decision table.
#[derive(Debug, Clone, Default)]
pub struct RegenerationPlanner {
    config: PlanningConfig,
}

impl RegenerationPlanner {
    pub const fn new(config: PlanningConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Generate a plan for `analysis`. Never fails.
    pub fn generate(&self, analysis: &AnalysisResult) -> RegenerationPlan {
        let texts = &self.config.strategies;
        let low_ndvi = analysis.ndvi < self.config.low_ndvi_threshold;
        let high_erosion = analysis.erosion_risk > self.config.high_erosion_threshold;

        let vegetation_strategy = if low_ndvi {
            texts.low_ndvi_vegetation.clone()
        } else {
            texts.vegetation.clone()
        };

        let mut soil_strategy = texts.soil.clone();
        if high_erosion {
            soil_strategy.push_str(&texts.erosion_control_clause);
        }

        debug!(
            ndvi = analysis.ndvi,
            erosion_risk = analysis.erosion_risk,
            low_ndvi,
            high_erosion,
            "Generated regeneration plan"
        );

        RegenerationPlan {
            soil_strategy,
            vegetation_strategy,
            water_strategy: texts.water.clone(),
            timeline: texts.timeline.clone(),
        }
    }
}

/// Generate a plan with the built-in thresholds and texts.
pub fn generate_regeneration_plan(analysis: &AnalysisResult) -> RegenerationPlan {
    RegenerationPlanner::default().generate(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use chrono::{Duration, Utc};

    fn analysis(ndvi: f64, erosion_risk: f64) -> AnalysisResult {
        AnalysisResult::new(ndvi, 0.28, erosion_risk)
    }

    #[test]
    fn test_healthy_site_gets_all_defaults() {
        let plan = generate_regeneration_plan(&AnalysisResult::new(0.62, 0.28, 0.15));
        assert_eq!(plan.soil_strategy, defaults::SOIL_STRATEGY);
        assert_eq!(plan.vegetation_strategy, defaults::VEGETATION_STRATEGY);
        assert_eq!(plan.water_strategy, defaults::WATER_STRATEGY);
        assert_eq!(
            plan.timeline,
            "Phase 1 (0-3 months), Phase 2 (3-12 months), Phase 3 (12+ months)"
        );
    }

    #[test]
    fn test_boundary_values_keep_defaults() {
        // ndvi exactly at 0.3 and erosion exactly at 0.5 do not trigger
        let plan = generate_regeneration_plan(&analysis(0.3, 0.5));
        assert_eq!(plan.soil_strategy, defaults::SOIL_STRATEGY);
        assert_eq!(plan.vegetation_strategy, defaults::VEGETATION_STRATEGY);
    }

    #[test]
    fn test_low_ndvi_overrides_vegetation_regardless_of_other_fields() {
        for (ndvi, moisture, erosion) in [(0.29, 0.0, 0.0), (0.0, 1.0, 0.9), (-0.2, 0.5, 0.5)] {
            let plan = generate_regeneration_plan(&AnalysisResult::new(ndvi, moisture, erosion));
            assert_eq!(
                plan.vegetation_strategy,
                "Priority: fast-establishing cover crops and nurse trees"
            );
        }
    }

    #[test]
    fn test_high_erosion_appends_clause_after_default() {
        let plan = generate_regeneration_plan(&analysis(0.62, 0.51));
        assert_eq!(
            plan.soil_strategy,
            "Apply organic compost and reduced tillage; implement contour bunds and erosion control"
        );
        assert!(plan.soil_strategy.starts_with(defaults::SOIL_STRATEGY));
        assert!(plan.soil_strategy.ends_with(defaults::EROSION_CONTROL_CLAUSE));
        assert_eq!(plan.vegetation_strategy, defaults::VEGETATION_STRATEGY);
    }

    #[test]
    fn test_degraded_site_triggers_both_rules() {
        let input: AnalysisResult =
            serde_json::from_str(r#"{"ndvi": 0.1, "erosion_risk": 0.6}"#).unwrap();
        let plan = generate_regeneration_plan(&input);
        assert_eq!(plan.vegetation_strategy, defaults::LOW_NDVI_VEGETATION_STRATEGY);
        assert!(plan.soil_strategy.contains(defaults::EROSION_CONTROL_CLAUSE));
        assert_eq!(plan.water_strategy, defaults::WATER_STRATEGY);
    }

    #[test]
    fn test_generation_ignores_timestamp() {
        let a = analysis(0.2, 0.7);
        let mut b = a.clone();
        b.timestamp = Utc::now() - Duration::days(365);
        let planner = RegenerationPlanner::default();
        assert_eq!(planner.generate(&a), planner.generate(&b));
        assert_eq!(planner.generate(&a), planner.generate(&a));
    }

    #[test]
    fn test_configured_thresholds_and_texts_apply() {
        let mut config = PlanningConfig::default();
        config.low_ndvi_threshold = 0.7;
        config.strategies.low_ndvi_vegetation = "Plant pioneer shrubs".to_string();
        config.strategies.water = "Dig zai pits".to_string();
        let plan = RegenerationPlanner::new(config).generate(&analysis(0.62, 0.15));
        assert_eq!(plan.vegetation_strategy, "Plant pioneer shrubs");
        assert_eq!(plan.water_strategy, "Dig zai pits");
    }
}

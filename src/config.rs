use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BetError, Result};

/// Default minimum number of points in a valid range.
pub const DEFAULT_MIN_POINTS: usize = 5;

/// Maximum relative disagreement between the interpolated and theoretical
/// monolayer pressures.
pub const PRESSURE_TOLERANCE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Criteria toggles
// ---------------------------------------------------------------------------

/// Which Rouquerol criteria are evaluated. A disabled criterion always
/// passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    /// The BET plot intercept is positive.
    pub positive_intercept: bool,
    /// `n(1 - p)` and the pressure increase across the range.
    pub increasing: bool,
    /// The monolayer amount lies inside the range.
    pub monolayer_in_range: bool,
    /// Interpolated and theoretical monolayer pressures agree.
    pub pressure_consistency: bool,
    /// The range holds at least `min_points` points.
    pub enough_points: bool,
    pub min_points: usize,
}

impl Default for CriteriaConfig {
    fn default() -> Self {
        CriteriaConfig {
            positive_intercept: true,
            increasing: true,
            monolayer_in_range: true,
            pressure_consistency: true,
            enough_points: true,
            min_points: DEFAULT_MIN_POINTS,
        }
    }
}

impl CriteriaConfig {
    /// Every criterion switched off.
    pub fn none() -> Self {
        CriteriaConfig {
            positive_intercept: false,
            increasing: false,
            monolayer_in_range: false,
            pressure_consistency: false,
            enough_points: false,
            min_points: DEFAULT_MIN_POINTS,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection objective
// ---------------------------------------------------------------------------

/// How a single surface area is chosen among the valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Lowest error against the theoretical isotherm.
    #[default]
    Error,
    /// Most data points.
    Points,
    /// Largest surface area.
    MaxArea,
    /// Smallest surface area.
    MinArea,
}

impl FromStr for Objective {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Objective::Error),
            "points" => Ok(Objective::Points),
            "max" | "max_area" => Ok(Objective::MaxArea),
            "min" | "min_area" => Ok(Objective::MinArea),
            other => Err(BetError::Config(format!(
                "invalid objective '{other}', must be error, points, max or min"
            ))),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Objective::Error => "error",
            Objective::Points => "points",
            Objective::MaxArea => "max",
            Objective::MinArea => "min",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Settings for one BET analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub criteria: CriteriaConfig,
    pub objective: Objective,
}

impl AnalysisConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| BetError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.criteria.positive_intercept);
        assert!(cfg.criteria.increasing);
        assert!(cfg.criteria.monolayer_in_range);
        assert!(cfg.criteria.pressure_consistency);
        assert!(cfg.criteria.enough_points);
        assert_eq!(cfg.criteria.min_points, 5);
        assert_eq!(cfg.objective, Objective::Error);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"criteria": {"min_points": 3, "increasing": false}, "objective": "points"}"#)
                .unwrap();
        assert_eq!(cfg.criteria.min_points, 3);
        assert!(!cfg.criteria.increasing);
        assert!(cfg.criteria.positive_intercept);
        assert_eq!(cfg.objective, Objective::Points);
    }

    #[test]
    fn parses_objective_names() {
        assert_eq!("error".parse::<Objective>().unwrap(), Objective::Error);
        assert_eq!("Points".parse::<Objective>().unwrap(), Objective::Points);
        assert_eq!("max".parse::<Objective>().unwrap(), Objective::MaxArea);
        assert_eq!("min_area".parse::<Objective>().unwrap(), Objective::MinArea);
        assert!("incorrect".parse::<Objective>().is_err());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beatmap.json");
        std::fs::write(&path, r#"{"objective": "min_area"}"#).unwrap();
        let cfg = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(cfg.objective, Objective::MinArea);
        assert_eq!(cfg.criteria, CriteriaConfig::default());
    }
}

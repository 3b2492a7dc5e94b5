use grid_policy::GridPolicy;
use serde::{Deserialize, Serialize};

/// Unit schema 0: mm, kg, s, degree.
pub const STANDARD_UNIT_SCHEMA: u32 = 0;

/// Session settings. Every field is optional in JSON and falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grid: GridPolicy,
    pub unit_schema: u32,
    /// Recompute the document after every feature creation or import.
    pub recompute_on_change: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: GridPolicy::default(),
            unit_schema: STANDARD_UNIT_SCHEMA,
            recompute_on_change: true,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Invalid(String),
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_policy::AxisRestriction;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SessionConfig::from_json("{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_partial_grid_block() {
        let config =
            SessionConfig::from_json(r#"{"grid": {"tolerance": 1.0, "axis_restriction": "XYZ"}}"#)
                .unwrap();
        assert_eq!(config.grid.size(), 25.0);
        assert_eq!(config.grid.tolerance(), 1.0);
        assert_eq!(config.grid.axis_restriction(), AxisRestriction::Xyz);
        assert!(config.recompute_on_change);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let err = SessionConfig::from_json(r#"{"grid": {"tolerance": -2.0}}"#).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SessionConfig {
            recompute_on_change: false,
            unit_schema: 1,
            ..Default::default()
        };
        let back = SessionConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}

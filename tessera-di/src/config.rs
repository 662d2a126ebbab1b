//! Component configuration

use crate::error::{DiError, DiResult};
use serde::{Deserialize, Serialize};

/// Default limit on nested resolutions
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 128;

/// Settings applied to a component and, unless overridden, to components
/// composed on top of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Label used in logs, errors and manifests
    pub name: Option<String>,
    /// How many resolutions may be nested inside one another
    pub max_resolution_depth: usize,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            name: None,
            max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }
}

impl ComponentConfig {
    /// Default settings with a label
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(json_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse JSON: {}", e)))?;
        config.validate()
    }

    fn validate(self) -> DiResult<Self> {
        if self.max_resolution_depth == 0 {
            return Err(DiError::ConfigError(
                "max_resolution_depth must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComponentConfig::default();
        assert_eq!(config.name, None);
        assert_eq!(config.max_resolution_depth, DEFAULT_MAX_RESOLUTION_DEPTH);
    }

    #[test]
    fn test_from_toml() {
        let config = ComponentConfig::from_toml(
            r#"
            name = "app"
            max_resolution_depth = 16
            "#,
        )
        .unwrap();
        assert_eq!(config, ComponentConfig {
            name: Some("app".to_string()),
            max_resolution_depth: 16,
        });
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = ComponentConfig::from_json(r#"{ "name": "screen" }"#).unwrap();
        assert_eq!(config.name.as_deref(), Some("screen"));
        assert_eq!(config.max_resolution_depth, DEFAULT_MAX_RESOLUTION_DEPTH);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            ComponentConfig::from_toml("max_resolution_depth = 0"),
            Err(DiError::ConfigError(_))
        ));
        assert!(matches!(
            ComponentConfig::from_json("{ not json"),
            Err(DiError::ConfigError(_))
        ));
    }
}

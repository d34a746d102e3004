use crate::error::{ParkzoneError, Result};
use crate::models::ValidityMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the same precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Parkzone
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Zone dataset loaded at startup
    pub dataset: ConfigValue<Option<PathBuf>>,
    pub geometry_validity: ConfigValue<ValidityMode>,
    /// Consecutive agreeing fixes required before a transition is reported (1 = off)
    pub stability_updates: ConfigValue<u32>,
    /// Random colour candidates tried before accepting the last one
    pub color_attempts: ConfigValue<u32>,
    /// Minimum hue distance in degrees between zone colours
    pub hue_separation: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            dataset: ConfigValue::new(None, ConfigSource::Default),
            geometry_validity: ConfigValue::new(ValidityMode::Lenient, ConfigSource::Default),
            stability_updates: ConfigValue::new(1, ConfigSource::Default),
            color_attempts: ConfigValue::new(50, ConfigSource::Default),
            hue_separation: ConfigValue::new(30.0, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ParkzoneError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ParkzoneError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(dataset) = file_config.dataset {
            self.dataset.update(Some(dataset), ConfigSource::File);
        }

        if let Some(geometry_validity) = file_config.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::File);
        }

        if let Some(stability) = file_config.stability_updates {
            self.stability_updates.update(validate_stability(stability)?, ConfigSource::File);
        }

        if let Some(attempts) = file_config.color_attempts {
            self.color_attempts.update(validate_color_attempts(attempts)?, ConfigSource::File);
        }

        if let Some(separation) = file_config.hue_separation {
            self.hue_separation.update(validate_hue_separation(separation)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PARKZONE_DATASET
        if let Ok(dataset) = env::var("PARKZONE_DATASET") {
            self.dataset.update(Some(PathBuf::from(dataset)), ConfigSource::Environment);
        }

        // PARKZONE_GEOMETRY_VALIDITY
        if let Ok(validity_str) = env::var("PARKZONE_GEOMETRY_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.geometry_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PARKZONE_GEOMETRY_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        // PARKZONE_STABILITY_UPDATES
        if let Ok(stability_str) = env::var("PARKZONE_STABILITY_UPDATES") {
            match stability_str.parse::<u32>().ok().map(validate_stability) {
                Some(Ok(stability)) => {
                    self.stability_updates.update(stability, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid PARKZONE_STABILITY_UPDATES value '{}': expected integer >= 1",
                    stability_str
                ),
            }
        }

        // PARKZONE_COLOR_ATTEMPTS
        if let Ok(attempts_str) = env::var("PARKZONE_COLOR_ATTEMPTS") {
            match attempts_str.parse::<u32>().ok().map(validate_color_attempts) {
                Some(Ok(attempts)) => self.color_attempts.update(attempts, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid PARKZONE_COLOR_ATTEMPTS value '{}': expected integer >= 1",
                    attempts_str
                ),
            }
        }

        // PARKZONE_HUE_SEPARATION
        if let Ok(separation_str) = env::var("PARKZONE_HUE_SEPARATION") {
            match separation_str.parse::<f64>().ok().map(validate_hue_separation) {
                Some(Ok(separation)) => {
                    self.hue_separation.update(separation, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid PARKZONE_HUE_SEPARATION value '{}': expected degrees in 0..180",
                    separation_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(dataset) = overrides.dataset {
            self.dataset.update(Some(dataset), ConfigSource::Cli);
        }

        if let Some(geometry_validity) = overrides.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::Cli);
        }

        if let Some(stability) = overrides.stability_updates {
            self.stability_updates.update(stability.max(1), ConfigSource::Cli);
        }
    }

    /// Dataset path, or an error naming the missing key
    pub fn require_dataset(&self) -> Result<&Path> {
        self.dataset.value.as_deref().ok_or_else(|| ParkzoneError::ConfigMissing {
            key: "dataset".to_string(),
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "dataset".to_string(),
            (
                self.dataset
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string()),
                self.dataset.source,
            ),
        );

        map.insert(
            "geometry_validity".to_string(),
            (format!("{:?}", self.geometry_validity.value), self.geometry_validity.source),
        );

        map.insert(
            "stability_updates".to_string(),
            (self.stability_updates.value.to_string(), self.stability_updates.source),
        );

        map.insert(
            "color_attempts".to_string(),
            (self.color_attempts.value.to_string(), self.color_attempts.source),
        );

        map.insert(
            "hue_separation".to_string(),
            (format!("{}°", self.hue_separation.value), self.hue_separation.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    dataset: Option<PathBuf>,
    geometry_validity: Option<ValidityMode>,
    stability_updates: Option<u32>,
    color_attempts: Option<u32>,
    hue_separation: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub dataset: Option<PathBuf>,
    pub geometry_validity: Option<ValidityMode>,
    pub stability_updates: Option<u32>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(ParkzoneError::ConfigInvalid {
            key: "geometry_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}

fn validate_stability(value: u32) -> Result<u32> {
    if value == 0 {
        return Err(ParkzoneError::ConfigInvalid {
            key: "stability_updates".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn validate_color_attempts(value: u32) -> Result<u32> {
    if value == 0 {
        return Err(ParkzoneError::ConfigInvalid {
            key: "color_attempts".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn validate_hue_separation(value: f64) -> Result<f64> {
    if !(0.0..180.0).contains(&value) {
        return Err(ParkzoneError::ConfigInvalid {
            key: "hue_separation".to_string(),
            reason: format!("{} is outside 0..180 degrees", value),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert!(config.dataset.value.is_none());
        assert_eq!(config.geometry_validity.value, ValidityMode::Lenient);
        assert_eq!(config.stability_updates.value, 1);
        assert_eq!(config.color_attempts.value, 50);
        assert_eq!(config.hue_separation.value, 30.0);
        assert_eq!(config.hue_separation.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_value_survives_only_until_cli() {
        let mut stability = ConfigValue::new(1u32, ConfigSource::Default);

        stability.update(3, ConfigSource::File);
        stability.update(5, ConfigSource::Cli);
        assert_eq!((stability.value, stability.source), (5, ConfigSource::Cli));

        // a late file value cannot displace the CLI flag
        stability.update(2, ConfigSource::File);
        assert_eq!((stability.value, stability.source), (5, ConfigSource::Cli));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
dataset = "data/zones.json"
geometry_validity = "Strict"
stability_updates = 3
color_attempts = 10
hue_separation = 45.0
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.dataset.value, Some(PathBuf::from("data/zones.json")));
        assert_eq!(config.dataset.source, ConfigSource::File);
        assert_eq!(config.geometry_validity.value, ValidityMode::Strict);
        assert_eq!(config.stability_updates.value, 3);
        assert_eq!(config.color_attempts.value, 10);
        assert_eq!(config.hue_separation.value, 45.0);
    }

    #[test]
    fn test_file_rejects_zero_stability() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "stability_updates = 0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(ParkzoneError::ConfigInvalid { key, .. }) if key == "stability_updates"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            dataset: Some(PathBuf::from("zones.json")),
            geometry_validity: None,
            stability_updates: Some(2),
        });

        assert_eq!(config.dataset.source, ConfigSource::Cli);
        assert_eq!(config.stability_updates.value, 2);
        assert_eq!(config.stability_updates.source, ConfigSource::Cli);
        assert_eq!(config.geometry_validity.source, ConfigSource::Default);
        assert_eq!(config.require_dataset().unwrap(), Path::new("zones.json"));
    }

    #[test]
    fn test_require_dataset_missing() {
        let config = LayeredConfig::with_defaults();
        assert!(matches!(
            config.require_dataset(),
            Err(ParkzoneError::ConfigMissing { key }) if key == "dataset"
        ));
    }

    #[test]
    fn test_parse_validity_mode() {
        assert_eq!(parse_validity_mode("Strict").unwrap(), ValidityMode::Strict);
        assert_eq!(parse_validity_mode("lenient").unwrap(), ValidityMode::Lenient);
        assert!(matches!(
            parse_validity_mode("loose"),
            Err(ParkzoneError::ConfigInvalid { key, .. }) if key == "geometry_validity"
        ));
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 5);
        let (dataset, source) = &map["dataset"];
        assert_eq!(dataset, "(none)");
        assert_eq!(*source, ConfigSource::Default);
        assert_eq!(map["hue_separation"].0, "30°");
    }
}

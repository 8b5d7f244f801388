//! Translator configuration, loadable from YAML or JSON.

use std::path::Path;

use os_core::Real;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TranslatorError, TranslatorResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub forward: ForwardOptions,
    pub reverse: ReverseOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardOptions {
    /// Emit `Daylighting:ReferencePoint` and `Daylighting:Controls`.
    pub daylighting: bool,
    /// Emit plant loop demand-side branches, pipes and connectors.
    pub plant_demand_side: bool,
    /// Write `!-` field name comments when saving IDF text.
    pub field_comments: bool,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            daylighting: true,
            plant_demand_side: true,
            field_comments: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseOptions {
    /// Slack allowed over 1.0 when summing controlled zone fractions.
    pub fraction_tolerance: Real,
    /// Reference points mapped onto zone daylighting controls (primary,
    /// secondary).
    pub max_daylighting_controls: usize,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            fraction_tolerance: 1.0e-6,
            max_daylighting_controls: 2,
        }
    }
}

impl ReverseOptions {
    /// Options with out-of-range values pulled back into range, for callers
    /// that build options in code and skip [`TranslatorConfig::validate`].
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let tol = self.fraction_tolerance;
        let fraction_tolerance = if tol.is_finite() && tol >= 0.0 {
            tol
        } else {
            warn!(value = tol, "fraction_tolerance out of range; using default");
            defaults.fraction_tolerance
        };
        let max_daylighting_controls = self.max_daylighting_controls.clamp(1, 2);
        if max_daylighting_controls != self.max_daylighting_controls {
            warn!(
                value = self.max_daylighting_controls,
                clamped = max_daylighting_controls,
                "max_daylighting_controls out of range"
            );
        }
        Self {
            fraction_tolerance,
            max_daylighting_controls,
        }
    }
}

impl TranslatorConfig {
    pub fn validate(&self) -> TranslatorResult<()> {
        let tol = self.reverse.fraction_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(TranslatorError::InvalidConfig(format!(
                "reverse.fraction_tolerance must be finite and >= 0, got {tol}"
            )));
        }
        if !(1..=2).contains(&self.reverse.max_daylighting_controls) {
            return Err(TranslatorError::InvalidConfig(format!(
                "reverse.max_daylighting_controls must be 1 or 2, got {}",
                self.reverse.max_daylighting_controls
            )));
        }
        Ok(())
    }
}

fn read(path: &Path) -> TranslatorResult<String> {
    std::fs::read_to_string(path).map_err(|source| TranslatorError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_yaml(path: &Path) -> TranslatorResult<TranslatorConfig> {
    let config: TranslatorConfig = serde_yaml::from_str(&read(path)?)?;
    config.validate()?;
    Ok(config)
}

pub fn load_json(path: &Path) -> TranslatorResult<TranslatorConfig> {
    let config: TranslatorConfig = serde_json::from_str(&read(path)?)?;
    config.validate()?;
    Ok(config)
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_config(path: &Path) -> TranslatorResult<TranslatorConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: TranslatorConfig =
            serde_yaml::from_str("forward:\n  daylighting: false\n").unwrap();
        assert!(!config.forward.daylighting);
        assert!(config.forward.plant_demand_side);
        assert_eq!(config.reverse, ReverseOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_limits() {
        let mut config = TranslatorConfig::default();
        config.reverse.max_daylighting_controls = 3;
        assert!(matches!(
            config.validate(),
            Err(TranslatorError::InvalidConfig(_))
        ));

        config.reverse.max_daylighting_controls = 1;
        config.reverse.fraction_tolerance = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_json_by_extension() {
        let path = std::env::temp_dir().join("os_translator_config.json");
        std::fs::write(&path, r#"{"reverse": {"fraction_tolerance": 0.01}}"#).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.reverse.fraction_tolerance, 0.01);
        assert_eq!(config.reverse.max_daylighting_controls, 2);
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("os_translator_no_such_config.yaml");
        let err = load_yaml(&path).unwrap_err();
        assert!(err.to_string().contains("os_translator_no_such_config.yaml"));
    }
}

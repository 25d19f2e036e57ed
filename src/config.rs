//! Engine configuration.
//!
//! Loaded from a JSON file given explicitly or named by `SWINGMAP_CONFIG`;
//! every field has a built-in default.

use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{elasticity::ElasticityParams, encoding::ExtrusionScale, solver::SolverConfig};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "SWINGMAP_CONFIG";

/// Tunable constants for the whole engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub elasticity: ElasticityParams,
    pub solver: SolverConfig,
    pub extrusion: ExtrusionScale,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.elasticity.validate()?;
        self.solver.validate()?;
        self.extrusion.validate()
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)
            .context("[EngineConfig::from_json_str] Failed to parse engine config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[EngineConfig::from_file] Failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("[EngineConfig::from_file] Invalid config in {}", path.display()))
    }

    /// Resolve the config to use. An explicit path must load; a path from the
    /// environment falls back to the defaults if it cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!(target: "swingmap::config", path = %path.display(), "engine_config.loaded=file");
            return Ok((config, Some(path.to_path_buf())));
        }

        if let Some(path) = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!(target: "swingmap::config", path = %path.display(), "engine_config.loaded=env");
                    return Ok((config, Some(path)));
                }
                Err(err) => {
                    tracing::warn!(
                        target: "swingmap::config",
                        path = %path.display(),
                        error = %err,
                        "engine_config.load_failed"
                    );
                }
            }
        }

        tracing::info!(target: "swingmap::config", "engine_config.loaded=builtin");
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.elasticity.divisor, 5.0);
        assert_eq!(config.solver.tolerance_pp, 0.05);
        assert_eq!(config.extrusion.margin_cap, 40.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"elasticity": {"divisor": 8.0}, "solver": {"tolerance_pp": 0.1}}"#).unwrap();
        assert_eq!(config.elasticity.divisor, 8.0);
        assert_eq!(config.elasticity.max, 3.0);
        assert_eq!(config.solver.tolerance_pp, 0.1);
        assert_eq!(config.extrusion, ExtrusionScale::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"elasticity": {"min": 4.0}}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"elasticity": {"neutral": 7.0}}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"solver": {"tolerance_pp": -1}}"#).is_err());
        assert!(EngineConfig::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"extrusion": {"range_height": 10.0}}"#).unwrap();

        let (config, path) = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.extrusion.range_height, 10.0);
        assert_eq!(path.as_deref(), Some(file.path()));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(EngineConfig::load(Some(Path::new("/nonexistent/engine.json"))).is_err());
    }
}

//! YAML pipeline definitions.
//!
//! A pipeline file lists step strings in the same form `Document::steps`
//! records them, so a document's history can be pasted into a config and
//! replayed.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: basic
//! steps:
//!   - CleanNumber()
//!   - BasicTokenizer()
//!   - CaseTokens(mode='lower')
//! logging:
//!   level: info
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transformers::{Registry, TransformError, parse_step};

use crate::compose::Compose;
use crate::logging::LoggingConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] TransformError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Step strings, applied in order.
    #[serde(default)]
    pub steps: Vec<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the version, the logging filter and that every step parses
    /// and names a built-in transformer. Transformers are not constructed,
    /// so files referenced by steps are not opened here.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.validate_with(Registry::global())
    }

    pub fn validate_with(&self, registry: &Registry) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.steps.is_empty() {
            return Err(ConfigLoadError::Validation(
                "steps must list at least one transformer".to_string(),
            ));
        }

        self.logging
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))?;

        for (index, step) in self.steps.iter().enumerate() {
            let parsed = parse_step(step).map_err(|err| err.at_step(index, step))?;
            if !registry.contains(&parsed.name) {
                return Err(TransformError::UnknownTransformer {
                    name: parsed.name,
                    index,
                    steps: self.steps.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Constructs the pipeline from the built-in transformers.
    pub fn build_pipeline(&self) -> Result<Compose, ConfigLoadError> {
        self.build_pipeline_with(Registry::global())
    }

    pub fn build_pipeline_with(&self, registry: &Registry) -> Result<Compose, ConfigLoadError> {
        Ok(Compose::from_steps_with(registry, &self.steps)?)
    }

    /// Serializes back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            steps: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl From<&Compose> for PipelineConfig {
    fn from(pipeline: &Compose) -> Self {
        Self {
            steps: pipeline
                .transformers()
                .iter()
                .map(|stage| stage.identity())
                .collect(),
            ..Self::default()
        }
    }
}

//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading program
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Policy, PolicySpec};

use super::types::{ProgramConfig, ProgramMetadata};

/// Loads and provides access to a program configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sotsuken/
/// ├── program.yaml   # Program metadata
/// └── policy.yaml    # Scoring and attendance rules
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sotsuken").unwrap();
/// println!("Required points: {}", loader.policy().required_points());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ProgramConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if a required file is missing
    /// - [`EngineError::ConfigParseError`] if a file contains invalid YAML
    ///   or is missing a required field
    /// - [`EngineError::InvalidPolicy`] if the policy values are out of range
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/sotsuken")?;
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ProgramMetadata>(&path.join("program.yaml"))?;

        let spec = Self::load_yaml::<PolicySpec>(&path.join("policy.yaml"))?;
        let policy = Policy::try_from(spec)?;

        Ok(Self {
            config: ProgramConfig::new(metadata, policy),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying program configuration.
    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        self.config.program()
    }

    /// Returns the validated scoring policy.
    pub fn policy(&self) -> &Policy {
        self.config.policy()
    }
}

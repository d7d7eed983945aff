//! Run configuration
//!
//! Stored as RON. Every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vd_core::{EPSILON, Tolerance, VisibilityIsolator};

/// Configuration file errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What happens to each part's work scope after its views are built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    /// Build and isolate views, export nothing, discard the scope
    #[default]
    DryRun,
    /// Export the sheet, then discard the scope
    Export,
    /// Export the sheet and keep the created sheet and views
    Persist,
}

impl RunMode {
    pub fn exports(&self) -> bool {
        !matches!(self, RunMode::DryRun)
    }

    pub fn commits(&self) -> bool {
        matches!(self, RunMode::Persist)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunMode::DryRun => "dry-run",
            RunMode::Export => "export",
            RunMode::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Raster image size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width_px: 1600,
            height_px: 1200,
        }
    }
}

/// Batch drawing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Sheet template looked up by exact name
    pub template_name: String,
    /// Directory that receives exported sheets
    pub output_dir: PathBuf,
    pub mode: RunMode,
    /// Answer the host's isolated-export prompt with "proceed"
    pub suppress_confirmation: bool,
    /// Add orientation markers to each view's isolated set
    pub include_markers: bool,
    /// Tolerance for basis checks
    pub tolerance: f64,
    pub raster: RasterConfig,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            template_name: "A3 Landscape".to_string(),
            output_dir: PathBuf::from("drawings"),
            mode: RunMode::default(),
            suppress_confirmation: true,
            include_markers: true,
            tolerance: EPSILON,
            raster: RasterConfig::default(),
        }
    }
}

impl DraftConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: DraftConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_name.trim().is_empty() {
            return Err(ConfigError::Invalid("template_name is empty".to_string()));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.raster.width_px == 0 || self.raster.height_px == 0 {
            return Err(ConfigError::Invalid("raster size must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance)
    }

    pub fn isolator(&self) -> VisibilityIsolator {
        VisibilityIsolator::new(self.suppress_confirmation)
    }
}

//! Tool configuration module.
//!
//! Handles loading and validating `wallfit.toml`. Everything the CLI can
//! set has a config-file counterpart, so a user can store their display
//! resolution and preferred detection settings once instead of repeating
//! flags on every run. CLI flags always override file values.
//!
//! ## Config File Location
//!
//! `--config <path>` names a file explicitly (missing file is an error).
//! Otherwise `wallfit.toml` in the current directory is used when present,
//! and stock defaults apply when it isn't.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output = "output-images"  # Directory for generated wallpapers
//!
//! [target]
//! # width = 1920            # Display width (omit to require -x on the CLI)
//! # height = 1080           # Display height (omit to require -y on the CLI)
//!
//! [fit]
//! threshold = 166           # Feature detection cutoff (0-255)
//! upscale = false           # Allow scaling images up, not only down
//! mask = false              # Focus detection away from the frame center
//! gradient_mask = false     # Softer, gradient-shaped center mask
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::imaging::DEFAULT_THRESHOLD;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `wallfit.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallfitConfig {
    /// Directory generated wallpapers are written to.
    pub output: String,
    /// Default display resolution (CLI `-x`/`-y` override).
    pub target: TargetConfig,
    /// Content-aware fitting settings.
    pub fit: FitConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for WallfitConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            target: TargetConfig::default(),
            fit: FitConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn default_output() -> String {
    "output-images".to_string()
}

/// Default target resolution. Both axes must be present to be usable;
/// half-set targets are rejected by [`WallfitConfig::validate`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Defaults for the fitting pipeline, mirroring [`crate::imaging::CropConfig`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub threshold: u32,
    pub upscale: bool,
    pub mask: bool,
    pub gradient_mask: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            upscale: false,
            mask: false,
            gradient_mask: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Max parallel workers. Omit for auto (number of CPU cores).
    pub max_processes: Option<usize>,
}

impl WallfitConfig {
    /// Load a config file, or stock defaults when `explicit` is `None` and
    /// no `wallfit.toml` exists in the current directory.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let implicit = Path::new("wallfit.toml");
                if implicit.exists() {
                    Self::load(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load and validate a specific config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fit.threshold > 255 {
            return Err(ConfigError::Validation(
                "fit.threshold must be between 0 and 255".into(),
            ));
        }
        if self.output.is_empty() {
            return Err(ConfigError::Validation("output must not be empty".into()));
        }
        match (self.target.width, self.target.height) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(ConfigError::Validation(
                    "target dimensions must be positive".into(),
                ));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::Validation(
                    "target.width and target.height must be set together".into(),
                ));
            }
            _ => {}
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Number of worker threads to use: the configured maximum, capped at the
/// number of available CPU cores — users can constrain down, not up.
pub fn effective_threads(processing: &ProcessingConfig) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match processing.max_processes {
        Some(max) => max.min(available).max(1),
        None => available,
    }
}

/// A stock `wallfit.toml` with every option documented, printed by
/// `wallfit --gen-config`.
pub fn stock_config_toml() -> String {
    let mut doc = String::new();
    doc.push_str("# wallfit configuration - all options are optional\n");
    doc.push_str("# CLI flags override anything set here.\n\n");
    doc.push_str("# Directory for generated wallpapers\noutput = \"output-images\"\n\n");
    doc.push_str("[target]\n");
    doc.push_str("# Store your display resolution to drop the -x/-y flags\n");
    doc.push_str("# width = 1920\n# height = 1080\n\n");
    doc.push_str("[fit]\n");
    doc.push_str("# Feature detection cutoff (0-255)\nthreshold = 166\n");
    doc.push_str("# Allow scaling images up, not only down\nupscale = false\n");
    doc.push_str("# Focus detection away from the frame center\nmask = false\n");
    doc.push_str("# Softer, gradient-shaped center mask (needs mask = true)\ngradient_mask = false\n\n");
    doc.push_str("[processing]\n");
    doc.push_str("# Max parallel workers (omit for auto = CPU cores)\n# max_processes = 4\n");
    doc
}

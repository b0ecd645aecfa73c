use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::caption_processor::Document;
use crate::placement::{RowGuidePolicy, SurfaceSize};
use crate::qc::PlacementValidatorConfig;
use crate::render_plan::PlannerSettings;
use crate::timecode::{FrameRate, GenericSeparator};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Timecode defaults for documents that do not carry their own
    #[serde(default)]
    pub timecode: TimecodeConfig,

    /// Placement and surface settings
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Caption QC settings
    #[serde(default)]
    pub qc: PlacementValidatorConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timecode settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimecodeConfig {
    // @field: Frame rate assumed by the CLI and for new documents
    #[serde(default = "default_fps")]
    pub default_fps: f64,

    // @field: Whether new documents count labels in drop-frame
    #[serde(default = "default_true")]
    pub drop_frame: bool,

    // @field: Reject labels naming a dropped frame instead of warning
    #[serde(default)]
    pub strict_drop_frame: bool,

    // @field: Separator for millisecond labels
    #[serde(default)]
    pub generic_separator: GenericSeparator,
}

impl Default for TimecodeConfig {
    fn default() -> Self {
        Self {
            default_fps: default_fps(),
            drop_frame: true,
            strict_drop_frame: false,
            generic_separator: GenericSeparator::default(),
        }
    }
}

/// Placement settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Constrain the caption aperture to a centred 4:3 region
    #[serde(default = "default_true")]
    pub aspect_constrained: bool,

    /// Rows shown as guides by authoring front ends
    #[serde(default)]
    pub row_guides: RowGuidePolicy,

    /// Timing tolerance for joining split rows into a block, in frames
    #[serde(default = "default_block_tolerance_frames")]
    pub block_tolerance_frames: f64,

    /// Default surface width in pixels
    #[serde(default = "default_surface_width")]
    pub surface_width: u32,

    /// Default surface height in pixels
    #[serde(default = "default_surface_height")]
    pub surface_height: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            aspect_constrained: true,
            row_guides: RowGuidePolicy::default(),
            block_tolerance_frames: default_block_tolerance_frames(),
            surface_width: default_surface_width(),
            surface_height: default_surface_height(),
        }
    }
}

impl PlacementConfig {
    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.surface_width, self.surface_height)
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            aspect_constrained: self.aspect_constrained,
            block_tolerance_frames: self.block_tolerance_frames,
            row_guides: self.row_guides,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_fps() -> f64 {
    29.97
}

fn default_true() -> bool {
    true
}

fn default_block_tolerance_frames() -> f64 {
    1.0
}

fn default_surface_width() -> u32 {
    1920
}

fn default_surface_height() -> u32 {
    1080
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        FrameRate::from_fps(self.timecode.default_fps)
            .map_err(|e| anyhow!("Invalid default frame rate: {}", e))?;

        let tolerance = self.placement.block_tolerance_frames;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(anyhow!("Block tolerance must be a non-negative number of frames, got {}", tolerance));
        }

        if self.placement.surface_width == 0 || self.placement.surface_height == 0 {
            return Err(anyhow!(
                "Surface size must be non-zero, got {}x{}",
                self.placement.surface_width,
                self.placement.surface_height
            ));
        }

        if self.qc.max_lines == 0 {
            return Err(anyhow!("QC max_lines must be at least 1"));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;

        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Document metadata for captions that carry none
    pub fn default_document(&self) -> Document {
        Document::new(self.timecode.default_fps, self.timecode.drop_frame)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            timecode: TimecodeConfig::default(),
            placement: PlacementConfig::default(),
            qc: PlacementValidatorConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

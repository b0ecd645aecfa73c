/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use capgrid::app_config::{Config, LogLevel, PlacementConfig};
use capgrid::placement::{RowGuidePolicy, SurfaceSize};
use capgrid::timecode::GenericSeparator;
use log::LevelFilter;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.timecode.default_fps, 29.97);
    assert!(config.timecode.drop_frame);
    assert!(!config.timecode.strict_drop_frame);
    assert_eq!(config.timecode.generic_separator, GenericSeparator::Dot);

    assert!(config.placement.aspect_constrained);
    assert_eq!(config.placement.row_guides, RowGuidePolicy::Standard);
    assert_eq!(config.placement.block_tolerance_frames, 1.0);
    assert_eq!(config.placement.surface(), SurfaceSize::new(1920, 1080));

    assert_eq!(config.qc.max_lines, 2);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.timecode.default_fps = 0.0;
    assert!(config.validate().is_err());
    config.timecode.default_fps = 25.0;

    config.placement.block_tolerance_frames = -1.0;
    assert!(config.validate().is_err());
    config.placement.block_tolerance_frames = 2.0;

    config.placement.surface_height = 0;
    assert!(config.validate().is_err());
    config.placement.surface_height = 480;

    config.qc.max_lines = 0;
    assert!(config.validate().is_err());
    config.qc.max_lines = 2;

    assert!(config.validate().is_ok());
}

/// Test partial config files fill in defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "timecode": { "default_fps": 25, "drop_frame": false, "generic_separator": "comma" },
        "placement": { "row_guides": "placement_assist" },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.timecode.default_fps, 25.0);
    assert!(!config.timecode.drop_frame);
    assert_eq!(config.timecode.generic_separator, GenericSeparator::Comma);
    assert_eq!(config.placement.row_guides, RowGuidePolicy::PlacementAssist);
    assert_eq!(config.placement.surface_width, 1920);
    assert!(config.qc.check_line_overflow);
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Debug);
    Ok(())
}

/// Test saving and loading a config file
#[test]
fn test_config_saveToFile_thenFromFile_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("capgrid.json");

    let mut config = Config::default();
    config.placement = PlacementConfig {
        aspect_constrained: false,
        surface_width: 720,
        surface_height: 576,
        ..PlacementConfig::default()
    };
    config.save_to_file(&path)?;

    assert_eq!(Config::from_file(&path)?, config);
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Test the default document follows the timecode settings
#[test]
fn test_defaultDocument_shouldUseTimecodeSettings() {
    let mut config = Config::default();
    config.timecode.default_fps = 59.94;

    let document = config.default_document();

    assert_eq!(document.fps, 59.94);
    assert!(document.uses_drop_frame());
    assert_eq!(document.start_timecode_label, None);
}

/// Test planner settings derive from the placement config
#[test]
fn test_plannerSettings_shouldMirrorPlacementConfig() {
    let placement = PlacementConfig {
        block_tolerance_frames: 2.0,
        row_guides: RowGuidePolicy::PlacementAssist,
        ..PlacementConfig::default()
    };

    let settings = placement.planner_settings();

    assert!(settings.aspect_constrained);
    assert_eq!(settings.block_tolerance_frames, 2.0);
    assert_eq!(settings.row_guides, RowGuidePolicy::PlacementAssist);
}

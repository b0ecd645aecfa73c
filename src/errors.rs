/*!
 * Error and warning types for the capgrid engine.
 *
 * Parse failures are returned as typed errors built with `thiserror`.
 * Clamping and legacy drop-frame labels are not errors: they are reported
 * as `CaptionWarning` values next to a best-effort result so an authoring
 * tool stays usable with imperfect data.
 */

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::caption_processor::Placement;

/// Errors raised while reading timecode or time labels
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    /// Label does not have the `HH:MM:SS:FF` / `HH:MM:SS;FF` shape
    #[error("Malformed SMPTE timecode '{0}': expected HH:MM:SS:FF or HH:MM:SS;FF")]
    MalformedSmpte(String),

    /// Label does not have the `HH:MM:SS.mmm` / `HH:MM:SS,mmm` shape
    #[error("Malformed time label '{0}': expected HH:MM:SS.mmm or HH:MM:SS,mmm")]
    MalformedGeneric(String),

    /// Minutes or seconds field outside 0..=59
    #[error("Timecode '{label}' has {field} out of range: {value}")]
    FieldOutOfRange {
        /// Offending label
        label: String,
        /// Name of the field ("minutes" or "seconds")
        field: &'static str,
        /// Parsed value
        value: u32,
    },

    /// Frame field not below the nominal frame rate
    #[error("Timecode '{label}' has frame {frame}, which is not below {nominal_fps}")]
    FrameOutOfRange {
        /// Offending label
        label: String,
        /// Parsed frame number
        frame: u32,
        /// Rounded frame rate
        nominal_fps: u32,
    },

    /// Strict drop-frame parsing met a frame number that drop-frame counting skips
    #[error("Drop-frame timecode '{0}' names a frame number that is never produced")]
    DroppedFrameLabel(String),

    /// Frame rate is not a positive finite number
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),
}

/// Errors raised while reconstructing a caption block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Anchor index does not address an event in the list
    #[error("Anchor index {anchor} is out of range for {len} events")]
    AnchorOutOfRange {
        /// Requested anchor
        anchor: usize,
        /// Number of events supplied
        len: usize,
    },
}

/// Non-fatal conditions reported for QC
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptionWarning {
    /// A placement was outside the 1..=15 / 0..=31 grid and has been clamped
    DomainClamp {
        /// Line index within the caption the placement belongs to
        line: usize,
        /// Placement as supplied
        requested: Placement,
        /// Placement actually used
        clamped: Placement,
    },

    /// A drop-frame label that real drop-frame numbering never produces
    IllegalDropFrame {
        /// The label as supplied
        label: String,
    },
}

impl fmt::Display for CaptionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionWarning::DomainClamp { line, requested, clamped } => write!(
                f,
                "Line {} placement {} clamped to {}",
                line, requested, clamped
            ),
            CaptionWarning::IllegalDropFrame { label } => {
                write!(f, "Drop-frame label {} names a dropped frame number", label)
            }
        }
    }
}

/// Main application error type used by the command-line front end
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from timecode parsing
    #[error("Timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Error from block reconstruction
    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

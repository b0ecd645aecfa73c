/*!
 * # capgrid - broadcast caption placement and timecode engine
 *
 * A Rust library for positioning pop-on captions on the CEA-608 grid and
 * converting between media time and SMPTE timecode.
 *
 * ## Features
 *
 * - SMPTE timecode labels, non-drop-frame and drop-frame (29.97 / 59.94)
 * - Millisecond time labels and document start-timecode offsets
 * - Row/column placement on the 15x32 caption grid, with clamping of legacy data
 * - Reconstruction of pop-on blocks split into one event per row
 * - Active cue lookup for a playback time
 * - Mid-row style tokens expanded into styled display cells
 * - Per-tick render plans and caption QC reports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timecode`: Timecode conversion:
 *   - `timecode::smpte`: SMPTE labels and frame counting
 *   - `timecode::generic`: Millisecond labels
 *   - `timecode::offset`: Document start-timecode offsets
 * - `mid_row`: Mid-row style token expansion
 * - `placement`: Caption grid placement:
 *   - `placement::grid`: Row/column resolution
 *   - `placement::geometry`: Surface geometry and the row guide cache
 * - `blocks`: Pop-on block reconstruction
 * - `cue_locator`: Active cue lookup
 * - `render_plan`: Per-tick render planning
 * - `qc`: Caption quality checks
 * - `caption_processor`: Caption events, documents and JSON import/export
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod blocks;
pub mod caption_processor;
pub mod cue_locator;
pub mod errors;
pub mod file_utils;
pub mod mid_row;
pub mod placement;
pub mod qc;
pub mod render_plan;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use blocks::{reconstruct_block, BlockReconstructor, CaptionBlock};
pub use caption_processor::{CaptionCollection, CaptionEvent, Document, Placement};
pub use cue_locator::{locate, CueLocator};
pub use errors::{AppError, BlockError, CaptionWarning, TimecodeError};
pub use mid_row::{DisplayCell, MidRowTokenizer};
pub use placement::{resolve_placement, SurfaceSize};
pub use render_plan::{RenderPlan, RenderPlanner};
pub use timecode::{seconds_to_smpte, smpte_to_seconds, FrameRate, SmpteCodec};

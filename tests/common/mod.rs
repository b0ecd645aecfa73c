/*!
 * Common test utilities for the capgrid test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use capgrid::caption_processor::{CaptionEvent, Placement};

/// Routes library logs through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample caption document for testing
///
/// The first caption is stored as one event per row, the way many
/// importers split pop-on blocks.
pub fn create_test_document(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"{
  "fps": 29.97,
  "dropFrame": true,
  "startTimecodeLabel": "01:00:00;00",
  "events": [
    { "start": 1.0, "end": 4.0, "lines": ["This is a test caption"] },
    { "start": 1.0, "end": 4.0, "lines": ["split over two rows."] },
    { "start": 5.0, "end": 9.0, "lines": ["{I}In italics"], "placement": [{ "row": 12, "col": 4 }] },
    { "start": 10.0, "end": 14.0, "lines": ["  Indented", "second line"] }
  ]
}"#;
    create_test_file(dir, filename, content)
}

/// Creates a caption document that fails QC
pub fn create_failing_document(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"{
  "fps": 25,
  "events": [
    { "start": 3.0, "end": 2.0, "lines": ["Backwards"] },
    { "start": 4.0, "end": 6.0, "lines": ["This line is far too long to fit on one caption row"] }
  ]
}"#;
    create_test_file(dir, filename, content)
}

/// Single-line event
pub fn event(start: f64, end: f64, text: &str) -> CaptionEvent {
    CaptionEvent::new(start, end, vec![text.to_string()])
}

/// Single-line event with an explicit placement
pub fn placed_event(start: f64, end: f64, text: &str, row: i32, col: i32) -> CaptionEvent {
    event(start, end, text).with_placement(vec![Some(Placement::new(row, col))])
}

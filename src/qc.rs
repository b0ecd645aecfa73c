/*!
 * Quality checks for caption documents.
 *
 * This module reports, without modifying the document:
 * - Events whose time range is empty or inverted
 * - Events with more rows than a pop-on block can show
 * - Placements outside the caption grid (clamped on air)
 * - Lines whose expanded width does not fit from their start column
 * - Start timecode labels that cannot be parsed or name a dropped frame
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::blocks::MAX_BLOCK_LINES;
use crate::caption_processor::{CaptionEvent, Document, Placement};
use crate::errors::CaptionWarning;
use crate::mid_row::MidRowTokenizer;
use crate::placement::resolve_placement;
use crate::timecode::SmpteCodec;

/// Issues found on a single event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QcIssue {
    /// End is not after start
    InvalidTimeRange { start: f64, end: f64 },
    /// No visible text on any line
    EmptyText,
    /// More lines than a block shows
    TooManyLines { lines: usize, max: usize },
    /// Placement outside the grid
    DomainClamp {
        line: usize,
        requested: Placement,
        clamped: Placement,
    },
    /// Expanded text is wider than the columns left on the row
    LineOverflow {
        line: usize,
        cells: usize,
        available: usize,
    },
}

impl QcIssue {
    /// Warnings are reported but do not fail the event
    pub fn is_warning(&self) -> bool {
        matches!(self, QcIssue::DomainClamp { .. })
    }
}

impl std::fmt::Display for QcIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QcIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s, end {:.3}s", start, end)
            }
            QcIssue::EmptyText => write!(f, "Caption has no visible text"),
            QcIssue::TooManyLines { lines, max } => {
                write!(f, "Too many lines: {} (max: {})", lines, max)
            }
            QcIssue::DomainClamp { line, requested, clamped } => {
                write!(f, "Line {} placement {} clamped to {}", line, requested, clamped)
            }
            QcIssue::LineOverflow { line, cells, available } => write!(
                f,
                "Line {} needs {} cells but only {} columns are available",
                line, cells, available
            ),
        }
    }
}

/// Issues found on the document metadata or event order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentIssue {
    /// Start timecode label does not parse
    StartOffsetUnparseable { label: String, reason: String },
    /// Start timecode label names a frame number drop-frame counting skips
    IllegalDropFrame { label: String },
    /// Event starts before its predecessor
    UnsortedEvents { index: usize },
}

impl DocumentIssue {
    pub fn is_warning(&self) -> bool {
        !matches!(self, DocumentIssue::StartOffsetUnparseable { .. })
    }
}

impl std::fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentIssue::StartOffsetUnparseable { label, reason } => {
                write!(f, "Start timecode '{}' is unusable: {}", label, reason)
            }
            DocumentIssue::IllegalDropFrame { label } => {
                write!(f, "Start timecode {} names a dropped frame number", label)
            }
            DocumentIssue::UnsortedEvents { index } => {
                write!(f, "Event {} starts before the event preceding it", index)
            }
        }
    }
}

/// Result of checking a single event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcEntryResult {
    /// Index of the event in the document
    pub index: usize,
    /// Whether the event passed (warnings allowed)
    pub passed: bool,
    pub issues: Vec<QcIssue>,
}

impl QcEntryResult {
    fn from_issues(index: usize, issues: Vec<QcIssue>) -> Self {
        Self {
            index,
            passed: issues.iter().all(QcIssue::is_warning),
            issues,
        }
    }
}

/// Result of checking a whole document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcReport {
    pub passed: bool,
    pub entry_results: Vec<QcEntryResult>,
    pub document_issues: Vec<DocumentIssue>,
    /// Number of issues, warnings included
    pub total_issues: usize,
    pub warning_count: usize,
}

impl QcReport {
    pub fn failed_entries(&self) -> Vec<&QcEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }

    /// Entries with at least one issue
    pub fn flagged_entries(&self) -> impl Iterator<Item = &QcEntryResult> {
        self.entry_results.iter().filter(|r| !r.issues.is_empty())
    }
}

/// Configuration for caption QC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementValidatorConfig {
    /// Maximum lines per event
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Whether to flag lines wider than the row allows
    #[serde(default = "default_true")]
    pub check_line_overflow: bool,

    /// Whether to flag events out of start order
    #[serde(default = "default_true")]
    pub check_sort_order: bool,
}

impl Default for PlacementValidatorConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            check_line_overflow: true,
            check_sort_order: true,
        }
    }
}

fn default_max_lines() -> usize {
    MAX_BLOCK_LINES
}

fn default_true() -> bool {
    true
}

/// Placement and timing validator for caption documents
pub struct PlacementValidator {
    config: PlacementValidatorConfig,
}

impl PlacementValidator {
    pub fn new() -> Self {
        Self {
            config: PlacementValidatorConfig::default(),
        }
    }

    pub fn with_config(config: PlacementValidatorConfig) -> Self {
        Self { config }
    }

    /// Check a single event
    pub fn validate_event(&self, index: usize, event: &CaptionEvent) -> QcEntryResult {
        let mut issues = Vec::new();

        if event.end <= event.start || event.start.is_nan() || event.end.is_nan() {
            issues.push(QcIssue::InvalidTimeRange {
                start: event.start,
                end: event.end,
            });
        }

        if event.lines.iter().all(|line| MidRowTokenizer::strip_tokens(line).trim().is_empty()) {
            issues.push(QcIssue::EmptyText);
        }

        if event.lines.len() > self.config.max_lines {
            issues.push(QcIssue::TooManyLines {
                lines: event.lines.len(),
                max: self.config.max_lines,
            });
        }

        let resolution = resolve_placement(&event.lines, event.placement.as_deref());

        issues.extend(resolution.warnings.iter().filter_map(|warning| match warning {
            CaptionWarning::DomainClamp { line, requested, clamped } => Some(QcIssue::DomainClamp {
                line: *line,
                requested: *requested,
                clamped: *clamped,
            }),
            CaptionWarning::IllegalDropFrame { .. } => None,
        }));

        if self.config.check_line_overflow {
            for placed in &resolution.lines {
                let cells = MidRowTokenizer::cell_count(placed.display_text().trim_end());
                let available = MidRowTokenizer::available_columns(placed.placement.col);
                if cells > available {
                    issues.push(QcIssue::LineOverflow {
                        line: placed.source_index,
                        cells,
                        available,
                    });
                }
            }
        }

        QcEntryResult::from_issues(index, issues)
    }

    /// Check document metadata and event order
    pub fn validate_document(&self, document: &Document, events: &[CaptionEvent]) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();

        if let Some(label) = document.start_timecode_label.as_deref().map(str::trim) {
            if !label.is_empty() {
                match SmpteCodec::for_document(document).parse_checked(label) {
                    Ok(parsed) => {
                        if !parsed.warnings.is_empty() {
                            issues.push(DocumentIssue::IllegalDropFrame {
                                label: label.to_string(),
                            });
                        }
                    }
                    Err(e) => issues.push(DocumentIssue::StartOffsetUnparseable {
                        label: label.to_string(),
                        reason: e.to_string(),
                    }),
                }
            }
        }

        if self.config.check_sort_order {
            issues.extend(
                events
                    .windows(2)
                    .enumerate()
                    .filter(|(_, pair)| pair[1].start < pair[0].start)
                    .map(|(i, _)| DocumentIssue::UnsortedEvents { index: i + 1 }),
            );
        }

        issues
    }

    /// Check a document and every event in it
    pub fn validate_collection(&self, document: &Document, events: &[CaptionEvent]) -> QcReport {
        let entry_results: Vec<QcEntryResult> = events
            .iter()
            .enumerate()
            .map(|(index, event)| self.validate_event(index, event))
            .collect();
        let document_issues = self.validate_document(document, events);

        let entry_issues = entry_results.iter().flat_map(|r| r.issues.iter());
        let warning_count = entry_issues.clone().filter(|issue| issue.is_warning()).count()
            + document_issues.iter().filter(|issue| issue.is_warning()).count();
        let total_issues = entry_issues.count() + document_issues.len();

        let passed = entry_results.iter().all(|r| r.passed)
            && document_issues.iter().all(DocumentIssue::is_warning);

        debug!(
            "Caption QC: {} events, {} issues, {} warnings",
            events.len(),
            total_issues,
            warning_count
        );

        QcReport {
            passed,
            entry_results,
            document_issues,
            total_issues,
            warning_count,
        }
    }
}

impl Default for PlacementValidator {
    fn default() -> Self {
        Self::new()
    }
}

/*!
 * Row/column resolution for caption lines.
 *
 * Explicit placements are clamped into the grid; lines without one get the
 * bottom rows of the title-safe band and a column taken from their leading
 * indentation. Lines are then ordered so the top line has the smaller row.
 */

use log::{debug, warn};
use serde::Serialize;

use crate::caption_processor::Placement;
use crate::errors::CaptionWarning;
use crate::placement::{GRID_ROWS, MAX_COL, MAX_ROW};

/// Where a line's column came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSource {
    /// From the event's placement data
    Explicit,
    /// From the leading spaces of the text
    Inferred,
}

/// A caption line with its resolved grid position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedLine {
    /// Index of the line in the input
    pub source_index: usize,
    /// Text as supplied
    pub text: String,
    /// Clamped placement
    pub placement: Placement,
    pub column_source: ColumnSource,
}

impl PlacedLine {
    /// Text to draw; indentation already expressed by the column is dropped
    pub fn display_text(&self) -> &str {
        match self.column_source {
            ColumnSource::Explicit => &self.text,
            ColumnSource::Inferred => self.text.trim_start_matches(' '),
        }
    }
}

/// Resolved lines plus the clamps performed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlacementResolution {
    pub lines: Vec<PlacedLine>,
    pub warnings: Vec<CaptionWarning>,
}

impl PlacementResolution {
    pub fn placements(&self) -> Vec<Placement> {
        self.lines.iter().map(|line| line.placement).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// Bottom-aligned default rows: `[15]` for one line, `[14, 15]` for two
pub fn default_rows_for(line_count: usize) -> Vec<i32> {
    let count = line_count.min(GRID_ROWS) as i32;
    (MAX_ROW - count + 1..=MAX_ROW).collect()
}

/// Resolve a grid position for every line
pub fn resolve_placement<S: AsRef<str>>(
    lines: &[S],
    explicit: Option<&[Option<Placement>]>,
) -> PlacementResolution {
    let default_rows = default_rows_for(lines.len());
    let mut warnings = Vec::new();

    let mut placed: Vec<PlacedLine> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let text = line.as_ref();
            let requested = explicit.and_then(|placements| placements.get(index).copied().flatten());

            match requested {
                Some(requested) => {
                    let clamped = requested.clamped();
                    if !requested.is_in_domain() {
                        warn!("Placement {} on line {} clamped to {}", requested, index, clamped);
                        warnings.push(CaptionWarning::DomainClamp {
                            line: index,
                            requested,
                            clamped,
                        });
                    }

                    PlacedLine {
                        source_index: index,
                        text: text.to_string(),
                        placement: clamped,
                        column_source: ColumnSource::Explicit,
                    }
                }
                None => {
                    let indent = text.chars().take_while(|&c| c == ' ').count();
                    let row = default_rows.get(index).copied().unwrap_or(MAX_ROW);
                    let requested = Placement::new(row, i32::try_from(indent).unwrap_or(i32::MAX));
                    let clamped = requested.clamped();
                    if !requested.is_in_domain() {
                        warn!("Line {} is indented {} columns, clamping to {}", index, indent, MAX_COL);
                        warnings.push(CaptionWarning::DomainClamp {
                            line: index,
                            requested,
                            clamped,
                        });
                    }

                    PlacedLine {
                        source_index: index,
                        text: text.to_string(),
                        placement: clamped,
                        column_source: ColumnSource::Inferred,
                    }
                }
            }
        })
        .collect();

    // Top line first; stable so equal rows keep their authored order
    if placed.windows(2).any(|pair| pair[1].placement.row < pair[0].placement.row) {
        debug!("Reordering {} lines so rows run top to bottom", placed.len());
        placed.sort_by_key(|line| line.placement.row);
    }

    PlacementResolution {
        lines: placed,
        warnings,
    }
}

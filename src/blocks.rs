/*!
 * Pop-on block reconstruction.
 *
 * Some import pipelines store each row of a pop-on caption as its own event
 * with identical timing. The reconstructor joins such rows back into one block
 * of at most two lines so placement and layout see the caption as it aired.
 */

use std::ops::Range;

use log::debug;
use serde::Serialize;

use crate::caption_processor::{CaptionEvent, Document, Placement};
use crate::errors::BlockError;
use crate::placement::{resolve_placement, PlacementResolution};
use crate::timecode::FrameRate;

/// Visible rows in a pop-on block
pub const MAX_BLOCK_LINES: usize = 2;

/// Small slack added to the tolerance so exact one-frame offsets still match
const TOLERANCE_SLACK: f64 = 1e-9;

/// One line of a reconstructed block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockLine {
    /// Event the line was taken from
    pub event_index: usize,
    pub text: String,
    /// Explicit placement carried by the event, if any
    pub placement: Option<Placement>,
}

/// One or two lines that are on screen together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionBlock {
    /// Event the block was built around
    pub anchor: usize,
    pub start: f64,
    pub end: f64,
    pub lines: Vec<BlockLine>,
}

impl CaptionBlock {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    pub fn explicit_placements(&self) -> Vec<Option<Placement>> {
        self.lines.iter().map(|line| line.placement).collect()
    }

    /// Grid positions for the block's lines
    pub fn resolve_placement(&self) -> PlacementResolution {
        let placements = self.explicit_placements();
        let explicit = placements.iter().any(Option::is_some).then_some(placements.as_slice());
        resolve_placement(&self.texts(), explicit)
    }

    /// Indices of the events that contributed lines
    pub fn event_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.lines.iter().map(|line| line.event_index).collect();
        indices.dedup();
        indices
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Joins events that share timing into caption blocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockReconstructor {
    tolerance: f64,
}

impl BlockReconstructor {
    /// Tolerance of one frame at `fps`; 1/30 s when the rate is unusable
    pub fn new(fps: f64) -> Self {
        Self {
            tolerance: FrameRate::from_fps_or_default(fps).frame_duration(),
        }
    }

    pub fn for_document(document: &Document) -> Self {
        Self {
            tolerance: document.frame_duration(),
        }
    }

    /// Replace the tolerance, in seconds
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if tolerance.is_finite() && tolerance >= 0.0 {
            self.tolerance = tolerance;
        } else {
            debug!("Ignoring unusable block tolerance {}", tolerance);
        }
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Whether two events start and end within the tolerance of each other
    pub fn shares_timing(&self, a: &CaptionEvent, b: &CaptionEvent) -> bool {
        let limit = self.tolerance + TOLERANCE_SLACK;
        (a.start - b.start).abs() <= limit && (a.end - b.end).abs() <= limit
    }

    /// The contiguous run of events around `anchor` that share its timing
    pub fn sibling_range(&self, events: &[CaptionEvent], anchor: usize) -> Result<Range<usize>, BlockError> {
        let target = events.get(anchor).ok_or(BlockError::AnchorOutOfRange {
            anchor,
            len: events.len(),
        })?;

        let mut first = anchor;
        while first > 0 && self.shares_timing(&events[first - 1], target) {
            first -= 1;
        }

        let mut last = anchor + 1;
        while last < events.len() && self.shares_timing(&events[last], target) {
            last += 1;
        }

        Ok(first..last)
    }

    /// Build the block the anchor event belongs to
    pub fn reconstruct(&self, events: &[CaptionEvent], anchor: usize) -> Result<CaptionBlock, BlockError> {
        let target = events.get(anchor).ok_or(BlockError::AnchorOutOfRange {
            anchor,
            len: events.len(),
        })?;

        // An event that already carries two rows is a whole block
        if target.lines.len() >= MAX_BLOCK_LINES {
            let lines = target
                .lines
                .iter()
                .take(MAX_BLOCK_LINES)
                .enumerate()
                .map(|(line, text)| BlockLine {
                    event_index: anchor,
                    text: text.clone(),
                    placement: target.placement_for(line),
                })
                .collect();

            return Ok(CaptionBlock {
                anchor,
                start: target.start,
                end: target.end,
                lines,
            });
        }

        let siblings = self.sibling_range(events, anchor)?;
        if siblings.len() > MAX_BLOCK_LINES {
            debug!(
                "{} events share the timing of event {}, keeping the nearest pair",
                siblings.len(),
                anchor
            );
        }

        let members = if siblings.start < anchor {
            vec![anchor - 1, anchor]
        } else if siblings.end > anchor + 1 {
            vec![anchor, anchor + 1]
        } else {
            vec![anchor]
        };

        let lines = members
            .into_iter()
            .map(|index| {
                let event = &events[index];
                BlockLine {
                    event_index: index,
                    text: event.first_line().unwrap_or_default().to_string(),
                    placement: event.placement_for(0),
                }
            })
            .collect();

        Ok(CaptionBlock {
            anchor,
            start: target.start,
            end: target.end,
            lines,
        })
    }
}

/// Block for `anchor` with a one-frame tolerance at `fps`
pub fn reconstruct_block(events: &[CaptionEvent], anchor: usize, fps: f64) -> Result<CaptionBlock, BlockError> {
    BlockReconstructor::new(fps).reconstruct(events, anchor)
}

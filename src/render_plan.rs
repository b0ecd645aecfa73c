/*!
 * Per-tick render planning.
 *
 * `RenderPlanner::evaluate` is called by the host's own timer or animation
 * loop with the current playback time. It locates the active event, rebuilds
 * its block, resolves grid positions, maps them onto the surface and expands
 * the text into styled cells. Nothing is painted here.
 */

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app_config::PlacementConfig;
use crate::blocks::BlockReconstructor;
use crate::caption_processor::{CaptionEvent, Document};
use crate::cue_locator::CueLocator;
use crate::errors::CaptionWarning;
use crate::mid_row::{DisplayCell, MidRowTokenizer};
use crate::placement::{
    col_to_horizontal_fraction, row_to_vertical_fraction, RowGuide, RowGuideCache, RowGuidePolicy,
    SurfaceSize,
};

/// Knobs for the render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Columns span a centred 4:3 aperture instead of the full width
    pub aspect_constrained: bool,
    /// Block tolerance, in frames
    pub block_tolerance_frames: f64,
    /// Row guides included in every plan
    #[serde(default)]
    pub row_guides: RowGuidePolicy,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            aspect_constrained: true,
            block_tolerance_frames: 1.0,
            row_guides: RowGuidePolicy::default(),
        }
    }
}

/// One positioned line of the active block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderLine {
    pub row: i32,
    pub col: i32,
    pub left_fraction: f64,
    pub cell_width_fraction: f64,
    /// Centre of the row band, as a fraction of the surface height
    pub vertical_fraction: f64,
    /// Pixel position of the first cell's top-left corner
    pub origin_x: f64,
    pub origin_y: f64,
    pub cells: Vec<DisplayCell>,
}

impl RenderLine {
    /// Characters of the line, blanks from style codes included
    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.character).collect()
    }
}

/// What to draw at a given time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub time: f64,
    /// Event located at `time`
    pub event_index: Option<usize>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// Lines top to bottom
    pub lines: Vec<RenderLine>,
    pub warnings: Vec<CaptionWarning>,
    /// Row bands an authoring front end draws as guides, in pixels
    pub row_guides: Vec<RowGuide>,
}

impl RenderPlan {
    /// Plan with nothing on screen
    pub fn empty(time: f64) -> Self {
        Self {
            time,
            event_index: None,
            start: None,
            end: None,
            lines: Vec::new(),
            warnings: Vec::new(),
            row_guides: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Evaluates render plans and owns the row guide cache for the surface
#[derive(Debug, Default)]
pub struct RenderPlanner {
    settings: PlannerSettings,
    cache: RowGuideCache,
}

impl RenderPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self {
            settings,
            cache: RowGuideCache::new(),
        }
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(config.planner_settings())
    }

    pub fn settings(&self) -> PlannerSettings {
        self.settings
    }

    /// Plan for `time`; empty when no event is on screen
    pub fn evaluate(
        &mut self,
        events: &[CaptionEvent],
        document: &Document,
        time: f64,
        surface: SurfaceSize,
    ) -> RenderPlan {
        let PlannerSettings {
            aspect_constrained: constrained,
            block_tolerance_frames,
            row_guides: policy,
        } = self.settings;
        let guides = self.cache.get_or_compute(surface, constrained);
        let row_guides = guides.visible(policy).to_vec();

        let Some(index) = CueLocator::for_document(document).locate_active(events, time) else {
            return RenderPlan {
                row_guides,
                ..RenderPlan::empty(time)
            };
        };

        let tolerance = document.frame_duration() * block_tolerance_frames;
        let reconstructor = BlockReconstructor::for_document(document).with_tolerance(tolerance);
        let block = match reconstructor.reconstruct(events, index) {
            Ok(block) => block,
            Err(e) => {
                warn!("Failed to rebuild caption block at {:.3}s: {}", time, e);
                return RenderPlan {
                    row_guides,
                    ..RenderPlan::empty(time)
                };
            }
        };

        let resolution = block.resolve_placement();
        let width = f64::from(surface.width);

        let lines = resolution
            .lines
            .iter()
            .map(|placed| {
                let placement = placed.placement;
                let span = col_to_horizontal_fraction(placement.col, surface, constrained);

                RenderLine {
                    row: placement.row,
                    col: placement.col,
                    left_fraction: span.left_fraction,
                    cell_width_fraction: span.cell_width_fraction,
                    vertical_fraction: row_to_vertical_fraction(placement.row),
                    origin_x: span.left_fraction * width,
                    origin_y: guides.guide(placement.row).top,
                    cells: MidRowTokenizer::tokenize_line(placed.display_text(), placement.col),
                }
            })
            .collect();

        RenderPlan {
            time,
            event_index: Some(index),
            start: Some(block.start),
            end: Some(block.end),
            lines,
            warnings: resolution.warnings,
            row_guides,
        }
    }

    /// Forget cached row guides for a surface that was resized away from
    pub fn invalidate_surface_cache(&mut self, surface: SurfaceSize) {
        self.cache.invalidate_surface(surface);
    }

    pub fn cache(&self) -> &RowGuideCache {
        &self.cache
    }
}

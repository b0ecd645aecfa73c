/*!
 * Surface geometry for the caption grid.
 *
 * Rows occupy the inner 80% of the surface height in 15 equal bands.
 * Columns are 32 equal divisions of the caption-safe aperture: the inner 80%
 * of the surface width, or of a centred 4:3 region when the caption aperture
 * is constrained to 4:3 inside a wider frame.
 */

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::caption_processor::Placement;
use crate::placement::{GRID_COLUMNS, GRID_ROWS, MAX_COL, MAX_ROW, MIN_COL, MIN_ROW};

/// Share of each surface dimension inside the safe title area
pub const SAFE_AREA_FRACTION: f64 = 0.8;

/// Margin on each side of the safe title area
pub const SAFE_MARGIN_FRACTION: f64 = (1.0 - SAFE_AREA_FRACTION) / 2.0;

/// Width/height of the constrained caption aperture
pub const CAPTION_APERTURE_ASPECT: f64 = 4.0 / 3.0;

/// Size of a rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Horizontal position of a column, as fractions of the full surface width
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalSpan {
    pub left_fraction: f64,
    pub cell_width_fraction: f64,
}

/// Rows shown as guides by an authoring UI; the engine accepts every legal row regardless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RowGuidePolicy {
    /// Rows 12..=15
    #[default]
    Standard,
    /// Rows 1..=15, while placing captions by hand
    PlacementAssist,
}

impl RowGuidePolicy {
    pub fn first_row(self) -> i32 {
        match self {
            RowGuidePolicy::Standard => 12,
            RowGuidePolicy::PlacementAssist => MIN_ROW,
        }
    }
}

fn row_band_fraction() -> f64 {
    SAFE_AREA_FRACTION / GRID_ROWS as f64
}

/// Vertical centre of a row's band, as a fraction of the full surface height
pub fn row_to_vertical_fraction(row: i32) -> f64 {
    let row = row.clamp(MIN_ROW, MAX_ROW);
    SAFE_MARGIN_FRACTION + (f64::from(row - 1) + 0.5) * row_band_fraction()
}

/// Left edge and width of the safe aperture, as fractions of the surface width
fn aperture(surface: SurfaceSize, aspect_constrained: bool) -> (f64, f64) {
    if !aspect_constrained || surface.is_empty() {
        return (SAFE_MARGIN_FRACTION, SAFE_AREA_FRACTION);
    }

    let width = f64::from(surface.width);
    let region_width = (f64::from(surface.height) * CAPTION_APERTURE_ASPECT).min(width);
    let region_left = (width - region_width) / 2.0;

    (
        (region_left + SAFE_MARGIN_FRACTION * region_width) / width,
        SAFE_AREA_FRACTION * region_width / width,
    )
}

/// Left edge and cell width of a column
pub fn col_to_horizontal_fraction(col: i32, surface: SurfaceSize, aspect_constrained: bool) -> HorizontalSpan {
    let col = col.clamp(MIN_COL, MAX_COL);
    let (left, width) = aperture(surface, aspect_constrained);
    let cell_width_fraction = width / GRID_COLUMNS as f64;

    HorizontalSpan {
        left_fraction: left + f64::from(col) * cell_width_fraction,
        cell_width_fraction,
    }
}

/// Pixel rectangle of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel rectangle for the cell at a (clamped) placement
pub fn cell_rect(placement: Placement, surface: SurfaceSize, aspect_constrained: bool) -> CellRect {
    let placement = placement.clamped();
    let span = col_to_horizontal_fraction(placement.col, surface, aspect_constrained);
    let band = row_band_fraction();
    let width = f64::from(surface.width);
    let height = f64::from(surface.height);

    CellRect {
        x: span.left_fraction * width,
        y: (SAFE_MARGIN_FRACTION + f64::from(placement.row - 1) * band) * height,
        width: span.cell_width_fraction * width,
        height: band * height,
    }
}

/// Pixel position of one row band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowGuide {
    pub row: i32,
    pub top: f64,
    pub center: f64,
    pub height: f64,
}

/// Row guide positions for one surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGuides {
    pub surface: SurfaceSize,
    pub aspect_constrained: bool,
    /// Aperture left edge in pixels
    pub aperture_left: f64,
    /// Aperture width in pixels
    pub aperture_width: f64,
    /// One guide per row, row 1 first
    pub rows: Vec<RowGuide>,
}

impl RowGuides {
    pub fn compute(surface: SurfaceSize, aspect_constrained: bool) -> Self {
        let height = f64::from(surface.height);
        let width = f64::from(surface.width);
        let band = row_band_fraction() * height;
        let (left, aperture_width) = aperture(surface, aspect_constrained);

        let rows = (MIN_ROW..=MAX_ROW)
            .map(|row| {
                let top = SAFE_MARGIN_FRACTION * height + f64::from(row - 1) * band;
                RowGuide {
                    row,
                    top,
                    center: top + band / 2.0,
                    height: band,
                }
            })
            .collect();

        Self {
            surface,
            aspect_constrained,
            aperture_left: left * width,
            aperture_width: aperture_width * width,
            rows,
        }
    }

    /// Guide for a row; out-of-domain rows are clamped
    pub fn guide(&self, row: i32) -> &RowGuide {
        &self.rows[(row.clamp(MIN_ROW, MAX_ROW) - MIN_ROW) as usize]
    }

    /// Guides a UI shows under the given policy
    pub fn visible(&self, policy: RowGuidePolicy) -> &[RowGuide] {
        &self.rows[(policy.first_row() - MIN_ROW) as usize..]
    }
}

/// Caller-owned memo of row guides keyed by surface size.
///
/// The caller invalidates it when the surface is resized.
#[derive(Debug, Default)]
pub struct RowGuideCache {
    entries: HashMap<(SurfaceSize, bool), RowGuides>,
    hits: usize,
    misses: usize,
}

impl RowGuideCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guides for a surface, computing them on first use
    pub fn get_or_compute(&mut self, surface: SurfaceSize, aspect_constrained: bool) -> &RowGuides {
        let key = (surface, aspect_constrained);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            debug!(
                "Computing row guides for {}x{} (constrained: {})",
                surface.width, surface.height, aspect_constrained
            );
        }

        self.entries
            .entry(key)
            .or_insert_with(|| RowGuides::compute(surface, aspect_constrained))
    }

    /// Drop every cached surface
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!("Invalidating {} cached row guide sets", self.entries.len());
        }
        self.entries.clear();
    }

    /// Drop the entries for one surface size
    pub fn invalidate_surface(&mut self, surface: SurfaceSize) {
        self.entries.retain(|(cached, _), _| *cached != surface);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

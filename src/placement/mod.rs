/*!
 * Caption placement on the CEA-608 grid.
 *
 * - `grid`: row/column resolution for the lines of a caption block
 * - `geometry`: mapping rows and columns onto a rendering surface
 */

pub mod geometry;
pub mod grid;

pub use self::geometry::{
    cell_rect, col_to_horizontal_fraction, row_to_vertical_fraction, CellRect, HorizontalSpan,
    RowGuide, RowGuideCache, RowGuidePolicy, RowGuides, SurfaceSize,
};
pub use self::grid::{default_rows_for, resolve_placement, ColumnSource, PlacedLine, PlacementResolution};

/// Rows on the caption grid
pub const GRID_ROWS: usize = 15;

/// Columns on the caption grid
pub const GRID_COLUMNS: usize = 32;

pub const MIN_ROW: i32 = 1;
pub const MAX_ROW: i32 = 15;
pub const MIN_COL: i32 = 0;
pub const MAX_COL: i32 = 31;

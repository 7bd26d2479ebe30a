//! Pixel ↔ grid coordinate mapping
//!
//! The rendered map reserves one header cell above and to the left of the
//! grid for variable labels, so grid cell `(0, 0)` starts one cell size away
//! from the origin on both axes. Cells are half-open pixel squares: a point on
//! a shared edge belongs to the cell whose top-left corner it is.

use crate::constants::layout::{DEFAULT_CELL_SIZE, HEADER_CELLS, REFERENCE_VIEWPORT};

use super::group::CellRect;
use super::shape::{CellCoord, GridShape};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where the map sits on the drawing surface and how big its cells are
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapLayout {
    pub origin: Point,
    pub cell_size: f32,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl MapLayout {
    pub fn new(origin: Point, cell_size: f32) -> Self {
        Self { origin, cell_size }
    }

    /// Grid cell containing a pixel position; may be out of range.
    ///
    /// A layout without a positive cell size covers no cells and maps every
    /// point to `(-1, -1)`.
    pub fn global_to_cell(&self, x: f32, y: f32) -> (i64, i64) {
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return (-1, -1);
        }
        let col = ((x - self.origin.x) / self.cell_size - HEADER_CELLS).floor();
        let row = ((y - self.origin.y) / self.cell_size - HEADER_CELLS).floor();
        if !col.is_finite() || !row.is_finite() {
            return (-1, -1);
        }
        (col as i64, row as i64)
    }

    /// Top-left pixel corner of a cell
    pub fn cell_to_global(&self, col: usize, row: usize) -> Point {
        Point::new(
            self.origin.x + (col as f32 + HEADER_CELLS) * self.cell_size,
            self.origin.y + (row as f32 + HEADER_CELLS) * self.cell_size,
        )
    }

    /// Grid cell containing a pixel position, if it lies on the grid
    pub fn cell_at(&self, shape: GridShape, x: f32, y: f32) -> Option<CellCoord> {
        let (col, row) = self.global_to_cell(x, y);
        if col < 0 || row < 0 {
            return None;
        }
        let cell = CellCoord::new(col as usize, row as usize);
        shape.contains(cell).then_some(cell)
    }

    /// Whether a pixel position lies on the grid (headers excluded)
    pub fn contains_point(&self, shape: GridShape, x: f32, y: f32) -> bool {
        self.cell_at(shape, x, y).is_some()
    }

    /// Cell containing a pixel position, clamped onto the grid
    pub fn clamped_cell(&self, shape: GridShape, x: f32, y: f32) -> CellCoord {
        let (col, row) = self.global_to_cell(x, y);
        CellCoord::new(
            col.clamp(0, shape.width() as i64 - 1) as usize,
            row.clamp(0, shape.height() as i64 - 1) as usize,
        )
    }

    /// Pixel extent of the grid plus its header row and column
    pub fn pixel_size(&self, shape: GridShape) -> (f32, f32) {
        (
            (shape.width() as f32 + HEADER_CELLS) * self.cell_size,
            (shape.height() as f32 + HEADER_CELLS) * self.cell_size,
        )
    }

    /// Pixel rectangle covered by a run of cells
    pub fn rect_to_pixels(&self, rect: CellRect) -> PixelRect {
        let top_left = self.cell_to_global(rect.first.col, rect.first.row);
        PixelRect {
            x: top_left.x,
            y: top_left.y,
            width: (rect.last.col - rect.first.col + 1) as f32 * self.cell_size,
            height: (rect.last.row - rect.first.row + 1) as f32 * self.cell_size,
        }
    }

    /// Scale and center the map inside a viewport
    pub fn fit_to_viewport(&mut self, shape: GridShape, width: f32, height: f32) {
        let scale = width.min(height) / REFERENCE_VIEWPORT;
        self.cell_size = scale * DEFAULT_CELL_SIZE;

        let (map_width, map_height) = self.pixel_size(shape);
        self.origin = Point::new((width - map_width) / 2.0, (height - map_height) / 2.0);
    }
}

//! Coverage groups drawn over the grid
//!
//! A group is stored as a start and end corner. Each axis runs forward from
//! the start to the end coordinate and wraps past the last column/row, so a
//! group with `start.col = 3` and `end.col = 0` on a 4-wide grid covers
//! columns 3 and 0. The stored direction is authoritative: no shortest-way
//! normalisation happens anywhere.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

use super::axis;
use super::shape::{CellCoord, GridShape};

/// Inclusive, non-wrapping run of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub first: CellCoord,
    pub last: CellCoord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    start: CellCoord,
    end: CellCoord,
    color: Rgb,
}

impl Group {
    /// Group walking from `start` to `end`, wrapping where `end < start`
    pub fn new(start: CellCoord, end: CellCoord, color: Rgb) -> Self {
        Self { start, end, color }
    }

    /// Bounding rectangle of two selected cells; never wraps
    pub fn from_selection(a: CellCoord, b: CellCoord, color: Rgb) -> Self {
        Self {
            start: CellCoord::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellCoord::new(a.col.max(b.col), a.row.max(b.row)),
            color,
        }
    }

    pub fn start(&self) -> CellCoord {
        self.start
    }

    pub fn end(&self) -> CellCoord {
        self.end
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn corners_fit(&self, shape: GridShape) -> bool {
        shape.contains(self.start) && shape.contains(self.end)
    }

    /// Columns covered, wrap included; corners must be on the grid
    pub fn width(&self, shape: GridShape) -> usize {
        axis::span(self.start.col, self.end.col, shape.width())
    }

    /// Rows covered, wrap included; corners must be on the grid
    pub fn height(&self, shape: GridShape) -> usize {
        axis::span(self.start.row, self.end.row, shape.height())
    }

    pub fn cell_count(&self, shape: GridShape) -> usize {
        self.width(shape) * self.height(shape)
    }

    /// Both corners on the grid and both spans a power of two
    pub fn is_valid(&self, shape: GridShape) -> bool {
        self.corners_fit(shape)
            && self.width(shape).is_power_of_two()
            && self.height(shape).is_power_of_two()
    }

    pub fn contains(&self, shape: GridShape, cell: CellCoord) -> bool {
        self.corners_fit(shape)
            && shape.contains(cell)
            && axis::arc_contains(self.start.col, self.end.col, cell.col, shape.width())
            && axis::arc_contains(self.start.row, self.end.row, cell.row, shape.height())
    }

    /// Whether the two groups share any cell. Overlap is allowed; renderers
    /// use this for stacking only.
    pub fn bounds_overlap(&self, other: &Group, shape: GridShape) -> bool {
        self.corners_fit(shape)
            && other.corners_fit(shape)
            && axis::arcs_intersect(
                (self.start.col, self.end.col),
                (other.start.col, other.end.col),
                shape.width(),
            )
            && axis::arcs_intersect(
                (self.start.row, self.end.row),
                (other.start.row, other.end.row),
                shape.height(),
            )
    }

    /// Non-wrapping rectangles that together cover the group (up to four)
    pub fn segments(&self, shape: GridShape) -> Vec<CellRect> {
        if !self.corners_fit(shape) {
            return Vec::new();
        }
        let cols = axis::unwrap_arc(self.start.col, self.end.col, shape.width());
        let rows = axis::unwrap_arc(self.start.row, self.end.row, shape.height());

        rows.iter()
            .flat_map(|&(top, bottom)| {
                cols.iter().map(move |&(left, right)| CellRect {
                    first: CellCoord::new(left, top),
                    last: CellCoord::new(right, bottom),
                })
            })
            .collect()
    }

    /// Every covered cell
    pub fn cells(&self, shape: GridShape) -> Vec<CellCoord> {
        self.segments(shape)
            .into_iter()
            .flat_map(|rect| {
                (rect.first.row..=rect.last.row).flat_map(move |row| {
                    (rect.first.col..=rect.last.col).map(move |col| CellCoord::new(col, row))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn grid(count: usize) -> GridShape {
        GridShape::new(count).unwrap()
    }

    fn group(start: (usize, usize), end: (usize, usize)) -> Group {
        Group::new(start.into(), end.into(), RED)
    }

    #[test]
    fn test_from_selection_orders_corners() {
        let g = Group::from_selection(CellCoord::new(3, 0), CellCoord::new(1, 2), RED);
        assert_eq!(g.start(), CellCoord::new(1, 0));
        assert_eq!(g.end(), CellCoord::new(3, 2));
        assert_eq!(g.color(), RED);
    }

    #[test]
    fn test_power_of_two_spans() {
        let shape = grid(4);
        assert!(group((0, 0), (1, 3)).is_valid(shape));
        assert!(group((2, 2), (2, 2)).is_valid(shape));
        assert!(group((0, 0), (3, 3)).is_valid(shape));
        assert!(!group((0, 0), (2, 0)).is_valid(shape));
        assert!(!group((0, 0), (1, 2)).is_valid(shape));
    }

    #[test]
    fn test_wrapping_width() {
        let shape = grid(4);
        let three_wide = group((3, 0), (1, 0));
        assert_eq!(three_wide.width(shape), 3);
        assert!(!three_wide.is_valid(shape));

        let two_wide = group((3, 0), (0, 0));
        assert_eq!(two_wide.width(shape), 2);
        assert!(two_wide.is_valid(shape));
        assert!(two_wide.contains(shape, CellCoord::new(3, 0)));
        assert!(two_wide.contains(shape, CellCoord::new(0, 0)));
        assert!(!two_wide.contains(shape, CellCoord::new(1, 0)));
        assert!(!two_wide.contains(shape, CellCoord::new(2, 0)));
    }

    #[test]
    fn test_corner_group_wraps_both_axes() {
        let shape = grid(4);
        let corners = group((3, 3), (0, 0));
        assert!(corners.is_valid(shape));
        assert_eq!(corners.cell_count(shape), 4);
        for cell in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            assert!(corners.contains(shape, cell.into()));
        }
        assert!(!corners.contains(shape, CellCoord::new(1, 0)));
        assert_eq!(corners.segments(shape).len(), 4);
    }

    #[test]
    fn test_out_of_range_corners_are_invalid() {
        let shape = grid(3);
        let g = group((0, 0), (1, 2));
        assert!(!g.is_valid(shape));
        assert!(!g.contains(shape, CellCoord::new(0, 0)));
        assert!(g.segments(shape).is_empty());
    }

    #[test]
    fn test_bounds_overlap() {
        let shape = grid(4);
        let left = group((0, 0), (1, 1));
        let right = group((2, 0), (3, 1));
        let wrap = group((3, 1), (0, 2));
        assert!(!left.bounds_overlap(&right, shape));
        assert!(left.bounds_overlap(&wrap, shape));
        assert!(right.bounds_overlap(&wrap, shape));
        assert!(wrap.bounds_overlap(&wrap, shape));
    }

    #[test]
    fn test_segments_cover_group_cells() {
        let shape = grid(4);
        let g = group((3, 1), (0, 2));
        let rects = g.segments(shape);
        assert_eq!(
            rects,
            vec![
                CellRect { first: CellCoord::new(3, 1), last: CellCoord::new(3, 2) },
                CellRect { first: CellCoord::new(0, 1), last: CellCoord::new(0, 2) },
            ]
        );
        let mut cells = g.cells(shape);
        cells.sort_by_key(|c| (c.row, c.col));
        let expected: Vec<CellCoord> = vec![(0, 1), (3, 1), (0, 2), (3, 2)]
            .into_iter()
            .map(CellCoord::from)
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_recolor_keeps_shape() {
        let mut g = group((0, 0), (1, 0));
        g.set_color(Rgb::new(0, 0, 255));
        assert_eq!(g.color(), Rgb::new(0, 0, 255));
        assert_eq!((g.start(), g.end()), (CellCoord::new(0, 0), CellCoord::new(1, 0)));
    }
}

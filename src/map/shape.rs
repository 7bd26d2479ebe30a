//! Grid dimensions and cell addressing derived from the variable count

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::variables;
use crate::error::{MapError, MapResult};

use super::axis::{gray, gray_inverse};

/// Integer grid position of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub col: usize,
    pub row: usize,
}

impl CellCoord {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((col, row): (usize, usize)) -> Self {
        Self::new(col, row)
    }
}

/// Layout of a map with a given number of variables.
///
/// The first `count / 2` variables run down the rows, the rest across the
/// columns. The first variable is the most significant bit of a minterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    variable_count: usize,
}

impl Default for GridShape {
    fn default() -> Self {
        Self {
            variable_count: variables::DEFAULT_COUNT,
        }
    }
}

impl GridShape {
    pub fn new(variable_count: usize) -> MapResult<Self> {
        if !(variables::MIN_COUNT..=variables::MAX_COUNT).contains(&variable_count) {
            return Err(MapError::InvalidVariableCount {
                count: variable_count,
                min: variables::MIN_COUNT,
                max: variables::MAX_COUNT,
            });
        }
        Ok(Self { variable_count })
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn row_variable_count(&self) -> usize {
        self.variable_count / 2
    }

    pub fn column_variable_count(&self) -> usize {
        self.variable_count - self.row_variable_count()
    }

    pub fn width(&self) -> usize {
        1 << self.column_variable_count()
    }

    pub fn height(&self) -> usize {
        1 << self.row_variable_count()
    }

    /// `(width, height)` in cells
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn cell_count(&self) -> usize {
        1 << self.variable_count
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.col < self.width() && cell.row < self.height()
    }

    pub fn check(&self, cell: CellCoord) -> MapResult<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(MapError::OutOfRange {
                col: cell.col,
                row: cell.row,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Minterm index of the input assignment a cell stands for
    pub fn minterm(&self, cell: CellCoord) -> MapResult<usize> {
        self.check(cell)?;
        Ok((gray(cell.row) << self.column_variable_count()) | gray(cell.col))
    }

    /// Cell holding the given minterm
    pub fn cell_of(&self, minterm: usize) -> Option<CellCoord> {
        if minterm >= self.cell_count() {
            return None;
        }
        let col_mask = self.width() - 1;
        Some(CellCoord::new(
            gray_inverse(minterm & col_mask),
            gray_inverse(minterm >> self.column_variable_count()),
        ))
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |row| (0..width).map(move |col| CellCoord::new(col, row)))
    }
}

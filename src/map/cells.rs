//! Output values of every cell, stored by minterm
//!
//! Storing by minterm rather than by grid position means a value stays
//! attached to its input assignment when the variable count, and therefore
//! the grid layout, changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::MapResult;

use super::shape::{CellCoord, GridShape};

/// Ternary output of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "-")]
    DontCare,
}

impl CellValue {
    /// Next value in the toggle cycle 0 → 1 → don't care → 0
    pub fn next(self) -> Self {
        match self {
            CellValue::Zero => CellValue::One,
            CellValue::One => CellValue::DontCare,
            CellValue::DontCare => CellValue::Zero,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CellValue::Zero => "0",
            CellValue::One => "1",
            CellValue::DontCare => "-",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.symbol())
    }
}

impl std::str::FromStr for CellValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(CellValue::Zero),
            "1" => Ok(CellValue::One),
            "-" | "x" | "X" | "d" => Ok(CellValue::DontCare),
            other => Err(format!("invalid cell value '{other}' (expected 0, 1 or -)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStore {
    shape: GridShape,
    values: Vec<CellValue>,
}

impl CellStore {
    /// All-zero store for a grid
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            values: vec![CellValue::Zero; shape.cell_count()],
        }
    }

    /// Store from values listed by minterm; `None` if the length is wrong
    pub fn from_minterms(shape: GridShape, values: Vec<CellValue>) -> Option<Self> {
        (values.len() == shape.cell_count()).then_some(Self { shape, values })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn get(&self, cell: CellCoord) -> MapResult<CellValue> {
        Ok(self.values[self.shape.minterm(cell)?])
    }

    pub fn set(&mut self, cell: CellCoord, value: CellValue) -> MapResult<()> {
        let minterm = self.shape.minterm(cell)?;
        self.values[minterm] = value;
        Ok(())
    }

    /// Advance a cell through the toggle cycle, returning its new value
    pub fn toggle(&mut self, cell: CellCoord) -> MapResult<CellValue> {
        let minterm = self.shape.minterm(cell)?;
        let value = self.values[minterm].next();
        self.values[minterm] = value;
        Ok(value)
    }

    /// Values listed by minterm index
    pub fn by_minterm(&self) -> &[CellValue] {
        &self.values
    }

    /// Minterms holding `value`, ascending
    pub fn minterms(&self, value: CellValue) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(m, _)| m)
            .collect()
    }

    /// Reshape for a new variable count.
    ///
    /// Variables are added or removed at the end of the variable list, which
    /// is the low end of a minterm. An assignment survives a shrink only when
    /// every removed variable is 0; after a grow, old values sit where the new
    /// variables are 0 and every other cell starts at 0.
    pub fn resize(&mut self, shape: GridShape) {
        let old_count = self.shape.variable_count();
        let new_count = shape.variable_count();
        if old_count == new_count {
            self.shape = shape;
            return;
        }

        let values = (0..shape.cell_count())
            .map(|minterm| {
                if new_count < old_count {
                    self.values[minterm << (old_count - new_count)]
                } else {
                    let added = new_count - old_count;
                    if minterm & ((1 << added) - 1) == 0 {
                        self.values[minterm >> added]
                    } else {
                        CellValue::Zero
                    }
                }
            })
            .collect();

        debug!(from = old_count, to = new_count, "Resized cell store");
        self.shape = shape;
        self.values = values;
    }
}

//! Error type shared by the map model

use thiserror::Error;

use crate::map::CellCoord;

/// Every way a map operation can be rejected.
///
/// None of these are fatal: a failed operation leaves the map exactly as it
/// was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfRange {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },

    #[error("unsupported variable count {count} (supported: {min}..={max})")]
    InvalidVariableCount { count: usize, min: usize, max: usize },

    #[error("expected {expected} non-empty variable names, got {names:?}")]
    InvalidVariableNames { expected: usize, names: Vec<String> },

    #[error("group {start}..{end} spans {width}x{height} cells, which is not a power-of-two rectangle of the grid")]
    InvalidGroupShape {
        start: CellCoord,
        end: CellCoord,
        width: usize,
        height: usize,
    },

    #[error("malformed map data: {0}")]
    MalformedData(String),

    #[error("no group covers cell ({col}, {row})")]
    NotFound { col: usize, row: usize },

    #[error("no group at index {index} (map has {count})")]
    NoSuchGroup { index: usize, count: usize },

    #[error("failed to encode map: {0}")]
    Encode(String),
}

pub type MapResult<T> = std::result::Result<T, MapError>;

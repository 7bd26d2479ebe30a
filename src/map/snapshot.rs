//! Persisted text form of a map
//!
//! Maps are stored as JSON. Cells are listed by minterm so their order does
//! not depend on the gray-code grid layout.

use serde::{Deserialize, Serialize};

use crate::constants::format;
use crate::error::{MapError, MapResult};

use super::cells::{CellStore, CellValue};
use super::group::Group;
use super::shape::GridShape;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MapSnapshot {
    pub format: String,
    pub version: u32,
    pub variable_count: usize,
    pub variables: Vec<String>,
    pub cells: Vec<CellValue>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Fully validated map contents ready to be swapped in
#[derive(Debug)]
pub(crate) struct MapParts {
    pub variables: Vec<String>,
    pub shape: GridShape,
    pub cells: CellStore,
    pub groups: Vec<Group>,
}

impl MapSnapshot {
    pub fn capture(variables: &[String], cells: &CellStore, groups: &[Group]) -> Self {
        Self {
            format: format::TAG.to_string(),
            version: format::VERSION,
            variable_count: cells.shape().variable_count(),
            variables: variables.to_vec(),
            cells: cells.by_minterm().to_vec(),
            groups: groups.to_vec(),
        }
    }

    pub fn encode(&self) -> MapResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MapError::Encode(e.to_string()))
    }

    pub fn decode(text: &str) -> MapResult<Self> {
        serde_json::from_str(text).map_err(|e| MapError::MalformedData(e.to_string()))
    }

    /// Check every structural and range rule, consuming the snapshot
    pub fn into_parts(self) -> MapResult<MapParts> {
        let malformed = |msg: String| MapError::MalformedData(msg);

        if self.format != format::TAG {
            return Err(malformed(format!("unknown format tag '{}'", self.format)));
        }
        if self.version != format::VERSION {
            return Err(malformed(format!("unsupported version {}", self.version)));
        }

        let shape = GridShape::new(self.variable_count).map_err(|e| malformed(e.to_string()))?;

        if self.variables.len() != self.variable_count {
            return Err(malformed(format!(
                "{} variable names for {} variables",
                self.variables.len(),
                self.variable_count
            )));
        }
        if let Some(position) = self.variables.iter().position(|name| name.trim().is_empty()) {
            return Err(malformed(format!("variable {position} has an empty name")));
        }

        let cell_total = self.cells.len();
        let cells = CellStore::from_minterms(shape, self.cells).ok_or_else(|| {
            malformed(format!(
                "{cell_total} cells for {} variables (expected {})",
                self.variable_count,
                shape.cell_count()
            ))
        })?;

        if let Some((index, group)) = self
            .groups
            .iter()
            .enumerate()
            .find(|(_, group)| !group.is_valid(shape))
        {
            return Err(malformed(format!(
                "group {index} ({}..{}) is not a valid group on a {}x{} grid",
                group.start(),
                group.end(),
                shape.width(),
                shape.height()
            )));
        }

        Ok(MapParts {
            variables: self.variables,
            shape,
            cells,
            groups: self.groups,
        })
    }
}

//! Karnaugh map model
//!
//! [`KarnaughMap`] owns the variable configuration, the cell values and the
//! ordered list of groups. Every mutation either completes or leaves the map
//! untouched.

pub mod axis;
pub mod cells;
pub mod group;
pub mod layout;
pub mod shape;
mod snapshot;

pub use cells::{CellStore, CellValue};
pub use group::{CellRect, Group};
pub use layout::{MapLayout, PixelRect, Point};
pub use shape::{CellCoord, GridShape};

use tracing::{debug, info};

use crate::color::Rgb;
use crate::constants::variables;
use crate::error::{MapError, MapResult};
use snapshot::MapSnapshot;

/// Two maps are equal when their variables, cell values and groups (in order)
/// are; `layout` is presentation state and is ignored.
#[derive(Debug, Clone)]
pub struct KarnaughMap {
    variables: Vec<String>,
    shape: GridShape,
    cells: CellStore,
    groups: Vec<Group>,
    /// Pixel placement used by renderers and input mapping
    pub layout: MapLayout,
}

impl Default for KarnaughMap {
    fn default() -> Self {
        let shape = GridShape::default();
        Self {
            variables: default_names(variables::DEFAULT_COUNT),
            shape,
            cells: CellStore::new(shape),
            groups: Vec::new(),
            layout: MapLayout::default(),
        }
    }
}

impl PartialEq for KarnaughMap {
    fn eq(&self, other: &Self) -> bool {
        self.variables == other.variables
            && self.shape == other.shape
            && self.cells == other.cells
            && self.groups == other.groups
    }
}

fn default_names(count: usize) -> Vec<String> {
    variables::DEFAULT_NAMES[..count]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// First `count` names, trimmed; every one must be non-empty
fn validate_names<S: AsRef<str>>(count: usize, names: &[S]) -> MapResult<Vec<String>> {
    let trimmed: Vec<String> = names
        .iter()
        .take(count)
        .map(|name| name.as_ref().trim().to_string())
        .collect();

    if trimmed.len() < count || trimmed.iter().any(String::is_empty) {
        return Err(MapError::InvalidVariableNames {
            expected: count,
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        });
    }
    Ok(trimmed)
}

impl KarnaughMap {
    /// Empty map over the given variables
    pub fn new<S: AsRef<str>>(count: usize, names: &[S]) -> MapResult<Self> {
        let shape = GridShape::new(count)?;
        let variables = validate_names(count, names)?;
        Ok(Self {
            variables,
            shape,
            cells: CellStore::new(shape),
            groups: Vec::new(),
            layout: MapLayout::default(),
        })
    }

    /// Empty map named with the default variable letters
    pub fn with_variable_count(count: usize) -> MapResult<Self> {
        Self::new(count, &variables::DEFAULT_NAMES)
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn variable_count(&self) -> usize {
        self.shape.variable_count()
    }

    /// Variables whose values select the row
    pub fn row_variables(&self) -> &[String] {
        &self.variables[..self.shape.row_variable_count()]
    }

    /// Variables whose values select the column
    pub fn column_variables(&self) -> &[String] {
        &self.variables[self.shape.row_variable_count()..]
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// `(width, height)` in cells
    pub fn grid_size(&self) -> (usize, usize) {
        self.shape.size()
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Gray-code header label of a column
    pub fn column_label(&self, col: usize) -> String {
        axis::gray_label(col, self.shape.column_variable_count())
    }

    /// Gray-code header label of a row
    pub fn row_label(&self, row: usize) -> String {
        axis::gray_label(row, self.shape.row_variable_count())
    }

    /// Switch to a new variable configuration.
    ///
    /// Cell values follow their input assignment (see [`CellStore::resize`]);
    /// groups that are no longer valid on the new grid are dropped.
    pub fn change_variables<S: AsRef<str>>(&mut self, count: usize, names: &[S]) -> MapResult<()> {
        let shape = GridShape::new(count)?;
        let variables = validate_names(count, names)?;

        let before = self.groups.len();
        self.cells.resize(shape);
        self.groups.retain(|group| group.is_valid(shape));
        self.shape = shape;
        self.variables = variables;

        info!(
            count = count,
            variables = ?self.variables,
            dropped_groups = before - self.groups.len(),
            "Changed map variables"
        );
        Ok(())
    }

    pub fn cell_value(&self, col: usize, row: usize) -> MapResult<CellValue> {
        self.cells.get(CellCoord::new(col, row))
    }

    pub fn set_output_at(&mut self, col: usize, row: usize, value: CellValue) -> MapResult<()> {
        self.cells.set(CellCoord::new(col, row), value)?;
        debug!(col = col, row = row, value = %value, "Set cell output");
        Ok(())
    }

    /// Advance a cell through 0 → 1 → don't care → 0
    pub fn toggle_output_at(&mut self, col: usize, row: usize) -> MapResult<CellValue> {
        let value = self.cells.toggle(CellCoord::new(col, row))?;
        debug!(col = col, row = row, value = %value, "Toggled cell output");
        Ok(value)
    }

    /// Group from two selected cells, bounds-checked against the grid
    pub fn group_from_cells(&self, a: CellCoord, b: CellCoord, color: Rgb) -> MapResult<Group> {
        self.shape.check(a)?;
        self.shape.check(b)?;
        Ok(Group::from_selection(a, b, color))
    }

    /// Append a group; it is drawn above every earlier one
    pub fn add_group(&mut self, group: Group) -> MapResult<usize> {
        self.shape.check(group.start())?;
        self.shape.check(group.end())?;
        if !group.is_valid(self.shape) {
            return Err(MapError::InvalidGroupShape {
                start: group.start(),
                end: group.end(),
                width: group.width(self.shape),
                height: group.height(self.shape),
            });
        }

        debug!(start = %group.start(), end = %group.end(), color = %group.color(), "Added group");
        self.groups.push(group);
        Ok(self.groups.len() - 1)
    }

    /// Index of the topmost (last added) group covering a cell
    pub fn group_index_at(&self, col: usize, row: usize) -> Option<usize> {
        let cell = CellCoord::new(col, row);
        self.groups
            .iter()
            .rposition(|group| group.contains(self.shape, cell))
    }

    /// Remove the topmost group covering a cell
    pub fn remove_group_at(&mut self, col: usize, row: usize) -> MapResult<Group> {
        self.shape.check(CellCoord::new(col, row))?;
        let index = self
            .group_index_at(col, row)
            .ok_or(MapError::NotFound { col, row })?;
        let group = self.groups.remove(index);
        debug!(index = index, start = %group.start(), end = %group.end(), "Removed group");
        Ok(group)
    }

    pub fn recolor_group(&mut self, index: usize, color: Rgb) -> MapResult<()> {
        let count = self.groups.len();
        let group = self
            .groups
            .get_mut(index)
            .ok_or(MapError::NoSuchGroup { index, count })?;
        group.set_color(color);
        Ok(())
    }

    pub fn clear_groups(&mut self) {
        info!(count = self.groups.len(), "Cleared groups");
        self.groups.clear();
    }

    /// Complete textual snapshot of variables, cells and groups
    pub fn serialize(&self) -> MapResult<String> {
        MapSnapshot::capture(&self.variables, &self.cells, &self.groups).encode()
    }

    /// Replace variables, cells and groups from a snapshot.
    ///
    /// The text is fully parsed and validated before anything is swapped in;
    /// on error the map is unchanged. Layout is kept.
    pub fn deserialize(&mut self, text: &str) -> MapResult<()> {
        let parts = MapSnapshot::decode(text)?.into_parts()?;

        self.variables = parts.variables;
        self.shape = parts.shape;
        self.cells = parts.cells;
        self.groups = parts.groups;

        info!(
            variables = ?self.variables,
            groups = self.groups.len(),
            "Loaded map from text"
        );
        Ok(())
    }

    /// New map from a snapshot, with default layout
    pub fn from_text(text: &str) -> MapResult<Self> {
        let mut map = Self::default();
        map.deserialize(text)?;
        Ok(map)
    }
}

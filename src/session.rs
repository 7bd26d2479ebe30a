//! Interactive editing session
//!
//! Ties a [`KarnaughMap`] to the drag selection and the group colors, so a
//! front end only has to translate its native input into [`crate::event_handler`]
//! events and draw what the session exposes.

use tracing::{debug, info};

use crate::color::{ColorCycle, Rgb};
use crate::config::EditorConfig;
use crate::error::MapResult;
use crate::map::{Group, KarnaughMap, Point};
use crate::selection::{InputSource, Selection, SelectionRect};

#[derive(Debug, Clone)]
pub struct EditorSession {
    map: KarnaughMap,
    selection: Selection,
    /// Color the next confirmed group gets
    current_color: Rgb,
    palette: ColorCycle,
    selection_color: Rgb,
    use_group_color_for_selection: bool,
    /// Last viewport the layout was fitted to
    viewport: Option<(f32, f32)>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(KarnaughMap::default(), &EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(map: KarnaughMap, config: &EditorConfig) -> Self {
        Self {
            map,
            selection: Selection::new(),
            current_color: config.initial_group_color,
            palette: ColorCycle::new(),
            selection_color: config.selection_color,
            use_group_color_for_selection: config.use_group_color_for_selection,
            viewport: None,
        }
    }

    pub fn map(&self) -> &KarnaughMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut KarnaughMap {
        &mut self.map
    }

    pub fn into_map(self) -> KarnaughMap {
        self.map
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_color(&self) -> Rgb {
        self.current_color
    }

    /// Color a selection in progress is previewed with
    pub fn selection_color(&self) -> Rgb {
        if self.use_group_color_for_selection {
            self.current_color
        } else {
            self.selection_color
        }
    }

    pub fn begin_selection(&mut self, source: InputSource, point: Point) -> bool {
        self.selection.begin(source, point)
    }

    pub fn update_selection(&mut self, source: InputSource, point: Point) -> bool {
        self.selection.update(source, point)
    }

    pub fn release_selection(&mut self, source: InputSource) -> bool {
        self.selection.release(source)
    }

    pub fn cancel_selection(&mut self) {
        if self.selection.rect().is_some() {
            debug!("Selection cancelled");
        }
        self.selection.cancel();
    }

    fn group_for(&self, rect: SelectionRect, color: Rgb) -> MapResult<Group> {
        let shape = self.map.shape();
        let layout = self.map.layout;
        let first = layout.clamped_cell(shape, rect.min.x, rect.min.y);
        let last = layout.clamped_cell(shape, rect.max.x, rect.max.y);
        self.map.group_from_cells(first, last, color)
    }

    /// Group the current selection would produce, for live preview
    pub fn preview_group(&self) -> Option<Group> {
        let rect = self.selection.rect()?;
        self.group_for(rect, self.selection_color()).ok()
    }

    /// Turn the selection into a group with the current color.
    ///
    /// Returns the new group's index, or `None` when nothing was selected. On
    /// success the current color moves on to the next palette entry; on error
    /// the selection is still consumed and the color is kept.
    pub fn confirm_selection(&mut self) -> MapResult<Option<usize>> {
        let Some(rect) = self.selection.confirm() else {
            return Ok(None);
        };

        let group = self.group_for(rect, self.current_color)?;
        let index = self.map.add_group(group)?;
        self.advance_color();
        Ok(Some(index))
    }

    fn advance_color(&mut self) {
        if let Some(next) = self.palette.next() {
            debug!(from = %self.current_color, to = %next, "Advanced group color");
            self.current_color = next;
        }
    }

    /// Use `color` for the next group
    pub fn change_color(&mut self, color: Rgb) {
        self.current_color = color;
    }

    /// Switch the selection preview between its own color and the group color
    pub fn toggle_selection_color(&mut self) -> bool {
        self.use_group_color_for_selection = !self.use_group_color_for_selection;
        self.use_group_color_for_selection
    }

    pub fn reset_groups(&mut self) {
        self.cancel_selection();
        self.map.clear_groups();
    }

    /// Change variables and refit the layout to the last known viewport
    pub fn change_variables<S: AsRef<str>>(&mut self, count: usize, names: &[S]) -> MapResult<()> {
        self.map.change_variables(count, names)?;
        self.selection.cancel();
        if let Some((width, height)) = self.viewport {
            self.map.layout.fit_to_viewport(self.map.shape(), width, height);
        }
        Ok(())
    }

    /// Scale and center the map inside a viewport of the given pixel size
    pub fn fit_to_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Some((width, height));
        let shape = self.map.shape();
        self.map.layout.fit_to_viewport(shape, width, height);
        info!(
            width = width,
            height = height,
            cell_size = self.map.layout.cell_size,
            "Fitted map to viewport"
        );
    }
}

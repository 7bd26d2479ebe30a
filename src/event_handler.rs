//! Input dispatch
//!
//! Front ends translate their native pointer, touch and keyboard events into
//! [`InputEvent`] and feed them to [`handle_event`]. Positions are in the same
//! pixel space as the map's layout.

use tracing::debug;

use crate::error::{MapError, MapResult};
use crate::map::Point;
use crate::selection::InputSource;
use crate::session::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Point, modifiers: Modifiers },
    PointerMove { pos: Point },
    PointerUp { pos: Point },
    DoubleClick { pos: Point },
    TouchStart { id: u64, pos: Point },
    TouchMove { id: u64, pos: Point },
    TouchEnd { id: u64 },
    KeyDown(Key),
}

pub fn handle_event(session: &mut EditorSession, event: InputEvent) -> MapResult<()> {
    let shape = session.map().shape();
    let layout = session.map().layout;

    match event {
        InputEvent::PointerDown { pos, modifiers } => {
            let Some(cell) = layout.cell_at(shape, pos.x, pos.y) else {
                return Ok(());
            };
            if modifiers.ctrl {
                session.map_mut().toggle_output_at(cell.col, cell.row)?;
            } else if modifiers.shift {
                // Shift-click on a cell no group covers is a no-op
                match session.map_mut().remove_group_at(cell.col, cell.row) {
                    Ok(_) | Err(MapError::NotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            } else {
                session.begin_selection(InputSource::Pointer, pos);
            }
        }
        InputEvent::PointerMove { pos } => {
            session.update_selection(InputSource::Pointer, pos);
        }
        InputEvent::PointerUp { pos } => {
            if session.update_selection(InputSource::Pointer, pos) {
                session.release_selection(InputSource::Pointer);
            }
        }
        InputEvent::DoubleClick { pos } => {
            if let Some(cell) = layout.cell_at(shape, pos.x, pos.y) {
                session.map_mut().toggle_output_at(cell.col, cell.row)?;
            }
        }
        InputEvent::TouchStart { id, pos } => {
            if layout.contains_point(shape, pos.x, pos.y) {
                session.begin_selection(InputSource::Touch(id), pos);
            }
        }
        InputEvent::TouchMove { id, pos } => {
            session.update_selection(InputSource::Touch(id), pos);
        }
        InputEvent::TouchEnd { id } => {
            session.release_selection(InputSource::Touch(id));
        }
        InputEvent::KeyDown(Key::Space) => {
            if let Some(index) = session.confirm_selection()? {
                debug!(index = index, "Confirmed selection as group");
            }
        }
        InputEvent::KeyDown(Key::Escape) => {
            session.cancel_selection();
        }
        InputEvent::KeyDown(Key::Other) => (),
    }
    Ok(())
}

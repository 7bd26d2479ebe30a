//! Drag selection state machine
//!
//! Pointer and touch input share one selection. Whichever source begins a
//! selection owns it until it is released, confirmed or cancelled; events from
//! any other source are ignored so a second finger or the mouse cannot corrupt
//! a selection in progress.

use tracing::debug;

use crate::map::Point;

/// Where selection input comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting {
        source: InputSource,
        anchor: Point,
        cursor: Point,
    },
}

/// Pixel rectangle spanned by a selection, normalised so `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub min: Point,
    pub max: Point,
}

impl SelectionRect {
    fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
    /// Rectangle of the last released selection, still confirmable
    released: Option<SelectionRect>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    pub fn active_source(&self) -> Option<InputSource> {
        match self.state {
            SelectionState::Selecting { source, .. } => Some(source),
            SelectionState::Idle => None,
        }
    }

    /// Start selecting at `point`; rejected while another selection is active
    pub fn begin(&mut self, source: InputSource, point: Point) -> bool {
        if self.is_active() {
            debug!(?source, "Selection already active, ignoring begin");
            return false;
        }
        self.state = SelectionState::Selecting {
            source,
            anchor: point,
            cursor: point,
        };
        self.released = None;
        debug!(?source, x = point.x, y = point.y, "Selection started");
        true
    }

    /// Move the free corner; only the owning source may do so
    pub fn update(&mut self, source: InputSource, point: Point) -> bool {
        match &mut self.state {
            SelectionState::Selecting {
                source: owner,
                cursor,
                ..
            } if *owner == source => {
                *cursor = point;
                true
            }
            _ => false,
        }
    }

    /// Stop tracking input; the rectangle stays available to [`Self::confirm`]
    pub fn release(&mut self, source: InputSource) -> bool {
        match self.state {
            SelectionState::Selecting {
                source: owner,
                anchor,
                cursor,
            } if owner == source => {
                self.released = Some(SelectionRect::spanning(anchor, cursor));
                self.state = SelectionState::Idle;
                debug!(?source, "Selection released");
                true
            }
            _ => false,
        }
    }

    /// Current rectangle, active or released
    pub fn rect(&self) -> Option<SelectionRect> {
        match self.state {
            SelectionState::Selecting { anchor, cursor, .. } => {
                Some(SelectionRect::spanning(anchor, cursor))
            }
            SelectionState::Idle => self.released,
        }
    }

    /// End the selection and hand out its rectangle, once
    pub fn confirm(&mut self) -> Option<SelectionRect> {
        let rect = self.rect();
        self.state = SelectionState::Idle;
        self.released = None;
        rect
    }

    /// Drop the selection without producing a rectangle
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
        self.released = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_exclusive() {
        let mut sel = Selection::new();
        assert!(sel.begin(InputSource::Pointer, Point::new(1.0, 1.0)));
        assert!(!sel.begin(InputSource::Pointer, Point::new(5.0, 5.0)));
        assert!(!sel.begin(InputSource::Touch(7), Point::new(5.0, 5.0)));

        assert!(sel.release(InputSource::Pointer));
        assert!(sel.begin(InputSource::Touch(7), Point::new(5.0, 5.0)));
        assert_eq!(sel.active_source(), Some(InputSource::Touch(7)));
    }

    #[test]
    fn test_other_sources_cannot_drive_selection() {
        let mut sel = Selection::new();
        sel.begin(InputSource::Touch(1), Point::new(0.0, 0.0));
        assert!(!sel.update(InputSource::Pointer, Point::new(50.0, 50.0)));
        assert!(!sel.update(InputSource::Touch(2), Point::new(50.0, 50.0)));
        assert!(!sel.release(InputSource::Pointer));
        assert!(sel.update(InputSource::Touch(1), Point::new(10.0, 20.0)));
        assert!(sel.is_active());
        assert_eq!(
            sel.rect(),
            Some(SelectionRect {
                min: Point::new(0.0, 0.0),
                max: Point::new(10.0, 20.0)
            })
        );
    }

    #[test]
    fn test_rect_is_normalised() {
        let mut sel = Selection::new();
        sel.begin(InputSource::Pointer, Point::new(30.0, 5.0));
        sel.update(InputSource::Pointer, Point::new(10.0, 25.0));
        let rect = sel.rect().unwrap();
        assert_eq!(rect.min, Point::new(10.0, 5.0));
        assert_eq!(rect.max, Point::new(30.0, 25.0));
    }

    #[test]
    fn test_released_selection_can_be_confirmed_once() {
        let mut sel = Selection::new();
        sel.begin(InputSource::Pointer, Point::new(0.0, 0.0));
        sel.update(InputSource::Pointer, Point::new(4.0, 4.0));
        sel.release(InputSource::Pointer);
        assert!(!sel.is_active());
        assert!(sel.confirm().is_some());
        assert_eq!(sel.confirm(), None);
    }

    #[test]
    fn test_confirm_ends_active_selection() {
        let mut sel = Selection::new();
        sel.begin(InputSource::Pointer, Point::new(2.0, 3.0));
        let rect = sel.confirm().unwrap();
        assert_eq!(rect.min, rect.max);
        assert_eq!(sel.state(), SelectionState::Idle);
    }

    #[test]
    fn test_cancel() {
        let mut sel = Selection::new();
        sel.begin(InputSource::Pointer, Point::new(2.0, 3.0));
        sel.cancel();
        assert!(!sel.is_active());
        assert_eq!(sel.confirm(), None);
        assert!(!sel.update(InputSource::Pointer, Point::new(1.0, 1.0)));
    }
}

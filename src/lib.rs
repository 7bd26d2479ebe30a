//! Karnaugh map editor core
//!
//! The [`map`] module holds the data model: cell values addressed by gray-code
//! grid position, wrap-aware groups and a lossless text snapshot. Everything
//! else is glue around it: a drag [`selection`], an editing [`session`] driven
//! by [`event_handler`], file [`persistence`], PNG [`export`] and the
//! user [`config`].

#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod event_handler;
pub mod export;
pub mod font;
pub mod map;
pub mod persistence;
pub mod selection;
pub mod session;

pub use color::Rgb;
pub use config::{EditorConfig, ExportSettings, MapStyle};
pub use error::{MapError, MapResult};
pub use event_handler::{handle_event, InputEvent, Key, Modifiers};
pub use map::{CellCoord, CellValue, Group, KarnaughMap, MapLayout, Point};
pub use selection::{InputSource, Selection, SelectionState};
pub use session::EditorSession;

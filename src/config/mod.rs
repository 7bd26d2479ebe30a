//! Configuration management for the editor
//!
//! - **settings**: EditorConfig loaded from the user's config directory (JSON)
//! - **style**: MapStyle shared by on-screen and exported rendering

pub mod settings;
pub mod style;

pub use settings::{EditorConfig, ExportSettings};
pub use style::MapStyle;

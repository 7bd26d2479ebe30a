//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the editor, providing a single source of truth for constant values.

/// Variable configuration limits
pub mod variables {
    /// Smallest supported variable count
    pub const MIN_COUNT: usize = 1;

    /// Largest supported variable count (8x8 grid)
    pub const MAX_COUNT: usize = 6;

    /// Variable count used for a fresh map
    pub const DEFAULT_COUNT: usize = 4;

    /// Names handed out when the caller does not provide any
    pub const DEFAULT_NAMES: [&str; MAX_COUNT] = ["A", "B", "C", "D", "E", "F"];
}

/// Pixel layout of the on-screen map
pub mod layout {
    /// Header cells (variable labels) reserved above and left of the grid
    pub const HEADER_CELLS: f32 = 1.0;

    /// Cell size used before the first viewport fit
    pub const DEFAULT_CELL_SIZE: f32 = 128.0;

    /// Viewport extent the default cell size was designed for
    pub const REFERENCE_VIEWPORT: f32 = 820.0;
}

/// Group color palette
pub mod palette {
    /// First color handed to new groups (#f00)
    pub const INITIAL_GROUP_COLOR: [u8; 3] = [255, 0, 0];

    /// Selection preview color when not using the group color (#fff)
    pub const SELECTION_COLOR: [u8; 3] = [255, 255, 255];

    /// Channel range for generated group colors
    pub const CHANNEL_MIN: u8 = 25;
    pub const CHANNEL_MAX: u8 = 230;

    /// Hue step between consecutive generated colors (golden angle, degrees)
    pub const HUE_STEP: f32 = 137.507_77;
}

/// Image export defaults
pub mod export {
    /// Cell size in pixels for exported images
    pub const CELL_SIZE: u32 = 128;

    /// Empty border around the exported map in pixels
    pub const BORDER_WIDTH: u32 = 10;

    /// Alpha of the translucent fill drawn under group outlines
    pub const GROUP_FILL_ALPHA: u8 = 48;
}

/// Persisted map format
pub mod format {
    /// Tag identifying serialized maps
    pub const TAG: &str = "karnaugh-map";

    /// Current serialization version
    pub const VERSION: u32 = 1;
}

/// Configuration file locations
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "karnaugh-editor";

    /// Config file name
    pub const FILENAME: &str = "config.json";
}

/// Config validation ranges
pub mod validation {
    pub const MIN_EXPORT_CELL_SIZE: u32 = 16;
    pub const MAX_EXPORT_CELL_SIZE: u32 = 1024;
    pub const MAX_EXPORT_BORDER: u32 = 256;
    pub const MIN_TEXT_SCALE: f32 = 0.05;
    pub const MAX_TEXT_SCALE: f32 = 1.0;
    pub const MAX_LINE_WIDTH: f32 = 64.0;
}

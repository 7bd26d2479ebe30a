//! Visual style of a rendered map

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgb;
use crate::constants::validation::{MAX_LINE_WIDTH, MAX_TEXT_SCALE, MIN_TEXT_SCALE};

/// Colors, line widths and text scales used to draw a map.
///
/// Text scales are fractions of the cell size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    #[serde(default = "default_ink")]
    pub grid_color: Rgb,
    #[serde(default = "default_grid_width")]
    pub grid_width: f32,
    #[serde(default = "default_ink")]
    pub label_color: Rgb,
    #[serde(default = "default_label_scale")]
    pub label_scale: f32,
    #[serde(default = "default_ink")]
    pub value_color: Rgb,
    #[serde(default = "default_value_scale")]
    pub value_scale: f32,
    #[serde(default = "default_group_width")]
    pub group_width: f32,
}

fn default_ink() -> Rgb {
    Rgb::BLACK
}

fn default_grid_width() -> f32 {
    2.0
}

fn default_label_scale() -> f32 {
    0.33
}

fn default_value_scale() -> f32 {
    0.5
}

fn default_group_width() -> f32 {
    4.0
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            grid_color: default_ink(),
            grid_width: default_grid_width(),
            label_color: default_ink(),
            label_scale: default_label_scale(),
            value_color: default_ink(),
            value_scale: default_value_scale(),
            group_width: default_group_width(),
        }
    }
}

impl MapStyle {
    /// Light ink for dark on-screen backgrounds
    pub fn screen() -> Self {
        Self {
            grid_color: Rgb::WHITE,
            label_color: Rgb::WHITE,
            value_color: Rgb::WHITE,
            ..Self::default()
        }
    }

    /// Clamp widths and scales into drawable ranges
    pub fn validate_and_clamp(&mut self, section: &str) {
        for (name, value) in [
            ("grid_width", &mut self.grid_width),
            ("group_width", &mut self.group_width),
        ] {
            if !(0.0..=MAX_LINE_WIDTH).contains(&*value) {
                let clamped = value.clamp(0.0, MAX_LINE_WIDTH);
                warn!(section = %section, field = name, value = *value, using = clamped, "line width out of range, clamping");
                *value = clamped;
            }
        }

        for (name, value) in [
            ("label_scale", &mut self.label_scale),
            ("value_scale", &mut self.value_scale),
        ] {
            if !(MIN_TEXT_SCALE..=MAX_TEXT_SCALE).contains(&*value) {
                let clamped = value.clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);
                warn!(section = %section, field = name, value = *value, using = clamped, "text scale out of range, clamping");
                *value = clamped;
            }
        }
    }
}

//! Image export
//!
//! Renders a map at a fixed cell size into a [`Canvas`] and writes it as PNG.
//! Text is optional: without a font the grid, values and groups are still
//! drawn, only labels and cell symbols are skipped.

pub mod canvas;

pub use canvas::Canvas;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{ExportSettings, MapStyle};
use crate::constants::export::GROUP_FILL_ALPHA;
use crate::constants::layout::HEADER_CELLS;
use crate::font::FontRenderer;
use crate::map::{CellValue, KarnaughMap, MapLayout, PixelRect, Point};

/// Pixel size of the exported image, with sizes clamped into their supported
/// ranges
pub fn image_size(map: &KarnaughMap, settings: &ExportSettings) -> (u32, u32) {
    let settings = settings.clamped();
    let (width, height) = map.grid_size();
    let border = 2 * settings.border_width;
    (
        (width as u32 + 1) * settings.cell_size + border,
        (height as u32 + 1) * settings.cell_size + border,
    )
}

fn export_layout(settings: &ExportSettings) -> MapLayout {
    let border = settings.border_width as f32;
    MapLayout::new(Point::new(border, border), settings.cell_size as f32)
}

/// Draw the whole map: groups, grid, header labels and cell values.
///
/// Out-of-range sizes are clamped first, so any settings give a bounded image.
pub fn render_map(map: &KarnaughMap, settings: &ExportSettings, font: Option<&FontRenderer>) -> Canvas {
    let settings = &settings.clamped();
    let (width, height) = image_size(map, settings);
    let mut canvas = Canvas::new(width, height);
    if let Some(background) = settings.background {
        canvas.clear(background.with_alpha(255));
    }

    let layout = export_layout(settings);
    let style = &settings.style;

    draw_group_fills(&mut canvas, map, &layout);
    draw_grid(&mut canvas, map, &layout, style);
    if let Some(font) = font {
        draw_labels(&mut canvas, map, &layout, style, font);
        draw_values(&mut canvas, map, &layout, style, font);
    }
    draw_group_outlines(&mut canvas, map, &layout, style);

    canvas
}

fn draw_group_fills(canvas: &mut Canvas, map: &KarnaughMap, layout: &MapLayout) {
    let shape = map.shape();
    for group in map.groups() {
        let fill = group.color().with_alpha(GROUP_FILL_ALPHA);
        for segment in group.segments(shape) {
            canvas.fill_rect(layout.rect_to_pixels(segment), fill);
        }
    }
}

fn draw_group_outlines(canvas: &mut Canvas, map: &KarnaughMap, layout: &MapLayout, style: &MapStyle) {
    let shape = map.shape();
    // Outlines sit a little inside their cells so neighbouring groups stay apart
    let inset = style.group_width.min(layout.cell_size / 8.0);
    for group in map.groups() {
        let stroke = group.color().with_alpha(255);
        for segment in group.segments(shape) {
            let px = layout.rect_to_pixels(segment);
            let inner = PixelRect {
                x: px.x + inset,
                y: px.y + inset,
                width: px.width - 2.0 * inset,
                height: px.height - 2.0 * inset,
            };
            canvas.stroke_rect(inner, style.group_width, stroke);
        }
    }
}

fn draw_grid(canvas: &mut Canvas, map: &KarnaughMap, layout: &MapLayout, style: &MapStyle) {
    let (cols, rows) = map.grid_size();
    let (map_width, map_height) = layout.pixel_size(map.shape());
    let color = style.grid_color.with_alpha(255);
    let half = style.grid_width / 2.0;
    let origin = layout.origin;

    for col in 0..=cols {
        let x = layout.cell_to_global(col, 0).x;
        canvas.fill_rect(
            PixelRect {
                x: x - half,
                y: origin.y,
                width: style.grid_width,
                height: map_height,
            },
            color,
        );
    }
    for row in 0..=rows {
        let y = layout.cell_to_global(0, row).y;
        canvas.fill_rect(
            PixelRect {
                x: origin.x,
                y: y - half,
                width: map_width,
                height: style.grid_width,
            },
            color,
        );
    }

    // Corner cell is split diagonally between row and column variable names
    let corner = layout.cell_size * HEADER_CELLS;
    canvas.draw_line(
        (origin.x, origin.y),
        (origin.x + corner, origin.y + corner),
        style.grid_width,
        color,
    );
}

fn draw_labels(
    canvas: &mut Canvas,
    map: &KarnaughMap,
    layout: &MapLayout,
    style: &MapStyle,
    font: &FontRenderer,
) {
    let (cols, rows) = map.grid_size();
    let size = layout.cell_size * style.label_scale;
    let cell = layout.cell_size;
    let origin = layout.origin;

    // Column variables in the upper right half of the corner, rows lower left
    let column_names = font.render_text(&map.column_variables().concat(), size);
    canvas.draw_text_centered(&column_names, origin.x + cell * 0.7, origin.y + cell * 0.3, style.label_color);
    let row_names = font.render_text(&map.row_variables().concat(), size);
    canvas.draw_text_centered(&row_names, origin.x + cell * 0.3, origin.y + cell * 0.7, style.label_color);

    for col in 0..cols {
        let corner = layout.cell_to_global(col, 0);
        let text = font.render_text(&map.column_label(col), size);
        canvas.draw_text_centered(&text, corner.x + cell / 2.0, origin.y + cell / 2.0, style.label_color);
    }
    for row in 0..rows {
        let corner = layout.cell_to_global(0, row);
        let text = font.render_text(&map.row_label(row), size);
        canvas.draw_text_centered(&text, origin.x + cell / 2.0, corner.y + cell / 2.0, style.label_color);
    }
}

fn draw_values(
    canvas: &mut Canvas,
    map: &KarnaughMap,
    layout: &MapLayout,
    style: &MapStyle,
    font: &FontRenderer,
) {
    let size = layout.cell_size * style.value_scale;
    let shape = map.shape();
    let symbols = [CellValue::Zero, CellValue::One, CellValue::DontCare]
        .map(|value| (value, font.render_text(value.symbol(), size)));

    for cell in shape.cells() {
        let Ok(value) = map.cells().get(cell) else {
            continue;
        };
        let Some((_, text)) = symbols.iter().find(|(v, _)| *v == value) else {
            continue;
        };
        let corner = layout.cell_to_global(cell.col, cell.row);
        let half = layout.cell_size / 2.0;
        canvas.draw_text_centered(text, corner.x + half, corner.y + half, style.value_color);
    }
}

/// Render `map` and write it to `path` as PNG.
///
/// A missing or unreadable font only disables text.
pub fn export_png(map: &KarnaughMap, settings: &ExportSettings, path: &Path) -> Result<()> {
    let font = match FontRenderer::locate(settings.font_path.as_ref()) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = %e, "No usable font, exporting without text");
            None
        }
    };

    let canvas = render_map(map, settings, font.as_ref());
    let bytes = canvas.encode_png()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write image to {:?}", path))?;

    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        "Exported map image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::map::Group;

    fn settings() -> ExportSettings {
        ExportSettings {
            cell_size: 20,
            border_width: 5,
            background: Some(Rgb::WHITE),
            font_path: None,
            style: MapStyle::default(),
        }
    }

    #[test]
    fn test_image_size_includes_header_and_border() {
        let map = KarnaughMap::with_variable_count(3).unwrap();
        assert_eq!(image_size(&map, &settings()), (5 * 20 + 10, 3 * 20 + 10));

        let defaults = ExportSettings::default();
        let map = KarnaughMap::default();
        assert_eq!(image_size(&map, &defaults), (5 * 128 + 20, 5 * 128 + 20));
    }

    #[test]
    fn test_render_without_font() {
        let mut map = KarnaughMap::with_variable_count(2).unwrap();
        map.add_group(Group::new((0, 0).into(), (0, 0).into(), Rgb::new(0, 0, 255)))
            .unwrap();
        let canvas = render_map(&map, &settings(), None);
        assert_eq!((canvas.width(), canvas.height()), (70, 70));

        // Border stays background
        assert_eq!(canvas.pixel(1, 1), Some([255, 255, 255, 255]));
        // Grid line between header and first column
        assert_eq!(canvas.pixel(25, 50), Some([0, 0, 0, 255]));
        // Inside the grouped cell (0, 0): translucent blue over white
        let inside = canvas.pixel(35, 35).unwrap();
        assert!(inside[2] == 255 && inside[0] < 255);
        // Ungrouped cell (1, 1) stays white
        assert_eq!(canvas.pixel(55, 55), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_oversized_settings_are_clamped() {
        use crate::constants::validation::{MAX_EXPORT_BORDER, MAX_EXPORT_CELL_SIZE};

        let huge = ExportSettings {
            cell_size: u32::MAX,
            border_width: u32::MAX,
            ..settings()
        };
        let map = KarnaughMap::with_variable_count(6).unwrap();
        let side = 9 * MAX_EXPORT_CELL_SIZE + 2 * MAX_EXPORT_BORDER;
        assert_eq!(image_size(&map, &huge), (side, side));

        let tiny = ExportSettings {
            cell_size: 0,
            ..settings()
        };
        let canvas = render_map(&KarnaughMap::with_variable_count(1).unwrap(), &tiny, None);
        assert_eq!((canvas.width(), canvas.height()), (3 * 16 + 10, 2 * 16 + 10));
    }

    #[test]
    fn test_transparent_background() {
        let mut s = settings();
        s.background = None;
        let canvas = render_map(&KarnaughMap::default(), &s, None);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_export_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("map.png");
        let mut s = settings();
        s.font_path = Some(dir.path().join("missing.ttf"));

        export_png(&KarnaughMap::default(), &s, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}

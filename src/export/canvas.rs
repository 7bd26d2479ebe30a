//! Software RGBA canvas
//!
//! Straight (non-premultiplied) 8-bit RGBA, row-major, blended with the usual
//! source-over rule. Drawing outside the canvas is clipped.

use anyhow::{Context, Result};

use crate::color::Rgb;
use crate::font::RenderedText;
use crate::map::PixelRect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Overwrite every pixel
    pub fn clear(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || color[3] == 0 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[idx..idx + 4];

        if color[3] == 255 {
            dst.copy_from_slice(&color);
            return;
        }

        let sa = color[3] as f32 / 255.0;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let blended = (color[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    /// Fill the pixels whose centers fall inside `rect`
    pub fn fill_rect(&mut self, rect: PixelRect, color: [u8; 4]) {
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let x1 = rect.right().round() as i64;
        let y1 = rect.bottom().round() as i64;

        for y in y0.max(0)..y1.min(self.height as i64) {
            for x in x0.max(0)..x1.min(self.width as i64) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Outline drawn inside `rect`, `line_width` pixels thick
    pub fn stroke_rect(&mut self, rect: PixelRect, line_width: f32, color: [u8; 4]) {
        if line_width <= 0.0 {
            return;
        }
        let w = line_width.min(rect.width / 2.0).min(rect.height / 2.0);
        let inner_height = rect.height - 2.0 * w;
        let edges = [
            PixelRect { height: w, ..rect },
            PixelRect {
                y: rect.bottom() - w,
                height: w,
                ..rect
            },
            PixelRect {
                y: rect.y + w,
                width: w,
                height: inner_height,
                ..rect
            },
            PixelRect {
                x: rect.right() - w,
                y: rect.y + w,
                width: w,
                height: inner_height,
            },
        ];
        for edge in edges {
            self.fill_rect(edge, color);
        }
    }

    /// Straight line of square brush stamps
    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), line_width: f32, color: [u8; 4]) {
        if line_width <= 0.0 {
            return;
        }
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        let half = line_width / 2.0;

        let mut covered = std::collections::HashSet::new();
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (cx, cy) = (from.0 + dx * t, from.1 + dy * t);
            let (x0, x1) = ((cx - half).round() as i64, (cx + half).round() as i64);
            let (y0, y1) = ((cy - half).round() as i64, (cy + half).round() as i64);
            for y in y0..y1.max(y0 + 1) {
                for x in x0..x1.max(x0 + 1) {
                    // Stamps overlap; blend each pixel once
                    if covered.insert((x, y)) {
                        self.blend_pixel(x, y, color);
                    }
                }
            }
        }
    }

    /// Blend a rasterized text mask with its top-left corner at `(x, y)`
    pub fn draw_text(&mut self, text: &RenderedText, x: i64, y: i64, color: Rgb) {
        for ty in 0..text.height {
            for tx in 0..text.width {
                let coverage = text.coverage[ty * text.width + tx];
                if coverage > 0 {
                    self.blend_pixel(x + tx as i64, y + ty as i64, color.with_alpha(coverage));
                }
            }
        }
    }

    /// Blend a text mask centered on a point
    pub fn draw_text_centered(&mut self, text: &RenderedText, cx: f32, cy: f32, color: Rgb) {
        let x = (cx - text.width as f32 / 2.0).round() as i64;
        let y = (cy - text.height as f32 / 2.0).round() as i64;
        self.draw_text(text, x, y, color);
    }

    /// Encode as an 8-bit RGBA PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().context("Failed to write PNG header")?;
            writer
                .write_image_data(&self.pixels)
                .context("Failed to write PNG image data")?;
            writer.finish().context("Failed to finish PNG stream")?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn rect(x: f32, y: f32, width: f32, height: f32) -> PixelRect {
        PixelRect { x, y, width, height }
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(rect(2.0, -3.0, 10.0, 5.0), RED);
        assert_eq!(canvas.pixel(2, 0), Some(RED));
        assert_eq!(canvas.pixel(3, 1), Some(RED));
        assert_eq!(canvas.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_blend_over_opaque_and_transparent() {
        let mut canvas = Canvas::new(2, 1);
        canvas.clear([255, 255, 255, 255]);
        canvas.blend_pixel(0, 0, [0, 0, 0, 128]);
        assert_eq!(canvas.pixel(0, 0), Some([127, 127, 127, 255]));

        let mut clear = Canvas::new(1, 1);
        clear.blend_pixel(0, 0, [10, 20, 30, 100]);
        assert_eq!(clear.pixel(0, 0), Some([10, 20, 30, 100]));
    }

    #[test]
    fn test_stroke_rect_leaves_inside_empty() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_rect(rect(0.0, 0.0, 10.0, 10.0), 2.0, RED);
        assert_eq!(canvas.pixel(0, 5), Some(RED));
        assert_eq!(canvas.pixel(9, 9), Some(RED));
        assert_eq!(canvas.pixel(5, 1), Some(RED));
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_line((0.0, 0.0), (10.0, 10.0), 1.0, RED);
        assert_eq!(canvas.pixel(5, 5), Some(RED));
        assert_eq!(canvas.pixel(5, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_text_blends_coverage() {
        let mut canvas = Canvas::new(3, 3);
        let text = RenderedText {
            width: 2,
            height: 1,
            coverage: vec![255, 0],
        };
        canvas.draw_text(&text, 1, 1, Rgb::new(0, 0, 255));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_encode_png_round_trips_size() {
        let mut canvas = Canvas::new(3, 2);
        canvas.clear(RED);
        let bytes = canvas.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        assert_eq!((reader.info().width, reader.info().height), (3, 2));
    }
}

//! TrueType text rasterizing using fontdue (pure Rust)

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fallback locations for systems without a configured font
const SYSTEM_FONT_PATHS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Rasterized text as a coverage mask, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

impl RenderedText {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug)]
pub struct FontRenderer {
    font: Font,
}

impl FontRenderer {
    /// Load a TrueType font from a file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let font_data = fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), e))?;

        debug!(path = %path.display(), "Loaded font");
        Ok(Self { font })
    }

    /// Try to find and load a common system font
    pub fn from_system_font() -> Result<Self> {
        // Compile-time font path (set by packagers via FONT_PATH) wins
        const FONT_PATH: Option<&str> = option_env!("FONT_PATH");
        if let Some(packaged) = FONT_PATH
            && let Ok(renderer) = Self::from_path(Path::new(packaged))
        {
            return Ok(renderer);
        }

        for path in SYSTEM_FONT_PATHS {
            if let Ok(renderer) = Self::from_path(Path::new(path)) {
                return Ok(renderer);
            }
        }

        Err(anyhow::anyhow!(
            "Could not find any system fonts. Tried FONT_PATH ({:?}) and {:?}",
            FONT_PATH,
            SYSTEM_FONT_PATHS
        ))
    }

    /// Configured font if given, otherwise a system font
    pub fn locate(configured: Option<&PathBuf>) -> Result<Self> {
        match configured {
            Some(path) => Self::from_path(path),
            None => Self::from_system_font(),
        }
    }

    /// Rasterize a single line of text at `size` pixels
    pub fn render_text(&self, text: &str, size: f32) -> RenderedText {
        if text.is_empty() || size <= 0.0 {
            return RenderedText::empty();
        }

        let mut glyphs = Vec::new();
        let mut x = 0.0f32;
        let mut max_ascent = 0i32;
        let mut max_descent = 0i32;

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size);
            max_ascent = max_ascent.max(metrics.height as i32 + metrics.ymin);
            max_descent = max_descent.max(-metrics.ymin);
            glyphs.push((x.round() as i32 + metrics.xmin, metrics, bitmap));
            x += metrics.advance_width;
        }

        let width = x.ceil() as usize;
        let height = (max_ascent + max_descent).max(0) as usize;
        if width == 0 || height == 0 {
            return RenderedText::empty();
        }

        let mut coverage = vec![0u8; width * height];
        for (x_offset, metrics, bitmap) in glyphs {
            // Baseline sits max_ascent rows below the top
            let top = max_ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let px = x_offset + gx as i32;
                    let py = top + gy as i32;
                    if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                        continue;
                    }
                    let idx = py as usize * width + px as usize;
                    coverage[idx] = coverage[idx].max(bitmap[gy * metrics.width + gx]);
                }
            }
        }

        RenderedText {
            width,
            height,
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FontRenderer::from_path(&dir.path().join("nope.ttf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read font file"));
    }

    #[test]
    fn test_garbage_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        assert!(FontRenderer::from_path(&path).is_err());
        assert!(FontRenderer::locate(Some(&path)).is_err());
    }

    #[test]
    fn test_render_when_a_system_font_exists() {
        // Hosts without any of the fallback fonts skip the rendering checks
        let Ok(font) = FontRenderer::from_system_font() else {
            return;
        };
        assert!(font.render_text("", 20.0).is_empty());
        let text = font.render_text("01", 20.0);
        assert!(!text.is_empty());
        assert_eq!(text.coverage.len(), text.width * text.height);
        assert!(text.coverage.iter().any(|&c| c > 0));
    }
}

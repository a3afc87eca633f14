//! Software text rendering.
//!
//! A built-in 5×7 block font rasterized straight into an alpha buffer, so
//! words can be turned into targets without a browser or a font file.
//! Glyph rows are stored as 5-bit masks, leftmost column in bit 4.

use crate::renderer::traits::{SurfaceProvider, TextSurface};

const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: usize = 7;

/// Metrics of the block font, in glyph dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockFont {
    /// Horizontal advance per character, glyph width plus gap.
    pub advance: f32,
    /// Cap height as a fraction of the font size.
    pub cap_height: f32,
}

impl Default for BlockFont {
    fn default() -> Self {
        Self {
            advance: 6.0,
            cap_height: 0.7,
        }
    }
}

impl BlockFont {
    /// Side length of one glyph dot at `font_size`.
    pub fn dot(&self, font_size: f32) -> f32 {
        font_size * self.cap_height / GLYPH_ROWS as f32
    }

    pub fn measure(&self, line: &str, font_size: f32) -> f32 {
        let n = line.chars().count();
        if n == 0 {
            return 0.0;
        }
        let gap = self.advance - GLYPH_COLS as f32;
        (n as f32 * self.advance - gap) * self.dot(font_size)
    }
}

/// Row masks for `c`. Lowercase letters use the uppercase shapes; characters
/// without a glyph return `None` and only advance the cursor.
pub fn glyph_rows(c: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match c.to_ascii_uppercase() {
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        _ => return None,
    };
    Some(rows)
}

/// Alpha-only raster that draws with a [`BlockFont`].
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    font: BlockFont,
    font_size: f32,
}

impl SoftwareSurface {
    pub fn new(width: u32, height: u32, font: BlockFont) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
            font,
            font_size: 10.0,
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Ink the pixels whose centers fall inside the box, clipped to the surface.
    fn fill_box(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let (cx0, cx1) = (clip(x0, self.width), clip(x1, self.width));
        let (cy0, cy1) = (clip(y0, self.height), clip(y1, self.height));
        for y in cy0..cy1 {
            let row = y as usize * self.width as usize;
            self.alpha[row + cx0 as usize..row + cx1 as usize].fill(255);
        }
    }
}

impl TextSurface for SoftwareSurface {
    fn set_font_size(&mut self, px: f32) {
        self.font_size = px;
    }

    fn measure_width(&self, line: &str) -> f32 {
        self.font.measure(line, self.font_size)
    }

    fn fill_line_centered(&mut self, line: &str, x: f32, y: f32) {
        let dot = self.font.dot(self.font_size);
        let left = x - self.measure_width(line) / 2.0;
        let top = y - dot * GLYPH_ROWS as f32 / 2.0;

        for (i, c) in line.chars().enumerate() {
            let Some(rows) = glyph_rows(c) else {
                continue;
            };
            let glyph_left = left + i as f32 * self.font.advance * dot;
            for (r, mask) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if mask & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = glyph_left + col as f32 * dot;
                    let y0 = top + r as f32 * dot;
                    self.fill_box(x0, y0, x0 + dot, y0 + dot);
                }
            }
        }
    }

    fn read_alpha(&self) -> Option<Vec<u8>> {
        Some(self.alpha.clone())
    }
}

/// Hands out [`SoftwareSurface`]s. An unavailable provider refuses every
/// request, standing in for a platform without offscreen rendering.
#[derive(Debug, Clone, Default)]
pub struct SoftwareProvider {
    font: BlockFont,
    unavailable: bool,
}

impl SoftwareProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

impl SurfaceProvider for SoftwareProvider {
    type Surface = SoftwareSurface;

    fn create(&mut self, width: u32, height: u32) -> Option<SoftwareSurface> {
        if self.unavailable {
            return None;
        }
        Some(SoftwareSurface::new(width, height, self.font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(surface: &SoftwareSurface) -> usize {
        surface.read_alpha().unwrap().iter().filter(|a| **a > 0).count()
    }

    #[test]
    fn glyph_lookup_basic() {
        assert_eq!(glyph_rows('A').unwrap()[3], 0b11111);
        assert_eq!(glyph_rows('a'), glyph_rows('A'));
        assert_eq!(glyph_rows(' '), Some([0; 7]));
        assert!(glyph_rows('\t').is_none());
        assert!(glyph_rows('é').is_none());
    }

    #[test]
    fn every_letter_and_digit_has_ink() {
        for c in ('A'..='Z').chain('0'..='9') {
            let rows = glyph_rows(c).unwrap();
            assert!(rows.iter().any(|r| *r != 0), "{} is blank", c);
            assert!(rows.iter().all(|r| *r < 32), "{} overflows 5 columns", c);
        }
    }

    #[test]
    fn measure_scales_with_size_and_length() {
        let font = BlockFont::default();
        assert_eq!(font.measure("", 50.0), 0.0);
        // One glyph is 5 dots wide, dot = 0.1 * size
        assert!((font.measure("A", 50.0) - 25.0).abs() < 1e-4);
        // Two glyphs: 6 + 5 dots
        assert!((font.measure("AB", 50.0) - 55.0).abs() < 1e-4);
        assert!((font.measure("AB", 100.0) - 110.0).abs() < 1e-4);
    }

    #[test]
    fn fill_draws_ink_around_center() {
        let mut surface = SoftwareSurface::new(200, 100, BlockFont::default());
        surface.set_font_size(50.0);
        surface.fill_line_centered("I", 100.0, 50.0);
        let alpha = surface.read_alpha().unwrap();
        // Center column of 'I' passes through the middle of the surface
        assert_eq!(alpha[50 * 200 + 100], 255);
        // Corners untouched
        assert_eq!(alpha[0], 0);
        assert_eq!(alpha[99 * 200 + 199], 0);
    }

    #[test]
    fn fill_clips_to_surface() {
        let mut surface = SoftwareSurface::new(40, 20, BlockFont::default());
        surface.set_font_size(120.0);
        surface.fill_line_centered("WWWW", 20.0, 10.0);
        assert_eq!(surface.read_alpha().unwrap().len(), 800);
        assert!(inked(&surface) > 0);
    }

    #[test]
    fn unknown_characters_only_advance() {
        let mut plain = SoftwareSurface::new(300, 100, BlockFont::default());
        plain.set_font_size(40.0);
        plain.fill_line_centered("A~A", 150.0, 50.0);

        let mut spaced = SoftwareSurface::new(300, 100, BlockFont::default());
        spaced.set_font_size(40.0);
        spaced.fill_line_centered("A A", 150.0, 50.0);

        assert_eq!(plain.read_alpha(), spaced.read_alpha());
    }

    #[test]
    fn unavailable_provider_refuses() {
        let mut provider = SoftwareProvider::unavailable();
        assert!(provider.create(10, 10).is_none());
        let mut provider = SoftwareProvider::new();
        assert!(provider.create(10, 10).is_some());
    }
}

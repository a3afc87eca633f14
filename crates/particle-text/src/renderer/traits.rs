//! Drawing surface contracts.
//!
//! The core never talks to a windowing system. Hosts implement these traits
//! over whatever they draw with (the browser 2D canvas in `particle-text-web`,
//! the software surfaces in this crate for headless use and tests).

use glam::Vec2;

use crate::api::types::Rgb;

/// The visible surface particles are painted onto each frame.
pub trait Canvas {
    /// Paint `color` at `alpha` over the whole surface.
    /// Used instead of a clear, so moving particles leave fading trails.
    fn fade(&mut self, color: Rgb, alpha: f32);

    /// Axis-aligned square/rectangle with its top-left corner at `pos`.
    fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: Rgb);

    /// Filled circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
}

/// Offscreen raster a word is rendered into before sampling its ink pixels.
///
/// Text is always drawn horizontally centered on `x` and vertically
/// middle-aligned on `y`.
pub trait TextSurface {
    fn set_font_size(&mut self, px: f32);

    /// Advance width of `line` at the current font size.
    fn measure_width(&self, line: &str) -> f32;

    fn fill_line_centered(&mut self, line: &str, x: f32, y: f32);

    /// One alpha byte per pixel, row-major. `None` when readback fails.
    fn read_alpha(&self) -> Option<Vec<u8>>;
}

/// Creates offscreen surfaces. Returning `None` means the platform could not
/// provide one; callers treat that as "nothing to draw", never as an error.
pub trait SurfaceProvider {
    type Surface: TextSurface;

    fn create(&mut self, width: u32, height: u32) -> Option<Self::Surface>;
}

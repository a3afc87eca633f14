use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGB color with float channels in 0..=255.
///
/// Channels stay fractional while blending so a color captured mid-blend
/// can seed the next blend without rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation from `a` to `b`.
    pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        Rgb {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
        }
    }

    /// Channels rounded to the nearest integer, as painted.
    pub fn rounded(&self) -> [u8; 3] {
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// A sampled ink pixel of a rasterized word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub x: u32,
    pub y: u32,
}

impl Target {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Integer pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Distance from the center at which particles spawn and disperse.
    pub fn dispersal_radius(&self) -> f32 {
        (self.width + self.height) as f32 / 2.0
    }

    /// Closed bounds check: points on the edge are still inside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width as f32 && p.y >= 0.0 && p.y <= self.height as f32
    }
}

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::traits::Canvas;
use crate::api::types::Rgb;

/// One painted particle, packed for hosts that upload the whole frame at once.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Top-left corner for squares, center for circles.
    pub x: f32,
    pub y: f32,
    /// Edge length for squares, diameter for circles.
    pub size: f32,
    /// 0.0 = square, 1.0 = circle.
    pub round: f32,
    /// Color channels 0..=255, already rounded.
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn painted(x: f32, y: f32, size: f32, round: bool, color: Rgb) -> Self {
        let [r, g, b] = color.rounded();
        Self {
            x,
            y,
            size,
            round: if round { 1.0 } else { 0.0 },
            r: r as f32,
            g: g as f32,
            b: b as f32,
            alpha: 1.0,
        }
    }
}

/// Headless canvas recording the particles drawn in the current frame.
///
/// A `fade` marks the start of a frame and drops the previous frame's
/// instances; the fade itself is kept so hosts can replay it.
pub struct RenderBuffer {
    pub instances: Vec<ParticleInstance>,
    /// Trail fill of the current frame.
    pub fade: Option<(Rgb, f32)>,
    /// Frames started so far.
    pub frames: u64,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            fade: None,
            frames: 0,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Flat float view of the instances.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RenderBuffer {
    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.instances.clear();
        self.fade = Some((color, alpha));
        self.frames += 1;
    }

    fn fill_rect(&mut self, pos: Vec2, width: f32, _height: f32, color: Rgb) {
        self.instances
            .push(ParticleInstance::painted(pos.x, pos.y, width, false, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.instances
            .push(ParticleInstance::painted(center.x, center.y, radius * 2.0, true, color));
    }
}

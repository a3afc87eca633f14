use serde::{Deserialize, Serialize};

use super::types::{CanvasSize, Rgb};

/// Tuning for the whole effect. Every field has a default, so a JSON
/// config only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Words or phrases to cycle through. `\n` forces a line break.
    pub words: Vec<String>,
    /// Fixed RNG seed. Hosts pick a fresh one when absent.
    pub seed: Option<u64>,
    /// Sample every n-th pixel of the rasterized word (row-major).
    pub pixel_step: usize,
    /// Distance under which a particle slows down proportionally.
    pub close_enough_radius: f32,
    /// Per-particle top speed, drawn once at spawn from [lo, hi).
    pub max_speed_range: [f32; 2],
    /// `max_force = max_speed * force_ratio`.
    pub force_ratio: f32,
    /// Per-particle diameter, drawn once at spawn from [lo, hi).
    pub size_range: [f32; 2],
    /// Per-particle color blend increment per frame, from [lo, hi).
    pub blend_rate_range: [f32; 2],
    /// Draw fixed-size squares instead of circles.
    pub draw_as_points: bool,
    /// Edge length of a square in points mode.
    pub point_size: f32,
    /// Color of the translucent fill painted over the canvas every frame.
    pub trail_color: Rgb,
    /// Alpha of the trail fill; lower values leave longer trails.
    pub trail_alpha: f32,
    /// Each word picks one of these at random.
    pub palette: Vec<Rgb>,
    /// Box the raw dispersal direction is sampled from.
    pub dispersal_box: [f32; 2],
    /// Frames between word changes when more than one word is configured.
    pub word_interval_frames: u64,
    pub settle: SettleConfig,
    pub layout: CanvasLayout,
    pub font: FontFit,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            words: Self::default_words(),
            seed: None,
            pixel_step: 8,
            close_enough_radius: 100.0,
            max_speed_range: [2.0, 5.0],
            force_ratio: 0.04,
            size_range: [4.0, 8.0],
            blend_rate_range: [0.005, 0.025],
            draw_as_points: true,
            point_size: 2.0,
            trail_color: Rgb::new(3.0, 3.0, 3.0),
            trail_alpha: 0.16,
            palette: vec![
                Rgb::new(99.0, 102.0, 241.0),
                Rgb::new(244.0, 63.0, 94.0),
                Rgb::new(34.0, 211.0, 238.0),
                Rgb::new(245.0, 245.0, 247.0),
            ],
            dispersal_box: [1000.0, 500.0],
            word_interval_frames: 240,
            settle: SettleConfig::default(),
            layout: CanvasLayout::default(),
            font: FontFit::default(),
        }
    }
}

impl EffectConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn default_words() -> Vec<String> {
        vec!["WELCOME\nTO MY PORTFOLIO".to_string()]
    }

    /// Replace the word list; an empty list keeps the default phrase.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        self.words = if words.is_empty() { Self::default_words() } else { words };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// When the text counts as visually resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleConfig {
    /// A settled particle is closer than this to its target...
    pub distance: f32,
    /// ...and slower than this.
    pub speed: f32,
    /// Frames of a word's display that never count toward settling.
    pub warmup_frames: u64,
    /// Consecutive settled frames needed before completion fires.
    pub stable_frames: u32,
    /// Fraction of the pool that must be settled on a stable frame.
    pub ratio: f32,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            distance: 2.5,
            speed: 0.35,
            warmup_frames: 90,
            stable_frames: 30,
            ratio: 0.9,
        }
    }
}

/// Canvas size as a function of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
    pub width_fraction: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub height_fraction: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width_fraction: 0.86,
            min_width: 320.0,
            max_width: 1000.0,
            height_fraction: 0.32,
            min_height: 220.0,
            max_height: 420.0,
        }
    }
}

impl CanvasLayout {
    /// Clamp the viewport fractions and floor to whole pixels.
    pub fn fit(&self, viewport_width: f32, viewport_height: f32) -> CanvasSize {
        let width = (viewport_width * self.width_fraction)
            .max(self.min_width)
            .min(self.max_width);
        let height = (viewport_height * self.height_fraction)
            .max(self.min_height)
            .min(self.max_height);
        CanvasSize::new(width.floor() as u32, height.floor() as u32)
    }
}

/// Font sizing used when rasterizing a word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFit {
    /// Starting size is `canvas_width / divisor`...
    pub divisor: f32,
    /// ...clamped to [min_start, max_start].
    pub min_start: f32,
    pub max_start: f32,
    /// Shrinking never goes below this.
    pub floor: f32,
    pub step: f32,
    /// Widest line must fit in this fraction of the canvas width.
    pub max_width_fraction: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for FontFit {
    fn default() -> Self {
        Self {
            divisor: 6.0,
            min_start: 42.0,
            max_start: 120.0,
            floor: 32.0,
            step: 4.0,
            max_width_fraction: 0.85,
            line_height: 1.1,
        }
    }
}

impl FontFit {
    pub fn start_size(&self, canvas_width: u32) -> f32 {
        (canvas_width as f32 / self.divisor)
            .max(self.min_start)
            .min(self.max_start)
    }

    /// One shrink step, never below the floor. A non-positive step still
    /// shrinks by the default 4px so fitting always terminates.
    pub fn shrink(&self, size: f32) -> f32 {
        let step = if self.step > 0.0 { self.step } else { 4.0 };
        (size - step).max(self.floor)
    }
}

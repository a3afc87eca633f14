//! Word → target pixels.
//!
//! The word is drawn into an offscreen surface the size of the canvas, and
//! every `pixel_step`-th pixel (row-major, wrapping across rows) that carries
//! any ink becomes a particle target.

use crate::api::config::{EffectConfig, FontFit};
use crate::api::types::{CanvasSize, Target};
use crate::core::rng::Rng;
use crate::renderer::traits::{SurfaceProvider, TextSurface};

/// Font size and vertical placement chosen for a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub font_size: f32,
    pub line_height: f32,
    /// Middle of the first line.
    pub first_line_y: f32,
}

/// Pick the largest font size (in `step`s from the start size) whose widest
/// line fits the canvas, then center the block of lines vertically.
/// Leaves `surface` set to the chosen size.
pub fn fit_text<S: TextSurface>(surface: &mut S, lines: &[&str], size: CanvasSize, font: &FontFit) -> TextLayout {
    let max_width = size.width as f32 * font.max_width_fraction;
    let widest = |s: &S| lines.iter().map(|l| s.measure_width(l)).fold(0.0_f32, f32::max);

    let mut font_size = font.start_size(size.width);
    surface.set_font_size(font_size);
    while widest(&*surface) > max_width && font_size > font.floor {
        let next = font.shrink(font_size);
        if next >= font_size {
            break;
        }
        font_size = next;
        surface.set_font_size(font_size);
    }

    let line_height = font_size * font.line_height;
    let total_height = line_height * lines.len() as f32;
    TextLayout {
        font_size,
        line_height,
        first_line_y: size.height as f32 / 2.0 - total_height / 2.0 + line_height / 2.0,
    }
}

/// Ink pixels of `alpha`, sampled every `step` pixels, in scan order.
pub fn sample_alpha(alpha: &[u8], width: u32, step: usize) -> Vec<Target> {
    if width == 0 {
        return Vec::new();
    }
    alpha
        .iter()
        .enumerate()
        .step_by(step.max(1))
        .filter(|(_, a)| **a > 0)
        .map(|(i, _)| Target {
            x: (i % width as usize) as u32,
            y: (i / width as usize) as u32,
        })
        .collect()
}

/// Render `word` and return its sampled targets, shuffled.
///
/// Returns an empty list when no offscreen surface is available or the
/// word has no ink; callers treat both as "no targets".
pub fn rasterize<P: SurfaceProvider>(
    word: &str,
    size: CanvasSize,
    config: &EffectConfig,
    provider: &mut P,
    rng: &mut Rng,
) -> Vec<Target> {
    let mut targets = sample_word(word, size, config, provider);
    rng.shuffle(&mut targets);
    targets
}

/// [`rasterize`] without the shuffle: targets in scan order.
pub fn sample_word<P: SurfaceProvider>(
    word: &str,
    size: CanvasSize,
    config: &EffectConfig,
    provider: &mut P,
) -> Vec<Target> {
    if size.width == 0 || size.height == 0 {
        return Vec::new();
    }
    let Some(mut surface) = provider.create(size.width, size.height) else {
        log::warn!("no offscreen surface for {}x{}, skipping word", size.width, size.height);
        return Vec::new();
    };

    let lines: Vec<&str> = word.split('\n').collect();
    let layout = fit_text(&mut surface, &lines, size, &config.font);
    let center_x = size.width as f32 / 2.0;
    for (i, line) in lines.iter().enumerate() {
        surface.fill_line_centered(line, center_x, layout.first_line_y + i as f32 * layout.line_height);
    }

    match surface.read_alpha() {
        Some(alpha) => sample_alpha(&alpha, size.width, config.pixel_step),
        None => {
            log::warn!("offscreen readback failed, skipping word");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::text::SoftwareProvider;

    #[test]
    fn sample_alpha_wraps_rows() {
        // 5 wide, 3 tall, everything inked
        let alpha = vec![255u8; 15];
        let targets = sample_alpha(&alpha, 5, 4);
        let coords: Vec<(u32, u32)> = targets.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(coords, vec![(0, 0), (4, 0), (3, 1), (2, 2)]);
    }

    #[test]
    fn sample_alpha_skips_transparent() {
        let alpha = [0u8, 0, 9, 0, 0, 0, 0, 0];
        assert_eq!(sample_alpha(&alpha, 4, 1), vec![Target { x: 2, y: 0 }]);
        assert!(sample_alpha(&alpha, 4, 2).iter().all(|t| t.x == 2));
        assert!(sample_alpha(&alpha, 4, 4).is_empty());
    }

    #[test]
    fn same_word_same_count() {
        let config = EffectConfig::default();
        let size = CanvasSize::new(400, 300);
        let mut provider = SoftwareProvider::new();
        let a = sample_word("AB", size, &config, &mut provider);
        let b = sample_word("AB", size, &config, &mut provider);
        assert!(!a.is_empty());
        assert_eq!(a, b);

        let mut rng = Rng::new(1);
        assert_eq!(rasterize("AB", size, &config, &mut provider, &mut rng).len(), a.len());
        assert_eq!(rasterize("AB", size, &config, &mut provider, &mut rng).len(), a.len());
    }

    #[test]
    fn shuffle_keeps_the_same_targets() {
        let config = EffectConfig::default();
        let size = CanvasSize::new(400, 300);
        let mut provider = SoftwareProvider::new();
        let mut rng = Rng::new(9);
        let mut scan = sample_word("HELLO", size, &config, &mut provider);
        let mut shuffled = rasterize("HELLO", size, &config, &mut provider, &mut rng);
        assert_ne!(scan, shuffled);
        scan.sort_by_key(|t| (t.y, t.x));
        shuffled.sort_by_key(|t| (t.y, t.x));
        assert_eq!(scan, shuffled);
    }

    #[test]
    fn targets_stay_on_canvas() {
        let config = EffectConfig::default();
        let size = CanvasSize::new(320, 220);
        let mut provider = SoftwareProvider::new();
        for t in sample_word("WELCOME\nTO MY PORTFOLIO", size, &config, &mut provider) {
            assert!(t.x < size.width && t.y < size.height);
        }
    }

    #[test]
    fn font_never_shrinks_below_floor() {
        let config = EffectConfig::default();
        let size = CanvasSize::new(320, 220);
        let mut provider = SoftwareProvider::new();
        let mut surface = provider.create(size.width, size.height).unwrap();
        let lines = ["AN EXTREMELY LONG LINE THAT CANNOT POSSIBLY FIT"];
        let layout = fit_text(&mut surface, &lines, size, &config.font);
        assert_eq!(layout.font_size, 32.0);
    }

    #[test]
    fn zero_font_step_still_reaches_the_floor() {
        let config = EffectConfig::from_json(r#"{"font":{"step":0}}"#).unwrap();
        let size = CanvasSize::new(320, 220);
        let mut provider = SoftwareProvider::new();
        let targets = sample_word("AN EXTREMELY LONG LINE THAT CANNOT FIT", size, &config, &mut provider);
        assert!(!targets.is_empty());

        let mut surface = provider.create(size.width, size.height).unwrap();
        let lines = ["AN EXTREMELY LONG LINE THAT CANNOT FIT"];
        let negative = FontFit { step: -3.0, ..config.font };
        assert_eq!(fit_text(&mut surface, &lines, size, &negative).font_size, 32.0);
    }

    #[test]
    fn font_shrinks_until_it_fits() {
        let config = EffectConfig::default();
        // Starts at 400 / 6 ≈ 66.7, where PORTFOLIO is wider than 340
        let size = CanvasSize::new(400, 300);
        let mut provider = SoftwareProvider::new();
        let mut surface = provider.create(size.width, size.height).unwrap();
        let lines = ["PORTFOLIO"];
        let layout = fit_text(&mut surface, &lines, size, &config.font);
        assert!(layout.font_size < config.font.start_size(400));
        assert!(surface.measure_width("PORTFOLIO") <= 340.0);
        // One step larger would not have fit
        surface.set_font_size(layout.font_size + 4.0);
        assert!(surface.measure_width("PORTFOLIO") > 340.0);
    }

    #[test]
    fn lines_are_centered_vertically() {
        let config = EffectConfig::default();
        let size = CanvasSize::new(600, 300);
        let mut provider = SoftwareProvider::new();
        let mut surface = provider.create(size.width, size.height).unwrap();
        let layout = fit_text(&mut surface, &["A", "B"], size, &config.font);
        let last_line_y = layout.first_line_y + layout.line_height;
        assert!(((layout.first_line_y + last_line_y) / 2.0 - 150.0).abs() < 1e-3);
    }

    #[test]
    fn missing_surface_yields_no_targets() {
        let config = EffectConfig::default();
        let mut provider = SoftwareProvider::unavailable();
        let mut rng = Rng::new(1);
        assert!(rasterize("AB", CanvasSize::new(400, 300), &config, &mut provider, &mut rng).is_empty());
    }

    #[test]
    fn blank_word_yields_no_targets() {
        let config = EffectConfig::default();
        let mut provider = SoftwareProvider::new();
        assert!(sample_word("", CanvasSize::new(400, 300), &config, &mut provider).is_empty());
        assert!(sample_word("   \n ", CanvasSize::new(400, 300), &config, &mut provider).is_empty());
    }
}

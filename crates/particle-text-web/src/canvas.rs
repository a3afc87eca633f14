//! Browser 2D canvas implementations of the core drawing traits.

use glam::Vec2;
use particle_text::{Canvas, Rgb, SurfaceProvider, TextSurface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Font stack used for target rasterization.
pub const FONT_FAMILY: &str = r#""Space Grotesk", "IBM Plex Sans", sans-serif"#;
/// Glyph weight used for target rasterization.
pub const FONT_WEIGHT: u32 = 800;

pub fn css_rgb(color: Rgb) -> String {
    let [r, g, b] = color.rounded();
    format!("rgb({}, {}, {})", r, g, b)
}

pub fn css_rgba(color: Rgb, alpha: f32) -> String {
    let [r, g, b] = color.rounded();
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

pub fn css_font(px: f32, family: &str) -> String {
    format!("{} {}px {}", FONT_WEIGHT, px, family)
}

/// 2D context of a canvas element, or `None` when the browser refuses one.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// The visible canvas.
pub struct Canvas2d {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    pub fn new(element: HtmlCanvasElement) -> Option<Self> {
        let ctx = context_2d(&element)?;
        Some(Self { element, ctx })
    }
}

impl Canvas for Canvas2d {
    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&css_rgba(color, alpha));
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.element.width() as f64,
            self.element.height() as f64,
        );
    }

    fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: Rgb) {
        self.ctx.set_fill_style_str(&css_rgb(color));
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.ctx.set_fill_style_str(&css_rgb(color));
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}

/// Detached canvas a word is drawn into before sampling.
pub struct DomTextSurface {
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl TextSurface for DomTextSurface {
    fn set_font_size(&mut self, px: f32) {
        self.ctx.set_font(&css_font(px, FONT_FAMILY));
    }

    fn measure_width(&self, line: &str) -> f32 {
        self.ctx
            .measure_text(line)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn fill_line_centered(&mut self, line: &str, x: f32, y: f32) {
        if let Err(err) = self.ctx.fill_text(line, x as f64, y as f64) {
            log::warn!("fillText failed: {:?}", err);
        }
    }

    fn read_alpha(&self) -> Option<Vec<u8>> {
        let image = self
            .ctx
            .get_image_data(0.0, 0.0, self.width as f64, self.height as f64)
            .ok()?;
        Some(image.data().0.chunks_exact(4).map(|px| px[3]).collect())
    }
}

/// Creates [`DomTextSurface`]s from a document.
pub struct DomSurfaceProvider {
    document: Document,
}

impl DomSurfaceProvider {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl SurfaceProvider for DomSurfaceProvider {
    type Surface = DomTextSurface;

    fn create(&mut self, width: u32, height: u32) -> Option<DomTextSurface> {
        let element = self
            .document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        element.set_width(width);
        element.set_height(height);
        let ctx = context_2d(&element)?;

        ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        Some(DomTextSurface {
            ctx,
            width,
            height,
        })
    }
}

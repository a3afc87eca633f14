use particle_text::{Canvas, CanvasSize, EffectConfig, FrameReport, ParticleTextEffect};
use web_sys::{Document, HtmlCanvasElement};

use crate::canvas::{Canvas2d, DomSurfaceProvider};

/// Wires a [`ParticleTextEffect`] to a canvas element.
///
/// Frame scheduling lives in the exported handle; this type only knows how
/// to step the effect and keep the element sized to match it.
pub struct EffectRunner {
    effect: ParticleTextEffect<DomSurfaceProvider>,
    element: HtmlCanvasElement,
    /// `None` when the element has no 2D context; every tick is then a no-op.
    canvas: Option<Canvas2d>,
}

impl EffectRunner {
    pub fn new(config: EffectConfig, document: Document, element: HtmlCanvasElement) -> Self {
        let canvas = Canvas2d::new(element.clone());
        if canvas.is_none() {
            log::warn!("canvas has no 2d context; particle text disabled");
        }
        Self {
            effect: ParticleTextEffect::new(config, DomSurfaceProvider::new(document)),
            element,
            canvas,
        }
    }

    pub fn effect(&self) -> &ParticleTextEffect<DomSurfaceProvider> {
        &self.effect
    }

    pub fn set_on_complete<F: FnMut() + 'static>(&mut self, callback: F) {
        self.effect.set_on_complete(callback);
    }

    pub fn mount(&mut self, viewport_width: f32, viewport_height: f32) {
        let size = self.effect.mount(viewport_width, viewport_height);
        self.apply_size(size);
    }

    pub fn tick(&mut self) -> FrameReport {
        let canvas = self.canvas.as_mut().map(|c| c as &mut dyn Canvas);
        self.effect.tick(canvas)
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if let Some(size) = self.effect.resize(viewport_width, viewport_height) {
            self.apply_size(size);
        }
    }

    pub fn teardown(&mut self) {
        self.effect.teardown();
    }

    fn apply_size(&self, size: CanvasSize) {
        if self.element.width() != size.width {
            self.element.set_width(size.width);
        }
        if self.element.height() != size.height {
            self.element.set_height(size.height);
        }
    }
}

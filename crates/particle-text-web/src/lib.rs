//! WASM bridge for `particle-text`.
//!
//! ```ignore
//! const fx = new ParticleText(containerEl, ["WELCOME\nTO MY PORTFOLIO"], () => dismiss(), null);
//! // later, when the overlay unmounts
//! fx.destroy();
//! ```

pub mod canvas;
pub mod runner;

pub use canvas::{Canvas2d, DomSurfaceProvider, DomTextSurface};
pub use runner::EffectRunner;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use particle_text::EffectConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, Window};

/// Route `log` output to the browser console and panics to `console.error`.
/// Safe to call more than once.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn viewport(window: &Window) -> (f32, f32) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width as f32, height as f32)
}

/// Words from a JS array; non-string entries are skipped.
fn words_from_array(words: &Array) -> Vec<String> {
    words.iter().filter_map(|w| w.as_string()).collect()
}

/// State shared between the handle and the frame/resize callbacks.
/// Callbacks hold it weakly, so dropping the handle frees everything.
struct Shared {
    window: Window,
    container: HtmlElement,
    element: HtmlCanvasElement,
    runner: RefCell<EffectRunner>,
    /// Cleared by `destroy`; every callback checks it before touching anything.
    alive: Cell<bool>,
    pending_frame: Cell<Option<i32>>,
    /// Set by the effect mid-tick, forwarded to JS once the runner is released.
    completed: Rc<Cell<bool>>,
    on_complete: Option<Function>,
    frame_cb: RefCell<Option<Closure<dyn FnMut()>>>,
    resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Shared {
    fn schedule(&self) {
        if !self.alive.get() {
            return;
        }
        let frame_cb = self.frame_cb.borrow();
        let Some(cb) = frame_cb.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.pending_frame.set(Some(id)),
            Err(err) => log::warn!("requestAnimationFrame failed: {:?}", err),
        }
    }

    fn on_frame(&self) {
        self.pending_frame.set(None);
        if !self.alive.get() {
            return;
        }
        if let Ok(mut runner) = self.runner.try_borrow_mut() {
            runner.tick();
        }
        if self.completed.replace(false) {
            if let Some(callback) = &self.on_complete {
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    log::warn!("onComplete threw: {:?}", err);
                }
            }
        }
        // The completion callback may have destroyed us.
        self.schedule();
    }

    fn on_resize(&self) {
        if !self.alive.get() {
            return;
        }
        let (width, height) = viewport(&self.window);
        if let Ok(mut runner) = self.runner.try_borrow_mut() {
            runner.resize(width, height);
        }
    }

    fn destroy(&self) {
        if !self.alive.replace(false) {
            return;
        }
        if let Some(id) = self.pending_frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        if let Some(cb) = self.resize_cb.borrow().as_ref() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
        }
        if let Ok(mut runner) = self.runner.try_borrow_mut() {
            runner.teardown();
        }
        let _ = self.container.remove_child(&self.element);
        log::info!("particle text destroyed");
    }
}

/// A running particle text effect mounted inside a host element.
#[wasm_bindgen]
pub struct ParticleText {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl ParticleText {
    /// Mount a canvas in `container` and start animating.
    ///
    /// `words` overrides the configured words when non-empty. `on_complete`
    /// is called once, with no arguments, when the text has settled.
    /// `config_json` is an optional partial `EffectConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        words: Array,
        on_complete: Option<Function>,
        config_json: Option<String>,
    ) -> Result<ParticleText, JsValue> {
        init_logging();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut config = match config_json.as_deref() {
            Some(json) => EffectConfig::from_json(json)
                .map_err(|err| JsValue::from_str(&format!("invalid config: {}", err)))?,
            None => EffectConfig::default(),
        };
        let words = words_from_array(&words);
        if !words.is_empty() {
            config = config.with_words(words);
        }
        if config.seed.is_none() {
            config.seed = Some((js_sys::Math::random() * (1u64 << 53) as f64) as u64);
        }

        let element = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        container.append_child(&element)?;

        let completed = Rc::new(Cell::new(false));
        let mut runner = EffectRunner::new(config, document, element.clone());
        let flag = completed.clone();
        runner.set_on_complete(move || flag.set(true));

        let (width, height) = viewport(&window);
        runner.mount(width, height);

        let shared = Rc::new(Shared {
            window,
            container,
            element,
            runner: RefCell::new(runner),
            alive: Cell::new(true),
            pending_frame: Cell::new(None),
            completed,
            on_complete,
            frame_cb: RefCell::new(None),
            resize_cb: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        *shared.frame_cb.borrow_mut() = Some(Closure::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame();
            }
        }));

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_resize();
            }
        });
        shared
            .window
            .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())?;
        *shared.resize_cb.borrow_mut() = Some(resize_cb);

        // First frame runs synchronously, like the loop's own ticks.
        shared.on_frame();
        Ok(ParticleText { shared })
    }

    /// Stop animating, detach listeners and remove the canvas.
    /// Frames already queued by the browser become no-ops.
    pub fn destroy(&self) {
        self.shared.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn completed(&self) -> bool {
        self.shared
            .runner
            .try_borrow()
            .map(|r| r.effect().is_completed())
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.shared
            .runner
            .try_borrow()
            .map(|r| r.effect().pool().len() as u32)
            .unwrap_or(0)
    }
}

impl Drop for ParticleText {
    fn drop(&mut self) {
        self.shared.destroy();
    }
}

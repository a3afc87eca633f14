//! The frame driver: owns the pool and steps it once per host tick.

use crate::api::config::EffectConfig;
use crate::api::types::{CanvasSize, Rgb};
use crate::core::rng::Rng;
use crate::core::settle::SettleTracker;
use crate::renderer::traits::{Canvas, SurfaceProvider};
use crate::systems::pool::{ParticlePool, WordTransition};
use crate::systems::raster::rasterize;

/// Seed used when the config does not pin one.
pub const DEFAULT_SEED: u64 = 42;

/// Word color when the palette is empty.
const FALLBACK_COLOR: Rgb = Rgb::new(245.0, 245.0, 247.0);

/// Lifecycle of a [`ParticleTextEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not mounted yet.
    Idle,
    /// Mounted and animating.
    Running,
    /// Completion has fired; still animating and rotating words.
    Completed,
    /// Torn down. Every later call is a no-op.
    Stopped,
}

impl Phase {
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Running | Phase::Completed)
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Pool size after removals.
    pub particles: usize,
    pub settled: usize,
    pub removed: usize,
    /// Completion fired on this tick.
    pub completed_now: bool,
    /// The next word was applied at the end of this tick.
    pub word_changed: bool,
}

/// Particles steering onto the glyphs of a rotating list of words.
///
/// The host calls [`mount`](Self::mount) once, then [`tick`](Self::tick) once
/// per display refresh, [`resize`](Self::resize) on viewport changes and
/// [`teardown`](Self::teardown) when the canvas goes away.
pub struct ParticleTextEffect<P: SurfaceProvider> {
    config: EffectConfig,
    provider: P,
    rng: Rng,
    pool: ParticlePool,
    size: CanvasSize,
    phase: Phase,
    frame: u64,
    word_index: usize,
    settle: SettleTracker,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl<P: SurfaceProvider> ParticleTextEffect<P> {
    pub fn new(mut config: EffectConfig, provider: P) -> Self {
        if config.words.is_empty() {
            config.words = EffectConfig::default_words();
        }
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self {
            settle: SettleTracker::new(config.settle),
            config,
            provider,
            rng: Rng::new(seed),
            pool: ParticlePool::new(),
            size: CanvasSize::default(),
            phase: Phase::Idle,
            frame: 0,
            word_index: 0,
            on_complete: None,
        }
    }

    /// Replace the word list before mounting. An empty list keeps the default phrase.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_words(words);
        self
    }

    /// Called once, with no arguments, when the text has settled.
    pub fn set_on_complete<F: FnMut() + 'static>(&mut self, callback: F) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.size
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn current_word(&self) -> &str {
        &self.config.words[self.word_index]
    }

    pub fn is_completed(&self) -> bool {
        self.settle.has_fired()
    }

    pub fn settle(&self) -> &SettleTracker {
        &self.settle
    }

    /// Size the canvas for the viewport and show the first word.
    /// Returns the canvas size the host should apply.
    pub fn mount(&mut self, viewport_width: f32, viewport_height: f32) -> CanvasSize {
        if self.phase != Phase::Idle {
            log::warn!("mount called in phase {:?}, ignoring", self.phase);
            return self.size;
        }
        self.size = self.config.layout.fit(viewport_width, viewport_height);
        self.phase = Phase::Running;
        self.frame = 0;
        self.word_index = 0;
        let transition = self.apply_current_word();
        log::info!(
            "particle text mounted at {}x{} with {} particles",
            self.size.width,
            self.size.height,
            transition.allocated
        );
        self.size
    }

    /// Run one frame. A missing canvas or a non-live effect makes this a
    /// no-op: nothing moves and the frame counter does not advance.
    pub fn tick(&mut self, canvas: Option<&mut dyn Canvas>) -> FrameReport {
        if !self.phase.is_live() {
            return FrameReport::default();
        }
        let Some(canvas) = canvas else {
            log::debug!("no canvas this frame, skipping");
            return FrameReport::default();
        };

        canvas.fade(self.config.trail_color, self.config.trail_alpha);
        let stats = self.pool.step(canvas, self.size, &self.config);
        let mut report = FrameReport {
            particles: self.pool.len(),
            settled: stats.settled,
            removed: stats.removed,
            ..FrameReport::default()
        };

        if self.settle.observe(stats.settled, self.pool.len()) {
            report.completed_now = true;
            self.phase = Phase::Completed;
            log::info!("particle text settled at frame {}", self.frame);
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }

        self.frame += 1;
        let words = self.config.words.len();
        let interval = self.config.word_interval_frames;
        if words > 1 && interval > 0 && self.frame % interval == 0 {
            self.word_index = (self.word_index + 1) % words;
            self.apply_current_word();
            self.settle.restart_word();
            report.word_changed = true;
        }

        report
    }

    /// Refit the canvas to a new viewport. Returns the new size only when the
    /// integer pixel size actually changed; the current word is re-applied then.
    /// The same word stays on screen, so settle tracking carries on.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) -> Option<CanvasSize> {
        if !self.phase.is_live() {
            return None;
        }
        let size = self.config.layout.fit(viewport_width, viewport_height);
        if size == self.size {
            return None;
        }
        log::debug!(
            "canvas resized {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            size.width,
            size.height
        );
        self.size = size;
        self.apply_current_word();
        Some(size)
    }

    /// Stop for good: later ticks and resizes do nothing.
    pub fn teardown(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopped;
        self.pool.clear();
        self.on_complete = None;
        log::info!("particle text torn down after {} frames", self.frame);
    }

    fn apply_current_word(&mut self) -> WordTransition {
        let word = &self.config.words[self.word_index];
        let targets = rasterize(word, self.size, &self.config, &mut self.provider, &mut self.rng);
        let color = self
            .rng
            .pick(&self.config.palette)
            .copied()
            .unwrap_or(FALLBACK_COLOR);
        let transition = self
            .pool
            .apply_word(&targets, color, self.size, &self.config, &mut self.rng);
        log::debug!(
            "word {} -> {} targets ({} reused, {} new, {} killed)",
            self.word_index,
            targets.len(),
            transition.reused,
            transition.allocated,
            transition.killed
        );
        transition
    }
}

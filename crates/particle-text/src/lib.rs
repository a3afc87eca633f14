//! Headless particle text effect.
//!
//! Words are rasterized offscreen, their ink pixels become targets, and a
//! pool of particles steers onto them frame by frame. Hosts supply the
//! drawing surfaces (see [`renderer::traits`]) and call
//! [`ParticleTextEffect::tick`] once per display refresh.

pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::{EffectConfig, SettleConfig, CanvasLayout, FontFit};
pub use api::types::{Rgb, Target, CanvasSize};
pub use crate::core::effect::{ParticleTextEffect, Phase, FrameReport, DEFAULT_SEED};
pub use crate::core::rng::Rng;
pub use crate::core::settle::SettleTracker;
pub use renderer::traits::{Canvas, TextSurface, SurfaceProvider};
pub use renderer::instance::{ParticleInstance, RenderBuffer};
pub use systems::geometry::random_point;
pub use systems::particle::Particle;
pub use systems::pool::{ParticlePool, WordTransition, StepStats};
pub use systems::raster::{rasterize, sample_word, TextLayout};
pub use systems::text::{BlockFont, SoftwareProvider, SoftwareSurface};

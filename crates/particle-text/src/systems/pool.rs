//! Particle pool: reuse across words, spawn on demand, retire off-canvas.

use crate::api::config::EffectConfig;
use crate::api::types::{CanvasSize, Rgb, Target};
use crate::core::rng::Rng;
use crate::renderer::traits::Canvas;

use super::geometry::random_point;
use super::particle::Particle;

/// What a word transition did to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordTransition {
    pub reused: usize,
    pub allocated: usize,
    /// Particles newly sent off to disperse (already-killed ones are not counted).
    pub killed: usize,
}

/// Per-frame counts from [`ParticlePool::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStats {
    pub settled: usize,
    pub removed: usize,
}

/// Contiguous store of every live or dispersing particle.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn killed_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_killed).count()
    }

    /// Insert a prepared particle (hosts and tests seeding a pool).
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Point the pool at a new word.
    ///
    /// Targets are consumed in order: existing particles first (killed ones
    /// are revived), then freshly spawned ones entering from the dispersal
    /// circle. Particles left over once the targets run out are killed.
    pub fn apply_word(
        &mut self,
        targets: &[Target],
        color: Rgb,
        bounds: CanvasSize,
        config: &EffectConfig,
        rng: &mut Rng,
    ) -> WordTransition {
        let center = bounds.center();
        let radius = bounds.dispersal_radius();
        let reused = targets.len().min(self.particles.len());
        let mut transition = WordTransition {
            reused,
            ..WordTransition::default()
        };

        for (particle, target) in self.particles.iter_mut().zip(targets) {
            particle.retarget(target.as_vec2(), color);
        }

        for target in &targets[reused..] {
            let spawn_at = random_point(center, radius, config.dispersal_box, rng);
            let mut particle = Particle::spawn(spawn_at, config, rng);
            particle.retarget(target.as_vec2(), color);
            self.particles.push(particle);
            transition.allocated += 1;
        }

        for particle in &mut self.particles[targets.len()..] {
            if particle.is_killed {
                continue;
            }
            particle.kill(random_point(center, radius, config.dispersal_box, rng));
            transition.killed += 1;
        }

        transition
    }

    /// Move and draw every particle, count the settled ones and drop killed
    /// particles that have left `bounds`.
    pub fn step(&mut self, canvas: &mut dyn Canvas, bounds: CanvasSize, config: &EffectConfig) -> StepStats {
        let mut stats = StepStats::default();
        // Back to front: swap_remove only pulls in already-visited particles.
        for i in (0..self.particles.len()).rev() {
            let particle = &mut self.particles[i];
            particle.step();
            particle.draw(canvas, config.draw_as_points, config.point_size);

            if particle.is_settled(&config.settle) {
                stats.settled += 1;
            }

            if particle.is_killed && !bounds.contains(particle.position) {
                self.particles.swap_remove(i);
                stats.removed += 1;
            }
        }
        stats
    }
}

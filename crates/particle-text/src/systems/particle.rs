//! A single steerable particle.

use glam::Vec2;

use crate::api::config::{EffectConfig, SettleConfig};
use crate::api::types::Rgb;
use crate::core::rng::Rng;
use crate::renderer::traits::Canvas;

/// Steering and color-blend state of one particle.
///
/// Owned by a [`ParticlePool`](super::pool::ParticlePool); speed, force, size
/// and blend rate are drawn once at spawn and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Per-frame force accumulator, zeroed after every integration.
    pub acceleration: Vec2,
    pub target: Vec2,
    pub close_enough_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    /// Circle diameter when not drawing as points.
    pub size: f32,
    /// Retiring: flying to a dispersal point, removed once off-canvas.
    pub is_killed: bool,
    pub start_color: Rgb,
    pub target_color: Rgb,
    /// Blend progress from `start_color` to `target_color`, 0..=1.
    pub color_weight: f32,
    pub color_blend_rate: f32,
}

impl Particle {
    pub const DEFAULT_CLOSE_ENOUGH_RADIUS: f32 = 100.0;

    /// A particle at rest with fixed tuning and black colors.
    pub fn new(position: Vec2, max_speed: f32, max_force: f32) -> Self {
        Particle {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            target: position,
            close_enough_radius: Self::DEFAULT_CLOSE_ENOUGH_RADIUS,
            max_speed,
            max_force,
            size: 6.0,
            is_killed: false,
            start_color: Rgb::BLACK,
            target_color: Rgb::BLACK,
            color_weight: 0.0,
            color_blend_rate: 0.01,
        }
    }

    /// A fresh particle with tuning drawn from the configured ranges.
    pub fn spawn(position: Vec2, config: &EffectConfig, rng: &mut Rng) -> Self {
        let max_speed = rng.range(config.max_speed_range[0], config.max_speed_range[1]);
        let mut p = Particle::new(position, max_speed, max_speed * config.force_ratio);
        p.close_enough_radius = config.close_enough_radius;
        p.size = rng.range(config.size_range[0], config.size_range[1]);
        p.color_blend_rate = rng.range(config.blend_rate_range[0], config.blend_rate_range[1]);
        p
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Velocity the particle wants: toward the target at `max_speed`,
    /// scaled down linearly inside `close_enough_radius`.
    pub fn desired_velocity(&self) -> Vec2 {
        let to_target = self.target - self.position;
        let distance = to_target.length();
        let mut proximity = 1.0;
        if distance < self.close_enough_radius {
            proximity = distance / self.close_enough_radius;
        }
        to_target.normalize_or_zero() * self.max_speed * proximity
    }

    /// Steering force toward the desired velocity. Always exactly
    /// `max_force` long unless the particle already moves as desired.
    pub fn steering(&self) -> Vec2 {
        (self.desired_velocity() - self.velocity).normalize_or_zero() * self.max_force
    }

    /// One physics step. Runs for killed particles too.
    pub fn step(&mut self) {
        self.acceleration += self.steering();
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
    }

    /// Color currently shown.
    pub fn current_color(&self) -> Rgb {
        Rgb::lerp(self.start_color, self.target_color, self.color_weight)
    }

    /// Advance the blend by one frame's worth, capped at 1.
    pub fn advance_color(&mut self) {
        if self.color_weight < 1.0 {
            self.color_weight = (self.color_weight + self.color_blend_rate).min(1.0);
        }
    }

    /// Start blending toward `color` from whatever is on screen right now.
    fn blend_to(&mut self, color: Rgb) {
        self.start_color = self.current_color();
        self.target_color = color;
        self.color_weight = 0.0;
    }

    /// Assign a glyph target. Revives a killed particle.
    pub fn retarget(&mut self, target: Vec2, color: Rgb) {
        self.is_killed = false;
        self.blend_to(color);
        self.target = target;
    }

    /// Send the particle to `dispersal` and fade it to black.
    /// Killing an already-killed particle changes nothing.
    pub fn kill(&mut self, dispersal: Vec2) {
        if self.is_killed {
            return;
        }
        self.target = dispersal;
        self.blend_to(Rgb::BLACK);
        self.is_killed = true;
    }

    pub fn is_settled(&self, settle: &SettleConfig) -> bool {
        self.distance_to_target() < settle.distance && self.speed() < settle.speed
    }

    /// Advance the color blend and paint the particle.
    pub fn draw(&mut self, canvas: &mut dyn Canvas, as_points: bool, point_size: f32) {
        self.advance_color();
        let color = Rgb::lerp(self.start_color, self.target_color, self.color_weight);
        if as_points {
            canvas.fill_rect(self.position, point_size, point_size, color);
        } else {
            canvas.fill_circle(self.position, self.size / 2.0, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::instance::RenderBuffer;

    fn at_rest(pos: Vec2, target: Vec2) -> Particle {
        let mut p = Particle::new(pos, 4.0, 0.16);
        p.target = target;
        p
    }

    #[test]
    fn spawn_draws_tuning_from_ranges() {
        let config = EffectConfig::default();
        let mut rng = Rng::new(42);
        for _ in 0..100 {
            let p = Particle::spawn(Vec2::ZERO, &config, &mut rng);
            assert!(p.max_speed >= 2.0 && p.max_speed <= 5.0);
            assert!((p.max_force - p.max_speed * 0.04).abs() < 1e-6);
            assert!(p.size >= 4.0 && p.size <= 8.0);
            assert!(p.color_blend_rate >= 0.005 && p.color_blend_rate <= 0.025);
            assert!(!p.is_killed);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn arrival_damping_scales_desired_speed() {
        let far = at_rest(Vec2::ZERO, Vec2::new(500.0, 0.0));
        let full = far.desired_velocity().length();
        assert!((full - 4.0).abs() < 1e-5);

        for d in [10.0_f32, 37.5, 50.0, 99.0] {
            let near = at_rest(Vec2::ZERO, Vec2::new(0.0, d));
            let ratio = near.desired_velocity().length() / full;
            assert!((ratio - d / 100.0).abs() < 1e-5, "d={} ratio={}", d, ratio);
        }
    }

    #[test]
    fn steering_is_rescaled_to_max_force() {
        let mut p = at_rest(Vec2::ZERO, Vec2::new(500.0, 0.0));
        p.velocity = Vec2::new(0.0, 3.0);
        assert!((p.steering().length() - 0.16).abs() < 1e-6);

        // Tiny mismatch is scaled up, not clamped down
        let mut q = at_rest(Vec2::ZERO, Vec2::new(500.0, 0.0));
        q.velocity = Vec2::new(3.99, 0.0);
        assert!((q.steering().length() - 0.16).abs() < 1e-6);
    }

    #[test]
    fn zero_vectors_do_not_produce_nan() {
        let mut p = at_rest(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(p.desired_velocity(), Vec2::ZERO);
        assert_eq!(p.steering(), Vec2::ZERO);
        p.step();
        assert_eq!(p.position, Vec2::new(5.0, 5.0));
        assert!(p.position.is_finite());
    }

    #[test]
    fn step_integrates_and_resets_acceleration() {
        let mut p = at_rest(Vec2::ZERO, Vec2::new(500.0, 0.0));
        p.step();
        assert!((p.velocity.x - 0.16).abs() < 1e-6);
        assert!((p.position.x - 0.16).abs() < 1e-6);
        assert_eq!(p.acceleration, Vec2::ZERO);
        p.step();
        assert!((p.velocity.x - 0.32).abs() < 1e-6);
        assert!((p.position.x - 0.48).abs() < 1e-6);
    }

    #[test]
    fn converges_on_target() {
        let mut p = at_rest(Vec2::ZERO, Vec2::new(120.0, 80.0));
        for _ in 0..2000 {
            p.step();
        }
        assert!(p.is_settled(&SettleConfig::default()), "ended at {:?}", p.position);
    }

    #[test]
    fn retarget_keeps_color_continuous() {
        let mut p = at_rest(Vec2::ZERO, Vec2::ZERO);
        p.start_color = Rgb::new(0.0, 0.0, 0.0);
        p.target_color = Rgb::new(200.0, 100.0, 50.0);
        p.color_weight = 0.25;
        let shown = p.current_color();

        p.retarget(Vec2::new(10.0, 10.0), Rgb::new(0.0, 255.0, 0.0));
        assert_eq!(p.start_color, shown);
        assert_eq!(p.current_color(), shown);
        assert_eq!(p.color_weight, 0.0);
        assert_eq!(p.target_color, Rgb::new(0.0, 255.0, 0.0));
    }

    #[test]
    fn kill_fades_to_black_once() {
        let mut p = at_rest(Vec2::ZERO, Vec2::ZERO);
        p.target_color = Rgb::new(100.0, 100.0, 100.0);
        p.color_weight = 1.0;

        p.kill(Vec2::new(-300.0, 0.0));
        assert!(p.is_killed);
        assert_eq!(p.target, Vec2::new(-300.0, 0.0));
        assert_eq!(p.start_color, Rgb::new(100.0, 100.0, 100.0));
        assert_eq!(p.target_color, Rgb::BLACK);

        p.color_weight = 0.5;
        p.kill(Vec2::new(900.0, 900.0));
        assert_eq!(p.target, Vec2::new(-300.0, 0.0));
        assert_eq!(p.color_weight, 0.5);
    }

    #[test]
    fn retarget_revives_killed_particle() {
        let mut p = at_rest(Vec2::ZERO, Vec2::ZERO);
        p.kill(Vec2::new(-300.0, 0.0));
        p.retarget(Vec2::new(4.0, 4.0), Rgb::new(1.0, 2.0, 3.0));
        assert!(!p.is_killed);
        assert_eq!(p.target, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn color_weight_is_monotone_and_capped() {
        let mut p = at_rest(Vec2::ZERO, Vec2::ZERO);
        p.color_blend_rate = 0.3;
        let mut last = p.color_weight;
        for _ in 0..10 {
            p.advance_color();
            assert!(p.color_weight >= last);
            last = p.color_weight;
        }
        assert_eq!(p.color_weight, 1.0);
    }

    #[test]
    fn draw_paints_points_or_circles() {
        let mut p = at_rest(Vec2::new(3.0, 4.0), Vec2::ZERO);
        p.size = 6.0;
        p.target_color = Rgb::new(100.0, 0.0, 0.0);
        p.color_blend_rate = 0.5;

        let mut buf = RenderBuffer::new();
        p.draw(&mut buf, true, 2.0);
        assert_eq!(buf.instances[0].size, 2.0);
        assert_eq!(buf.instances[0].round, 0.0);
        assert_eq!(buf.instances[0].r, 50.0);

        p.draw(&mut buf, false, 2.0);
        assert_eq!(buf.instances[1].size, 6.0);
        assert_eq!(buf.instances[1].round, 1.0);
        assert_eq!(buf.instances[1].r, 100.0);
    }
}

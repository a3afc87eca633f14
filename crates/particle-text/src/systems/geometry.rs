//! Spawn and dispersal point generation.

use glam::Vec2;

use crate::core::rng::Rng;

/// A point at exactly `radius` from `center`, in a random direction.
///
/// The direction comes from a uniform sample inside `sample_box` (anchored at
/// the origin), so on a canvas smaller than the box the directions skew
/// toward its lower right. If the sample lands exactly on `center` the
/// direction is undefined and `center` itself is returned.
pub fn random_point(center: Vec2, radius: f32, sample_box: [f32; 2], rng: &mut Rng) -> Vec2 {
    let sample = Vec2::new(rng.next_f32() * sample_box[0], rng.next_f32() * sample_box[1]);
    center + (sample - center).normalize_or_zero() * radius
}

//! Placement engine - finds a free spot for a newly discovered node.
//!
//! The search walks outward in rings around a seed point:
//! 1. **Bias**: if the node has related nodes on the board, the seed is pulled
//!    to within `related_max_distance` of their centroid
//! 2. **Seed**: the seed itself is used when nothing crowds it
//! 3. **Rings**: radius `start_radius`, then `+radius_step` up to `max_radius`
//! 4. **Samples**: `clamp(ceil(2πr / min_spacing), min_samples, max_samples)`
//!    evenly spaced angles per ring, each jittered forward by up to `jitter`
//!    of a slot
//! 5. **Accept**: the first sample at least `min_spacing` from every node
//!
//! When every ring is crowded the seed is returned and the node overlaps.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

use clue_model::Vec2;

use crate::config::PlacementConfig;

/// Keeps new nodes apart from existing ones.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    config: PlacementConfig,
    rng: ChaCha8Rng,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create an engine with reproducible jitter.
    pub fn with_seed(config: PlacementConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Place a node near `seed`, staying close to the nodes it relates to.
    ///
    /// `related` holds the positions of related nodes already on the board,
    /// `existing` the positions of all nodes.
    pub fn place(&mut self, seed: Vec2, related: &[Vec2], existing: &[Vec2]) -> Vec2 {
        let spacing = self.config.min_spacing;
        match Vec2::centroid(related) {
            Some(centroid) => {
                let max = self.config.related_max_distance;
                let seed = clamp_toward(seed, centroid, max);
                self.search(seed, spacing, existing, Some((centroid, max)))
            }
            None => self.search(seed, spacing, existing, None),
        }
    }

    /// Expanding-ring search for a point at least `min_spacing` from every
    /// existing position. Returns `seed` unchanged if no ring has room.
    pub fn find_free_spot(&mut self, seed: Vec2, min_spacing: f32, existing: &[Vec2]) -> Vec2 {
        self.search(seed, min_spacing, existing, None)
    }

    fn search(
        &mut self,
        seed: Vec2,
        min_spacing: f32,
        existing: &[Vec2],
        anchor: Option<(Vec2, f32)>,
    ) -> Vec2 {
        if min_spacing <= 0.0 || is_free(seed, min_spacing, existing) {
            return seed;
        }

        let step = self.config.radius_step.max(1.0);
        let mut radius = self.config.start_radius.max(1.0);
        while radius <= self.config.max_radius {
            let count = self.sample_count(radius, min_spacing);
            let slot = TAU / count as f32;
            for i in 0..count {
                let jitter = if self.config.jitter > 0.0 {
                    self.rng.gen_range(0.0..self.config.jitter)
                } else {
                    0.0
                };
                let candidate = seed + Vec2::from_angle((i as f32 + jitter) * slot) * radius;

                if let Some((centroid, max)) = anchor {
                    if candidate.distance(centroid) > max {
                        continue;
                    }
                }
                if is_free(candidate, min_spacing, existing) {
                    return candidate;
                }
            }
            radius += step;
        }

        seed
    }

    fn sample_count(&self, radius: f32, min_spacing: f32) -> usize {
        let ideal = (TAU * radius / min_spacing).ceil();
        let min = self.config.min_samples.max(1);
        let max = self.config.max_samples.max(min);
        if ideal.is_finite() {
            (ideal as usize).clamp(min, max)
        } else {
            max
        }
    }
}

fn is_free(point: Vec2, min_spacing: f32, existing: &[Vec2]) -> bool {
    existing.iter().all(|p| p.distance(point) >= min_spacing)
}

/// Move `point` along the line toward `target` until it is no further than
/// `max` from it.
fn clamp_toward(point: Vec2, target: Vec2, max: f32) -> Vec2 {
    let offset = point - target;
    let distance = offset.length();
    if distance <= max {
        point
    } else {
        target + offset * (max / distance)
    }
}

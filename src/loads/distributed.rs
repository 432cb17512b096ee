//! Distributed loads on beams

use serde::{Deserialize, Serialize};

/// A linearly varying line load on a beam, in the beam's local axes.
///
/// `start` and `end` hold force densities [qx, qy, qz] at the start and end
/// node; intermediate values are interpolated linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Force density at the start node
    pub start: [f64; 3],
    /// Force density at the end node
    pub end: [f64; 3],
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(start: [f64; 3], end: [f64; 3]) -> Self {
        Self { start, end }
    }

    /// Create a uniform distributed load over the full member length
    pub fn uniform(q: [f64; 3]) -> Self {
        Self::new(q, q)
    }

    /// Create a triangular load (zero at start, `q_max` at end)
    pub fn triangular(q_max: [f64; 3]) -> Self {
        Self::new([0.0; 3], q_max)
    }

    /// Check if the load is uniform (constant magnitude)
    pub fn is_uniform(&self) -> bool {
        self.start
            .iter()
            .zip(self.end.iter())
            .all(|(s, e)| (s - e).abs() < 1e-12)
    }

    /// Intensity at distance `x` from the start of a member of `length`
    pub fn intensity_at(&self, x: f64, length: f64) -> [f64; 3] {
        let t = if length > 0.0 { x / length } else { 0.0 };
        std::array::from_fn(|i| self.start[i] + (self.end[i] - self.start[i]) * t)
    }

    /// Total force carried by the load over `length`, local axes
    pub fn resultant(&self, length: f64) -> [f64; 3] {
        std::array::from_fn(|i| (self.start[i] + self.end[i]) / 2.0 * length)
    }
}

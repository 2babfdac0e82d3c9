//! Rays for portal placement

use super::math::Vec3;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized (ZERO if the input had no length)
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// A ray that cannot hit anything: zero direction or non-finite input
    pub fn is_degenerate(&self) -> bool {
        self.direction.is_zero() || !self.direction.is_finite() || !self.origin.is_finite()
    }
}

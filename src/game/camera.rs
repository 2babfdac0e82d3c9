//! First-person camera
//!
//! Yaw/pitch camera in a Z-up world. Yaw 0 looks down +Y, positive yaw turns
//! toward +X. Movement requests are flattened onto the ground so looking up
//! or down never changes walking speed.

use std::f32::consts::FRAC_PI_2;
use crate::geometry::Vec3;
use crate::settings::CameraSettings;
use super::view::ViewPose;

/// Pitch stays just short of straight up/down so the basis never degenerates
const PITCH_LIMIT: f32 = FRAC_PI_2 * (89.0 / 90.0);

/// Keyboard movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Camera state for the player view
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // radians
    pub pitch: f32, // radians
    /// Vertical field of view in degrees
    pub zoom: f32,

    // Computed basis vectors
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32, zoom: f32) -> Self {
        let mut cam = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            zoom,
            front: Vec3::Y,
            right: Vec3::X,
            up: Vec3::UP,
        };
        cam.update_basis();
        cam
    }

    pub fn update_basis(&mut self) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        self.front = Vec3::new(sy * cp, cy * cp, sp).normalize();
        self.right = self.front.cross(Vec3::UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Mouse look; `dx`/`dy` are already scaled to radians
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Turn after passing through a portal
    pub fn apply_yaw_correction(&mut self, radians: f32) {
        if radians.is_finite() {
            self.rotate(radians, 0.0);
        }
    }

    /// Scroll zoom, clamped to the configured range
    pub fn zoom_by(&mut self, amount: f32, settings: &CameraSettings) {
        self.zoom = (self.zoom - amount).clamp(settings.zoom_min, settings.zoom_max);
    }

    /// Horizontal displacement for one movement key held for `dt` seconds
    pub fn movement(&self, direction: Movement, speed: f32, dt: f32) -> Vec3 {
        let forward = self.front.reject(Vec3::UP).normalize();
        let right = self.right.reject(Vec3::UP).normalize();
        let step = speed * dt;
        match direction {
            Movement::Forward => forward * step,
            Movement::Backward => forward * -step,
            Movement::Left => right * -step,
            Movement::Right => right * step,
        }
    }

    pub fn pose(&self) -> ViewPose {
        ViewPose::new(self.position, self.front, self.up)
    }
}

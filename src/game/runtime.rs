//! Per-frame runtime
//!
//! Owns everything the frame loop mutates and runs one frame in a fixed
//! order: jump request, gravity, walking, portal teleport, then (unless the
//! player was just teleported) mouse look and portal placement.
//! Input arrives as a plain [`FrameInput`] so the whole frame can be driven
//! from tests without a window.

use macroquad::logging::{debug, info};
use crate::geometry::Vec3;
use crate::settings::Settings;
use crate::world::PlaneIndex;
use super::camera::{Camera, Movement};
use super::motion::{integrate_vertical, is_horizontal_available, MotionState};
use super::placement::find_portal_surface;
use super::portal::{PortalId, PortalPair, Teleport};
use super::view::{view_through, ViewPose};

/// Input gathered for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Mouse look in radians (yaw, pitch)
    pub look: (f32, f32),
    /// Scroll amount (degrees of field of view)
    pub zoom: f32,
    /// Fire a portal along the view direction
    pub place: Option<PortalId>,
}

impl FrameInput {
    fn movements(&self) -> impl Iterator<Item = Movement> + '_ {
        [
            (self.forward, Movement::Forward),
            (self.backward, Movement::Backward),
            (self.left, Movement::Left),
            (self.right, Movement::Right),
        ]
        .into_iter()
        .filter(|(held, _)| *held)
        .map(|(_, m)| m)
    }
}

/// What happened during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Feet came to rest on a floor plane
    pub landed: bool,
    /// At least one movement key was blocked by a wall
    pub blocked: bool,
    pub teleport: Option<Teleport>,
    pub placed: Option<PortalId>,
}

/// Frame loop state
pub struct Runtime {
    pub settings: Settings,
    pub level: PlaneIndex,
    pub portals: PortalPair,
    pub camera: Camera,
    pub motion: MotionState,
    /// Most recently placed portal (the renderer looks through it)
    pub last_placed: Option<PortalId>,
}

impl Runtime {
    /// Start with the player's feet at `spawn`
    pub fn new(settings: Settings, level: PlaneIndex, spawn: Vec3) -> Self {
        let eye = spawn + Vec3::UP * settings.physics.eye_height;
        let camera = Camera::new(eye, 0.0, 0.0, settings.camera.fov_degrees);
        Self {
            settings,
            level,
            portals: PortalPair::new(),
            camera,
            motion: MotionState::new(spawn),
            last_placed: None,
        }
    }

    fn eye_offset(&self) -> Vec3 {
        Vec3::UP * self.settings.physics.eye_height
    }

    /// Camera position derived from the feet
    pub fn eye(&self) -> Vec3 {
        self.motion.position + self.eye_offset()
    }

    /// Advance one frame of `dt` seconds
    pub fn step(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        let start_feet = self.motion.position;

        if input.jump {
            self.motion.jump(self.settings.physics.jump_speed);
        }
        report.landed = integrate_vertical(
            &mut self.motion,
            &self.level,
            self.settings.physics.gravity,
            dt,
        );

        let mut stopped = Vec3::ZERO;
        for movement in input.movements() {
            let step = self.camera.movement(movement, self.settings.camera.move_speed, dt);
            if is_horizontal_available(&self.level, self.eye(), step) {
                self.motion.position += step;
            } else {
                stopped += step;
                report.blocked = true;
            }
        }

        report.teleport = self.teleport(start_feet, stopped);
        if let Some(teleport) = report.teleport {
            self.camera.apply_yaw_correction(teleport.yaw_correction);
            let feet = self.motion.position;
            info!(
                "Entered {} portal, exiting at ({:.2}, {:.2}, {:.2})",
                teleport.entered.name(), feet.x, feet.y, feet.z
            );
        }
        self.camera.position = self.eye();

        if report.teleport.is_none() {
            self.camera.rotate(input.look.0, input.look.1);
            if input.zoom != 0.0 {
                self.camera.zoom_by(input.zoom, &self.settings.camera);
            }
            if let Some(id) = input.place {
                report.placed = self.place_portal(id);
            }
        }

        report
    }

    /// Portal check over the feet and eye segments of this frame.
    ///
    /// Portals float just in front of their wall, so walking into one is
    /// usually stopped by the wall first. `stopped` is the walk a wall
    /// refused; it still reaches portals entered from the front, never one
    /// on the far side of the blocking wall. On a hit the feet move to the
    /// exit.
    fn teleport(&mut self, start_feet: Vec3, stopped: Vec3) -> Option<Teleport> {
        let offset = self.eye_offset();
        let feet = self.motion.position;
        let front = self.camera.front;
        let settings = &self.settings.portal;

        let segments = [(start_feet, feet), (start_feet + offset, feet + offset)];
        let mut exit = Vec3::ZERO;
        let mut teleport = None;
        for (start, end) in segments {
            exit = end;
            teleport = self.portals.pass_through(&mut exit, start, front, settings);
            if teleport.is_some() {
                break;
            }
        }
        if teleport.is_none() && !stopped.is_zero() {
            for (start, end) in segments {
                exit = end + stopped;
                teleport = self.portals.pass_through_front(&mut exit, start, front, settings);
                if teleport.is_some() {
                    break;
                }
            }
        }

        if teleport.is_some() {
            self.motion.position = exit;
        }
        teleport
    }

    /// Shoot a portal along the current view direction
    pub fn place_portal(&mut self, id: PortalId) -> Option<PortalId> {
        let Some(hit) = find_portal_surface(&self.level, self.camera.position, self.camera.front) else {
            debug!("No portal surface in view for {} portal", id.name());
            return None;
        };
        let portal = self
            .portals
            .place(id, hit.point, hit.normal, hit.up, &self.settings.portal)?;
        info!(
            "Placed {} portal at ({:.2}, {:.2}, {:.2})",
            id.name(), portal.position.x, portal.position.y, portal.position.z
        );
        self.last_placed = Some(id);
        Some(id)
    }

    /// Camera pose as seen through `source`, or the real pose if the pair
    /// is incomplete
    pub fn virtual_view(&self, source: PortalId) -> ViewPose {
        view_through(&self.portals, source, &self.camera.pose())
    }
}

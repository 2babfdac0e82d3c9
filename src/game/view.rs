//! Virtual camera through a portal pair
//!
//! To draw what is visible through a portal, the scene is rendered a second
//! time from a virtual camera standing behind the sibling portal. The
//! camera's pose is re-expressed in the source portal's local frame and
//! rebuilt on the destination side:
//!
//! - right coordinate goes onto the destination-side right (`-dst.right`),
//! - up coordinate stays on the destination up,
//! - normal coordinate is negated onto the destination normal.
//!
//! That is a rotation of half a turn about the portal up axis, so the
//! virtual view keeps its handedness. Everything here is pure; the renderer
//! calls it every frame with the current camera and portals.

use crate::geometry::Vec3;
use super::portal::{Portal, PortalId, PortalPair};

/// Eye position plus orientation, enough to place a 3D camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl ViewPose {
    pub fn new(eye: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self { eye, forward, up }
    }

    /// A point one unit ahead of the eye
    pub fn target(&self) -> Vec3 {
        self.eye + self.forward
    }
}

/// Move a source-side vector across to the destination side
fn transfer(v: Vec3, source: &Portal, destination: &Portal) -> Vec3 {
    let r = v.dot(source.right);
    let u = v.dot(source.up);
    let n = v.dot(source.normal);
    -destination.right * r + destination.up * u - destination.normal * n
}

/// Pose of the virtual camera looking out of `destination` when the real
/// camera looks into `source`.
///
/// The eye is found by following the view ray to the source portal plane,
/// carrying that hit point across, then stepping back along the transformed
/// forward by the same ray distance. When the view ray is parallel to the
/// source plane the eye offset is carried across directly.
pub fn virtual_view(camera: &ViewPose, source: &Portal, destination: &Portal) -> ViewPose {
    let forward = transfer(camera.forward, source, destination);
    let up = transfer(camera.up, source, destination);

    let denom = camera.forward.dot(source.normal);
    let t = if denom != 0.0 {
        (source.position - camera.eye).dot(source.normal) / denom
    } else {
        f32::NAN
    };

    let eye = if t.is_finite() {
        let hit = camera.eye + camera.forward * t;
        let hit_across = destination.position + transfer(hit - source.position, source, destination);
        hit_across - forward * t
    } else {
        destination.position + transfer(camera.eye - source.position, source, destination)
    };

    ViewPose { eye, forward, up }
}

/// Virtual view through the portal `source` of the pair. Returns the camera
/// unchanged unless both portals are placed.
pub fn view_through(pair: &PortalPair, source: PortalId, camera: &ViewPose) -> ViewPose {
    match pair.linked(source) {
        Some((from, to)) => virtual_view(camera, from, to),
        None => *camera,
    }
}

//! Game Module
//!
//! Everything that changes from frame to frame:
//! - `motion` - gravity, floor landing and wall blocking
//! - `placement` - view ray against portal-capable surfaces
//! - `portal` - the blue/orange pair, crossing detection and teleport
//! - `view` - virtual camera through a portal for the second render pass
//! - `camera` - first-person yaw/pitch camera
//! - `runtime` - per-frame context tying the above together in order

#![allow(dead_code)]

pub mod camera;
pub mod motion;
pub mod placement;
pub mod portal;
pub mod runtime;
pub mod view;

// Re-export main types
pub use camera::{Camera, Movement};
pub use motion::{integrate_vertical, is_horizontal_available, vertical_step, MotionState};
pub use placement::{cast_ray, find_portal_surface, PortalHit};
pub use portal::{Portal, PortalId, PortalPair, PortalVertex, Teleport, PORTAL_INDICES};
pub use runtime::{FrameInput, FrameReport, Runtime};
pub use view::{view_through, virtual_view, ViewPose};

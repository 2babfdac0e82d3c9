//! Portal placement ray cast
//!
//! Casts the view ray against every plane in the index and reports the
//! nearest hit, but only if that nearest surface accepts portals. A portal
//! cannot be shot "through" a plain wall onto a capable one behind it.

use crate::geometry::{Ray, Vec3};
use crate::world::{Axis, PlaneIndex, PlaneRef};

/// Where a placement ray landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalHit {
    pub point: Vec3,
    /// Surface normal facing back toward the ray origin
    pub normal: Vec3,
    /// Reference up for orienting the portal quad
    pub up: Vec3,
    pub plane: PlaneRef,
    /// Ray parameter of the hit
    pub t: f32,
}

/// Orientation reference for a portal on a floor or ceiling: the view
/// direction flattened onto the ground plane. Looking straight down or up
/// leaves no horizontal component, so fall back to world +Y.
fn floor_portal_up(direction: Vec3) -> Vec3 {
    let flat = Vec3::new(direction.x, direction.y, 0.0).normalize();
    if flat.is_zero() {
        Vec3::Y
    } else {
        flat
    }
}

/// Find the nearest plane hit by `ray` across all three axis families.
pub fn cast_ray(level: &PlaneIndex, ray: &Ray) -> Option<PortalHit> {
    if ray.is_degenerate() {
        return None;
    }

    let mut best: Option<PortalHit> = None;
    for axis in Axis::ALL {
        let origin = axis.component(ray.origin);
        let direction = axis.component(ray.direction);
        if direction == 0.0 {
            continue;
        }

        for (index, plane) in level.planes(axis).iter().enumerate() {
            let t = (plane.offset - origin) / direction;
            if !(t > 0.0) || best.map_or(false, |b| t > b.t) {
                continue;
            }
            let point = ray.at(t);
            if !plane.contains(axis.project(point)) {
                continue;
            }

            // Snap onto the plane so the quad is exactly coplanar
            let mut point = point;
            match axis {
                Axis::X => point.x = plane.offset,
                Axis::Y => point.y = plane.offset,
                Axis::Z => point.z = plane.offset,
            }
            let normal = if plane.offset > origin {
                -axis.unit()
            } else {
                axis.unit()
            };
            let up = match axis {
                Axis::X | Axis::Y => Vec3::UP,
                Axis::Z => floor_portal_up(ray.direction),
            };

            best = Some(PortalHit {
                point,
                normal,
                up,
                plane: PlaneRef { axis, index },
                t,
            });
        }
    }
    best
}

/// Cast a placement ray from `eye` along `direction`. Fails when nothing is
/// hit or the nearest surface is not portal-capable.
pub fn find_portal_surface(level: &PlaneIndex, eye: Vec3, direction: Vec3) -> Option<PortalHit> {
    let hit = cast_ray(level, &Ray::new(eye, direction))?;
    if level.is_portal_capable(hit.plane) {
        Some(hit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::world::AxisPlane;

    fn rect(min: Vec2, max: Vec2) -> Vec<Vec2> {
        vec![
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ]
    }

    /// Room: capable wall at x = 10, plain wall at y = 10, capable floor at z = 0,
    /// plain pillar face at x = 5 covering y in [2, 4]
    fn room() -> PlaneIndex {
        let mut level = PlaneIndex::new();
        level.push(
            Axis::X,
            AxisPlane::new(rect(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 5.0)), 10.0),
            true,
        );
        level.push(
            Axis::Y,
            AxisPlane::new(rect(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 5.0)), 10.0),
            false,
        );
        level.push(
            Axis::Z,
            AxisPlane::new(rect(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0)), 0.0),
            true,
        );
        level.push(
            Axis::X,
            AxisPlane::new(rect(Vec2::new(2.0, 0.0), Vec2::new(4.0, 5.0)), 5.0),
            false,
        );
        level
    }

    #[test]
    fn test_hit_capable_wall() {
        let level = room();
        let hit = find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), Vec3::X).unwrap();
        assert_eq!(hit.point, Vec3::new(10.0, 0.0, 2.0));
        assert_eq!(hit.normal, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(hit.up, Vec3::UP);
        assert_eq!(hit.plane, PlaneRef { axis: Axis::X, index: 0 });
        assert!((hit.t - 10.0).abs() < 0.0001);
    }

    #[test]
    fn test_normal_faces_origin_from_either_side() {
        let level = room();
        let hit = find_portal_surface(&level, Vec3::new(12.0, 0.0, 2.0), -Vec3::X).unwrap();
        assert_eq!(hit.normal, Vec3::X);
    }

    #[test]
    fn test_plain_wall_rejected() {
        let level = room();
        assert!(find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), Vec3::Y).is_none());
        // but the raw cast still sees it
        let hit = cast_ray(&level, &Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Y)).unwrap();
        assert_eq!(hit.plane.axis, Axis::Y);
    }

    #[test]
    fn test_nearest_plain_surface_shadows_capable_one() {
        let level = room();
        // Pillar at x = 5 sits in front of the capable wall at x = 10
        assert!(find_portal_surface(&level, Vec3::new(0.0, 3.0, 2.0), Vec3::X).is_none());
    }

    #[test]
    fn test_floor_hit_up_follows_view() {
        let level = room();
        let dir = Vec3::new(1.0, 0.0, -1.0);
        let hit = find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), dir).unwrap();
        assert_eq!(hit.plane.axis, Axis::Z);
        assert_eq!(hit.normal, Vec3::UP);
        assert!((hit.point.x - 2.0).abs() < 0.0001);
        assert!((hit.up.x - 1.0).abs() < 0.0001);
        assert!(hit.up.z.abs() < 0.0001);
    }

    #[test]
    fn test_straight_down_gets_fallback_up() {
        let level = room();
        let hit = find_portal_surface(&level, Vec3::new(1.0, 1.0, 2.0), -Vec3::UP).unwrap();
        assert_eq!(hit.up, Vec3::Y);
    }

    #[test]
    fn test_behind_and_missing_rays_fail() {
        let level = room();
        // Looking up: no ceiling
        assert!(find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), Vec3::UP).is_none());
        // Degenerate direction
        assert!(find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO).is_none());
        let nan = Vec3::new(f32::NAN, 0.0, 0.0);
        assert!(find_portal_surface(&level, Vec3::new(0.0, 0.0, 2.0), nan).is_none());
        // Empty level
        assert!(find_portal_surface(&PlaneIndex::new(), Vec3::ZERO, Vec3::X).is_none());
    }
}

//! Winding-number point-in-polygon test
//!
//! Every collision, placement and teleport check goes through
//! [`point_in_polygon`], so floor landing, wall blocking and portal crossing
//! all agree on what "inside a surface" means.

use std::f32::consts::PI;
use super::math::Vec2;

/// Total subtended angle above which a point counts as enclosed.
///
/// A point inside a simple polygon sees a total of ±2π, a point outside sees
/// ~0. π sits halfway between the two, leaving ±π of slack for accumulated
/// floating error.
pub const WINDING_THRESHOLD: f32 = PI;

/// Signed angle from `v1` to `v2` in radians, in (-π, π].
///
/// Positive when `v2` is counter-clockwise of `v1`. Returns 0 when either
/// vector has zero length.
pub fn signed_angle_between(v1: Vec2, v2: Vec2) -> f32 {
    let mag = v1.len() * v2.len();
    if mag == 0.0 || !mag.is_finite() {
        return 0.0;
    }

    let sin_value = (v1.x * v2.y - v2.x * v1.y) / mag;
    let cos_value = ((v1.x * v2.x + v1.y * v2.y) / mag).clamp(-1.0, 1.0);

    let a = cos_value.acos();
    if sin_value < 0.0 {
        -a
    } else {
        a
    }
}

/// Generalized winding test: sums the signed angle each edge subtends at
/// `point` (wrapping last to first). Works for any simple polygon, convex
/// or not, in either winding order.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut total = 0.0;
    for (i, vertex) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        total += signed_angle_between(*vertex - point, next - point);
    }

    total.abs() > WINDING_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn test_angle_quarter_turns() {
        let a = signed_angle_between(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        assert!((a - PI / 2.0).abs() < 0.0001);
        let b = signed_angle_between(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0));
        assert!((b + PI / 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_angle_opposite_is_positive_pi() {
        let a = signed_angle_between(Vec2::new(1.0, 0.0), Vec2::new(-3.0, 0.0));
        assert!((a - PI).abs() < 0.0001);
    }

    #[test]
    fn test_angle_parallel_and_degenerate() {
        assert_eq!(signed_angle_between(Vec2::new(2.0, 2.0), Vec2::new(1.0, 1.0)), 0.0);
        assert_eq!(signed_angle_between(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_inside_and_outside_square() {
        let poly = square(-5.0, 5.0);
        assert!(point_in_polygon(Vec2::new(0.0, 0.0), &poly));
        assert!(point_in_polygon(Vec2::new(4.9, -4.9), &poly));
        assert!(!point_in_polygon(Vec2::new(5.1, 0.0), &poly));
        assert!(!point_in_polygon(Vec2::new(-20.0, 30.0), &poly));
    }

    #[test]
    fn test_winding_order_does_not_matter() {
        let mut poly = square(0.0, 2.0);
        poly.reverse();
        assert!(point_in_polygon(Vec2::new(1.0, 1.0), &poly));
        assert!(!point_in_polygon(Vec2::new(3.0, 1.0), &poly));
    }

    #[test]
    fn test_concave_polygon() {
        // L shape: the notch at (3, 3) is outside
        let poly = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ];
        assert!(point_in_polygon(Vec2::new(1.0, 3.0), &poly));
        assert!(point_in_polygon(Vec2::new(3.0, 1.0), &poly));
        assert!(!point_in_polygon(Vec2::new(3.0, 3.0), &poly));
    }

    #[test]
    fn test_edge_points_are_stable() {
        let poly = square(0.0, 2.0);
        let on_edge = Vec2::new(2.0, 1.0);
        let on_corner = Vec2::new(0.0, 0.0);
        let first = point_in_polygon(on_edge, &poly);
        let corner = point_in_polygon(on_corner, &poly);
        for _ in 0..10 {
            assert_eq!(point_in_polygon(on_edge, &poly), first);
            assert_eq!(point_in_polygon(on_corner, &poly), corner);
        }
    }

    #[test]
    fn test_degenerate_polygons_contain_nothing() {
        assert!(!point_in_polygon(Vec2::new(0.0, 0.0), &[]));
        assert!(!point_in_polygon(
            Vec2::new(0.5, 0.0),
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]
        ));
    }
}

//! Motion and collision against the plane index
//!
//! Two independent checks run each frame:
//! - Vertical: integrate gravity and land on the first floor plane the feet
//!   pass through.
//! - Horizontal: reject a proposed step outright if it would pass through a
//!   wall plane. There is no sliding; the caller commits the step only when
//!   it is unblocked.
//!
//! Vertical velocity is positive downward, so a jump is a negative velocity.

use crate::geometry::Vec3;
use crate::world::{Axis, PlaneIndex};

/// The moving agent: feet position, velocity and jump state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    /// Feet position
    pub position: Vec3,
    /// Only the up component is integrated; landing clears all of it
    pub velocity: Vec3,
    pub jumping: bool,
}

impl MotionState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            jumping: false,
        }
    }

    /// Start a jump unless one is already in progress
    pub fn jump(&mut self, speed: f32) -> bool {
        if self.jumping {
            return false;
        }
        self.velocity.z = -speed;
        self.jumping = true;
        true
    }
}

/// Vertical speed after `dt` and the downward displacement it produces.
///
/// `h = (v'² - v²) / 2g` equals `v·dt + ½·g·dt²` without a separate
/// multiply-accumulate.
pub fn vertical_step(v: f32, dt: f32, gravity: f32) -> (f32, f32) {
    let v_next = v + gravity * dt;
    let h = (v_next * v_next - v * v) / (2.0 * gravity);
    (v_next, h)
}

/// Integrate gravity for one frame. Returns true when the agent landed.
///
/// Every Z plane between the current height (inclusive) and the candidate
/// height is tested against the agent's XY; the first one that contains it
/// wins, snapping the feet to the plane and clearing velocity and the jump
/// flag. Otherwise the candidate position is committed.
pub fn integrate_vertical(
    state: &mut MotionState,
    level: &PlaneIndex,
    gravity: f32,
    dt: f32,
) -> bool {
    if !(gravity > 0.0) || !dt.is_finite() {
        return false;
    }

    let (v_next, h) = vertical_step(state.velocity.z, dt, gravity);
    let candidate = state.position - Vec3::UP * h;
    if !candidate.is_finite() {
        return false;
    }

    let xy = Axis::Z.project(state.position);
    for plane in level.planes(Axis::Z) {
        if !(state.position.z >= plane.offset && candidate.z <= plane.offset) {
            continue;
        }
        if !plane.contains(xy) {
            continue;
        }
        state.position.z = plane.offset;
        state.velocity = Vec3::ZERO;
        state.jumping = false;
        return true;
    }

    state.position = candidate;
    state.velocity.z = v_next;
    false
}

/// Is a horizontal step free of wall planes?
///
/// X and Y plane families are checked independently. A plane blocks when the
/// step's coordinate on that axis reaches or crosses the plane's offset and
/// the point where the step meets the plane lies inside the plane's quad.
/// Axes with no motion, and planes the agent is already exactly on, never
/// block.
pub fn is_horizontal_available(level: &PlaneIndex, position: Vec3, movement: Vec3) -> bool {
    if !movement.is_finite() || !position.is_finite() {
        return false;
    }
    let destination = position + movement;

    for axis in [Axis::X, Axis::Y] {
        let start = axis.component(position);
        let end = axis.component(destination);
        let delta = end - start;
        if delta == 0.0 {
            continue;
        }

        for plane in level.planes(axis) {
            let before = plane.offset - start;
            let after = plane.offset - end;
            if before == 0.0 || before * after > 0.0 {
                continue;
            }
            let t = before / delta;
            let hit = position.lerp(destination, t);
            if plane.contains(axis.project(hit)) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use crate::world::AxisPlane;

    const G: f32 = 20.0;

    /// 10×10 floor at z = 0 spanning [-5, 5]²
    fn floor_level() -> PlaneIndex {
        let mut level = PlaneIndex::new();
        level.push(
            Axis::Z,
            AxisPlane::new(
                vec![
                    Vec2::new(-5.0, -5.0),
                    Vec2::new(5.0, -5.0),
                    Vec2::new(5.0, 5.0),
                    Vec2::new(-5.0, 5.0),
                ],
                0.0,
            ),
            false,
        );
        level
    }

    /// Wall at x = 3 covering y in [-2, 2], z in [0, 3]
    fn wall_level() -> PlaneIndex {
        let mut level = PlaneIndex::new();
        level.push(
            Axis::X,
            AxisPlane::new(
                vec![
                    Vec2::new(-2.0, 0.0),
                    Vec2::new(2.0, 0.0),
                    Vec2::new(2.0, 3.0),
                    Vec2::new(-2.0, 3.0),
                ],
                3.0,
            ),
            false,
        );
        level
    }

    #[test]
    fn test_vertical_step_from_rest() {
        let (v, h) = vertical_step(0.0, 1.0, G);
        assert_eq!(v, 20.0);
        assert_eq!(h, 10.0);
    }

    #[test]
    fn test_vertical_step_matches_kinematics() {
        let (v0, dt) = (-8.0, 0.1);
        let (_, h) = vertical_step(v0, dt, G);
        let expected = v0 * dt + 0.5 * G * dt * dt;
        assert!((h - expected).abs() < 0.0001);
    }

    #[test]
    fn test_fall_and_land_on_floor() {
        let level = floor_level();
        let mut state = MotionState::new(Vec3::new(1.0, 1.0, 5.0));
        state.jumping = true;

        let mut landed = false;
        for _ in 0..100 {
            if integrate_vertical(&mut state, &level, G, 1.0 / 60.0) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(state.position.z, 0.0);
        assert_eq!(state.velocity, Vec3::ZERO);
        assert!(!state.jumping);
    }

    #[test]
    fn test_fall_through_outside_floor() {
        let level = floor_level();
        let mut state = MotionState::new(Vec3::new(8.0, 0.0, 5.0));
        for _ in 0..120 {
            assert!(!integrate_vertical(&mut state, &level, G, 1.0 / 60.0));
        }
        assert!(state.position.z < 0.0);
    }

    #[test]
    fn test_single_large_step_still_lands() {
        let level = floor_level();
        let mut state = MotionState::new(Vec3::new(0.0, 0.0, 5.0));
        assert!(integrate_vertical(&mut state, &level, G, 1.0));
        assert_eq!(state.position.z, 0.0);
    }

    #[test]
    fn test_standing_on_floor_stays_put() {
        let level = floor_level();
        let mut state = MotionState::new(Vec3::new(0.0, 0.0, 0.0));
        for _ in 0..10 {
            assert!(integrate_vertical(&mut state, &level, G, 1.0 / 60.0));
            assert_eq!(state.position.z, 0.0);
        }
    }

    #[test]
    fn test_jump_rises_then_lands() {
        let level = floor_level();
        let mut state = MotionState::new(Vec3::ZERO);
        assert!(state.jump(8.0));
        assert!(!state.jump(8.0));

        assert!(!integrate_vertical(&mut state, &level, G, 1.0 / 60.0));
        assert!(state.position.z > 0.0);
        assert!(state.jumping);

        let mut frames = 0;
        while !integrate_vertical(&mut state, &level, G, 1.0 / 60.0) {
            frames += 1;
            assert!(frames < 200);
        }
        assert_eq!(state.position.z, 0.0);
        assert!(!state.jumping);
    }

    #[test]
    fn test_planes_not_reached_do_not_land() {
        let level = floor_level();
        // Rising from below the floor never lands on it
        let mut state = MotionState::new(Vec3::new(0.0, 0.0, -3.0));
        state.velocity.z = -8.0;
        assert!(!integrate_vertical(&mut state, &level, G, 1.0 / 60.0));
        // Falling from well above, a tiny step does not reach it
        let mut state = MotionState::new(Vec3::new(0.0, 0.0, 10.0));
        assert!(!integrate_vertical(&mut state, &level, G, 1.0 / 60.0));
    }

    #[test]
    fn test_wall_blocks_crossing_step() {
        let level = wall_level();
        let pos = Vec3::new(2.5, 0.0, 1.0);
        assert!(!is_horizontal_available(&level, pos, Vec3::new(1.0, 0.0, 0.0)));
        // Landing exactly on the wall blocks too
        assert!(!is_horizontal_available(&level, pos, Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_wall_does_not_block_short_or_parallel_steps() {
        let level = wall_level();
        let pos = Vec3::new(2.5, 0.0, 1.0);
        assert!(is_horizontal_available(&level, pos, Vec3::new(0.4, 0.0, 0.0)));
        assert!(is_horizontal_available(&level, pos, Vec3::new(-1.0, 0.0, 0.0)));
        assert!(is_horizontal_available(&level, pos, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_step_past_wall_edge_is_free() {
        let level = wall_level();
        let pos = Vec3::new(2.5, 4.0, 1.0);
        assert!(is_horizontal_available(&level, pos, Vec3::new(1.0, 0.0, 0.0)));
        // Above the wall
        let pos = Vec3::new(2.5, 0.0, 5.0);
        assert!(is_horizontal_available(&level, pos, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_diagonal_step_uses_crossing_point() {
        let level = wall_level();
        // Starts beside the wall, crosses x = 3 at y = 3 (past its edge)
        let pos = Vec3::new(2.0, 2.0, 1.0);
        assert!(is_horizontal_available(&level, pos, Vec3::new(2.0, 2.0, 0.0)));
        // Crosses x = 3 at y = 1, inside the wall
        let pos = Vec3::new(2.0, 0.0, 1.0);
        assert!(!is_horizontal_available(&level, pos, Vec3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_agent_on_wall_plane_is_not_stuck() {
        let level = wall_level();
        let pos = Vec3::new(3.0, 0.0, 1.0);
        assert!(is_horizontal_available(&level, pos, Vec3::new(-0.5, 0.0, 0.0)));
        assert!(is_horizontal_available(&level, pos, Vec3::new(0.0, 0.5, 0.0)));
    }

    #[test]
    fn test_empty_level_is_open_space() {
        let level = PlaneIndex::new();
        let mut state = MotionState::new(Vec3::new(0.0, 0.0, 1.0));
        assert!(!integrate_vertical(&mut state, &level, G, 0.5));
        assert!(is_horizontal_available(&level, Vec3::ZERO, Vec3::new(100.0, 100.0, 0.0)));
    }
}

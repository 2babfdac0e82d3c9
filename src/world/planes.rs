//! Axis-aligned plane index
//!
//! Collision and portal placement only ever deal with rectangles whose
//! normal lies on a world axis. Each plane is stored as its quad projected
//! onto the two axes it does not span, plus the constant coordinate on the
//! third. Planes are grouped by that constant axis.

use std::collections::HashSet;
use macroquad::logging::debug;
use crate::geometry::{point_in_polygon, Vec2, Vec3};
use super::level::LevelRecord;

/// Vertices may drift this far off the declared plane and still count as coplanar
const COPLANAR_TOLERANCE: f32 = 0.001;

/// World axis a plane is constant along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Classify a normal that has exactly two zero components.
    /// Returns None for tilted or zero normals.
    pub fn from_normal(n: Vec3) -> Option<Axis> {
        if n.x == 0.0 && n.y == 0.0 && n.z != 0.0 {
            Some(Axis::Z)
        } else if n.x == 0.0 && n.z == 0.0 && n.y != 0.0 {
            Some(Axis::Y)
        } else if n.y == 0.0 && n.z == 0.0 && n.x != 0.0 {
            Some(Axis::X)
        } else {
            None
        }
    }

    /// Coordinate of `v` along this axis
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// The two coordinates of `v` that are not along this axis, in x, y, z order
    pub fn project(self, v: Vec3) -> Vec2 {
        match self {
            Axis::X => Vec2::new(v.y, v.z),
            Axis::Y => Vec2::new(v.x, v.z),
            Axis::Z => Vec2::new(v.x, v.y),
        }
    }

    /// Positive unit vector along this axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::UP,
        }
    }
}

/// A rectangular surface of constant coordinate along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPlane {
    /// Quad corners projected with [`Axis::project`], in declared order
    pub polygon: Vec<Vec2>,
    /// Coordinate along the constant axis
    pub offset: f32,
}

impl AxisPlane {
    pub fn new(polygon: Vec<Vec2>, offset: f32) -> Self {
        Self { polygon, offset }
    }

    /// Build from world-space corners. None if a corner is off the plane.
    pub fn from_quad(axis: Axis, vertices: &[Vec3; 4]) -> Option<Self> {
        let offset = axis.component(vertices[0]);
        if vertices
            .iter()
            .any(|v| (axis.component(*v) - offset).abs() > COPLANAR_TOLERANCE)
        {
            return None;
        }
        let polygon = vertices.iter().map(|v| axis.project(*v)).collect();
        Some(Self { polygon, offset })
    }

    /// Is a plane-local 2D point inside the quad?
    pub fn contains(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.polygon)
    }
}

/// Identifies one plane in a [`PlaneIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaneRef {
    pub axis: Axis,
    pub index: usize,
}

/// All collision planes of a level, grouped by constant axis, plus the set of
/// planes that can host a portal.
///
/// An empty index is valid and means open space everywhere.
#[derive(Debug, Clone, Default)]
pub struct PlaneIndex {
    x_planes: Vec<AxisPlane>,
    y_planes: Vec<AxisPlane>,
    z_planes: Vec<AxisPlane>,
    portal_surfaces: HashSet<PlaneRef>,
}

impl PlaneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify level records into axis groups. Records whose normal is not
    /// axis-aligned, or whose corners are not coplanar, are skipped.
    pub fn from_records(records: &[LevelRecord], capable_material: i32) -> Self {
        let mut index = Self::new();
        for (i, record) in records.iter().enumerate() {
            let Some(axis) = Axis::from_normal(record.normal) else {
                debug!("Skipping record {}: normal is not axis-aligned", i);
                continue;
            };
            let Some(plane) = AxisPlane::from_quad(axis, &record.vertices) else {
                debug!("Skipping record {}: corners are not coplanar", i);
                continue;
            };
            index.push(axis, plane, record.material == capable_material);
        }
        index
    }

    /// Add a plane, returning its reference
    pub fn push(&mut self, axis: Axis, plane: AxisPlane, portal_capable: bool) -> PlaneRef {
        let planes = self.planes_mut(axis);
        let plane_ref = PlaneRef { axis, index: planes.len() };
        planes.push(plane);
        if portal_capable {
            self.portal_surfaces.insert(plane_ref);
        }
        plane_ref
    }

    pub fn planes(&self, axis: Axis) -> &[AxisPlane] {
        match axis {
            Axis::X => &self.x_planes,
            Axis::Y => &self.y_planes,
            Axis::Z => &self.z_planes,
        }
    }

    fn planes_mut(&mut self, axis: Axis) -> &mut Vec<AxisPlane> {
        match axis {
            Axis::X => &mut self.x_planes,
            Axis::Y => &mut self.y_planes,
            Axis::Z => &mut self.z_planes,
        }
    }

    pub fn is_portal_capable(&self, plane_ref: PlaneRef) -> bool {
        self.portal_surfaces.contains(&plane_ref)
    }

    pub fn portal_surface_count(&self) -> usize {
        self.portal_surfaces.len()
    }

    /// Total plane count across all three groups
    pub fn len(&self) -> usize {
        self.x_planes.len() + self.y_planes.len() + self.z_planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vertices: [Vec3; 4], normal: Vec3, material: i32) -> LevelRecord {
        LevelRecord { vertices, normal, material }
    }

    fn floor(z: f32, material: i32) -> LevelRecord {
        record(
            [
                Vec3::new(0.0, 0.0, z),
                Vec3::new(4.0, 0.0, z),
                Vec3::new(4.0, 4.0, z),
                Vec3::new(0.0, 4.0, z),
            ],
            Vec3::UP,
            material,
        )
    }

    #[test]
    fn test_axis_from_normal() {
        assert_eq!(Axis::from_normal(Vec3::new(0.0, 0.0, -1.0)), Some(Axis::Z));
        assert_eq!(Axis::from_normal(Vec3::new(0.0, 1.0, 0.0)), Some(Axis::Y));
        assert_eq!(Axis::from_normal(Vec3::new(-1.0, 0.0, 0.0)), Some(Axis::X));
        assert_eq!(Axis::from_normal(Vec3::new(0.7, 0.7, 0.0)), None);
        assert_eq!(Axis::from_normal(Vec3::ZERO), None);
    }

    #[test]
    fn test_projection_drops_constant_axis() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.project(v), Vec2::new(2.0, 3.0));
        assert_eq!(Axis::Y.project(v), Vec2::new(1.0, 3.0));
        assert_eq!(Axis::Z.project(v), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_records_are_grouped_by_normal() {
        let wall_x = record(
            [
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(5.0, 4.0, 0.0),
                Vec3::new(5.0, 4.0, 3.0),
                Vec3::new(5.0, 0.0, 3.0),
            ],
            Vec3::new(-1.0, 0.0, 0.0),
            3,
        );
        let wall_y = record(
            [
                Vec3::new(0.0, 7.0, 0.0),
                Vec3::new(4.0, 7.0, 0.0),
                Vec3::new(4.0, 7.0, 3.0),
                Vec3::new(0.0, 7.0, 3.0),
            ],
            Vec3::new(0.0, 1.0, 0.0),
            1,
        );
        let index = PlaneIndex::from_records(&[floor(0.0, 2), wall_x, wall_y], 3);

        assert_eq!(index.planes(Axis::X).len(), 1);
        assert_eq!(index.planes(Axis::Y).len(), 1);
        assert_eq!(index.planes(Axis::Z).len(), 1);
        assert_eq!(index.planes(Axis::X)[0].offset, 5.0);
        assert_eq!(index.planes(Axis::Y)[0].offset, 7.0);
        assert_eq!(index.planes(Axis::Y)[0].polygon[2], Vec2::new(4.0, 3.0));

        assert!(index.is_portal_capable(PlaneRef { axis: Axis::X, index: 0 }));
        assert!(!index.is_portal_capable(PlaneRef { axis: Axis::Z, index: 0 }));
        assert_eq!(index.portal_surface_count(), 1);
    }

    #[test]
    fn test_tilted_and_warped_records_are_skipped() {
        let tilted = record(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Vec3::new(-0.7, 0.0, 0.7),
            3,
        );
        let mut warped = floor(0.0, 3);
        warped.vertices[2].z = 0.5;

        let index = PlaneIndex::from_records(&[tilted, warped, floor(2.0, 3)], 3);
        assert_eq!(index.len(), 1);
        assert_eq!(index.planes(Axis::Z)[0].offset, 2.0);
        assert!(index.is_portal_capable(PlaneRef { axis: Axis::Z, index: 0 }));
    }

    #[test]
    fn test_empty_index_is_open_space() {
        let index = PlaneIndex::new();
        assert!(index.is_empty());
        assert!(index.planes(Axis::Z).is_empty());
        assert!(!index.is_portal_capable(PlaneRef { axis: Axis::Z, index: 0 }));
    }
}

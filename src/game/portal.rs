//! Portal pair: placement, crossing detection and teleport
//!
//! There are exactly two portal slots, blue and orange. Each portal's exit is
//! its sibling, looked up by identity; nothing stores a back-reference.
//! Teleporting only happens while both portals exist.

use crate::geometry::{point_in_polygon, signed_angle_between, Vec2, Vec3};
use crate::settings::PortalSettings;
use crate::world::Axis;

/// Triangle indices for a portal quad
pub const PORTAL_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Portal identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalId {
    Blue,
    Orange,
}

impl PortalId {
    /// Evaluation order for crossing checks
    pub const ALL: [PortalId; 2] = [PortalId::Blue, PortalId::Orange];

    fn slot(self) -> usize {
        match self {
            PortalId::Blue => 0,
            PortalId::Orange => 1,
        }
    }

    /// The portal this one leads to
    pub fn sibling(self) -> PortalId {
        match self {
            PortalId::Blue => PortalId::Orange,
            PortalId::Orange => PortalId::Blue,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PortalId::Blue => "blue",
            PortalId::Orange => "orange",
        }
    }
}

/// One corner of a portal quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

/// A placed portal
#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    /// Quad center, lifted off the host surface along the normal
    pub position: Vec3,
    /// Unit normal, pointing out of the host surface
    pub normal: Vec3,
    /// Quad up direction
    pub up: Vec3,
    /// Quad right direction, `normalize(up × normal)`
    pub right: Vec3,
    /// Corners: top-left, top-right, bottom-right, bottom-left
    pub quad: [PortalVertex; 4],
}

impl Portal {
    /// Build the quad for a surface hit. None when the normal is zero or the
    /// up reference is parallel to it (no right direction).
    pub fn new(point: Vec3, normal: Vec3, up: Vec3, settings: &PortalSettings) -> Option<Self> {
        let right = up.cross(normal).normalize();
        if right.is_zero() || !point.is_finite() {
            return None;
        }

        let center = point + normal * settings.surface_offset;
        let half_up = up * (settings.height / 2.0);
        let half_right = right * (settings.width / 2.0);

        let corners = [
            (center + half_up - half_right, Vec2::new(0.0, 0.0)),
            (center + half_up + half_right, Vec2::new(1.0, 0.0)),
            (center - half_up + half_right, Vec2::new(1.0, 1.0)),
            (center - half_up - half_right, Vec2::new(0.0, 1.0)),
        ];
        let quad = corners.map(|(position, uv)| PortalVertex { position, uv, normal });

        Some(Self {
            position: center,
            normal,
            up,
            right,
            quad,
        })
    }

    /// Does the segment from `start` to `end` pass through this portal's quad?
    ///
    /// The coordinate on the portal's constant axis must change, and reach or
    /// cross the quad's offset. The crossing point is then tested against the
    /// quad with the same winding test used for level collision.
    pub fn is_crossed_by(&self, start: Vec3, end: Vec3) -> bool {
        let Some(axis) = Axis::from_normal(self.normal) else {
            return false;
        };
        if !start.is_finite() || !end.is_finite() {
            return false;
        }

        let offset = axis.component(self.quad[0].position);
        let s = axis.component(start);
        let e = axis.component(end);
        if s == e || (offset - s) * (offset - e) > 0.0 {
            return false;
        }

        let t = (offset - s) / (e - s);
        let hit = axis.project(start.lerp(end, t));
        let polygon = self.quad.map(|v| axis.project(v.position));
        point_in_polygon(hit, &polygon)
    }
}

/// Result of walking into a portal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teleport {
    pub entered: PortalId,
    /// Yaw to add to the camera (radians); zero for floor/ceiling portals
    pub yaw_correction: f32,
}

/// Two-slot portal table indexed by [`PortalId`]
#[derive(Debug, Clone, Default)]
pub struct PortalPair {
    slots: [Option<Portal>; 2],
}

impl PortalPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PortalId) -> Option<&Portal> {
        self.slots[id.slot()].as_ref()
    }

    pub fn exists(&self, id: PortalId) -> bool {
        self.slots[id.slot()].is_some()
    }

    /// The portal and its sibling, if both are placed
    pub fn linked(&self, id: PortalId) -> Option<(&Portal, &Portal)> {
        Some((self.get(id)?, self.get(id.sibling())?))
    }

    /// Place (or replace) one portal. The sibling is untouched.
    /// Returns None, leaving the slot as it was, for degenerate input.
    pub fn place(
        &mut self,
        id: PortalId,
        point: Vec3,
        normal: Vec3,
        up: Vec3,
        settings: &PortalSettings,
    ) -> Option<&Portal> {
        let portal = Portal::new(point, normal, up, settings)?;
        self.slots[id.slot()] = Some(portal);
        self.get(id)
    }

    /// Which portal, if any, the segment `start -> end` enters this frame.
    /// Blue is checked first; the first match wins.
    pub fn entered(&self, start: Vec3, end: Vec3) -> Option<PortalId> {
        self.find_entered(start, end, false)
    }

    /// Like [`PortalPair::entered`], but only portals whose front face the
    /// segment moves into count.
    pub fn entered_from_front(&self, start: Vec3, end: Vec3) -> Option<PortalId> {
        self.find_entered(start, end, true)
    }

    fn find_entered(&self, start: Vec3, end: Vec3, front_only: bool) -> Option<PortalId> {
        if !self.exists(PortalId::Blue) || !self.exists(PortalId::Orange) {
            return None;
        }
        let motion = end - start;
        PortalId::ALL.into_iter().find(|id| {
            self.get(*id).map_or(false, |p| {
                (!front_only || motion.dot(p.normal) < 0.0) && p.is_crossed_by(start, end)
            })
        })
    }

    /// Teleport check for one frame.
    ///
    /// `start` is the agent position at frame start and `position` the
    /// position after this frame's motion. When the segment enters a portal,
    /// `position` is moved in front of the sibling portal and the returned
    /// [`Teleport`] carries the camera yaw correction. None means no
    /// teleport; `position` is left alone.
    pub fn pass_through(
        &self,
        position: &mut Vec3,
        start: Vec3,
        front: Vec3,
        settings: &PortalSettings,
    ) -> Option<Teleport> {
        let entered = self.entered(start, *position)?;
        self.exit_through(entered, position, front, settings)
    }

    /// [`PortalPair::pass_through`] restricted to portals entered from the
    /// front, for motion a wall stopped short of the portal plane.
    pub fn pass_through_front(
        &self,
        position: &mut Vec3,
        start: Vec3,
        front: Vec3,
        settings: &PortalSettings,
    ) -> Option<Teleport> {
        let entered = self.entered_from_front(start, *position)?;
        self.exit_through(entered, position, front, settings)
    }

    fn exit_through(
        &self,
        entered: PortalId,
        position: &mut Vec3,
        front: Vec3,
        settings: &PortalSettings,
    ) -> Option<Teleport> {
        let (portal, exit) = self.linked(entered)?;

        *position = exit.position + exit.normal * settings.exit_distance + Vec3::UP * settings.exit_bump;

        let yaw_correction = if portal.normal.z != 0.0 || exit.normal.z != 0.0 {
            0.0
        } else {
            -signed_angle_between(Vec2::new(front.x, front.y), Vec2::new(exit.normal.x, exit.normal.y))
        };

        Some(Teleport {
            entered,
            yaw_correction,
        })
    }
}

//! Scene drawing
//!
//! Thin macroquad layer over the game state. The level and portals are
//! drawn as flat-colored meshes from the player's camera, then a second
//! pass renders the view through the most recently placed portal into an
//! offscreen target shown as an inset in the top-right corner.

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, vec3, Vec3 as GlVec3};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::{
    clear_background, draw_line, draw_rectangle_lines, draw_text, draw_texture_ex,
    render_target_ex, screen_height, screen_width, set_camera, set_default_camera, Camera3D,
    DrawTextureParams, FilterMode, RenderTarget, RenderTargetParams,
};
use crate::game::{PortalId, PortalPair, Runtime, ViewPose, PORTAL_INDICES};
use crate::geometry::Vec3;
use crate::world::LevelRecord;

const INSET_WIDTH: u32 = 320;
const INSET_HEIGHT: u32 = 240;
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

const SKY: Color = Color::new(0.08, 0.09, 0.11, 1.0);
const BLUE_PORTAL: Color = Color::new(0.16, 0.45, 1.0, 1.0);
const ORANGE_PORTAL: Color = Color::new(1.0, 0.55, 0.1, 1.0);

fn gl(v: Vec3) -> GlVec3 {
    vec3(v.x, v.y, v.z)
}

/// Portal-capable walls are white, everything else a shade of gray keyed
/// off the material id
pub fn material_color(material: i32, capable_material: i32) -> Color {
    if material == capable_material {
        return Color::new(0.92, 0.92, 0.9, 1.0);
    }
    let shade = 0.25 + 0.08 * (material.rem_euclid(5) as f32);
    Color::new(shade, shade, shade * 1.05, 1.0)
}

pub fn portal_color(id: PortalId) -> Color {
    match id {
        PortalId::Blue => BLUE_PORTAL,
        PortalId::Orange => ORANGE_PORTAL,
    }
}

/// Shade a face by how directly it faces up or sideways so walls stay
/// readable without lighting
fn face_shade(color: Color, normal: Vec3) -> Color {
    let k = 0.7 + 0.3 * normal.z.abs() + 0.15 * normal.x.abs();
    Color::new(
        (color.r * k).min(1.0),
        (color.g * k).min(1.0),
        (color.b * k).min(1.0),
        color.a,
    )
}

fn record_mesh(record: &LevelRecord, capable_material: i32) -> Mesh {
    let color = face_shade(material_color(record.material, capable_material), record.normal);
    let uvs = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let vertices = record
        .vertices
        .iter()
        .zip(uvs)
        .map(|(p, (u, v))| Vertex::new(p.x, p.y, p.z, u, v, color))
        .collect();
    Mesh { vertices, indices: QUAD_INDICES.to_vec(), texture: None }
}

fn camera_for(pose: &ViewPose, fov_degrees: f32, target: Option<&RenderTarget>) -> Camera3D {
    Camera3D {
        position: gl(pose.eye),
        target: gl(pose.target()),
        up: gl(pose.up),
        fovy: fov_degrees.to_radians(),
        render_target: target.cloned(),
        ..Default::default()
    }
}

/// Owns the GPU resources reused every frame
pub struct Renderer {
    level: Vec<Mesh>,
    inset: RenderTarget,
}

impl Renderer {
    pub fn new(records: &[LevelRecord], capable_material: i32) -> Self {
        let inset = render_target_ex(
            INSET_WIDTH,
            INSET_HEIGHT,
            RenderTargetParams { depth: true, ..Default::default() },
        );
        inset.texture.set_filter(FilterMode::Linear);
        Self {
            level: records.iter().map(|r| record_mesh(r, capable_material)).collect(),
            inset,
        }
    }

    fn draw_world(&self, portals: &PortalPair) {
        for mesh in &self.level {
            draw_mesh(mesh);
        }
        for id in PortalId::ALL {
            let Some(portal) = portals.get(id) else { continue };
            let color = portal_color(id);
            let vertices = portal
                .quad
                .iter()
                .map(|v| {
                    Vertex::new(v.position.x, v.position.y, v.position.z, v.uv.x, v.uv.y, color)
                })
                .collect();
            draw_mesh(&Mesh { vertices, indices: PORTAL_INDICES.to_vec(), texture: None });
        }
    }

    /// Draw one full frame
    pub fn draw(&self, runtime: &Runtime) {
        let fov = runtime.camera.zoom;

        clear_background(SKY);
        set_camera(&camera_for(&runtime.camera.pose(), fov, None));
        self.draw_world(&runtime.portals);

        let inset_source = runtime
            .last_placed
            .filter(|id| runtime.portals.linked(*id).is_some());
        if let Some(source) = inset_source {
            let pose = runtime.virtual_view(source);
            set_camera(&camera_for(&pose, fov, Some(&self.inset)));
            clear_background(SKY);
            self.draw_world(&runtime.portals);
        }

        set_default_camera();
        if let Some(source) = inset_source {
            self.draw_inset(source);
        }
        draw_crosshair();
        draw_hud(runtime);
    }

    fn draw_inset(&self, source: PortalId) {
        let w = INSET_WIDTH as f32;
        let h = INSET_HEIGHT as f32;
        let x = screen_width() - w - 10.0;
        let y = 10.0;
        draw_texture_ex(
            &self.inset.texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                flip_y: true,
                ..Default::default()
            },
        );
        draw_rectangle_lines(x, y, w, h, 2.0, portal_color(source));
    }
}

fn draw_crosshair() {
    let cx = screen_width() / 2.0;
    let cy = screen_height() / 2.0;
    draw_line(cx - 8.0, cy, cx + 8.0, cy, 1.0, WHITE);
    draw_line(cx, cy - 8.0, cx, cy + 8.0, 1.0, WHITE);
}

fn draw_hud(runtime: &Runtime) {
    let eye = runtime.eye();
    let status = |id: PortalId| if runtime.portals.exists(id) { "placed" } else { "-" };
    draw_text(
        &format!(
            "Pos: ({:.1}, {:.1}, {:.1}) | Blue: {} | Orange: {} | FOV: {:.0}",
            eye.x,
            eye.y,
            eye.z,
            status(PortalId::Blue),
            status(PortalId::Orange),
            runtime.camera.zoom,
        ),
        10.0,
        20.0,
        16.0,
        WHITE,
    );
    draw_text(
        "WASD move | Space jump | LMB blue | RMB orange | Wheel zoom | Esc quit",
        10.0,
        screen_height() - 10.0,
        14.0,
        Color::new(0.7, 0.7, 0.7, 1.0),
    );
}

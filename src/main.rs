//! Portal Demo: a first-person walk through an axis-aligned level
//!
//! - Levels are plain-text quad records; every face is split by axis into
//!   2D polygons used for floor landing, wall blocking and ray casts
//! - Two linked portals (blue/orange) can be shot onto white walls
//! - Walking into one portal teleports out of the other
//! - The view through the last placed portal is rendered as an inset

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod game;
mod geometry;
mod render;
mod settings;
mod world;

use clap::Parser;
use macroquad::logging::{error, info, warn};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

use game::{FrameInput, PortalId, Runtime};
use render::Renderer;
use settings::{load_settings, save_settings, Settings, SettingsError};
use world::{load_level, LevelRecord, PlaneIndex};

/// Feet position at startup
const SPAWN_FEET: geometry::Vec3 = geometry::Vec3 { x: 0.0, y: 0.0, z: 0.0 };

#[derive(Parser, Debug)]
#[command(name = "portal-demo")]
#[command(about = "First-person portal demo")]
struct Cli {
    /// Settings file (RON)
    #[arg(long, default_value = "assets/settings.ron")]
    settings: PathBuf,

    /// Level file, overrides the one named in the settings
    #[arg(long)]
    level: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Portal Demo v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn settings_or_default(cli: &Cli) -> Settings {
    match load_settings(&cli.settings) {
        Ok(settings) => {
            info!("Loaded settings from {}", cli.settings.display());
            settings
        }
        Err(SettingsError::IoError(e)) => {
            info!("No settings at {} ({}), using defaults", cli.settings.display(), e);
            let settings = Settings::default();
            if let Err(e) = save_settings(&settings, &cli.settings) {
                warn!("Could not write default settings to {}: {}", cli.settings.display(), e);
            }
            settings
        }
        Err(e) => {
            warn!("Ignoring settings file {}: {}", cli.settings.display(), e);
            Settings::default()
        }
    }
}

/// Load the level records and build the collision index. A broken level
/// leaves an empty world rather than aborting.
fn level_or_empty(path: &Path, settings: &Settings) -> (Vec<LevelRecord>, PlaneIndex) {
    match load_level(path) {
        Ok(records) => {
            let index = PlaneIndex::from_records(&records, settings.portal.capable_material);
            info!(
                "Loaded level {}: {} records, {} planes, {} portal surfaces",
                path.display(),
                records.len(),
                index.len(),
                index.portal_surface_count()
            );
            (records, index)
        }
        Err(e) => {
            error!("Failed to load level {}: {}", path.display(), e);
            (Vec::new(), PlaneIndex::new())
        }
    }
}

/// Map this frame's keyboard and mouse state onto game input
fn gather_input(settings: &Settings) -> FrameInput {
    // macroquad reports the delta as previous minus current position
    let delta = mouse_delta_position();
    let sensitivity = settings.camera.mouse_sensitivity;
    let (_, wheel) = mouse_wheel();

    let place = if is_mouse_button_pressed(MouseButton::Left) {
        Some(PortalId::Blue)
    } else if is_mouse_button_pressed(MouseButton::Right) {
        Some(PortalId::Orange)
    } else {
        None
    };

    FrameInput {
        forward: is_key_down(KeyCode::W),
        backward: is_key_down(KeyCode::S),
        left: is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::D),
        jump: is_key_pressed(KeyCode::Space),
        look: (-delta.x * sensitivity, delta.y * sensitivity),
        zoom: if wheel != 0.0 { wheel.signum() } else { 0.0 },
        place,
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let cli = Cli::parse();
    let mut settings = settings_or_default(&cli);
    if let Some(level) = &cli.level {
        settings.level_path = level.display().to_string();
    }

    let level_path = PathBuf::from(&settings.level_path);
    let (records, index) = level_or_empty(&level_path, &settings);
    let renderer = Renderer::new(&records, settings.portal.capable_material);
    let mut runtime = Runtime::new(settings, index, SPAWN_FEET);

    set_cursor_grab(true);
    show_mouse(false);

    info!("=== Portal Demo v{} ===", VERSION);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let input = gather_input(&runtime.settings);
        runtime.step(&input, get_frame_time());
        renderer.draw(&runtime);

        next_frame().await;
    }

    set_cursor_grab(false);
    show_mouse(true);
}

//! Demo settings
//!
//! Stored as RON. Every section has serde defaults, so a settings file only
//! needs the values it wants to change.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Error type for settings loading
#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        SettingsError::ParseError(e)
    }
}

impl From<ron::Error> for SettingsError {
    fn from(e: ron::Error) -> Self {
        SettingsError::SerializeError(e)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error: {}", e),
            SettingsError::ParseError(e) => write!(f, "Parse error: {}", e),
            SettingsError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SettingsError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Gravity and body dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Initial upward speed of a jump (units/s)
    pub jump_speed: f32,
    /// Camera height above the feet
    pub eye_height: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            jump_speed: 8.0,
            eye_height: 2.0,
        }
    }
}

/// First-person camera controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Walking speed (units/s)
    pub move_speed: f32,
    /// Radians of turn per unit of mouse delta
    pub mouse_sensitivity: f32,
    /// Initial vertical field of view
    pub fov_degrees: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            mouse_sensitivity: 1.5,
            fov_degrees: 45.0,
            zoom_min: 1.0,
            zoom_max: 45.0,
        }
    }
}

/// Portal quad size and teleport offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub width: f32,
    pub height: f32,
    /// Distance the quad floats off its host surface (avoids z-fighting)
    pub surface_offset: f32,
    /// Exit distance along the destination portal normal
    pub exit_distance: f32,
    /// Extra lift along world up when exiting
    pub exit_bump: f32,
    /// Level material id of surfaces that accept portals
    pub capable_material: i32,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            width: 1.5,
            height: 2.7,
            surface_offset: 0.01,
            exit_distance: 1.0,
            exit_bump: 2.0,
            capable_material: 3,
        }
    }
}

/// All demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level_path: String,
    pub physics: PhysicsSettings,
    pub camera: CameraSettings,
    pub portal: PortalSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_path: "assets/levels/map1.txt".to_string(),
            physics: PhysicsSettings::default(),
            camera: CameraSettings::default(),
            portal: PortalSettings::default(),
        }
    }
}

impl Settings {
    /// Reject values that would make the per-frame math divide by zero or
    /// produce degenerate portals
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("physics.gravity", self.physics.gravity),
            ("portal.width", self.portal.width),
            ("portal.height", self.portal.height),
            ("camera.zoom_min", self.camera.zoom_min),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::ValidationError(format!(
                    "{} must be positive, got {}", name, value
                )));
            }
        }

        let finite = [
            ("physics.jump_speed", self.physics.jump_speed),
            ("physics.eye_height", self.physics.eye_height),
            ("camera.move_speed", self.camera.move_speed),
            ("camera.mouse_sensitivity", self.camera.mouse_sensitivity),
            ("camera.fov_degrees", self.camera.fov_degrees),
            ("portal.surface_offset", self.portal.surface_offset),
            ("portal.exit_distance", self.portal.exit_distance),
            ("portal.exit_bump", self.portal.exit_bump),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::ValidationError(format!(
                    "{} must be finite, got {}", name, value
                )));
            }
        }

        if self.camera.zoom_max < self.camera.zoom_min {
            return Err(SettingsError::ValidationError(format!(
                "camera.zoom_max ({}) is below camera.zoom_min ({})",
                self.camera.zoom_max, self.camera.zoom_min
            )));
        }
        Ok(())
    }
}

/// Parse settings from a RON string
pub fn settings_from_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = ron::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    settings_from_str(&contents)
}

/// Save settings to a pretty-printed RON file
pub fn save_settings<P: AsRef<Path>>(settings: &Settings, path: P) -> Result<(), SettingsError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());
    let ron_string = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, ron_string)?;
    Ok(())
}

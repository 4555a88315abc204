//! Application configuration
//!
//! TOML-backed settings for the window, the projection and the scene.
//! Every section has defaults matching the renderer's native contract
//! (1024x720, 60 degree vertical field of view, near 0.3, far 20), so a
//! missing or partial file still yields a runnable setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Window title
    pub title: String,
    /// Target frames per second for the host's pacer
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 720,
            title: "Software Renderer".to_string(),
            target_fps: 30,
        }
    }
}

/// Perspective projection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near plane distance
    pub z_near: f32,
    /// Far plane distance
    pub z_far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            z_near: 0.3,
            z_far: 20.0,
        }
    }
}

/// One mesh entry in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneObjectConfig {
    /// Path to an OBJ file; `None` selects the built-in cube
    pub obj: Option<PathBuf>,
    /// Path to a PNG texture; `None` selects the built-in checkerboard
    pub texture: Option<PathBuf>,
    /// Initial translation
    pub translation: [f32; 3],
    /// Initial per-axis scale
    pub scale: [f32; 3],
    /// Initial euler rotation in radians
    pub rotation: [f32; 3],
}

impl Default for SceneObjectConfig {
    fn default() -> Self {
        Self {
            obj: None,
            texture: None,
            translation: [0.0, 0.0, 5.0],
            scale: [1.0, 1.0, 1.0],
            rotation: [0.0, 0.0, 0.0],
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Projection settings
    pub projection: ProjectionConfig,
    /// Scene content; empty means "one default cube"
    pub meshes: Vec<SceneObjectConfig>,
}

impl ApplicationConfig {
    /// Parse a TOML configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&text)?;
        log::info!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Vertical field of view in radians
    pub fn fov_y(&self) -> f32 {
        self.projection.fov_y_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_the_renderer_contract() {
        let config = ApplicationConfig::default();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 720);
        assert_relative_eq!(config.fov_y(), std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
        assert_relative_eq!(config.projection.z_near, 0.3);
        assert_relative_eq!(config.projection.z_far, 20.0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ApplicationConfig = toml::from_str(
            r#"
            [window]
            width = 640
            height = 480

            [[meshes]]
            translation = [0.0, 1.0, 8.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.title, "Software Renderer");
        assert_relative_eq!(config.projection.z_far, 20.0);
        assert_eq!(config.meshes.len(), 1);
        assert!(config.meshes[0].obj.is_none());
        assert_relative_eq!(config.meshes[0].translation[2], 8.0);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ApplicationConfig::default();
        let text = toml::to_string(&config).unwrap();
        let reparsed: ApplicationConfig = toml::from_str(&text).unwrap();
        assert_eq!(reparsed.window.width, config.window.width);
        assert_relative_eq!(reparsed.projection.fov_y_degrees, 60.0);
    }
}

//! TOML configuration. Every field has a default, so an empty file is valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    camera::{Camera, DEFAULT_PLANE_LEN},
    renderer::{Renderer, Shading},
    world::{DEFAULT_WALL_GLYPH, Grid, MapError},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub screen: ScreenConfig,
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub map: MapConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    pub width: usize,
    pub height: usize,
    /// Columns reserved on the right for the HUD.
    pub panel_width: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            panel_width: 20,
        }
    }
}

impl ScreenConfig {
    #[inline]
    pub fn view_width(&self) -> usize {
        self.width - self.panel_width
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    pub move_speed: f64,
    /// Radians per turn command.
    pub rot_speed: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.2,
            rot_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub start: [f64; 2],
    pub dir: [f64; 2],
    pub plane_len: f64,
    /// Horizontal field of view in degrees; overrides `plane_len` when set.
    pub fov: Option<f64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: [15.5, 9.5],
            dir: [-1.0, 0.0],
            plane_len: DEFAULT_PLANE_LEN,
            fov: None,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        let mut camera = Camera::looking(self.start, self.dir, self.plane_len);
        if let Some(fov) = self.fov {
            camera.set_fov_from_horizontal(fov);
        }
        camera
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub rows: Option<Vec<String>>,
    /// Takes precedence over `rows`.
    pub file: Option<PathBuf>,
    pub wall: char,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            rows: None,
            file: None,
            wall: DEFAULT_WALL_GLYPH,
        }
    }
}

impl MapConfig {
    pub fn build(&self) -> Result<Grid, MapError> {
        match (&self.file, &self.rows) {
            (Some(path), _) => Grid::load(path, self.wall),
            (None, Some(rows)) => Grid::from_rows(rows, self.wall),
            (None, None) => Ok(Grid::default_level()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub parallel: bool,
    pub max_steps: Option<usize>,
    pub shading: Shading,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_steps: None,
            shading: Shading::default(),
        }
    }
}

impl RenderConfig {
    pub fn build(&self) -> Renderer {
        Renderer {
            shading: self.shading.clone(),
            max_steps: self.max_steps,
            parallel: self.parallel,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let s = &self.screen;
        if s.width == 0 || s.height == 0 {
            return invalid("screen width and height must be positive");
        }
        if s.panel_width >= s.width {
            return invalid("panel_width must leave room for the view");
        }

        let m = &self.movement;
        if !(m.move_speed.is_finite() && m.move_speed > 0.0) {
            return invalid("move_speed must be a positive number");
        }
        if !(m.rot_speed.is_finite() && m.rot_speed > 0.0) {
            return invalid("rot_speed must be a positive number");
        }

        let c = &self.camera;
        if !(c.plane_len.is_finite() && c.plane_len > 0.0) {
            return invalid("plane_len must be a positive number");
        }
        if c.fov.is_some_and(|f| !(f > 0.0 && f < 180.0)) {
            return invalid("fov must be between 0 and 180 degrees");
        }
        if c.dir == [0.0, 0.0] || !c.dir.iter().chain(&c.start).all(|v| v.is_finite()) {
            return invalid("camera start and dir must be finite and dir non-zero");
        }

        let t = &self.render.shading.thresholds;
        if !(t[0] > 0.0 && t[0] < t[1] && t[1] < t[2]) {
            return invalid("shading thresholds must be positive and ascending");
        }
        if self.render.max_steps == Some(0) {
            return invalid("max_steps must be at least 1");
        }
        Ok(())
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::math::Color;

pub const DEFAULT_GEOMETRY: &str = "BoxGeometry";
pub const DEFAULT_MATERIAL: &str = "MeshBasicMaterial";
pub const DEFAULT_SIZE: f32 = 0.5;

/// Display options for one backdrop object
///
/// Geometry and material are kept as the names the host supplies; they are
/// resolved when a session is built so that unknown names can fall back
/// instead of failing the whole configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub geometry: String,
    pub material: String,
    pub color: Color,
    pub wireframe: bool,
    pub size: f32,
    pub animation: bool,
    #[serde(alias = "pointerControl", alias = "mouseControl")]
    pub pointer_control: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            geometry: DEFAULT_GEOMETRY.to_string(),
            material: DEFAULT_MATERIAL.to_string(),
            color: Color::default(),
            wireframe: false,
            size: DEFAULT_SIZE,
            animation: true,
            pointer_control: false,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(SceneError::InvalidSize(self.size));
        }
        Ok(())
    }
}

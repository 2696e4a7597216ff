// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::SceneConfig;
use crate::error::Result;
use crate::math::Color;

pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 600;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-backdrop")]
#[command(about = "Animated 3D backdrop", long_about = None)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Geometry name, e.g. BoxGeometry, TorusKnotGeometry or sphere
    #[arg(long, short = 'g')]
    pub geometry: Option<String>,

    /// Material name, e.g. MeshPhongMaterial or normal
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Hex color (#rgb or #rrggbb)
    #[arg(long)]
    pub color: Option<Color>,

    #[arg(long)]
    pub wireframe: bool,

    /// Size factor, must be positive
    #[arg(long)]
    pub size: Option<f32>,

    /// Keep the object still
    #[arg(long = "no-animation")]
    pub no_animation: bool,

    /// Move the camera with the pointer
    #[arg(long = "pointer-control")]
    pub pointer_control: bool,

    #[arg(long, default_value_t = DEFAULT_WINDOW_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_WINDOW_HEIGHT)]
    pub height: u32,
}

impl Cli {
    /// Configuration file values with flag overrides applied
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load_from_file(path)?,
            None => SceneConfig::default(),
        };

        if let Some(geometry) = &self.geometry {
            config.geometry = geometry.clone();
        }
        if let Some(material) = &self.material {
            config.material = material.clone();
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if self.wireframe {
            config.wireframe = true;
        }
        if self.no_animation {
            config.animation = false;
        }
        if self.pointer_control {
            config.pointer_control = true;
        }

        config.validate()?;
        Ok(config)
    }
}

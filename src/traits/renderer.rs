use super::host::OutputId;
use crate::camera::PerspectiveCamera;
use crate::core::Dimensions;
use crate::error::Result;
use crate::math::Color;
use crate::scene::Scene;

/// Creation options for a render surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Composite over whatever is behind the container
    pub alpha: bool,
    pub antialias: bool,
    pub clear_color: Color,
    pub clear_alpha: f32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            clear_color: Color::BLACK,
            clear_alpha: 0.0,
        }
    }
}

/// Drawable output bound to a container
pub trait RenderSurface {
    /// Element to attach to the container
    fn output(&self) -> OutputId;

    fn set_size(&mut self, size: Dimensions);

    /// Draw the scene as seen through the camera
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;

    /// Release graphics resources; later calls are no-ops
    fn dispose(&mut self);
}

/// Rendering context owned by the caller and handed to each session
pub trait Engine {
    type Surface: RenderSurface;

    fn create_surface(&mut self, size: Dimensions, options: SurfaceOptions) -> Result<Self::Surface>;
}

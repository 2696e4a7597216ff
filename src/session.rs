//! One live backdrop: surface, scene, camera, listeners and frame loop.
//!
//! A session is built synchronously by [`SceneSession::initialize`] and torn
//! down by [`SceneSession::dispose`]. Everything it registered with the host
//! is recorded in its teardown list, so disposal is idempotent and never
//! touches a resource it did not create.

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::core::Dimensions;
use crate::error::Result;
use crate::geometry::GeometryKind;
use crate::material::Material;
use crate::math::Color;
use crate::scene::{
    Light, Mesh, Scene, AMBIENT_INTENSITY, DIRECTIONAL_INTENSITY, DIRECTIONAL_POSITION,
};
use crate::traits::{
    Container, Engine, FrameHandle, Host, ListenerId, OutputId, PointerEvent, Rect,
    RenderSurface, SurfaceOptions,
};

/// Radians added to the mesh X and Y rotation each frame
pub const ROTATION_STEP: f32 = 0.01;

/// Camera travel for a pointer at the container edge
pub const POINTER_RANGE: f32 = 2.0;

/// Uniform mesh scale for a container of `size` and a size option of `size_factor`
pub fn mesh_scale(size: Dimensions, size_factor: f32) -> f32 {
    (size.min_side() as f32 / 100.0) * (size_factor / 3.0)
}

/// Pointer position mapped into [-1, 1] on both axes, Y pointing up
pub fn normalized_pointer(rect: &Rect, event: &PointerEvent) -> Option<(f32, f32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = ((event.client_x - rect.left) / rect.width) * 2.0 - 1.0;
    let y = -((event.client_y - rect.top) / rect.height) * 2.0 + 1.0;
    Some((x, y))
}

/// Everything registered with the host and container
#[derive(Debug)]
struct Teardown {
    resize_listener: ListenerId,
    pointer_listener: Option<ListenerId>,
    output: OutputId,
}

pub struct SceneSession<S: RenderSurface> {
    config: SceneConfig,
    surface: S,
    scene: Scene,
    camera: PerspectiveCamera,
    size: Dimensions,
    pending_frame: Option<FrameHandle>,
    teardown: Option<Teardown>,
}

impl<S: RenderSurface> SceneSession<S> {
    /// Build a session inside `container`
    ///
    /// Returns `Ok(None)` without touching anything when the container is not
    /// attached yet. An invalid size is rejected before anything is created.
    pub fn initialize<E, H, C>(
        engine: &mut E,
        host: &mut H,
        container: &mut C,
        config: &SceneConfig,
    ) -> Result<Option<Self>>
    where
        E: Engine<Surface = S>,
        H: Host,
        C: Container,
    {
        config.validate()?;

        if !container.is_attached() {
            log::debug!("Container not attached, skipping scene setup");
            return Ok(None);
        }

        let size = container.client_size().or(host.window_size());

        let mut surface = engine.create_surface(size, SurfaceOptions::default())?;
        surface.set_size(size);
        let output = surface.output();
        container.append_output(output);

        let mut scene = Scene::new();
        let camera = PerspectiveCamera::backdrop(size.aspect());

        scene.add_light(Light::ambient(Color::WHITE, AMBIENT_INTENSITY));
        scene.add_light(Light::directional(
            Color::WHITE,
            DIRECTIONAL_INTENSITY,
            DIRECTIONAL_POSITION,
        ));

        let geometry = GeometryKind::from_name(&config.geometry);
        let material = Material::from_config(&config.material, config.color, config.wireframe)
            .unwrap_or_else(|err| {
                log::error!("Material error: {}", err);
                Material::fallback()
            });

        let mut mesh = Mesh::new(geometry, material);
        mesh.transform.set_uniform_scale(mesh_scale(size, config.size));
        scene.add_mesh(mesh);

        let pointer_listener = config
            .pointer_control
            .then(|| container.add_pointer_listener());
        let resize_listener = host.add_resize_listener();

        log::info!(
            "Scene ready: {} / {} at {}x{}",
            geometry.name(),
            material.kind.name(),
            size.width,
            size.height
        );

        let mut session = Self {
            config: config.clone(),
            surface,
            scene,
            camera,
            size,
            pending_frame: None,
            teardown: Some(Teardown {
                resize_listener,
                pointer_listener,
                output,
            }),
        };
        session.pending_frame = Some(host.request_animation_frame());

        Ok(Some(session))
    }

    /// Per-frame callback: reschedule, rotate if animated, render
    pub fn animate<H: Host>(&mut self, host: &mut H) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }

        self.pending_frame = Some(host.request_animation_frame());

        if self.config.animation {
            for mesh in self.scene.meshes_mut() {
                mesh.transform.rotation.x += ROTATION_STEP;
                mesh.transform.rotation.y += ROTATION_STEP;
            }
        }

        self.surface.render(&self.scene, &self.camera)
    }

    /// Move the camera with the pointer; returns whether the camera moved
    pub fn handle_pointer_move<C: Container>(&mut self, container: &C, event: PointerEvent) -> bool {
        if self.is_disposed() || !self.config.pointer_control {
            return false;
        }

        let rect = container.bounding_rect();
        let Some((x, y)) = normalized_pointer(&rect, &event) else {
            return false;
        };

        self.camera.position.x = x * POINTER_RANGE;
        self.camera.position.y = y * POINTER_RANGE;
        self.camera.look_at(self.scene.position);
        true
    }

    pub fn handle_resize<H: Host, C: Container>(&mut self, host: &H, container: &C) {
        if self.is_disposed() {
            return;
        }

        let size = container.client_size().or(host.window_size());
        if size.is_empty() {
            log::debug!("Ignoring resize to an empty area");
            return;
        }
        self.size = size;
        self.surface.set_size(size);
        self.camera.aspect = size.aspect();
        self.camera.update_projection_matrix();
        log::debug!("Resized scene to {}x{}", size.width, size.height);
    }

    /// Undo everything `initialize` registered; safe to call repeatedly
    pub fn dispose<H: Host, C: Container>(&mut self, host: &mut H, container: &mut C) {
        let Some(teardown) = self.teardown.take() else {
            return;
        };

        host.remove_resize_listener(teardown.resize_listener);
        if let Some(id) = teardown.pointer_listener {
            container.remove_pointer_listener(id);
        }
        if let Some(handle) = self.pending_frame.take() {
            host.cancel_animation_frame(handle);
        }

        self.surface.dispose();
        if container.contains_output(teardown.output) {
            container.remove_output(teardown.output);
        }

        log::debug!("Scene disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.teardown.is_none()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// The single backdrop mesh
    pub fn mesh(&self) -> Option<&Mesh> {
        self.scene.meshes().first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_formula() {
        let scale = mesh_scale(Dimensions::new(400, 300), 0.5);
        assert!((scale - 0.5).abs() < 1e-6);

        let scale = mesh_scale(Dimensions::new(1920, 1080), 3.0);
        assert!((scale - 10.8).abs() < 1e-5);
    }

    #[test]
    fn test_normalized_pointer_corners() {
        let rect = Rect::new(100.0, 50.0, 400.0, 300.0);

        let top_left = normalized_pointer(&rect, &PointerEvent::new(100.0, 50.0)).unwrap();
        assert_eq!(top_left, (-1.0, 1.0));

        let bottom_right = normalized_pointer(&rect, &PointerEvent::new(500.0, 350.0)).unwrap();
        assert_eq!(bottom_right, (1.0, -1.0));

        let center = normalized_pointer(&rect, &PointerEvent::new(300.0, 200.0)).unwrap();
        assert_eq!(center, (0.0, 0.0));
    }

    #[test]
    fn test_normalized_pointer_degenerate_rect() {
        let rect = Rect::new(0.0, 0.0, 0.0, 300.0);
        assert!(normalized_pointer(&rect, &PointerEvent::new(1.0, 1.0)).is_none());
    }
}

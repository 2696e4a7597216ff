use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scene_backdrop::cli::Cli;
use scene_backdrop::core::{WgpuEngine, WindowContainer, WindowHost};
use scene_backdrop::traits::PointerEvent;
use scene_backdrop::{GeometryKind, MaterialKind, SceneConfig, SceneMount};

type Mount = SceneMount<WgpuEngine, WindowHost, WindowContainer>;

const WINDOW_TITLE: &str = "Scene Backdrop";

struct App {
    cli: Cli,
    config: SceneConfig,
    window: Option<Arc<Window>>,
    mount: Option<Mount>,
}

impl App {
    fn new(cli: Cli, config: SceneConfig) -> Self {
        Self {
            cli,
            config,
            window: None,
            mount: None,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mount) = self.mount.as_mut() {
            mount.unmount();
        }
        event_loop.exit();
    }

    /// Title the window after the readiness flag
    fn sync_title(&self) {
        let (Some(window), Some(mount)) = (&self.window, &self.mount) else {
            return;
        };
        if !mount.is_ready() {
            log::warn!("Scene not ready, showing placeholder");
        }
        window.set_title(&window_title(mount.is_ready()));
    }

    fn apply_key(&mut self, key: KeyCode) {
        let Some(mount) = self.mount.as_mut() else {
            return;
        };

        let mut config = mount.config().clone();
        match key {
            KeyCode::KeyG => config.geometry = next_geometry(&config.geometry).name().to_string(),
            KeyCode::KeyM => config.material = next_material(&config.material).name().to_string(),
            KeyCode::KeyW => config.wireframe = !config.wireframe,
            KeyCode::KeyA => config.animation = !config.animation,
            _ => return,
        }

        log::info!(
            "Switching to {} / {}{}",
            config.geometry,
            config.material,
            if config.wireframe { " (wireframe)" } else { "" }
        );
        if let Err(e) = mount.update_config(config) {
            log::error!("Failed to rebuild scene: {}", e);
        }
        self.sync_title();
    }
}

fn window_title(ready: bool) -> String {
    if ready {
        WINDOW_TITLE.to_string()
    } else {
        format!("{} (not ready)", WINDOW_TITLE)
    }
}

fn next_geometry(current: &str) -> GeometryKind {
    let current = GeometryKind::from_name(current);
    let index = GeometryKind::ALL
        .iter()
        .position(|&kind| kind == current)
        .unwrap_or(0);
    GeometryKind::ALL[(index + 1) % GeometryKind::ALL.len()]
}

fn next_material(current: &str) -> MaterialKind {
    let index = MaterialKind::from_name(current)
        .ok()
        .and_then(|current| MaterialKind::ALL.iter().position(|&kind| kind == current))
        .unwrap_or(0);
    MaterialKind::ALL[(index + 1) % MaterialKind::ALL.len()]
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_transparent(true)
                .with_inner_size(winit::dpi::PhysicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let mut mount = SceneMount::new(
            WgpuEngine::new(window.clone()),
            WindowHost::new(window.clone()),
            WindowContainer::new(window.clone()),
            self.config.clone(),
        );
        if let Err(e) = mount.mount() {
            log::error!("Failed to initialize scene: {}", e);
            event_loop.exit();
            return;
        }

        self.window = Some(window);
        self.mount = Some(mount);
        self.sync_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.apply_key(key),
            WindowEvent::Resized(_) => {
                if let Some(mount) = self.mount.as_mut() {
                    if mount.host().has_resize_listeners() {
                        mount.on_resize();
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(mount) = self.mount.as_mut() {
                    if mount.container().has_pointer_listeners() {
                        mount.on_pointer_move(PointerEvent::new(position.x as f32, position.y as f32));
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(mount) = self.mount.as_mut() {
                    for handle in mount.host_mut().take_due_frames() {
                        mount.on_animation_frame(handle);
                    }
                }
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.scene_config().context("Invalid scene configuration")?;
    log::debug!("Starting with {:?}", config);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_marks_placeholder() {
        assert_eq!(window_title(true), "Scene Backdrop");
        assert_eq!(window_title(false), "Scene Backdrop (not ready)");
    }

    #[test]
    fn test_key_cycles_wrap_around() {
        assert_eq!(next_geometry("SphereGeometry"), GeometryKind::Box);
        assert_eq!(next_geometry("unknown"), GeometryKind::Torus);
        assert_eq!(next_material("MeshNormalMaterial"), MaterialKind::Basic);
        assert_eq!(next_material("MeshToonMaterial"), MaterialKind::Lambert);
    }
}

use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Instance, Limits, Queue, Surface};
use winit::window::Window;

use super::surface_renderer::MeshSurfaceRenderer;
use super::window::Dimensions;
use crate::error::{Result, SceneError};
use crate::traits::{Engine, OutputId, SurfaceOptions};

/// Adapter, device and queue shared by every surface of an engine
pub struct GpuContext {
    adapter: Adapter,
    device: Device,
    queue: Queue,
}

impl GpuContext {
    /// Create a GPU context compatible with a surface (for window rendering)
    ///
    /// This ensures the adapter is compatible with the provided surface.
    pub async fn new_with_surface(instance: &Instance, surface: &Surface<'_>) -> Result<Self> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SceneError::Surface(format!("Failed to find appropriate adapter: {:?}", e)))
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| SceneError::Surface(format!("Failed to create device: {:?}", e)))
    }
}

/// Engine drawing into a winit window
///
/// The GPU context is created with the first surface and reused by every
/// later session on the same window.
pub struct WgpuEngine {
    window: Arc<Window>,
    instance: Instance,
    gpu: Option<Arc<GpuContext>>,
    next_output: u64,
}

impl WgpuEngine {
    pub fn new(window: Arc<Window>) -> Self {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        Self {
            window,
            instance,
            gpu: None,
            next_output: 0,
        }
    }
}

impl Engine for WgpuEngine {
    type Surface = MeshSurfaceRenderer;

    fn create_surface(&mut self, size: Dimensions, options: SurfaceOptions) -> Result<Self::Surface> {
        let surface = self
            .instance
            .create_surface(self.window.clone())
            .map_err(|e| SceneError::Surface(e.to_string()))?;

        let gpu = match &self.gpu {
            Some(gpu) => gpu.clone(),
            None => {
                let gpu = Arc::new(pollster::block_on(GpuContext::new_with_surface(
                    &self.instance,
                    &surface,
                ))?);
                self.gpu = Some(gpu.clone());
                gpu
            }
        };

        self.next_output += 1;
        MeshSurfaceRenderer::new(gpu, surface, OutputId(self.next_output), size, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_context_shared_by_arc() {
        // GpuContext creation requires actual GPU hardware
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arc<GpuContext>>();
    }
}

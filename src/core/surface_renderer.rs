use std::sync::Arc;
use glam::Vec3;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, TextureView};

use super::gpu_context::GpuContext;
use super::window::Dimensions;
use crate::camera::PerspectiveCamera;
use crate::error::{Result, SceneError};
use crate::scene::{Mesh, Scene};
use crate::traits::{OutputId, RenderSurface, SurfaceOptions};
use crate::types::{MeshUniform, MeshVertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

/// GPU buffers for one scene mesh
struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    line_buffer: Buffer,
    line_count: u32,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
}

/// Draws a [`Scene`] onto a window surface
///
/// Meshes are uploaded on the first frame and kept until the scene's mesh
/// count changes. Wireframe materials are drawn as a line list over the
/// triangle edges.
pub struct MeshSurfaceRenderer {
    gpu: Arc<GpuContext>,
    surface: Option<Surface<'static>>,
    surface_config: SurfaceConfiguration,
    output: OutputId,
    options: SurfaceOptions,
    sample_count: u32,
    bind_group_layout: BindGroupLayout,
    fill_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    depth_view: TextureView,
    msaa_view: Option<TextureView>,
    meshes: Vec<GpuMesh>,
}

impl MeshSurfaceRenderer {
    pub fn new(
        gpu: Arc<GpuContext>,
        surface: Surface<'static>,
        output: OutputId,
        size: Dimensions,
        options: SurfaceOptions,
    ) -> Result<Self> {
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| SceneError::Surface("Surface reports no formats".into()))?;

        let alpha_mode = Self::pick_alpha_mode(&surface_caps.alpha_modes, options.alpha);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let sample_count = if options.antialias
            && gpu
                .adapter()
                .get_texture_format_features(surface_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };

        let bind_group_layout = Self::create_bind_group_layout(gpu.device());
        let shader = gpu.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../mesh.wgsl").into()),
        });

        let fill_pipeline = Self::create_render_pipeline(
            gpu.device(),
            &bind_group_layout,
            &shader,
            surface_format,
            sample_count,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = Self::create_render_pipeline(
            gpu.device(),
            &bind_group_layout,
            &shader,
            surface_format,
            sample_count,
            wgpu::PrimitiveTopology::LineList,
        );

        let depth_view = Self::create_attachment(gpu.device(), DEPTH_FORMAT, width, height, sample_count);
        let msaa_view = (sample_count > 1)
            .then(|| Self::create_attachment(gpu.device(), surface_format, width, height, sample_count));

        Ok(Self {
            gpu,
            surface: Some(surface),
            surface_config,
            output,
            options,
            sample_count,
            bind_group_layout,
            fill_pipeline,
            line_pipeline,
            depth_view,
            msaa_view,
            meshes: Vec::new(),
        })
    }

    /// Get current surface dimensions
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.surface_config.width, self.surface_config.height)
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode], transparent: bool) -> wgpu::CompositeAlphaMode {
        let preferred = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ];
        if transparent {
            if let Some(mode) = preferred.iter().find(|m| modes.contains(*m)) {
                return *mode;
            }
        }
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }

    /// Upload meshes the GPU has not seen yet
    fn sync_meshes(&mut self, scene: &Scene) {
        if self.meshes.len() == scene.meshes().len() {
            return;
        }

        let device = self.gpu.device();
        self.meshes = scene
            .meshes()
            .iter()
            .map(|mesh| Self::upload_mesh(device, &self.bind_group_layout, mesh))
            .collect();
    }

    fn upload_mesh(device: &Device, layout: &BindGroupLayout, mesh: &Mesh) -> GpuMesh {
        let lines = mesh.data.edge_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let line_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Edge Buffer"),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Uniform Buffer"),
            size: std::mem::size_of::<MeshUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.data.indices.len() as u32,
            line_buffer,
            line_count: lines.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_render_pipeline(
        device: &Device,
        bind_group_layout: &BindGroupLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        topology: wgpu::PrimitiveTopology,
    ) -> RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    /// Depth or multisampled color target matching the surface size
    fn create_attachment(
        device: &Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Surface Attachment"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Uniform block for one mesh as seen through `camera`
pub fn mesh_uniform(scene: &Scene, camera: &PerspectiveCamera, mesh: &Mesh) -> MeshUniform {
    let model = mesh.transform.matrix();
    let normal_matrix = model.inverse().transpose();
    let color = mesh.material.color.to_linear();
    let (ambient, (direction, light)) = if mesh.material.kind.is_lit() {
        (
            scene.ambient_light(),
            scene.key_light().unwrap_or((Vec3::Z, [0.0; 3])),
        )
    } else {
        ([0.0; 3], (Vec3::Z, [0.0; 3]))
    };

    MeshUniform {
        view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        model: model.to_cols_array_2d(),
        normal_matrix: normal_matrix.to_cols_array_2d(),
        color: [color[0], color[1], color[2], 1.0],
        ambient: [ambient[0], ambient[1], ambient[2], 0.0],
        light_direction: direction.extend(0.0).to_array(),
        light_color: [light[0], light[1], light[2], 0.0],
        camera_position: camera.position.extend(1.0).to_array(),
        shading: [mesh.material.kind.shading_model(), 0, 0, 0],
    }
}

impl RenderSurface for MeshSurfaceRenderer {
    fn output(&self) -> OutputId {
        self.output
    }

    fn set_size(&mut self, size: Dimensions) {
        if size.is_empty() || self.is_disposed() {
            return;
        }
        if size == self.dimensions() {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        if let Some(surface) = &self.surface {
            surface.configure(self.gpu.device(), &self.surface_config);
        }

        let device = self.gpu.device();
        self.depth_view =
            Self::create_attachment(device, DEPTH_FORMAT, size.width, size.height, self.sample_count);
        if self.sample_count > 1 {
            self.msaa_view = Some(Self::create_attachment(
                device,
                self.surface_config.format,
                size.width,
                size.height,
                self.sample_count,
            ));
        }
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        self.sync_meshes(scene);

        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let surface_texture = match surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(SceneError::Render(e.to_string())),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        for (mesh, gpu_mesh) in scene.meshes().iter().zip(&self.meshes) {
            let uniform = mesh_uniform(scene, camera, mesh);
            self.gpu
                .queue()
                .write_buffer(&gpu_mesh.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let clear = self.options.clear_color.to_linear();
        let (view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Mesh Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: self.options.clear_alpha as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (mesh, gpu_mesh) in scene.meshes().iter().zip(&self.meshes) {
                let (pipeline, indices, count) = if mesh.material.wireframe {
                    (&self.line_pipeline, &gpu_mesh.line_buffer, gpu_mesh.line_count)
                } else {
                    (&self.fill_pipeline, &gpu_mesh.index_buffer, gpu_mesh.index_count)
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &gpu_mesh.bind_group, &[]);
                render_pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..count, 0, 0..1);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }

    fn dispose(&mut self) {
        if self.surface.take().is_some() {
            self.meshes.clear();
            log::debug!("Released render surface {:?}", self.output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryKind;
    use crate::material::{Material, MaterialKind};
    use crate::math::Color;
    use crate::scene::{Light, DIRECTIONAL_POSITION};

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_light(Light::ambient(Color::WHITE, 0.7));
        scene.add_light(Light::directional(Color::WHITE, 0.7, DIRECTIONAL_POSITION));
        scene
    }

    #[test]
    fn test_uniform_carries_material() {
        let scene = lit_scene();
        let camera = PerspectiveCamera::backdrop(1.0);
        let mesh = Mesh::new(
            GeometryKind::Box,
            Material::new(MaterialKind::Phong, Color::WHITE, false),
        );

        let uniform = mesh_uniform(&scene, &camera, &mesh);
        assert_eq!(uniform.shading[0], MaterialKind::Phong.shading_model());
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.camera_position, [0.0, 0.0, 3.0, 1.0]);
        assert!((uniform.ambient[0] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_scale_in_model_matrix() {
        let scene = lit_scene();
        let camera = PerspectiveCamera::backdrop(1.0);
        let mut mesh = Mesh::new(GeometryKind::Sphere, Material::fallback());
        mesh.transform.set_uniform_scale(2.0);

        let uniform = mesh_uniform(&scene, &camera, &mesh);
        assert_eq!(uniform.model[0][0], 2.0);
        assert_eq!(uniform.model[1][1], 2.0);
        assert_eq!(uniform.model[2][2], 2.0);
        // Inverse transpose of a uniform scale
        assert!((uniform.normal_matrix[0][0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unlit_scene_has_no_key_light() {
        let scene = Scene::new();
        let camera = PerspectiveCamera::backdrop(1.0);
        let mesh = Mesh::new(GeometryKind::Box, Material::fallback());

        let uniform = mesh_uniform(&scene, &camera, &mesh);
        assert_eq!(uniform.light_color, [0.0; 4]);
        assert_eq!(uniform.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unlit_material_ignores_lights() {
        let scene = lit_scene();
        let camera = PerspectiveCamera::backdrop(1.0);
        let mesh = Mesh::new(
            GeometryKind::Torus,
            Material::new(MaterialKind::Basic, Color::WHITE, false),
        );

        let uniform = mesh_uniform(&scene, &camera, &mesh);
        assert_eq!(uniform.ambient, [0.0; 4]);
        assert_eq!(uniform.light_color, [0.0; 4]);
        assert_eq!(uniform.light_direction, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_alpha_mode_prefers_premultiplied_when_transparent() {
        use wgpu::CompositeAlphaMode::*;
        let modes = [Opaque, PreMultiplied];
        assert_eq!(MeshSurfaceRenderer::pick_alpha_mode(&modes, true), PreMultiplied);
        assert_eq!(MeshSurfaceRenderer::pick_alpha_mode(&modes, false), Opaque);
        assert_eq!(MeshSurfaceRenderer::pick_alpha_mode(&[Opaque], true), Opaque);
        assert_eq!(MeshSurfaceRenderer::pick_alpha_mode(&[], true), Auto);
    }
}

//! Forward Renderer
//!
//! The [`Renderer`] owns the GPU context, the two render pipelines (lit
//! triangles, unlit points) and the GPU buffers of the currently loaded
//! model. Each frame it refreshes a single uniform block from the scene and
//! draws into the window surface.

use glam::{Mat4, Vec3, Vec4};
use rustc_hash::FxHashMap;
use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::errors::Result;
use crate::resources::{Geometry, Material, Topology};
use crate::scene::{LightKind, Scene};

use super::context::GpuContext;

const SHADER: &str = include_str!("shader.wgsl");

// ============================================================================
// GPU Data Layouts
// ============================================================================

/// Interleaved vertex as uploaded to the GPU.
///
/// Geometries without normals or colors fill the missing attribute with a
/// neutral value so both pipelines can share one layout.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU mirror of the `FrameUniforms` block in `shader.wgsl`.
///
/// All vectors are padded to 16 bytes to satisfy WGSL uniform layout rules.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view_projection: Mat4,
    model: Mat4,
    ambient_color: Vec4,
    light_direction: Vec4,
    light_color: Vec4,
    base_color: Vec4,
    flags: [u32; 4],
}

/// GPU-resident buffers for one geometry.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    vertex_count: u32,
    topology: Topology,
}

// ============================================================================
// Renderer
// ============================================================================

pub struct Renderer {
    pub ctx: GpuContext,

    mesh_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    /// Uploaded geometries keyed by geometry UUID. The viewer shows a single
    /// model, so inserting a new entry evicts everything else.
    meshes: FxHashMap<Uuid, GpuMesh>,
}

impl Renderer {
    /// Creates the GPU context for `window` and builds the fixed pipeline set.
    ///
    /// # Errors
    ///
    /// Propagates every failure from [`GpuContext::new`].
    pub async fn new<W>(window: W, width: u32, height: u32, vsync: bool) -> Result<Self>
    where
        W: raw_window_handle::HasWindowHandle
            + raw_window_handle::HasDisplayHandle
            + Send
            + Sync
            + 'static,
    {
        let ctx = GpuContext::new(window, width, height, vsync).await?;
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER)),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model Pipeline Layout"),
            bind_group_layouts: &[Some(&frame_layout)],
            immediate_size: 0,
        });

        let mesh_pipeline = Self::build_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ctx.color_format(),
            ctx.depth_format,
            wgpu::PrimitiveTopology::TriangleList,
            "Mesh Pipeline",
        );
        let point_pipeline = Self::build_pipeline(
            device,
            &pipeline_layout,
            &shader,
            ctx.color_format(),
            ctx.depth_format,
            wgpu::PrimitiveTopology::PointList,
            "Point Cloud Pipeline",
        );

        Ok(Self {
            ctx,
            mesh_pipeline,
            point_pipeline,
            frame_buffer,
            frame_bind_group,
            meshes: FxHashMap::default(),
        })
    }

    fn build_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        label: &str,
    ) -> wgpu::RenderPipeline {
        let cull_mode = match topology {
            wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
            _ => None,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: Some(true),
                depth_compare: Some(wgpu::CompareFunction::Less),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Renders one frame of `scene` into the window surface.
    ///
    /// An empty scene still clears to the background color, so the viewer
    /// shows its backdrop while a model is loading.
    pub fn render(&mut self, scene: &Scene) {
        let (width, height) = self.ctx.size();
        if width == 0 || height == 0 {
            return;
        }

        let bg = scene.background;
        self.ctx.clear_color = wgpu::Color {
            r: f64::from(bg.x),
            g: f64::from(bg.y),
            b: f64::from(bg.z),
            a: 1.0,
        };

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            wgpu::CurrentSurfaceTexture::Lost => {
                self.ctx.resize(width, height);
                return;
            }
            e => {
                log::error!("Failed to acquire surface frame: {e:?}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draw = scene.model().filter(|mesh| mesh.visible).map(|mesh| {
            let uniforms = Self::build_uniforms(scene, mesh.transform.matrix(), &mesh.material);
            self.ctx
                .queue
                .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));
            self.prepare_mesh(&mesh.geometry)
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.ctx.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(id) = draw
                && let Some(gpu_mesh) = self.meshes.get(&id)
            {
                let pipeline = match gpu_mesh.topology {
                    Topology::TriangleList => &self.mesh_pipeline,
                    Topology::PointList => &self.point_pipeline,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));

                if let Some(index_buffer) = &gpu_mesh.index_buffer {
                    pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
                } else {
                    pass.draw(0..gpu_mesh.vertex_count, 0..1);
                }
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Collects the light terms and material parameters for the frame.
    ///
    /// Ambient contributions accumulate; for directional lights the last one
    /// wins. The viewer builds scenes with exactly one of each.
    fn build_uniforms(scene: &Scene, model: Mat4, material: &Material) -> FrameUniforms {
        let mut ambient = Vec3::ZERO;
        let mut light_direction = Vec3::ONE;
        let mut light_color = Vec3::ZERO;

        for light in scene.lights.values() {
            match light.kind {
                LightKind::Ambient => ambient += light.color * light.intensity,
                LightKind::Directional { direction } => {
                    light_direction = direction;
                    light_color = light.color * light.intensity;
                }
            }
        }

        FrameUniforms {
            view_projection: scene.camera.view_projection_matrix(),
            model,
            ambient_color: ambient.extend(0.0),
            light_direction: light_direction.extend(0.0),
            light_color: light_color.extend(0.0),
            base_color: material.base_color.extend(1.0),
            flags: [material.features.bits(), 0, 0, 0],
        }
    }

    /// Ensures `geometry` is resident on the GPU and returns its cache key.
    fn prepare_mesh(&mut self, geometry: &Geometry) -> Uuid {
        let id = geometry.uuid;
        if !self.meshes.contains_key(&id) {
            // Single-model viewer: a new upload replaces whatever was loaded.
            self.meshes.clear();
            self.meshes.insert(id, Self::upload_mesh(&self.ctx.device, geometry));
            log::debug!(
                "Uploaded geometry {} ({} vertices, {} triangles)",
                id,
                geometry.vertex_count(),
                geometry.triangle_count()
            );
        }
        id
    }

    fn upload_mesh(device: &wgpu::Device, geometry: &Geometry) -> GpuMesh {
        let vertices: Vec<Vertex> = geometry
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                position: p.to_array(),
                normal: geometry
                    .normals
                    .as_ref()
                    .and_then(|n| n.get(i))
                    .copied()
                    .unwrap_or(Vec3::ZERO)
                    .to_array(),
                color: geometry
                    .colors
                    .as_ref()
                    .and_then(|c| c.get(i))
                    .copied()
                    .unwrap_or(Vec3::ONE)
                    .to_array(),
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = geometry.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.as_ref().map_or(0, |i| i.len() as u32),
            vertex_count: geometry.positions.len() as u32,
            topology: geometry.topology(),
        }
    }
}

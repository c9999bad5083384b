//! Render pipeline setup for the viewport and the chrome
//!
//! This module manages the GPU pipelines, their uniform buffers and the
//! vertex buffers uploaded from the scene.

use crate::renderer::mesh::{LineVertex, MeshVertex};
use crate::renderer::overlay::OverlayVertex;
use crate::renderer::scene::Scene;
use crate::renderer::Color;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform buffer data for shapes and edges
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub face_color: [f32; 4],
    pub highlight_color: [f32; 4],
    pub edge_color: [f32; 4],
    pub light_dir: [f32; 4],
    /// Shape handle, face index, enabled flag, padding
    pub highlight: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct GradientUniforms {
    top: [f32; 4],
    bottom: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct OverlayUniforms {
    screen: [f32; 4],
}

/// Colors the shapes are drawn with
#[derive(Debug, Clone, Copy)]
pub struct ShapePalette {
    pub face: Color,
    pub highlight: Color,
    pub edge: Color,
}

/// Vertex buffers of the display list, rebuilt when the scene revision changes
struct SceneBuffers {
    revision: u64,
    mesh: Option<(wgpu::Buffer, u32)>,
    lines: Option<(wgpu::Buffer, u32)>,
}

/// One uniform buffer and the bind group exposing it at binding 0
struct UniformBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformBinding {
    fn new<T: Pod>(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, value: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write<T: Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// All pipelines used to draw a frame
pub struct RenderPipelines {
    gradient: wgpu::RenderPipeline,
    mesh: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
    overlay: wgpu::RenderPipeline,

    gradient_uniforms: UniformBinding,
    scene_uniforms: UniformBinding,
    overlay_uniforms: UniformBinding,

    buffers: SceneBuffers,
}

impl RenderPipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
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
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let gradient_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gradient Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/gradient.wgsl").into()),
        });
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let overlay_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let opaque = Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        });
        let blended = Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        });

        let gradient = create_pipeline(
            device,
            &pipeline_layout,
            PipelineSpec {
                label: "Gradient Pipeline",
                shader: &gradient_shader,
                vs: "vs_main",
                fs: "fs_main",
                buffers: &[],
                target: opaque.clone(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth: Some(depth_state(false, wgpu::CompareFunction::Always, wgpu::DepthBiasState::default())),
            },
        );

        // Faces are pushed back slightly so their edges win the depth test
        let mesh = create_pipeline(
            device,
            &pipeline_layout,
            PipelineSpec {
                label: "Mesh Pipeline",
                shader: &scene_shader,
                vs: "vs_mesh",
                fs: "fs_mesh",
                buffers: &[MeshVertex::desc()],
                target: opaque.clone(),
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth: Some(depth_state(
                    true,
                    wgpu::CompareFunction::Less,
                    wgpu::DepthBiasState {
                        constant: 2,
                        slope_scale: 1.0,
                        clamp: 0.0,
                    },
                )),
            },
        );

        let lines = create_pipeline(
            device,
            &pipeline_layout,
            PipelineSpec {
                label: "Edge Pipeline",
                shader: &scene_shader,
                vs: "vs_line",
                fs: "fs_line",
                buffers: &[LineVertex::desc()],
                target: opaque,
                topology: wgpu::PrimitiveTopology::LineList,
                depth: Some(depth_state(false, wgpu::CompareFunction::LessEqual, wgpu::DepthBiasState::default())),
            },
        );

        let overlay = create_pipeline(
            device,
            &pipeline_layout,
            PipelineSpec {
                label: "Overlay Pipeline",
                shader: &overlay_shader,
                vs: "vs_main",
                fs: "fs_main",
                buffers: &[OverlayVertex::desc()],
                target: blended,
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth: None,
            },
        );

        let gradient_uniforms = UniformBinding::new(
            device,
            &layout,
            "Gradient Uniforms",
            &GradientUniforms {
                top: Color::BLACK.to_array(),
                bottom: Color::BLACK.to_array(),
            },
        );
        let scene_uniforms = UniformBinding::new(device, &layout, "Scene Uniforms", &SceneUniforms::zeroed());
        let overlay_uniforms = UniformBinding::new(
            device,
            &layout,
            "Overlay Uniforms",
            &OverlayUniforms { screen: [1.0, 1.0, 0.0, 0.0] },
        );

        Self {
            gradient,
            mesh,
            lines,
            overlay,
            gradient_uniforms,
            scene_uniforms,
            overlay_uniforms,
            buffers: SceneBuffers {
                revision: u64::MAX,
                mesh: None,
                lines: None,
            },
        }
    }

    /// Upload uniforms and, if the display list changed, vertex buffers
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene, palette: &ShapePalette) {
        let (top, bottom) = scene.background();
        self.gradient_uniforms.write(
            queue,
            &GradientUniforms {
                top: top.to_array(),
                bottom: bottom.to_array(),
            },
        );

        let camera = scene.camera();
        let light = (camera.eye() - camera.target).normalize_or_zero().as_vec3();
        let highlight = match scene.highlight() {
            Some(picked) => [picked.shape.0, picked.face as u32, 1, 0],
            None => [0; 4],
        };
        self.scene_uniforms.write(
            queue,
            &SceneUniforms {
                view_proj: camera.uniform_matrix(scene.aspect()).to_cols_array_2d(),
                face_color: palette.face.to_array(),
                highlight_color: palette.highlight.to_array(),
                edge_color: palette.edge.to_array(),
                light_dir: [light.x, light.y, light.z, 0.0],
                highlight,
            },
        );

        let (width, height) = scene.size();
        self.overlay_uniforms.write(
            queue,
            &OverlayUniforms {
                screen: [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0],
            },
        );

        if self.buffers.revision != scene.revision() {
            let mesh: Vec<MeshVertex> = scene
                .shapes()
                .iter()
                .flat_map(|s| s.mesh.vertices(s.handle.0))
                .collect();
            let lines: Vec<LineVertex> = scene.shapes().iter().flat_map(|s| s.mesh.line_vertices()).collect();

            self.buffers = SceneBuffers {
                revision: scene.revision(),
                mesh: vertex_buffer(device, "Mesh Vertex Buffer", &mesh),
                lines: vertex_buffer(device, "Edge Vertex Buffer", &lines),
            };
        }
    }

    /// Background, faces and edges, clipped to the viewport
    pub fn draw_scene(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.gradient);
        pass.set_bind_group(0, &self.gradient_uniforms.bind_group, &[]);
        pass.draw(0..3, 0..1);

        pass.set_bind_group(0, &self.scene_uniforms.bind_group, &[]);
        if let Some((buffer, count)) = &self.buffers.mesh {
            pass.set_pipeline(&self.mesh);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..*count, 0..1);
        }
        if let Some((buffer, count)) = &self.buffers.lines {
            pass.set_pipeline(&self.lines);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..*count, 0..1);
        }
    }

    /// Chrome quads over the whole window
    pub fn draw_overlay(&self, pass: &mut wgpu::RenderPass<'_>, buffer: &wgpu::Buffer, count: u32) {
        pass.set_pipeline(&self.overlay);
        pass.set_bind_group(0, &self.overlay_uniforms.bind_group, &[]);
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(0..count, 0..1);
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'static>],
    target: Option<wgpu::ColorTargetState>,
    topology: wgpu::PrimitiveTopology,
    depth: Option<wgpu::DepthStencilState>,
}

fn create_pipeline(device: &wgpu::Device, layout: &wgpu::PipelineLayout, spec: PipelineSpec<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some(spec.vs),
            buffers: spec.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fs),
            targets: &[spec.target],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: spec.depth,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn depth_state(write: bool, compare: wgpu::CompareFunction, bias: wgpu::DepthBiasState) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias,
    }
}

/// `None` for an empty slice; wgpu rejects zero-sized vertex buffers
pub fn vertex_buffer<T: Pod>(device: &wgpu::Device, label: &str, vertices: &[T]) -> Option<(wgpu::Buffer, u32)> {
    if vertices.is_empty() {
        return None;
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Some((buffer, vertices.len() as u32))
}

/// Depth attachment matching the surface size
pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

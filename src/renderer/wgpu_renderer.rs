//! WGPU-based renderer implementation for cadframe
//!
//! Draws the background gradient, the displayed shapes with their edges
//! and the selection highlight into the viewport, then the window chrome
//! on top.

use crate::cad::Shape;
use crate::renderer::overlay::{build_chrome, ChromeState};
use crate::renderer::pipeline::{create_depth_view, vertex_buffer, RenderPipelines, ShapePalette};
use crate::renderer::scene::Scene;
use crate::renderer::{
    Color, PickCallback, PickedFace, RenderStats, SceneRenderer, SelectionMode, ShapeHandle,
};
use crate::utils::error::{CadFrameError, IntoFrameError, Result};
use crate::window::layout::ChromeLayout;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::window::Window;

/// Colors used for the chrome backdrop behind the viewport
const CLEAR: Color = Color::new(0.13, 0.14, 0.16, 1.0);

/// GPU objects, present once `initialize` succeeded
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    pipelines: RenderPipelines,
    depth: wgpu::TextureView,
}

/// WGPU renderer implementation
pub struct WgpuRenderer {
    window: Arc<Window>,
    gpu: Option<Gpu>,
    scene: Scene,
    palette: ShapePalette,

    /// Render statistics
    stats: RenderStats,

    /// Frame timing for FPS calculation
    frame_times: Vec<Instant>,
}

impl WgpuRenderer {
    pub fn new(window: Arc<Window>, layout: ChromeLayout, palette: ShapePalette) -> Self {
        let size = window.inner_size();
        Self {
            window,
            gpu: None,
            scene: Scene::new(layout, size.width, size.height),
            palette,
            stats: RenderStats::default(),
            frame_times: Vec::with_capacity(120),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Initialize wgpu instance, device, queue, and surface
    async fn init_wgpu(window: Arc<Window>, width: u32, height: u32) -> Result<Gpu> {
        // Create wgpu instance with all backends
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .renderer_err("Failed to create surface")?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .renderer_err("Failed to find suitable GPU adapter")?;

        // Create device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cadframe GPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .renderer_err("Failed to create GPU device")?;

        // Get surface capabilities
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| CadFrameError::Renderer("Surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        // Configure surface
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipelines = RenderPipelines::new(&device, surface_format);
        let depth = create_depth_view(&device, width, height);

        info!(
            "GPU renderer on {} ({:?}), format {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_format
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            surface_config,
            pipelines,
            depth,
        })
    }

    /// Reconfigure the surface (e.g., after resize or lost surface)
    fn reconfigure_surface(gpu: &mut Gpu) {
        gpu.surface.configure(&gpu.device, &gpu.surface_config);
        gpu.depth = create_depth_view(&gpu.device, gpu.surface_config.width, gpu.surface_config.height);
    }

    /// Update render statistics
    fn update_stats(&mut self, frame_start: Instant) {
        let now = Instant::now();
        let frame_time = now.duration_since(frame_start).as_secs_f32() * 1000.0;

        self.frame_times.push(now);
        self.frame_times.retain(|&t| now.duration_since(t) < Duration::from_secs(1));
        self.stats.fps = self.frame_times.len() as f32;

        // Exponential moving average
        self.stats.frame_time = if self.stats.frames == 0 {
            frame_time
        } else {
            self.stats.frame_time * 0.9 + frame_time * 0.1
        };
        self.stats.frames += 1;
    }
}

impl SceneRenderer for WgpuRenderer {
    fn initialize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(CadFrameError::Renderer(format!(
                "Cannot initialize a {}x{} surface",
                width, height
            )));
        }
        let gpu = pollster::block_on(Self::init_wgpu(self.window.clone(), width, height))?;
        self.gpu = Some(gpu);
        self.scene.set_size(width, height);
        Ok(())
    }

    fn set_background_gradient(&mut self, top: Color, bottom: Color) {
        self.scene.set_background(top, bottom);
    }

    fn display_shape(&mut self, shape: &Shape) -> ShapeHandle {
        self.scene.add(shape)
    }

    fn erase_all(&mut self) {
        self.scene.clear();
    }

    fn fit_all(&mut self) {
        self.scene.fit_all();
    }

    fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.scene.set_selection_mode(mode);
    }

    fn register_pick_callback(&mut self, callback: PickCallback) {
        self.scene.set_callback(callback);
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.scene.set_size(width, height);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.surface_config.width = width;
            gpu.surface_config.height = height;
            Self::reconfigure_surface(gpu);
        }
        Ok(())
    }

    fn pick(&mut self, x: f64, y: f64) -> Vec<PickedFace> {
        self.scene.pick(x, y)
    }

    fn set_highlight(&mut self, face: Option<PickedFace>) {
        self.scene.set_highlight(face);
    }

    fn orbit(&mut self, dx: f64, dy: f64) {
        self.scene.orbit(dx, dy);
    }

    fn zoom(&mut self, steps: f64) {
        self.scene.zoom(steps);
    }

    fn render(&mut self, chrome: &ChromeState) -> Result<()> {
        let frame_start = Instant::now();
        let Some(gpu) = self.gpu.as_mut() else {
            return Err(CadFrameError::Renderer("Renderer not initialized".to_string()));
        };

        // Get current surface texture
        let surface_texture = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                Self::reconfigure_surface(gpu);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(CadFrameError::Renderer("Out of GPU memory".to_string()));
            }
            Err(e) => {
                warn!("Surface texture acquisition failed: {:?}", e);
                return Ok(());
            }
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.pipelines
            .prepare(&gpu.device, &gpu.queue, &self.scene, &self.palette);
        let (width, height) = self.scene.size();
        let overlay = build_chrome(self.scene.layout(), width as f64, chrome);
        let overlay = vertex_buffer(&gpu.device, "Overlay Vertex Buffer", &overlay);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let viewport = self.scene.viewport();
            if viewport.width >= 1.0 && viewport.height >= 1.0 {
                pass.set_viewport(
                    viewport.x as f32,
                    viewport.y as f32,
                    viewport.width as f32,
                    viewport.height as f32,
                    0.0,
                    1.0,
                );
                pass.set_scissor_rect(
                    viewport.x as u32,
                    viewport.y as u32,
                    (viewport.width as u32).min(width.saturating_sub(viewport.x as u32)),
                    (viewport.height as u32).min(height.saturating_sub(viewport.y as u32)),
                );
                gpu.pipelines.draw_scene(&mut pass);
            }
        }

        if let Some((buffer, count)) = &overlay {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Chrome Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            gpu.pipelines.draw_overlay(&mut pass, buffer, *count);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        self.update_stats(frame_start);
        Ok(())
    }
}

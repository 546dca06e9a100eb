pub mod instance;
pub mod pipeline;
pub mod texture;

use std::ops::Range;
use std::sync::Arc;

use thiserror::Error;
use winit::window::Window;

use self::instance::QuadInstance;
use self::pipeline::QuadPipeline;
use self::texture::SpriteTexture;

/// Window and GPU initialization failures. All terminal: the process logs
/// and exits.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create wgpu surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create wgpu device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// One run of instances drawn with a single texture bound.
pub struct DrawBatch<'a> {
    pub texture: &'a SpriteTexture,
    pub range: Range<u32>,
}

/// Core GPU state — device, queue, surface, pipeline.
pub struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub quad_pipeline: QuadPipeline,
}

/// Intermediate frame state returned by `begin_frame`.
pub struct FrameContext {
    pub output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuState {
    /// Initialize wgpu and the quad rendering pipeline. The logical size is
    /// what the demos draw against; the surface stretches it to the window.
    pub fn new(
        window: Arc<Window>,
        logical_w: u32,
        logical_h: u32,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        log::info!(
            "GPU adapter: {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("dashcat_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);

        let format = surface_caps
            .formats
            .iter()
            .find(|f| **f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            wgpu::CompositeAlphaMode::Auto
        };

        log::info!("Surface: format={:?}, alpha_mode={:?}", format, alpha_mode);

        // Fifo = vsync, matching the handheld's present behavior.
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let quad_pipeline = QuadPipeline::new(&device, format);
        quad_pipeline.update_screen_size(&queue, logical_w as f32, logical_h as f32);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            quad_pipeline,
        })
    }

    /// Resize the surface. Drawing stays in logical coordinates, so only the
    /// swapchain changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Upload instance data for this frame.
    pub fn update_instances(&mut self, instances: &[QuadInstance]) {
        self.quad_pipeline.update_instances(&self.queue, instances);
    }

    /// Create a texture bind group compatible with the quad pipeline.
    pub fn create_texture(&self, image: &image::RgbaImage, label: &str) -> SpriteTexture {
        SpriteTexture::from_image(
            &self.device,
            &self.queue,
            &self.quad_pipeline.texture_layout,
            image,
            label,
        )
    }

    /// The 1x1 white texture used for solid rectangles.
    pub fn create_white_texture(&self) -> SpriteTexture {
        SpriteTexture::white(&self.device, &self.queue, &self.quad_pipeline.texture_layout)
    }

    /// Acquire the next surface texture and create a command encoder.
    /// Returns None if the surface is lost/outdated (caller should skip this frame).
    pub fn begin_frame(&self) -> Option<FrameContext> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return None;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return None;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
                return None;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        Some(FrameContext {
            output,
            view,
            encoder,
        })
    }

    /// One render pass: clear to white, then draw each batch with its
    /// texture bound.
    pub fn draw_batches(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        batches: &[DrawBatch<'_>],
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quad_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 1.0,
                        g: 1.0,
                        b: 1.0,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let p = &self.quad_pipeline;
        render_pass.set_pipeline(&p.pipeline);
        render_pass.set_bind_group(0, &p.screen_bind_group, &[]);
        render_pass.set_vertex_buffer(0, p.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, p.instance_buffer.slice(..));
        render_pass.set_index_buffer(p.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for batch in batches {
            if batch.range.is_empty() {
                continue;
            }
            render_pass.set_bind_group(1, &batch.texture.bind_group, &[]);
            render_pass.draw_indexed(0..6, 0, batch.range.clone());
        }
    }

    /// Submit the command encoder and present.
    pub fn finish_frame(&self, encoder: wgpu::CommandEncoder, output: wgpu::SurfaceTexture) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

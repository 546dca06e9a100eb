use std::ops::Range;
use std::sync::Arc;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets;
use crate::audio::SamplePlayer;
use crate::demo::{pack_rgba, Demo, DemoState, RectsScene, SCREEN_H, SCREEN_W};
use crate::input::{translate_key, Button, PadEvent};
use crate::render::instance::QuadInstance;
use crate::render::texture::SpriteTexture;
use crate::render::{DrawBatch, GpuState, RenderError};

/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | max: {:.2}ms",
                self.frames_since_log as f64 / elapsed,
                avg_ms,
                self.frame_time_max * 1000.0,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frame_time_max = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Which texture a draw batch samples.
#[derive(Clone, Copy)]
enum TexId {
    Backdrop,
    Sheet,
    White,
}

struct SceneTextures {
    backdrop: SpriteTexture,
    sheet: SpriteTexture,
    white: SpriteTexture,
}

impl SceneTextures {
    fn get(&self, id: TexId) -> &SpriteTexture {
        match id {
            TexId::Backdrop => &self.backdrop,
            TexId::Sheet => &self.sheet,
            TexId::White => &self.white,
        }
    }
}

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    textures: Option<SceneTextures>,

    // Decoded before the event loop starts; decode failure never reaches here.
    backdrop_img: image::RgbaImage,
    sheet_img: image::RgbaImage,

    audio: SamplePlayer,
    demos: DemoState,

    last_frame_time: Option<Instant>,
    frame_stats: FrameStats,

    // Reusable instance staging (avoid per-frame allocation)
    instance_buf: Vec<QuadInstance>,
    batch_buf: Vec<(TexId, Range<u32>)>,

    /// Window at 2x native resolution?
    doubled: bool,

    /// GPU init failure captured inside the event loop, surfaced by `run`.
    fatal: Option<RenderError>,
}

impl App {
    fn new(
        backdrop_img: image::RgbaImage,
        sheet_img: image::RgbaImage,
        audio: SamplePlayer,
    ) -> Self {
        Self {
            window: None,
            gpu: None,
            textures: None,
            backdrop_img,
            sheet_img,
            audio,
            demos: DemoState::new(),
            last_frame_time: None,
            frame_stats: FrameStats::new(),
            instance_buf: Vec::with_capacity(8),
            batch_buf: Vec::with_capacity(4),
            doubled: false,
            fatal: None,
        }
    }

    fn handle_pad_event(&mut self, event: PadEvent, event_loop: &ActiveEventLoop) {
        match event {
            PadEvent::Quit => {
                log::info!("Quit requested");
                event_loop.exit();
            }
            PadEvent::ButtonDown { button: Button::Start, .. } => {
                log::info!("Start pressed, exiting");
                event_loop.exit();
            }
            PadEvent::ButtonDown { button: Button::Select, .. } => {
                let label = self.demos.cycle();
                log::info!("Demo: {label}");
            }
            PadEvent::ButtonDown { button: Button::Square, .. }
                if self.demos.current == Demo::Audio =>
            {
                self.audio.toggle_pause();
            }
            PadEvent::ButtonDown { button: Button::Square, .. } => {
                self.toggle_resolution();
            }
            PadEvent::ButtonDown { button: Button::Cross, .. }
                if self.demos.current == Demo::Audio =>
            {
                self.audio.restart();
            }
            other => self.demos.handle_event(&other),
        }
    }

    /// Flip between native and 2x window size. Drawing is in logical
    /// coordinates, so the scenes just stretch.
    fn toggle_resolution(&mut self) {
        self.doubled = !self.doubled;
        let scale = if self.doubled { 2 } else { 1 };
        if let Some(window) = &self.window {
            let _ = window.request_inner_size(PhysicalSize::new(
                SCREEN_W * scale,
                SCREEN_H * scale,
            ));
        }
        log::info!("Resolution: {}x{}", SCREEN_W * scale, SCREEN_H * scale);
    }

    /// Stage this frame's quads and record which texture each run samples.
    fn build_instances(&mut self) {
        self.instance_buf.clear();
        self.batch_buf.clear();

        let batch = |buf: &mut Vec<(TexId, Range<u32>)>,
                         instances: &mut Vec<QuadInstance>,
                         id: TexId,
                         quads: &[QuadInstance]| {
            let start = instances.len() as u32;
            instances.extend_from_slice(quads);
            buf.push((id, start..instances.len() as u32));
        };

        match self.demos.current {
            Demo::Sprite => {
                batch(
                    &mut self.batch_buf,
                    &mut self.instance_buf,
                    TexId::Backdrop,
                    &[QuadInstance::full_texture(
                        0.0,
                        0.0,
                        SCREEN_W as f32,
                        SCREEN_H as f32,
                    )],
                );
                let scene = &self.demos.sprite;
                batch(
                    &mut self.batch_buf,
                    &mut self.instance_buf,
                    TexId::Sheet,
                    &[QuadInstance::sprite(
                        &scene.placement,
                        scene.animator.current_frame(),
                        self.sheet_img.width(),
                        self.sheet_img.height(),
                    )],
                );
            }
            Demo::Rects => {
                let scene = &self.demos.rects;
                let pad = &scene.pad_rect;
                batch(
                    &mut self.batch_buf,
                    &mut self.instance_buf,
                    TexId::White,
                    &[
                        QuadInstance::solid(
                            pad.x as f32,
                            pad.y as f32,
                            pad.w as f32,
                            pad.h as f32,
                            scene.colors[0],
                        ),
                        QuadInstance::solid(
                            scene.nub_pos.x,
                            scene.nub_pos.y,
                            RectsScene::RECT_W as f32,
                            RectsScene::RECT_H as f32,
                            scene.colors[1],
                        ),
                    ],
                );
            }
            Demo::Audio => {
                let progress = self.audio.progress();
                let fill = if self.audio.is_paused() {
                    pack_rgba(150, 150, 150, 255)
                } else {
                    pack_rgba(70, 160, 230, 255)
                };
                batch(
                    &mut self.batch_buf,
                    &mut self.instance_buf,
                    TexId::White,
                    &[
                        QuadInstance::solid(40.0, 120.0, 400.0, 32.0, pack_rgba(40, 40, 40, 255)),
                        QuadInstance::solid(42.0, 122.0, 396.0 * progress, 28.0, fill),
                    ],
                );
            }
        }
    }

    fn render_frame(&mut self) {
        self.build_instances();

        let Some(gpu) = &mut self.gpu else { return };
        gpu.update_instances(&self.instance_buf);

        let Some(gpu) = &self.gpu else { return };
        let Some(textures) = &self.textures else { return };
        let Some(mut frame) = gpu.begin_frame() else { return };

        let batches: Vec<DrawBatch<'_>> = self
            .batch_buf
            .iter()
            .map(|(id, range)| DrawBatch {
                texture: textures.get(*id),
                range: range.clone(),
            })
            .collect();

        gpu.draw_batches(&mut frame.encoder, &frame.view, &batches);
        gpu.finish_frame(frame.encoder, frame.output);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("dashcat")
            .with_resizable(false)
            .with_inner_size(PhysicalSize::new(SCREEN_W, SCREEN_H));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Window creation failed: {e}");
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let gpu = match GpuState::new(window.clone(), SCREEN_W, SCREEN_H) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU init failed: {e}");
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        };

        self.textures = Some(SceneTextures {
            backdrop: gpu.create_texture(&self.backdrop_img, "forest_backdrop"),
            sheet: gpu.create_texture(&self.sheet_img, "cheetah_sheet"),
            white: gpu.create_white_texture(),
        });
        self.gpu = Some(gpu);
        log::info!("wgpu + quad pipeline initialized");

        event_loop.set_control_flow(ControlFlow::Poll);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(pad) =
                    translate_key(&key_event.logical_key, key_event.state, key_event.repeat)
                {
                    self.handle_pad_event(pad, event_loop);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    self.frame_stats.record_frame(dt);
                    self.demos.update(dt as f32);
                }
                self.last_frame_time = Some(now);

                self.render_frame();
            }
            _ => {}
        }
    }
}

/// Entry point — decode assets, open the audio device, run the event loop.
/// Asset and device failures are terminal and bubble up to `main`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let backdrop = assets::decode_png(assets::BACKDROP_PNG)?;
    let sheet = assets::decode_png(assets::SHEET_PNG)?;
    log::info!(
        "Assets decoded: backdrop {}x{}, sheet {}x{}",
        backdrop.width(),
        backdrop.height(),
        sheet.width(),
        sheet.height()
    );

    let audio = SamplePlayer::new(assets::LOOP_WAV)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(backdrop, sheet, audio);
    event_loop.run_app(&mut app)?;

    if let Some(fatal) = app.fatal.take() {
        return Err(fatal.into());
    }
    Ok(())
}

//! nanovisual - a real-time audio-reactive sketch
//!
//! Listens to the microphone and turns its loudness into a grid of
//! pulsing cells. Click to move from the welcome screen to the grid.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use nanovisual::audio::AudioSystem;
use nanovisual::cli::Args;
use nanovisual::params::{AudioConfig, AudioSource, RecordingConfig, RenderConfig};
use nanovisual::rendering::{FrameRateMonitor, RenderSystem};
use nanovisual::sketch::{Viewport, Visualizer};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Sketch and its amplitude source
    visualizer: Visualizer,
    audio: Option<AudioSystem>,

    // Configuration
    audio_config: AudioConfig,
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    // Frame tracking
    frame_count: usize,
    frame_rate: FrameRateMonitor,

    /// Fatal error raised inside the event loop, reported after it exits
    error: Option<anyhow::Error>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let audio_config = args.audio_config();
        audio_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid audio config: {}", e))?;

        let render_config = args.render_config();
        let recording_config = args.create_recording_config()?;
        let frame_rate = FrameRateMonitor::new(recording_config.as_ref().map(|c| c.fps));
        let viewport = Viewport::new(
            render_config.window_width as f64,
            render_config.window_height as f64,
        );

        Ok(Self {
            window: None,
            render_system: None,
            visualizer: Visualizer::new(&args.sketch_params(), viewport),
            audio: None,
            audio_config,
            render_config,
            recording_config,
            frame_count: 0,
            frame_rate,
            error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.recording_config.clone(),
        ))?;
        self.visualizer.resized(render_system.viewport());

        // A missing device or unreadable clip degrades to a silent source
        self.audio = match AudioSystem::new(&self.audio_config) {
            Ok(audio) => Some(audio),
            Err(e) => {
                log::warn!("Audio unavailable, running silent: {:#}", e);
                None
            }
        };

        match &self.audio_config.source {
            AudioSource::Microphone => log::info!("Source: microphone"),
            AudioSource::Clip(path) => log::info!("Source: clip {}", path.display()),
        }
        if let Some(config) = &self.recording_config {
            log::info!(
                "Recording {} frames to {}",
                config.total_frames(),
                config.frames_dir().display()
            );
        }
        log::info!("Click to advance, ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        let amplitude = self
            .audio
            .as_ref()
            .map(|audio| audio.level() as f64)
            .unwrap_or(0.0);

        let list = self.visualizer.draw(amplitude);

        match render_system.render(&list, self.frame_count) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = render_system.size();
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                render_system.resize(size, scale_factor);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.error = Some(anyhow::anyhow!("GPU out of memory"));
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        self.frame_count += 1;
        self.frame_rate.record_frame();

        if let Some(config) = &self.recording_config {
            if self.frame_count >= config.total_frames() {
                log::info!("Recording complete ({} frames)", self.frame_count);
                event_loop.exit();
            }
        }
    }

    fn resized(&mut self, size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) {
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(size, scale_factor);
            self.visualizer.resized(render_system.viewport());
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
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
            } => event_loop.exit(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => self.visualizer.pointer_pressed(),
            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resized(size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.render_system.as_ref().map(|r| r.size()) {
                    self.resized(size, scale_factor);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("nanovisual - audio-reactive grid sketch");

    let mut app = App::new(&args)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated abnormally")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Camera, Vec2, Viewport};
use crate::core::{AppControl, FrameDriver, FrameSink, Game, Setup};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::render::{FrameTarget, RendererConfig, SpriteRenderer};
use crate::scene::DrawState;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub renderer: RendererConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
            renderer: RendererConfig::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `game` until it exits or fails.
    ///
    /// Fatal render errors are logged, stop the event loop, and are returned
    /// here.
    pub fn run<G>(config: RuntimeConfig, game: G) -> Result<()>
    where
        G: Game + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, game);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<G>
where
    G: Game + 'static,
{
    config: RuntimeConfig,
    game: G,

    entry: Option<WindowEntry>,
    renderer: Option<SpriteRenderer>,
    driver: FrameDriver,

    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    viewport: Viewport,

    error: Option<anyhow::Error>,
}

impl<G> AppState<G>
where
    G: Game + 'static,
{
    fn new(config: RuntimeConfig, game: G) -> Self {
        let driver = FrameDriver::new(config.renderer.sprite_capacity);
        let viewport = Viewport::offscreen(config.renderer.design_resolution);
        Self {
            config,
            game,
            entry: None,
            renderer: None,
            driver,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            viewport,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.config.gpu.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let mut renderer = entry.with_gpu(|gpu| SpriteRenderer::new(gpu.device(), self.config.renderer.clone()));

        let size = entry.with_window(|w| w.inner_size());
        self.viewport = window_viewport(self.config.renderer.design_resolution, size);

        let game = &mut self.game;
        let viewport = &self.viewport;
        entry.with_gpu(|gpu| -> Result<()> {
            game.setup(&mut Setup::new(&mut renderer, gpu.device(), gpu.queue()))
                .context("game setup failed")?;
            if viewport.is_valid() {
                renderer.resize(gpu.queue(), viewport);
            }
            Ok(())
        })?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.renderer = Some(renderer);
        self.clock.reset();
        Ok(())
    }

    fn resize(&mut self, new_size: Option<PhysicalSize<u32>>) {
        let (Some(entry), Some(renderer)) = (self.entry.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let size = new_size.unwrap_or_else(|| entry.with_window(|w| w.inner_size()));
        self.viewport = window_viewport(self.config.renderer.design_resolution, size);
        log::debug!(
            "resize: {}x{}, scale {:?}, offset {:?}",
            size.width,
            size.height,
            self.viewport.scale,
            self.viewport.offset
        );

        let viewport = &self.viewport;
        entry.with_gpu_mut(|gpu| {
            gpu.resize(size);
            if viewport.is_valid() {
                renderer.resize(gpu.queue(), viewport);
            }
        });
        entry.with_window(|w| w.request_redraw());
    }

    /// Runs one frame. `Ok(Exit)` when the game asked to stop.
    fn redraw(&mut self) -> Result<AppControl> {
        // Minimized: nothing to present.
        if !self.viewport.is_valid() {
            return Ok(AppControl::Continue);
        }
        let (Some(entry), Some(renderer)) = (self.entry.as_mut(), self.renderer.as_mut()) else {
            return Ok(AppControl::Continue);
        };

        let time = self.clock.tick();
        let game = &mut self.game;
        let driver = &mut self.driver;
        let input_state = &self.input_state;
        let input_frame = &self.input_frame;
        let viewport = &self.viewport;

        let control = entry.with_mut(|fields| {
            let mut sink = SurfaceSink {
                gpu: fields.gpu,
                window: fields.window,
                renderer,
                viewport: *viewport,
            };
            driver.frame(game, time, input_state, input_frame, viewport, &mut sink)
        });

        // Per-frame edges are consumed by this frame only.
        self.input_frame.clear();
        control.with_context(|| format!("frame {} failed", time.frame_index))
    }
}

impl<G> ApplicationHandler for AppState<G>
where
    G: Game + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(ev) = translate_window_event(&self.viewport, &self.input_state, &event) {
            self.input_state.apply_event(&mut self.input_frame, ev);
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => self.resize(Some(*new_size)),

            WindowEvent::ScaleFactorChanged { .. } => self.resize(None),

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => event_loop.exit(),
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}

fn window_viewport(design_resolution: Vec2, size: PhysicalSize<u32>) -> Viewport {
    Viewport::new(design_resolution, Vec2::new(size.width as f32, size.height as f32))
}

/// Renders a recorded frame into the window's next surface texture.
struct SurfaceSink<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    window: &'a Window,
    renderer: &'a mut SpriteRenderer,
    viewport: Viewport,
}

impl FrameSink for SurfaceSink<'_, '_> {
    fn submit(&mut self, state: &DrawState, camera: &Camera) -> crate::error::Result<()> {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => return Ok(self.gpu.handle_surface_error(err).into_result()?),
        };

        {
            let mut target = FrameTarget {
                device: self.gpu.device(),
                queue: self.gpu.queue(),
                encoder: &mut frame.encoder,
                window_view: &frame.view,
                format: self.gpu.surface_format(),
                viewport: self.viewport,
            };
            self.renderer.render(&mut target, state, camera)?;
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        Ok(())
    }
}

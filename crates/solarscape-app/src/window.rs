//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: keys are mapped to
//! camera commands as they arrive, ticks run from the [`TickScheduler`] on
//! every redraw, and the frame is drawn through the [`GpuHost`].

use std::sync::Arc;

use solarscape_config::Config;
use solarscape_input::{KeyMap, KeyboardState, RawKeyEvent};
use solarscape_render::{GpuHost, HostSettings, SurfaceError, init_render_context_blocking};
use solarscape_scene::{CommandOutcome, FrameStyle, SceneState, render_frame};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::game_loop::TickScheduler;

/// Errors that stop the event loop from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state: the scene, input mapping and, once resumed, the window
/// and GPU host.
pub struct AppState {
    pub config: Config,
    pub scene: SceneState,
    pub window: Option<Arc<Window>>,
    pub host: Option<GpuHost>,
    pub keyboard: KeyboardState,
    pub keymap: KeyMap,
    pub scheduler: TickScheduler,
    pub style: FrameStyle,
    last_status_tick: u64,
}

impl AppState {
    pub fn new(config: Config, scene: SceneState) -> Self {
        let keymap = KeyMap::from_config(&config.input);
        let scheduler = TickScheduler::new(config.scene.tick_hz);
        let style = FrameStyle {
            star_color: config.render.star_color,
            point_size: config.render.point_size,
        };
        Self {
            config,
            scene,
            window: None,
            host: None,
            keyboard: KeyboardState::new(),
            keymap,
            scheduler,
            style,
            last_status_tick: 0,
        }
    }

    /// Feed one key event through the key map into the scene.
    pub fn handle_key(&mut self, event: RawKeyEvent) -> Option<CommandOutcome> {
        let press = self.keyboard.process_raw(event)?;
        let command = self.keymap.resolve(press)?;
        Some(self.scene.handle_command(command))
    }

    /// Run the ticks due for `elapsed` seconds. Used by tests; the event loop
    /// measures wall time through [`TickScheduler::frame`].
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        let scene = &mut self.scene;
        let ran = self.scheduler.advance(elapsed, || scene.tick());
        self.log_status();
        ran
    }

    fn run_due_ticks(&mut self) {
        let scene = &mut self.scene;
        if self.scheduler.frame(|| scene.tick()) > 0 {
            self.log_status();
        }
    }

    fn log_status(&mut self) {
        let interval = self.config.debug.status_interval_ticks;
        let tick = self.scene.tick_count();
        if interval == 0 || tick < self.last_status_tick + interval {
            return;
        }
        self.last_status_tick = tick;
        let camera = self.scene.camera();
        info!(
            tick,
            frames = self.scheduler.frame_count(),
            x = camera.translation.x,
            y = camera.translation.y,
            z = camera.translation.z,
            mode = ?camera.render_mode,
            "Scene status"
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(host) = &mut self.host {
            host.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.run_due_ticks();

        let Some(host) = &mut self.host else {
            return;
        };
        render_frame(&mut self.scene, host, &self.style);
        match host.present() {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, reconfiguring");
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    host.resize(size.width, size.height);
                }
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => {
                let settings = HostSettings::from_config(&self.config);
                self.host = Some(GpuHost::new(ctx, &settings));
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        info!("Window ready: {}x{}", size.width, size.height);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    info!("Scale factor changed to {scale_factor:.2}");
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(RawKeyEvent::from(&event));
                if self.scene.shutdown_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Creates an event loop and runs the application until the window closes
/// or the user quits.
#[instrument(skip_all)]
pub fn run(config: Config, scene: SceneState) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, scene);
    event_loop.run_app(&mut app)?;
    info!("Exited after {} ticks", app.scene.tick_count());
    Ok(())
}

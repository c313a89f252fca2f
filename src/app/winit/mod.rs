//! Winit-based Application Framework
//!
//! - [`App`]: builder for the window and engine settings
//! - [`AppHandler`]: what the application does each frame
//! - `AppRunner`: the winit event loop handler (internal)
//!
//! ```rust,ignore
//! use phoenix::app::winit::{App, AppHandler};
//!
//! App::new()
//!     .with_title("My Scene")
//!     .run::<MyHandler>()
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::engine::Engine;
use crate::errors::{Error, Result};
use crate::renderer::RenderSettings;

/// Application behaviour driven by the runner.
///
/// 1. [`init`](Self::init): once, after the renderer is bound to the window
/// 2. [`resize`](Self::resize): on every viewport change
/// 3. [`update`](Self::update): once per frame; renders through
///    `engine.renderer`
///
/// The runner keeps no frame time; handlers read their own clocks.
pub trait AppHandler: Sized + 'static {
    fn init(engine: &mut Engine, window: &Arc<Window>) -> Self;

    /// Viewport changed to `width` x `height` physical pixels. Handlers that
    /// override this are responsible for resizing `engine.renderer`.
    fn resize(&mut self, engine: &mut Engine, width: u32, height: u32) {
        engine.resize(width, height);
    }

    /// Runs one frame. An error stops the event loop.
    #[allow(unused_variables)]
    fn update(&mut self, engine: &mut Engine, window: &Arc<Window>) -> Result<()> {
        Ok(())
    }
}

type InitFn<H> = Box<dyn FnOnce(&mut Engine, &Arc<Window>) -> H>;

/// Application builder.
pub struct App {
    title: String,
    render_settings: RenderSettings,
    asset_root: PathBuf,
    inner_size: (f64, f64),
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Phoenix".into(),
            render_settings: RenderSettings::default(),
            asset_root: PathBuf::from("assets"),
            inner_size: (1280.0, 720.0),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.render_settings = settings;
        self
    }

    /// Directory relative asset locators resolve against.
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Initial logical window size.
    #[must_use]
    pub fn with_inner_size(mut self, width: f64, height: f64) -> Self {
        self.inner_size = (width, height);
        self
    }

    /// Runs `H` until the window closes. Blocks the calling thread.
    pub fn run<H: AppHandler>(self) -> Result<()> {
        self.run_with(H::init)
    }

    /// Like [`run`](Self::run), building the handler with `init` so it can
    /// capture configuration.
    pub fn run_with<H, F>(self, init: F) -> Result<()>
    where
        H: AppHandler,
        F: FnOnce(&mut Engine, &Arc<Window>) -> H + 'static,
    {
        let engine = Engine::new(self.render_settings.clone(), self.asset_root.clone())?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::<H>::new(self, engine, Box::new(init));
        event_loop.run_app(&mut runner)?;

        match runner.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct AppRunner<H: AppHandler> {
    title: String,
    inner_size: (f64, f64),

    window: Option<Arc<Window>>,
    engine: Engine,
    init: Option<InitFn<H>>,
    user_state: Option<H>,

    /// First error that stopped the loop, returned from `run`.
    fatal: Option<Error>,
}

impl<H: AppHandler> AppRunner<H> {
    fn new(app: App, engine: Engine, init: InitFn<H>) -> Self {
        Self {
            title: app.title,
            inner_size: app.inner_size,
            window: None,
            engine,
            init: Some(init),
            user_state: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("Fatal error: {error}");
        self.fatal.get_or_insert(error);
        event_loop.exit();
    }

    fn run_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(user_state)) = (&self.window, &mut self.user_state) else {
            return;
        };

        if let Err(e) = user_state.update(&mut self.engine, window) {
            self.fail(event_loop, e);
        }
    }
}

impl<H: AppHandler> ApplicationHandler for AppRunner<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.inner_size;
        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, Error::Surface(format!("failed to create window: {e}")));
                return;
            }
        };
        self.window = Some(Arc::clone(&window));

        log::info!("Initializing Renderer Backend...");

        let size = window.inner_size();
        if let Err(e) = pollster::block_on(self.engine.init(Arc::clone(&window), size.width, size.height)) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(init) = self.init.take() {
            self.user_state = Some(init(&mut self.engine, &window));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                let (width, height) = (physical_size.width, physical_size.height);
                match &mut self.user_state {
                    Some(user_state) => user_state.resize(&mut self.engine, width, height),
                    None => self.engine.resize(width, height),
                }
            }
            WindowEvent::RedrawRequested => {
                self.run_frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.user_state.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}

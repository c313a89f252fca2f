//! Showcase scene
//!
//! Three animated copies of a skinned model under an HDR sky, watched by a
//! camera that flies a scripted seven-step path once while facing the
//! origin.
//!
//! Each frame ([`Showcase::step`]) runs, in order on the main thread:
//! 1. queued load completions ([`TaskQueue`] against [`SceneState`])
//! 2. the camera flight
//! 3. the [`FrameDriver`]: mixers, matrices, render

pub mod config;
pub mod flight;
pub mod frame_driver;
pub mod loading;
pub mod state;

use std::sync::Arc;

use tokio::task::JoinHandle;
use winit::window::Window;

use crate::app::AppHandler;
use crate::assets::AssetServer;
use crate::engine::Engine;
use crate::errors::Result;
use crate::renderer::RenderSurface;
use crate::tasks::TaskQueue;
use crate::utils::Clock;

pub use config::{CameraConfig, ShowcaseConfig};
pub use flight::{CameraFlight, CameraKeyframe, look_at_point};
pub use frame_driver::FrameDriver;
pub use state::{Flock, FlockMember, SceneState};

pub struct Showcase {
    config: Arc<ShowcaseConfig>,
    state: SceneState,
    tasks: TaskQueue<SceneState>,
    flight: CameraFlight,
    /// Flight time, apart from the driver's mixer clock: the flight starts
    /// with the showcase and runs on its own ticker like a GSAP timeline.
    flight_clock: Clock,
    driver: FrameDriver,
    loads: Vec<JoinHandle<()>>,
}

impl Showcase {
    /// Builds the scene for a `width` x `height` viewport and starts both
    /// background loads on `engine`'s asset server.
    pub fn new(config: ShowcaseConfig, engine: &Engine, width: u32, height: u32) -> Self {
        Self::with_assets(config, &engine.assets, width, height)
    }

    pub fn with_assets(
        config: ShowcaseConfig,
        assets: &AssetServer,
        width: u32,
        height: u32,
    ) -> Self {
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let config = Arc::new(config);
        let state = SceneState::new(&config, aspect);
        let tasks = TaskQueue::new();

        let loads = vec![
            loading::spawn_model_load(assets, &config, tasks.sender()),
            loading::spawn_environment_load(assets, &config, tasks.sender()),
        ];

        let flight = CameraFlight::new(&config.flight, config.camera.look_at);

        Self {
            config,
            state,
            tasks,
            flight,
            flight_clock: Clock::new(),
            driver: FrameDriver::new(),
            loads,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    #[must_use]
    pub fn flight(&self) -> &CameraFlight {
        &self.flight
    }

    /// Completions queued so far that the next step will apply.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// True once both background loads have queued their result or logged
    /// their failure.
    #[must_use]
    pub fn loads_settled(&self) -> bool {
        self.loads.iter().all(JoinHandle::is_finished)
    }

    /// One frame: drain queued completions, tick the flight, then let the
    /// frame driver advance the mixers and render into `surface`.
    pub fn step<R>(&mut self, surface: &mut R) -> Result<()>
    where
        R: RenderSurface + ?Sized,
    {
        self.tasks.run_pending(&mut self.state);

        let dt = self.flight_clock.delta_seconds();
        self.flight.tick(dt, &mut self.state.scene, self.state.camera);

        self.driver.frame(&mut self.state, surface)
    }

    /// Resizes `surface` and the camera aspect together.
    pub fn resize_viewport<R>(&mut self, surface: &mut R, width: u32, height: u32)
    where
        R: RenderSurface + ?Sized,
    {
        self.state.resize_viewport(surface, width, height);
    }
}

impl AppHandler for Showcase {
    fn init(engine: &mut Engine, window: &Arc<Window>) -> Self {
        let size = window.inner_size();
        Self::new(ShowcaseConfig::default(), engine, size.width, size.height)
    }

    fn resize(&mut self, engine: &mut Engine, width: u32, height: u32) {
        self.resize_viewport(&mut engine.renderer, width, height);
    }

    fn update(&mut self, engine: &mut Engine, _window: &Arc<Window>) -> Result<()> {
        self.step(&mut engine.renderer)
    }
}

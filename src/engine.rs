//! Engine Core Module
//!
//! [`Engine`] bundles the renderer and the asset server. It holds no window
//! logic and keeps no time of its own, so a frontend (the winit runner here,
//! or a test harness) drives it and each handler owns whatever clocks it
//! needs.
//!
//! ```rust,ignore
//! let mut engine = Engine::new(RenderSettings::default(), "assets")?;
//! pollster::block_on(engine.init(window, 1280, 720))?;
//! loop {
//!     // handler renders through engine.renderer
//! }
//! ```

use std::path::PathBuf;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::assets::AssetServer;
use crate::errors::Result;
use crate::renderer::{RenderSettings, RenderSurface, Renderer};

pub struct Engine {
    pub renderer: Renderer,
    pub assets: AssetServer,
}

impl Engine {
    /// Creates the engine. GPU resources are not allocated until
    /// [`init`](Self::init); the asset worker runtime starts immediately.
    pub fn new(settings: RenderSettings, asset_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            renderer: Renderer::new(settings),
            assets: AssetServer::new(asset_root)?,
        })
    }

    /// Binds the renderer to `window`.
    pub async fn init<W>(&mut self, window: W, width: u32, height: u32) -> Result<()>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        self.renderer.init(window, width, height).await
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }
}

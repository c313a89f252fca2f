//! Background loads for the showcase scene.
//!
//! Each load runs on the asset server's worker runtime. On success its
//! result is handed to the main thread as a queued task; on failure the
//! error is logged and the element stays absent. The returned handle
//! finishes once the outcome is queued or logged.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::assets::AssetServer;
use crate::showcase::config::ShowcaseConfig;
use crate::showcase::state::SceneState;
use crate::tasks::TaskSender;

/// Starts the model load. Completion places the instances and creates
/// their mixers.
pub fn spawn_model_load(
    assets: &AssetServer,
    config: &Arc<ShowcaseConfig>,
    tasks: TaskSender<SceneState>,
) -> JoinHandle<()> {
    let load = assets.load_prefab_async(&config.model);
    let config = Arc::clone(config);
    assets.spawn(async move {
        match load.await {
            Ok(prefab) => {
                log::info!(
                    "Model '{}' loaded: {} nodes, {} clips",
                    prefab.name,
                    prefab.nodes.len(),
                    prefab.animations.len()
                );
                let queued = tasks.send(move |state: &mut SceneState| {
                    state.populate_flock(&prefab, &config);
                });
                if !queued {
                    log::debug!("scene gone before model load completed");
                }
            }
            Err(e) => log::error!("Failed to load model '{}': {e}", config.model),
        }
    })
}

/// Starts the environment map load. Completion sets both the background
/// and the lighting environment.
pub fn spawn_environment_load(
    assets: &AssetServer,
    config: &ShowcaseConfig,
    tasks: TaskSender<SceneState>,
) -> JoinHandle<()> {
    let load = assets.load_hdr_texture_async(&config.environment_map);
    let locator = config.environment_map.clone();
    assets.spawn(async move {
        match load.await {
            Ok(texture) => {
                log::info!(
                    "Environment map '{locator}' loaded ({}x{})",
                    texture.width,
                    texture.height
                );
                let queued = tasks.send(move |state: &mut SceneState| {
                    state.apply_environment(texture);
                });
                if !queued {
                    log::debug!("scene gone before environment load completed");
                }
            }
            Err(e) => log::error!("Failed to load environment map '{locator}': {e}"),
        }
    })
}

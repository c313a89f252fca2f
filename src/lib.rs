#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod engine;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod showcase;
pub mod tasks;
pub mod tween;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use app::{App, AppHandler};
pub use assets::{AssetServer, Prefab, PrefabInstance, SharedPrefab};
pub use engine::Engine;
pub use errors::{AssetError, Error, Result};
pub use renderer::{RenderSettings, RenderSurface, Renderer, WgpuContext};
pub use resources::{Geometry, Mesh, Texture};
pub use scene::{Camera, Light, Node, NodeHandle, Scene, Transform};
pub use showcase::{SceneState, Showcase, ShowcaseConfig};
pub use tasks::{TaskQueue, TaskSender};
pub use tween::{Easing, Position, Timeline, Tween};

use std::sync::Arc;

use crate::animation::AnimationMixer;
use crate::assets::prefab::{Prefab, PrefabInstance};
use crate::renderer::RenderSurface;
use crate::resources::Texture;
use crate::scene::{Background, Camera, Light, NodeHandle, Scene};
use crate::showcase::config::ShowcaseConfig;

/// One animated copy of the model.
#[derive(Debug)]
pub struct FlockMember {
    pub instance: PrefabInstance,
    pub mixer: AnimationMixer,
    pub playback_rate: f32,
}

/// The model instances and their mixers; present once the model has loaded.
#[derive(Debug, Default)]
pub struct Flock {
    pub members: Vec<FlockMember>,
}

/// Everything the frame loop, the camera flight and the load completions
/// share. Passed around by `&mut`; nothing else holds it.
pub struct SceneState {
    pub scene: Scene,
    pub camera: NodeHandle,
    /// `None` until the model load completes.
    pub flock: Option<Flock>,
}

impl SceneState {
    /// Builds the initial scene: clear colour, ambient light and the camera
    /// at its start pose.
    #[must_use]
    pub fn new(config: &ShowcaseConfig, aspect: f32) -> Self {
        let mut scene = Scene::new();
        scene.background = Background::from_hex(config.clear_color);
        scene.add_light(Light::ambient_from_hex(
            config.ambient_color,
            config.ambient_intensity,
        ));

        let cam = &config.camera;
        let camera = scene.add_camera(Camera::new_perspective(cam.fov, aspect, cam.near, cam.far));
        if let Some(node) = scene.get_node_mut(camera) {
            node.transform.position = cam.position;
        }
        scene.active_camera = Some(camera);

        Self {
            scene,
            camera,
            flock: None,
        }
    }

    #[must_use]
    pub fn mixers_ready(&self) -> bool {
        self.flock.is_some()
    }

    /// Viewport changed: `surface` is resized and the camera aspect follows.
    /// Zero-sized viewports leave both untouched.
    pub fn resize_viewport<R>(&mut self, surface: &mut R, width: u32, height: u32)
    where
        R: RenderSurface + ?Sized,
    {
        if width == 0 || height == 0 {
            return;
        }
        surface.resize(width, height);
        self.resize(width, height);
    }

    /// Camera aspect only; nothing else in the scene changes. Zero-sized
    /// viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some((_, camera)) = self.scene.query_camera_bundle(self.camera) {
            camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// Places one instance of `prefab` per configured position, each with
    /// its own mixer playing every clip of the model.
    pub fn populate_flock(&mut self, prefab: &Prefab, config: &ShowcaseConfig) {
        if self.flock.is_some() {
            log::warn!("model already placed, ignoring second load");
            return;
        }
        if prefab.animations.is_empty() {
            log::warn!("model '{}' has no animation clips", prefab.name);
        }

        let members = config
            .instance_positions
            .iter()
            .zip(&config.playback_rates)
            .map(|(&position, &playback_rate)| {
                let instance = self.scene.instantiate(prefab);
                self.scene.place(instance.root, position, config.model_scale);

                let mut mixer = AnimationMixer::new();
                for clip in &prefab.animations {
                    mixer.play(clip, &instance);
                }

                FlockMember {
                    instance,
                    mixer,
                    playback_rate,
                }
            })
            .collect();

        self.flock = Some(Flock { members });
        log::info!(
            "placed {} instances of '{}'",
            config.instance_positions.len(),
            prefab.name
        );
    }

    /// Uses `texture` as both background and lighting environment.
    pub fn apply_environment(&mut self, texture: Arc<Texture>) {
        self.scene.background = Background::Texture(Arc::clone(&texture));
        self.scene.environment.set_env_map(Some(texture));
        self.scene.environment.set_intensity(1.0);
    }
}

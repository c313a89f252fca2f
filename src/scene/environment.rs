//! Environment
//!
//! Image-based lighting configuration for a scene.

use std::sync::Arc;

use crate::resources::Texture;

/// IBL environment: an equirectangular HDR map sampled for diffuse lighting.
#[derive(Clone, Debug)]
pub struct Environment {
    pub env_map: Option<Arc<Texture>>,
    pub intensity: f32,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_map: None,
            intensity: 1.0,
        }
    }

    pub fn set_env_map(&mut self, texture: Option<Arc<Texture>>) {
        self.env_map = texture;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
    }

    #[must_use]
    pub fn has_env_map(&self) -> bool {
        self.env_map.is_some()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

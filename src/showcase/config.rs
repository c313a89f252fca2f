//! Showcase configuration.
//!
//! Every constant of the scene lives here. [`ShowcaseConfig::default`]
//! is the shipped scene; embedders may load a variant from JSON.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::showcase::flight::CameraKeyframe;

/// Per-instance mixer speed factors, in instance order.
pub const PLAYBACK_RATES: [f32; 3] = [0.7, 0.6, 0.8];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Fixed world point the camera keeps facing during the flight.
    pub look_at: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 15.0),
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            look_at: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Directory relative locators resolve against.
    pub asset_root: PathBuf,
    pub model: String,
    pub environment_map: String,

    /// `0xRRGGBB` shown until the environment map arrives.
    pub clear_color: u32,
    pub ambient_color: u32,
    pub ambient_intensity: f32,

    pub model_scale: f32,
    pub instance_positions: Vec<Vec3>,
    /// Mixer speed factor per instance; same length as `instance_positions`.
    pub playback_rates: Vec<f32>,

    pub camera: CameraConfig,
    pub flight: Vec<CameraKeyframe>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            model: "scene.gltf".to_string(),
            environment_map: "overcast_soil_puresky_2k.hdr".to_string(),

            clear_color: 0xa3a3a3,
            ambient_color: 0xdddddd,
            ambient_intensity: 1.0,

            model_scale: 0.01,
            instance_positions: vec![
                Vec3::new(-1.0, 2.0, 2.0),
                Vec3::new(8.0, 3.0, -8.0),
                Vec3::new(-10.0, 1.0, -5.0),
            ],
            playback_rates: PLAYBACK_RATES.to_vec(),

            camera: CameraConfig::default(),
            flight: CameraKeyframe::default_flight(),
        }
    }
}

impl ShowcaseConfig {
    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, locator: impl Into<String>) -> Self {
        self.model = locator.into();
        self
    }

    #[must_use]
    pub fn with_environment_map(mut self, locator: impl Into<String>) -> Self {
        self.environment_map = locator.into();
        self
    }

    #[must_use]
    pub fn with_flight(mut self, flight: Vec<CameraKeyframe>) -> Self {
        self.flight = flight;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.instance_positions.len() != self.playback_rates.len() {
            return Err(Error::Config(format!(
                "{} instance positions but {} playback rates",
                self.instance_positions.len(),
                self.playback_rates.len()
            )));
        }
        if let Some(rate) = self.playback_rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(Error::Config(format!("invalid playback rate {rate}")));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(Error::Config(format!(
                "invalid clip planes near={} far={}",
                self.camera.near, self.camera.far
            )));
        }
        if let Some((i, kf)) = self
            .flight
            .iter()
            .enumerate()
            .find(|(_, kf)| !kf.duration.is_finite() || kf.duration < 0.0)
        {
            return Err(Error::Config(format!(
                "keyframe {} has invalid duration {}",
                i + 1,
                kf.duration
            )));
        }
        Ok(())
    }
}

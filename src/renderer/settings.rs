//! Renderer Settings
//!
//! GPU and presentation options fixed at renderer creation.
//!
//! ```rust,ignore
//! use phoenix::renderer::RenderSettings;
//!
//! let settings = RenderSettings::default()
//!     .with_vsync(false)
//!     .with_msaa_samples(1);
//! ```

/// Configuration for [`Renderer`](super::Renderer).
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Cap the frame rate to the display refresh rate.
    pub vsync: bool,

    /// GPU adapter selection preference.
    pub power_preference: wgpu::PowerPreference,

    /// Features the adapter must support; initialisation fails otherwise.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Depth buffer texture format.
    pub depth_format: wgpu::TextureFormat,

    /// Multisample count for the colour and depth targets. 1 disables MSAA.
    pub msaa_samples: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            depth_format: wgpu::TextureFormat::Depth32Float,
            msaa_samples: 4,
        }
    }
}

impl RenderSettings {
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    #[must_use]
    pub fn with_power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    #[must_use]
    pub fn with_msaa_samples(mut self, samples: u32) -> Self {
        self.msaa_samples = samples;
        self
    }

    /// Sample count handed to wgpu; never below 1.
    #[inline]
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        self.msaa_samples.max(1)
    }

    #[inline]
    #[must_use]
    pub fn is_multisampled(&self) -> bool {
        self.sample_count() > 1
    }

    #[must_use]
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

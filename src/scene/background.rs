//! Background Mode
//!
//! - [`Background::Color`]: hardware clear, no draw call
//! - [`Background::Texture`]: equirectangular panorama drawn as a
//!   full-screen triangle behind everything else

use std::sync::Arc;

use glam::Vec4;

use crate::resources::Texture;
use crate::scene::light::srgb_hex_to_linear;

#[derive(Clone, Debug)]
pub enum Background {
    /// Linear RGBA clear colour.
    Color(Vec4),
    /// Equirectangular HDR texture sampled along the view direction.
    Texture(Arc<Texture>),
}

impl Background {
    /// Solid background from a packed `0xRRGGBB` sRGB colour.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self::Color(srgb_hex_to_linear(hex).extend(1.0))
    }

    #[must_use]
    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture(_))
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(Vec4::new(0.0, 0.0, 0.0, 1.0))
    }
}

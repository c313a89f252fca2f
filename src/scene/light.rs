use glam::Vec3;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform light from all directions.
    Ambient,
}

/// Light component in the scene.
#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    /// Builds a light from a packed `0xRRGGBB` sRGB colour.
    #[must_use]
    pub fn ambient_from_hex(hex: u32, intensity: f32) -> Self {
        Self::new_ambient(srgb_hex_to_linear(hex), intensity)
    }
}

/// Converts a packed `0xRRGGBB` sRGB colour to linear RGB.
#[must_use]
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_endpoints_map_to_unit_range() {
        assert_eq!(srgb_hex_to_linear(0x000000), Vec3::ZERO);
        let white = srgb_hex_to_linear(0xffffff);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
    }

    #[test]
    fn grey_is_darker_in_linear_space() {
        let grey = srgb_hex_to_linear(0xa3a3a3);
        assert!(grey.x < 0xa3 as f32 / 255.0);
        assert!((grey.x - grey.y).abs() < 1e-6 && (grey.y - grey.z).abs() < 1e-6);
    }
}

use half::f16;
use uuid::Uuid;

/// CPU-side HDR texture, stored as RGBA half floats ready for upload.
///
/// Used for the equirectangular environment map.
#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` channels, row-major.
    pub data: Vec<f16>,
}

impl Texture {
    /// Builds a texture from RGB32F pixels, padding alpha to 1.
    #[must_use]
    pub fn from_rgb32f(name: &str, width: u32, height: u32, rgb: &[f32]) -> Self {
        let data = rgb
            .chunks_exact(3)
            .flat_map(|px| {
                [
                    f16::from_f32(px[0]),
                    f16::from_f32(px[1]),
                    f16::from_f32(px[2]),
                    f16::ONE,
                ]
            })
            .collect();

        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Rgba16Float
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Bytes per row of the tightly packed data.
    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_padded_with_opaque_alpha() {
        let tex = Texture::from_rgb32f("t", 2, 1, &[0.5, 1.0, 2.0, 0.0, 0.0, 0.0]);
        assert_eq!(tex.data.len(), 8);
        assert_eq!(tex.data[2].to_f32(), 2.0);
        assert_eq!(tex.data[3], f16::ONE);
        assert_eq!(tex.bytes().len(), 16);
        assert_eq!(tex.bytes_per_row(), 16);
    }
}

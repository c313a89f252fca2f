use std::sync::Arc;

use glam::Vec4;

use crate::resources::geometry::Geometry;
use crate::resources::image::TextureMap;

/// One draw: geometry plus its base colour.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub geometry: Arc<Geometry>,
    /// Linear RGBA base colour factor.
    pub base_color: Vec4,
    /// Multiplied with `base_color`, read through `TEXCOORD_0`.
    pub base_color_map: Option<TextureMap>,
}

impl Primitive {
    #[must_use]
    pub fn new(geometry: Arc<Geometry>, base_color: Vec4) -> Self {
        Self {
            geometry,
            base_color,
            base_color_map: None,
        }
    }
}

/// A mesh component: the primitives drawn at the owning node's transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, primitives: Vec<Primitive>) -> Self {
        Self {
            name: name.to_string(),
            primitives,
            visible: true,
        }
    }
}

//! Core resource definitions.
//!
//! CPU-side data the renderer uploads, independent of any GPU handle:
//! - Geometry: vertex attributes and indices
//! - Mesh: primitives drawn at a node
//! - Texture: HDR pixel data
//! - Image: 8-bit material textures

pub mod geometry;
pub mod image;
pub mod mesh;
pub mod texture;

pub use geometry::{Geometry, SkinnedVertex};
pub use image::{Image, ImageSampler, TextureMap};
pub use mesh::{Mesh, Primitive};
pub use texture::Texture;

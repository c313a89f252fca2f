//! Scene Graph Module
//!
//! Manages the scene hierarchy and its components:
//! - [`Node`]: hierarchy entry (parent/children + transform)
//! - [`Transform`]: TRS with cached matrices and look-at
//! - [`Scene`]: the container, its component pools and prefab instancing
//! - [`Camera`]: perspective camera component
//! - [`Light`]: ambient and directional lights
//! - [`Skeleton`]: joints bound to scene nodes
//! - [`transform_system`]: world-matrix propagation, decoupled from `Scene`

pub mod background;
pub mod camera;
pub mod environment;
pub mod light;
pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use background::Background;
pub use camera::Camera;
pub use environment::Environment;
pub use light::{Light, LightKind};
pub use node::Node;
pub use scene::Scene;
pub use skeleton::{Skeleton, SkinBinding};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct SkeletonKey;
}

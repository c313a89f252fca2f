use std::sync::Arc;

use glam::Affine3A;

use crate::animation::clip::AnimationClip;
use crate::resources::mesh::Mesh;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices into `Prefab::nodes`.
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
    /// Index into `Prefab::skeletons`.
    pub skin_index: Option<usize>,
}

impl PrefabNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct PrefabSkeleton {
    pub name: String,
    /// Indices into `Prefab::nodes`, in joint order.
    pub bone_indices: Vec<usize>,
    pub inverse_bind_matrices: Vec<Affine3A>,
}

/// Intermediate model data decoded from a glTF file.
///
/// Holds no scene handles and is `Send + Sync`; [`Scene::instantiate`]
/// turns it into live nodes as many times as needed.
///
/// [`Scene::instantiate`]: crate::scene::Scene::instantiate
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub name: String,
    /// Flat node storage.
    pub nodes: Vec<PrefabNode>,
    pub skeletons: Vec<PrefabSkeleton>,
    pub animations: Vec<Arc<AnimationClip>>,
}

impl Prefab {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

pub type SharedPrefab = Arc<Prefab>;

/// Handles produced by one `Scene::instantiate` call.
#[derive(Debug, Clone)]
pub struct PrefabInstance {
    /// Group node every parentless prefab node hangs under. Positioning and
    /// scaling this node moves the whole instance.
    pub root: NodeHandle,
    /// `nodes[i]` is the scene node created for `Prefab::nodes[i]`.
    pub nodes: Vec<NodeHandle>,
}

impl PrefabInstance {
    #[must_use]
    pub fn node(&self, prefab_index: usize) -> Option<NodeHandle> {
        self.nodes.get(prefab_index).copied()
    }
}

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::prefab::{Prefab, PrefabInstance};
use crate::resources::mesh::Mesh;
use crate::scene::background::Background;
use crate::scene::camera::Camera;
use crate::scene::environment::Environment;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::skeleton::{Skeleton, SkinBinding};
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle, SkeletonKey};

/// Scene graph.
///
/// Pure data: node hierarchy, component pools and global settings. The
/// renderer reads it, the animation mixers and the camera flight write node
/// transforms, and [`update`](Self::update) propagates matrices once per
/// frame.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // === Component pools ===
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub skins: SlotMap<SkeletonKey, Skeleton>,

    pub environment: Environment,
    pub background: Background,

    pub active_camera: Option<NodeHandle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            skins: SlotMap::with_key(),
            environment: Environment::new(),
            background: Background::default(),
            active_camera: None,
        }
    }

    /// Adds a node at the top level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        self.link(parent, handle);
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent
    /// (or from the top level).
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p) {
                n.children.retain(|&x| x != child);
            }
        } else {
            self.root_nodes.retain(|&x| x != child);
        }

        self.link(parent, child);
    }

    fn link(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let mut node = Node::new("Camera");
        node.camera = Some(self.cameras.insert(camera));
        self.add_node(node)
    }

    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let mut node = Node::new("Light");
        node.light = Some(self.lights.insert(light));
        self.add_node(node)
    }

    /// The (Transform, Camera) pair of a camera node.
    pub fn query_camera_bundle(
        &mut self,
        handle: NodeHandle,
    ) -> Option<(&mut Transform, &mut Camera)> {
        let camera_key = self.nodes.get(handle)?.camera?;
        let camera = self.cameras.get_mut(camera_key)?;
        let transform = &mut self.nodes.get_mut(handle)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn camera_of(&self, handle: NodeHandle) -> Option<&Camera> {
        let key = self.nodes.get(handle)?.camera?;
        self.cameras.get(key)
    }

    /// Lights attached to visible nodes, with their world matrices.
    pub fn iter_active_lights(&self) -> impl Iterator<Item = (&Light, &Affine3A)> {
        self.nodes.values().filter(|n| n.visible).filter_map(|node| {
            let light = self.lights.get(node.light?)?;
            Some((light, &node.transform.world_matrix))
        })
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(
            &mut self.nodes,
            &mut self.cameras,
            &self.root_nodes,
        );
    }

    pub fn update_skeletons(&mut self) {
        let tasks: Vec<(SkeletonKey, Affine3A)> = self
            .nodes
            .values()
            .filter_map(|node| {
                let binding = node.skin.as_ref()?;
                Some((binding.skeleton, node.transform.world_matrix.inverse()))
            })
            .collect();

        let nodes = &self.nodes;
        for (key, root_inv) in tasks {
            if let Some(skeleton) = self.skins.get_mut(key) {
                skeleton.compute_joint_matrices(nodes, root_inv);
            }
        }
    }

    /// World matrices, camera matrices and joint palettes, in that order.
    pub fn update(&mut self) {
        self.update_matrix_world();
        self.update_skeletons();
    }

    // ========================================================================
    // Prefab instancing
    // ========================================================================

    /// Creates a fresh copy of `prefab` in the scene.
    ///
    /// Every call makes new nodes, new mesh components and a new skeleton
    /// bound to the new nodes, so instances never share pose or animation
    /// state. Geometry is shared. Parentless prefab nodes hang under a new
    /// group node which is added at the top level.
    pub fn instantiate(&mut self, prefab: &Prefab) -> PrefabInstance {
        let name = if prefab.name.is_empty() {
            "Prefab"
        } else {
            prefab.name.as_str()
        };
        let root = self.add_node(Node::new(name));

        let handles: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut node = Node::new(p.name.as_deref().unwrap_or("Node"));
                node.transform = Transform::from_trs(
                    p.transform.position,
                    p.transform.rotation,
                    p.transform.scale,
                );
                node.mesh = p.mesh.clone().map(|mesh| self.meshes.insert(mesh));
                self.nodes.insert(node)
            })
            .collect();

        // A node keeps the first parent that claims it; later claims and
        // self references are ignored.
        let mut has_parent = vec![false; handles.len()];
        for (i, p) in prefab.nodes.iter().enumerate() {
            for &c in &p.children_indices {
                if c == i || c >= handles.len() || has_parent[c] {
                    continue;
                }
                has_parent[c] = true;
                self.link(handles[i], handles[c]);
            }
        }
        for (i, &handle) in handles.iter().enumerate() {
            if !has_parent[i] {
                self.link(root, handle);
            }
        }

        let skeleton_keys: Vec<SkeletonKey> = prefab
            .skeletons
            .iter()
            .map(|s| {
                let bones = s
                    .bone_indices
                    .iter()
                    .filter_map(|&b| handles.get(b).copied())
                    .collect();
                self.skins
                    .insert(Skeleton::new(&s.name, bones, s.inverse_bind_matrices.clone()))
            })
            .collect();

        for (i, p) in prefab.nodes.iter().enumerate() {
            let Some(&key) = p.skin_index.and_then(|s| skeleton_keys.get(s)) else {
                continue;
            };
            if let Some(node) = self.nodes.get_mut(handles[i]) {
                node.skin = Some(SkinBinding { skeleton: key });
            }
        }

        PrefabInstance {
            root,
            nodes: handles,
        }
    }

    /// Sets position and uniform scale of a top-level or nested node.
    pub fn place(&mut self, handle: NodeHandle, position: Vec3, scale: f32) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.position = position;
            node.transform.scale = Vec3::splat(scale);
        }
    }
}

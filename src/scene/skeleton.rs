use glam::{Affine3A, Mat4};
use slotmap::SlotMap;
use uuid::Uuid;

use crate::scene::{Node, NodeHandle, SkeletonKey};

/// Links a mesh node to the skeleton that deforms it.
///
/// Joint matrices are expressed relative to the skinned node's current world
/// matrix, so placing an instance root moves its skin with it.
#[derive(Debug, Clone)]
pub struct SkinBinding {
    pub skeleton: SkeletonKey,
}

/// A set of joints bound to concrete scene nodes.
///
/// `bones[i]` is joint `i` in the vertex stream. Each prefab instance owns
/// its own skeleton, so two instances never share a pose.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    pub bones: Vec<NodeHandle>,
    pub(crate) inverse_bind_matrices: Vec<Affine3A>,

    /// Recomputed every frame from the bone world matrices.
    pub(crate) joint_matrices: Vec<Mat4>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<NodeHandle>, inverse_bind_matrices: Vec<Affine3A>) -> Self {
        let count = bones.len();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
            joint_matrices: vec![Mat4::IDENTITY; count],
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    /// Updates the joint palette.
    ///
    /// `root_matrix_inv` is the inverse world matrix of the skinned mesh node;
    /// it brings bone transforms back into mesh space. Joints whose node has
    /// been removed keep their previous matrix.
    pub fn compute_joint_matrices(
        &mut self,
        nodes: &SlotMap<NodeHandle, Node>,
        root_matrix_inv: Affine3A,
    ) {
        for (i, &bone_handle) in self.bones.iter().enumerate() {
            let Some(bone_node) = nodes.get(bone_handle) else {
                continue;
            };
            let ibm = self
                .inverse_bind_matrices
                .get(i)
                .copied()
                .unwrap_or(Affine3A::IDENTITY);

            self.joint_matrices[i] =
                (root_matrix_inv * bone_node.transform.world_matrix * ibm).into();
        }
    }
}

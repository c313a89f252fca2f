use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use uuid::Uuid;

/// Interleaved vertex as uploaded to the GPU.
///
/// Layout matches the forward pipeline's single vertex buffer:
/// position, normal, uv, joint indices, joint weights.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u16; 4],
    pub weights: [f32; 4],
}

/// Triangle-list geometry with optional skinning attributes.
///
/// Immutable once built; shared across prefab instances through `Arc` and
/// cached on the GPU by `uuid`.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// `TEXCOORD_0`; empty when the primitive has none.
    pub uvs: Vec<Vec2>,
    /// Joint indices per vertex; empty for rigid geometry.
    pub joints: Vec<[u16; 4]>,
    /// Joint weights per vertex; empty for rigid geometry.
    pub weights: Vec<[f32; 4]>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    #[must_use]
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            joints: Vec::new(),
            weights: Vec::new(),
            indices: None,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.joints.is_empty() && self.joints.len() == self.weights.len()
    }

    /// Area-weighted smooth normals from the triangle list.
    pub fn compute_vertex_normals(&mut self) {
        let count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; count];

        let mut accumulate = |i0: usize, i1: usize, i2: usize| {
            if i0 >= count || i1 >= count || i2 >= count {
                return;
            }
            let (v0, v1, v2) = (self.positions[i0], self.positions[i1], self.positions[i2]);
            let face_normal = (v1 - v0).cross(v2 - v0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        };

        if let Some(indices) = &self.indices {
            for tri in indices.chunks_exact(3) {
                accumulate(tri[0] as usize, tri[1] as usize, tri[2] as usize);
            }
        } else {
            for i in (0..count.saturating_sub(2)).step_by(3) {
                accumulate(i, i + 1, i + 2);
            }
        }

        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Interleaves the attribute arrays. Missing attributes fall back to an
    /// up normal, uv (0, 0) and a full weight on joint 0.
    #[must_use]
    pub fn interleaved(&self) -> Vec<SkinnedVertex> {
        let skinned = self.is_skinned();
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| SkinnedVertex {
                position: p.to_array(),
                normal: self.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                uv: self.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
                joints: if skinned { self.joints[i] } else { [0; 4] },
                weights: if skinned {
                    self.weights[i]
                } else {
                    [1.0, 0.0, 0.0, 0.0]
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
    }

    #[test]
    fn normals_follow_winding() {
        let mut geometry = triangle();
        geometry.compute_vertex_normals();
        for n in &geometry.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn rigid_geometry_binds_joint_zero() {
        let v = triangle().interleaved();
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].joints, [0; 4]);
        assert_eq!(v[0].weights, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(v[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn uvs_are_interleaved_per_vertex() {
        let mut geometry = triangle();
        geometry.uvs = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let v = geometry.interleaved();
        assert_eq!(v[1].uv, [1.0, 0.0]);
        assert_eq!(v[2].uv, [0.0, 1.0]);
        assert_eq!(std::mem::size_of::<SkinnedVertex>(), 56);
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine as _;
use glam::{Affine3A, Vec3, Vec4};

use phoenix::animation::binding::TargetPath;
use phoenix::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use phoenix::animation::tracks::{InterpolationMode, KeyframeTrack};
use phoenix::assets::prefab::{Prefab, PrefabNode, PrefabSkeleton};
use phoenix::errors::{Error, Result};
use phoenix::renderer::RenderSurface;
use phoenix::resources::{Geometry, Mesh, Primitive};
use phoenix::scene::{NodeHandle, Scene};

pub const EPSILON: f32 = 1e-4;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

/// A [`RenderSurface`] that records what each frame would have drawn.
#[derive(Default)]
pub struct RecordingSurface {
    /// Camera node of every render, in order.
    pub renders: Vec<NodeHandle>,
    /// Scene node count seen by every render.
    pub node_counts: Vec<usize>,
    /// Camera world matrix seen by the latest render.
    pub camera_world: Option<Affine3A>,
    pub size: Option<(u32, u32)>,
    pub resizes: usize,
    pub fail: bool,
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, scene: &Scene, camera: NodeHandle) -> Result<()> {
        if self.fail {
            return Err(Error::Surface("device lost".to_string()));
        }
        self.renders.push(camera);
        self.node_counts.push(scene.nodes.len());
        self.camera_world = scene.get_node(camera).map(|n| *n.world_matrix());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.resizes += 1;
    }
}

/// Clip moving prefab node 1 from the origin to (0, 1, 0) over one second.
pub fn flap_clip() -> AnimationClip {
    AnimationClip::new(
        "Flap".to_string(),
        vec![Track {
            meta: TrackMeta {
                node_index: 1,
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::Y],
                InterpolationMode::Linear,
            )),
        }],
    )
}

/// Three nodes: `Root` -> `Hips` (the only bone), plus a skinned `Body`
/// mesh at the top level. Carries [`flap_clip`].
pub fn skinned_prefab() -> Prefab {
    let mut geometry = Geometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
    geometry.compute_vertex_normals();
    geometry.joints = vec![[0, 0, 0, 0]; 3];
    geometry.weights = vec![[1.0, 0.0, 0.0, 0.0]; 3];

    let mesh = Mesh::new(
        "Body",
        vec![Primitive::new(Arc::new(geometry), Vec4::ONE)],
    );

    let mut prefab = Prefab::new("Bird");
    prefab.nodes = vec![
        PrefabNode {
            name: Some("Root".to_string()),
            children_indices: vec![1],
            ..PrefabNode::default()
        },
        PrefabNode {
            name: Some("Hips".to_string()),
            ..PrefabNode::default()
        },
        PrefabNode {
            name: Some("Body".to_string()),
            mesh: Some(mesh),
            skin_index: Some(0),
            ..PrefabNode::default()
        },
    ];
    prefab.skeletons = vec![PrefabSkeleton {
        name: "Rig".to_string(),
        bone_indices: vec![1],
        inverse_bind_matrices: vec![Affine3A::IDENTITY],
    }];
    prefab.animations = vec![Arc::new(flap_clip())];
    prefab
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A `.gltf` document with every buffer embedded as a base64 data URI:
/// one triangle on node 1 (child of node 0) and a one-second translation
/// clip named `Bob` on node 1.
pub fn embedded_gltf() -> Vec<u8> {
    let mut buffer = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    buffer.extend(f32_bytes(&[0.0, 1.0]));
    buffer.extend(f32_bytes(&[0.0, 0.0, 0.0, 0.0, 2.0, 0.0]));
    assert_eq!(buffer.len(), 68);

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer)
    );

    let doc = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Root", "children": [1] },
            { "name": "Body", "mesh": 0 }
        ],
        "meshes": [{
            "name": "Tri",
            "primitives": [{ "attributes": { "POSITION": 0 } }]
        }],
        "animations": [{
            "name": "Bob",
            "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
            "samplers": [{ "input": 1, "output": 2, "interpolation": "LINEAR" }]
        }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
        ],
        "buffers": [{ "byteLength": 68, "uri": uri }]
    });

    serde_json::to_vec(&doc).unwrap()
}

/// A 2x1 Radiance HDR image: (1.0, 0.5, 0.25) then (0.5, 0.5, 0.5).
pub fn tiny_hdr() -> Vec<u8> {
    let mut bytes = b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 2\n".to_vec();
    bytes.extend_from_slice(&[128, 64, 32, 129]);
    bytes.extend_from_slice(&[128, 128, 128, 128]);
    bytes
}

/// 2x1 RGBA pixels of [`png_bytes`]: opaque red, then half-transparent blue.
pub const PNG_PIXELS: [u8; 8] = [255, 0, 0, 255, 0, 0, 255, 128];

/// [`PNG_PIXELS`] encoded as a PNG file.
pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::from_raw(2, 1, PNG_PIXELS.to_vec()).unwrap();
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Where [`textured_gltf`] keeps its base colour image.
pub enum ImageSource<'a> {
    /// Inside the binary buffer, through a buffer view.
    BufferView,
    /// A base64 `data:` URI.
    DataUri,
    /// A file next to the model.
    External(&'a str),
}

/// One triangle with `TEXCOORD_0` and a material whose base colour texture
/// is [`png_bytes`] named `Feathers`, sampled with nearest magnification and
/// clamped `u`.
pub fn textured_gltf(source: ImageSource<'_>) -> Vec<u8> {
    let mut buffer = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    buffer.extend(f32_bytes(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
    assert_eq!(buffer.len(), 60);

    let png = png_bytes();
    let mut views = vec![
        serde_json::json!({ "buffer": 0, "byteOffset": 0, "byteLength": 36 }),
        serde_json::json!({ "buffer": 0, "byteOffset": 36, "byteLength": 24 }),
    ];
    let image = match source {
        ImageSource::BufferView => {
            views.push(serde_json::json!({
                "buffer": 0, "byteOffset": 60, "byteLength": png.len()
            }));
            buffer.extend(&png);
            serde_json::json!({ "name": "Feathers", "bufferView": 2, "mimeType": "image/png" })
        }
        ImageSource::DataUri => serde_json::json!({
            "name": "Feathers",
            "uri": format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&png)
            )
        }),
        ImageSource::External(uri) => serde_json::json!({ "name": "Feathers", "uri": uri }),
    };

    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer)
    );

    let doc = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "Wing", "mesh": 0 }],
        "meshes": [{
            "name": "Tri",
            "primitives": [{
                "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
                "material": 0
            }]
        }],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 1.0, 1.0, 0.5],
                "baseColorTexture": { "index": 0 }
            }
        }],
        "textures": [{ "source": 0, "sampler": 0 }],
        "samplers": [{ "magFilter": 9728, "wrapS": 33071 }],
        "images": [image],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }
        ],
        "bufferViews": views,
        "buffers": [{ "byteLength": buffer.len(), "uri": uri }]
    });

    serde_json::to_vec(&doc).unwrap()
}

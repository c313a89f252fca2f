use std::sync::Arc;

use base64::Engine as _;
use glam::{Affine3A, Mat4, Quat, Vec2, Vec3, Vec4};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::io::AssetReaderVariant;
use crate::assets::prefab::{Prefab, PrefabNode, PrefabSkeleton, SharedPrefab};
use crate::errors::{AssetError, Error, Result};
use crate::resources::geometry::Geometry;
use crate::resources::image::{Image, ImageSampler, TextureMap};
use crate::resources::mesh::{Mesh, Primitive};
use crate::scene::transform::Transform;

/// glTF 2.0 loader producing [`Prefab`]s.
///
/// Reads `.gltf` (JSON) and `.glb` files. Buffers may live in the GLB binary
/// chunk, in base64 `data:` URIs, or in external files next to the model.
/// Materials contribute their base colour factor and base colour texture.
pub struct GltfLoader;

/// Encoded image bytes, indexed like `gltf.images()`. `None` marks an
/// image that could not be fetched.
type EncodedImages = Vec<Option<Vec<u8>>>;

impl GltfLoader {
    /// Fetches and decodes the model at `source` (path or URL).
    pub async fn load_async(source: &str) -> Result<SharedPrefab> {
        let reader = AssetReaderVariant::from_source(source)?;
        let filename = AssetReaderVariant::source_filename(source).to_string();
        let bytes = reader.read_bytes(&filename).await?;
        Self::load_from_bytes_async(&filename, bytes, Some(&reader)).await
    }

    /// Decodes a model already in memory. External buffer URIs are fetched
    /// through `reader`; without one only embedded buffers are accepted.
    pub async fn load_from_bytes_async(
        name: &str,
        bytes: Vec<u8>,
        reader: Option<&AssetReaderVariant>,
    ) -> Result<SharedPrefab> {
        let gltf = gltf::Gltf::from_slice(&bytes)?;
        let buffers = Self::resolve_buffers(&gltf, reader).await?;
        let images = Self::resolve_images(&gltf, &buffers, reader).await?;

        let name = name.to_string();
        let prefab = tokio::task::spawn_blocking(move || {
            Self::build_prefab(&name, &gltf, &buffers, &images)
        })
        .await??;
        Ok(Arc::new(prefab))
    }

    /// Synchronous decode for models whose buffers are all embedded.
    pub fn parse_embedded(name: &str, bytes: &[u8]) -> Result<Prefab> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = gltf
            .buffers()
            .map(|buffer| Self::embedded_buffer(&gltf, &buffer))
            .collect::<Result<Vec<_>>>()?;
        let images = gltf
            .images()
            .map(|image| Self::embedded_image(&image, &buffers))
            .collect::<Result<Vec<_>>>()?;
        Self::build_prefab(name, &gltf, &buffers, &images)
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    async fn resolve_buffers(
        gltf: &gltf::Gltf,
        reader: Option<&AssetReaderVariant>,
    ) -> Result<Vec<Vec<u8>>> {
        let mut data = Vec::with_capacity(gltf.buffers().count());
        for buffer in gltf.buffers() {
            let bytes = match (buffer.source(), reader) {
                (gltf::buffer::Source::Uri(uri), Some(reader)) if !uri.starts_with("data:") => {
                    reader.read_bytes(uri).await?
                }
                _ => Self::embedded_buffer(gltf, &buffer)?,
            };
            if bytes.len() < buffer.length() {
                return Err(Error::Asset(AssetError::InvalidData(format!(
                    "buffer {} holds {} bytes, {} expected",
                    buffer.index(),
                    bytes.len(),
                    buffer.length()
                ))));
            }
            data.push(bytes);
        }
        Ok(data)
    }

    fn embedded_buffer(gltf: &gltf::Gltf, buffer: &gltf::Buffer) -> Result<Vec<u8>> {
        match buffer.source() {
            gltf::buffer::Source::Bin => gltf.blob.clone().ok_or_else(|| {
                Error::Asset(AssetError::InvalidData("missing GLB binary chunk".to_string()))
            }),
            gltf::buffer::Source::Uri(uri) => {
                let Some(encoded) = data_uri_payload(uri) else {
                    return Err(Error::Asset(AssetError::InvalidData(format!(
                        "external buffer '{uri}' needs an asset reader"
                    ))));
                };
                Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
            }
        }
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// A texture that cannot be fetched is dropped with a warning; the model
    /// still loads.
    async fn resolve_images(
        gltf: &gltf::Gltf,
        buffers: &[Vec<u8>],
        reader: Option<&AssetReaderVariant>,
    ) -> Result<EncodedImages> {
        let mut encoded = Vec::with_capacity(gltf.images().count());
        for image in gltf.images() {
            let bytes = match (image.source(), reader) {
                (gltf::image::Source::Uri { uri, .. }, Some(reader)) if !uri.starts_with("data:") => {
                    match reader.read_bytes(uri).await {
                        Ok(bytes) => Some(bytes),
                        Err(e) => {
                            log::warn!("image '{uri}' could not be read: {e}");
                            None
                        }
                    }
                }
                _ => Self::embedded_image(&image, buffers)?,
            };
            encoded.push(bytes);
        }
        Ok(encoded)
    }

    fn embedded_image(image: &gltf::Image, buffers: &[Vec<u8>]) -> Result<Option<Vec<u8>>> {
        match image.source() {
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                buffers
                    .get(view.buffer().index())
                    .and_then(|buffer| buffer.get(start..end))
                    .map(|bytes| Some(bytes.to_vec()))
                    .ok_or_else(|| {
                        Error::Asset(AssetError::InvalidData(format!(
                            "image {} points outside its buffer",
                            image.index()
                        )))
                    })
            }
            gltf::image::Source::Uri { uri, .. } => match data_uri_payload(uri) {
                Some(encoded) => Ok(Some(base64::engine::general_purpose::STANDARD.decode(encoded)?)),
                None => {
                    log::warn!("image '{uri}' is external and no asset reader is available");
                    Ok(None)
                }
            },
        }
    }

    fn decode_images(gltf: &gltf::Document, encoded: &[Option<Vec<u8>>]) -> Result<Vec<Option<Arc<Image>>>> {
        gltf.images()
            .map(|image| {
                let Some(bytes) = encoded.get(image.index()).and_then(Option::as_ref) else {
                    return Ok(None);
                };
                let rgba = ::image::load_from_memory(bytes)?.to_rgba8();
                let name = image
                    .name()
                    .map_or_else(|| format!("image {}", image.index()), str::to_string);
                Ok(Some(Arc::new(Image::from_rgba8(
                    &name,
                    rgba.width(),
                    rgba.height(),
                    rgba.into_raw(),
                ))))
            })
            .collect()
    }

    fn texture_map(info: &gltf::texture::Info, images: &[Option<Arc<Image>>]) -> Option<TextureMap> {
        use gltf::texture::{MagFilter, MinFilter, WrappingMode};

        if info.tex_coord() != 0 {
            log::warn!("texture {} uses TEXCOORD_{}, only set 0 is read", info.texture().index(), info.tex_coord());
            return None;
        }
        let texture = info.texture();
        let image = images.get(texture.source().index())?.clone()?;

        let wrap = |mode: WrappingMode| match mode {
            WrappingMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            WrappingMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
            WrappingMode::Repeat => wgpu::AddressMode::Repeat,
        };
        let sampler = texture.sampler();
        // No mip chain is generated; mipmapped minification keeps its base filter.
        let min_filter = match sampler.min_filter() {
            Some(MinFilter::Nearest | MinFilter::NearestMipmapNearest | MinFilter::NearestMipmapLinear) => {
                wgpu::FilterMode::Nearest
            }
            _ => wgpu::FilterMode::Linear,
        };
        let mag_filter = match sampler.mag_filter() {
            Some(MagFilter::Nearest) => wgpu::FilterMode::Nearest,
            _ => wgpu::FilterMode::Linear,
        };

        Some(TextureMap {
            image,
            sampler: ImageSampler {
                address_mode_u: wrap(sampler.wrap_s()),
                address_mode_v: wrap(sampler.wrap_t()),
                mag_filter,
                min_filter,
            },
        })
    }

    // ========================================================================
    // Prefab assembly
    // ========================================================================

    fn build_prefab(
        name: &str,
        gltf: &gltf::Document,
        buffers: &[Vec<u8>],
        encoded_images: &[Option<Vec<u8>>],
    ) -> Result<Prefab> {
        let mut prefab = Prefab::new(name);
        let images = Self::decode_images(gltf, encoded_images)?;

        for node in gltf.nodes() {
            let (t, r, s) = node.transform().decomposed();
            prefab.nodes.push(PrefabNode {
                name: node.name().map(str::to_string),
                transform: Transform::from_trs(
                    Vec3::from_array(t),
                    Quat::from_array(r),
                    Vec3::from_array(s),
                ),
                children_indices: node.children().map(|c| c.index()).collect(),
                mesh: node
                    .mesh()
                    .map(|mesh| Self::load_mesh(&mesh, buffers, &images))
                    .transpose()?,
                skin_index: node.skin().map(|skin| skin.index()),
            });
        }

        prefab.skeletons = gltf
            .skins()
            .map(|skin| Self::load_skin(&skin, buffers))
            .collect();

        prefab.animations = gltf
            .animations()
            .map(|anim| Arc::new(Self::load_animation(&anim, buffers)))
            .collect();

        log::info!(
            "glTF '{name}': {} nodes, {} skins, {} clips",
            prefab.nodes.len(),
            prefab.skeletons.len(),
            prefab.animations.len()
        );
        Ok(prefab)
    }

    fn load_mesh(
        mesh: &gltf::Mesh,
        buffers: &[Vec<u8>],
        images: &[Option<Arc<Image>>],
    ) -> Result<Mesh> {
        let mut primitives = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "mesh '{}': skipping primitive {} with mode {:?}",
                    mesh.name().unwrap_or("Mesh"),
                    primitive.index(),
                    primitive.mode()
                );
                continue;
            }
            let geometry = Self::load_primitive_geometry(&primitive, buffers)?;
            let pbr = primitive.material().pbr_metallic_roughness();
            let base_color_map = pbr
                .base_color_texture()
                .and_then(|info| Self::texture_map(&info, images));
            primitives.push(Primitive {
                geometry: Arc::new(geometry),
                base_color: Vec4::from_array(pbr.base_color_factor()),
                base_color_map,
            });
        }
        Ok(Mesh::new(mesh.name().unwrap_or("Mesh"), primitives))
    }

    fn load_primitive_geometry(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Result<Geometry> {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| {
                Error::Asset(AssetError::InvalidData("primitive without POSITION".to_string()))
            })?
            .map(Vec3::from_array)
            .collect();
        let count = positions.len();

        let mut geometry = Geometry::new(positions);
        geometry.indices = reader.read_indices().map(|iter| iter.into_u32().collect());

        match reader.read_normals() {
            Some(iter) => geometry.normals = iter.map(Vec3::from_array).collect(),
            None => geometry.compute_vertex_normals(),
        }

        if let Some(iter) = reader.read_tex_coords(0) {
            let uvs: Vec<Vec2> = iter.into_f32().map(Vec2::from_array).collect();
            if uvs.len() == count {
                geometry.uvs = uvs;
            }
        }

        let joints: Vec<[u16; 4]> = reader
            .read_joints(0)
            .map(|r| r.into_u16().collect())
            .unwrap_or_default();
        let weights: Vec<[f32; 4]> = reader
            .read_weights(0)
            .map(|r| r.into_f32().collect())
            .unwrap_or_default();
        if joints.len() == count && weights.len() == count {
            geometry.joints = joints;
            geometry.weights = weights;
        } else if !joints.is_empty() || !weights.is_empty() {
            log::warn!(
                "primitive {}: skinning attributes do not match {count} vertices, drawing rigid",
                primitive.index()
            );
        }

        Ok(geometry)
    }

    fn load_skin(skin: &gltf::Skin, buffers: &[Vec<u8>]) -> PrefabSkeleton {
        let joints: Vec<gltf::Node> = skin.joints().collect();

        let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let inverse_bind_matrices: Vec<Affine3A> = match reader.read_inverse_bind_matrices() {
            Some(iter) => iter
                .map(|m| Affine3A::from_mat4(Mat4::from_cols_array_2d(&m)))
                .collect(),
            None => vec![Affine3A::IDENTITY; joints.len()],
        };

        PrefabSkeleton {
            name: skin.name().unwrap_or("Skeleton").to_string(),
            bone_indices: joints.iter().map(gltf::Node::index).collect(),
            inverse_bind_matrices,
        }
    }

    fn load_animation(anim: &gltf::Animation, buffers: &[Vec<u8>]) -> AnimationClip {
        use gltf::animation::util::ReadOutputs;

        let clip_name = anim.name().unwrap_or("anim").to_string();
        let mut tracks = Vec::new();

        for (channel_index, channel) in anim.channels().enumerate() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let node_index = channel.target().node().index();

            let Some(inputs) = reader.read_inputs() else {
                log::warn!("clip '{clip_name}': channel {channel_index} has no inputs");
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let (target, data) = match reader.read_outputs() {
                Some(ReadOutputs::Translations(iter)) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                Some(ReadOutputs::Rotations(iter)) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                Some(ReadOutputs::Scales(iter)) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(
                        times,
                        iter.map(Vec3::from_array).collect(),
                        interpolation,
                    )),
                ),
                Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
            };

            tracks.push(Track {
                meta: TrackMeta { node_index, target },
                data,
            });
        }

        AnimationClip::new(clip_name, tracks)
    }
}

/// The base64 payload of a `data:` URI.
fn data_uri_payload(uri: &str) -> Option<&str> {
    uri.strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
}

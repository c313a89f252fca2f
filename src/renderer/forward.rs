//! Forward pass for skinned and rigid meshes.
//!
//! GPU resources are created on first sight and cached:
//! - vertex/index buffers per geometry uuid
//! - a joint matrix storage buffer per skeleton
//! - a texture view per base colour image uuid, a sampler per sampler state
//! - a uniform buffer and bind group per (node, primitive)

use std::collections::HashMap;
use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::resources::{Geometry, Image, ImageSampler, SkinnedVertex, TextureMap};
use crate::scene::{NodeHandle, Scene, SkeletonKey};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct DrawUniforms {
    model: Mat4,
    normal_matrix: Mat4,
    base_color: Vec4,
    skinning: Vec4,
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    count: u32,
}

struct GpuDraw {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct DrawCommand {
    key: (NodeHandle, usize),
    geometry: Uuid,
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Uint16x4,
        4 => Float32x4
    ];
    wgpu::VertexBufferLayout {
        array_stride: size_of::<SkinnedVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

pub(crate) struct ForwardPass {
    pipeline: wgpu::RenderPipeline,
    draw_layout: wgpu::BindGroupLayout,
    /// Bound for rigid meshes; a single identity matrix.
    identity_joints: wgpu::Buffer,
    /// Bound for primitives without a base colour map.
    white: wgpu::TextureView,

    geometries: HashMap<Uuid, GpuGeometry>,
    skeletons: HashMap<SkeletonKey, wgpu::Buffer>,
    images: HashMap<Uuid, wgpu::TextureView>,
    samplers: HashMap<ImageSampler, wgpu::Sampler>,
    draws: HashMap<(NodeHandle, usize), GpuDraw>,
    commands: Vec<DrawCommand>,
}

impl ForwardPass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let source = format!(
            "{}\n{}",
            super::frame::COMMON_WGSL,
            include_str!("shaders/forward.wgsl")
        );
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Forward Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw BindGroup Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Forward Pipeline Layout"),
            bind_group_layouts: &[Some(frame_layout), Some(&draw_layout)],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Forward Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: Some(true),
                depth_compare: Some(wgpu::CompareFunction::Less),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        let identity_joints = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Identity Joints"),
            contents: bytemuck::bytes_of(&Mat4::IDENTITY),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let white = upload_image(device, queue, &Image::white());

        Self {
            pipeline,
            draw_layout,
            identity_joints,
            white,
            geometries: HashMap::new(),
            skeletons: HashMap::new(),
            images: HashMap::new(),
            samplers: HashMap::new(),
            draws: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// Uploads per-frame data for every visible mesh primitive and records
    /// the draw list.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        self.commands.clear();

        for (key, skeleton) in &scene.skins {
            let joints = skeleton.joint_matrices();
            if joints.is_empty() {
                continue;
            }
            let bytes: &[u8] = bytemuck::cast_slice(joints);
            match self.skeletons.get(&key) {
                Some(buffer) if buffer.size() == bytes.len() as u64 => {
                    queue.write_buffer(buffer, 0, bytes);
                }
                _ => {
                    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("Joints ({})", skeleton.name)),
                        contents: bytes,
                        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                    });
                    self.skeletons.insert(key, buffer);
                    // Bind groups holding the old buffer are stale.
                    self.draws.clear();
                }
            }
        }

        for (handle, node) in &scene.nodes {
            if !node.visible {
                continue;
            }
            let Some(mesh) = node.mesh.and_then(|key| scene.meshes.get(key)) else {
                continue;
            };
            if !mesh.visible {
                continue;
            }

            let skeleton = node.skin.as_ref().map(|binding| binding.skeleton);
            let model = Mat4::from(*node.world_matrix());
            let normal_matrix = model.inverse().transpose();

            for (index, primitive) in mesh.primitives.iter().enumerate() {
                let geometry = &primitive.geometry;
                if geometry.vertex_count() == 0 {
                    continue;
                }
                self.geometries
                    .entry(geometry.uuid)
                    .or_insert_with(|| upload_geometry(device, geometry));

                let skinned = geometry.is_skinned()
                    && skeleton.is_some_and(|key| self.skeletons.contains_key(&key));
                let uniforms = DrawUniforms {
                    model,
                    normal_matrix,
                    base_color: primitive.base_color,
                    skinning: Vec4::new(if skinned { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0),
                };

                let key = (handle, index);
                if !self.draws.contains_key(&key) {
                    let map = primitive.base_color_map.as_ref();
                    if let Some(map) = map {
                        self.cache_texture_map(device, queue, map);
                    }
                    let sampler_state = map.map(|m| m.sampler).unwrap_or_default();
                    let sampler = self
                        .samplers
                        .entry(sampler_state)
                        .or_insert_with(|| create_sampler(device, &sampler_state));
                    let view = map
                        .and_then(|m| self.images.get(&m.image.uuid))
                        .unwrap_or(&self.white);
                    let joints = skeleton
                        .filter(|_| skinned)
                        .and_then(|key| self.skeletons.get(&key))
                        .unwrap_or(&self.identity_joints);
                    let draw = create_draw(device, &self.draw_layout, joints, view, sampler);
                    self.draws.insert(key, draw);
                }
                if let Some(draw) = self.draws.get(&key) {
                    queue.write_buffer(&draw.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
                }

                self.commands.push(DrawCommand {
                    key,
                    geometry: geometry.uuid,
                });
            }
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, frame_bind_group: &wgpu::BindGroup) {
        if self.commands.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, frame_bind_group, &[]);

        for command in &self.commands {
            let (Some(draw), Some(geometry)) =
                (self.draws.get(&command.key), self.geometries.get(&command.geometry))
            else {
                continue;
            };
            pass.set_bind_group(1, &draw.bind_group, &[]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            match &geometry.index_buffer {
                Some(indices) => {
                    pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..geometry.count, 0, 0..1);
                }
                None => pass.draw(0..geometry.count, 0..1),
            }
        }
    }

    fn cache_texture_map(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, map: &TextureMap) {
        let image = &map.image;
        self.images.entry(image.uuid).or_insert_with(|| {
            log::debug!("Uploading image '{}' ({}x{})", image.name, image.width, image.height);
            upload_image(device, queue, image)
        });
    }

    /// Drops cached resources whose node or skeleton left the scene.
    pub fn prune(&mut self, scene: &Scene) {
        self.draws
            .retain(|(handle, _), _| scene.nodes.contains_key(*handle));
        self.skeletons.retain(|key, _| scene.skins.contains_key(*key));
    }
}

fn upload_image(device: &wgpu::Device, queue: &wgpu::Queue, image: &Image) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&image.name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: image.format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: Some(image.height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_sampler(device: &wgpu::Device, state: &ImageSampler) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Base Color Sampler"),
        address_mode_u: state.address_mode_u,
        address_mode_v: state.address_mode_v,
        mag_filter: state.mag_filter,
        min_filter: state.min_filter,
        ..Default::default()
    })
}

fn upload_geometry(device: &wgpu::Device, geometry: &Geometry) -> GpuGeometry {
    let vertices = geometry.interleaved();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let (index_buffer, count) = match &geometry.indices {
        Some(indices) if !indices.is_empty() => {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            (Some(buffer), indices.len() as u32)
        }
        _ => (None, vertices.len() as u32),
    };

    GpuGeometry {
        vertex_buffer,
        index_buffer,
        count,
    }
}

fn create_draw(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    joints: &wgpu::Buffer,
    base_color_map: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> GpuDraw {
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniforms"),
        size: size_of::<DrawUniforms>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw BindGroup"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: joints.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(base_color_map),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuDraw {
        uniform_buffer,
        bind_group,
    }
}

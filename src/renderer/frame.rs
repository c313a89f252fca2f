//! Per-frame GPU state shared by every pass: camera and light uniforms plus
//! the environment map binding (group 0 in all shaders).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use uuid::Uuid;
use wgpu::util::DeviceExt;

use crate::resources::Texture;
use crate::scene::{Camera, LightKind, Scene};

pub(crate) const COMMON_WGSL: &str = include_str!("shaders/common.wgsl");

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    pub view_projection: Mat4,
    pub inv_view_rotation_projection: Mat4,
    pub camera_position: Vec4,
    pub ambient: Vec4,
    pub environment: Vec4,
}

impl FrameUniforms {
    pub fn extract(scene: &Scene, camera: &Camera) -> Self {
        let view = *camera.view_matrix();
        let projection = *camera.projection_matrix();

        let mut rotation_only = view;
        rotation_only.w_axis = Vec4::W;
        let inv_view_rotation_projection = (projection * rotation_only).inverse();

        let ambient: Vec3 = scene
            .iter_active_lights()
            .filter(|(light, _)| light.kind == LightKind::Ambient)
            .map(|(light, _)| light.color * light.intensity)
            .sum();

        let env = &scene.environment;
        let has_env = if env.has_env_map() { 1.0 } else { 0.0 };

        Self {
            view_projection: *camera.view_projection_matrix(),
            inv_view_rotation_projection,
            camera_position: camera.world_position().extend(1.0),
            ambient: ambient.extend(1.0),
            environment: Vec4::new(env.intensity, has_env, 0.0, 0.0),
        }
    }
}

/// Group 0 resources. The bind group is rebuilt only when the bound
/// environment texture changes.
pub(crate) struct FrameResources {
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    placeholder: wgpu::TextureView,
    env: Option<(Uuid, wgpu::TextureView)>,
}

impl FrameResources {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame BindGroup Layout"),
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
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let black = Texture::from_rgb32f("placeholder", 1, 1, &[0.0, 0.0, 0.0]);
        let placeholder = upload_texture(device, queue, &black);
        let bind_group = Self::create_bind_group(device, &layout, &uniform_buffer, &placeholder, &sampler);

        Self {
            layout,
            bind_group,
            uniform_buffer,
            sampler,
            placeholder,
            env: None,
        }
    }

    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let wanted = scene.environment.env_map.as_ref();
        let current = self.env.as_ref().map(|(id, _)| *id);
        if wanted.map(|t| t.uuid) == current {
            return;
        }

        self.env = wanted.map(|texture| {
            log::info!(
                "Uploading environment map '{}' ({}x{})",
                texture.name,
                texture.width,
                texture.height
            );
            (texture.uuid, upload_texture(device, queue, texture))
        });
        let view = self.env.as_ref().map_or(&self.placeholder, |(_, view)| view);
        self.bind_group =
            Self::create_bind_group(device, &self.layout, &self.uniform_buffer, view, &self.sampler);
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniforms: &wgpu::Buffer,
        env_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BindGroup"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(env_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, texture: &Texture) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: 1,
    };
    let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&texture.name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture.format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &gpu_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        texture.bytes(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(texture.bytes_per_row()),
            rows_per_image: Some(texture.height),
        },
        size,
    );

    gpu_texture.create_view(&wgpu::TextureViewDescriptor::default())
}

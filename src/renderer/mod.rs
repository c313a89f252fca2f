//! Rendering Module
//!
//! A small forward renderer on wgpu:
//!
//! - [`context`]: device, queue, surface, depth buffer and MSAA target
//! - [`settings`]: creation-time options
//! - background pass: equirectangular environment behind the scene
//! - forward pass: GPU-skinned meshes lit by ambient light and the
//!   environment map
//!
//! The renderer is created uninitialised and bound to a window with
//! [`Renderer::init`]. Until then rendering is a no-op.

pub mod context;
pub mod settings;

mod background;
mod forward;
mod frame;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::errors::{Error, Result};
use crate::scene::{Background, NodeHandle, Scene};

use self::background::BackgroundPass;
use self::forward::ForwardPass;
use self::frame::{FrameResources, FrameUniforms};

pub use context::WgpuContext;
pub use settings::RenderSettings;

/// Anything the frame driver can draw a scene into.
pub trait RenderSurface {
    /// Draws `scene` as seen from the camera on node `camera`.
    fn render(&mut self, scene: &Scene, camera: NodeHandle) -> Result<()>;

    /// Follows a viewport change.
    fn resize(&mut self, width: u32, height: u32);
}

struct RendererState {
    context: WgpuContext,
    frame: FrameResources,
    background: BackgroundPass,
    forward: ForwardPass,
}

pub struct Renderer {
    settings: RenderSettings,
    size: (u32, u32),
    state: Option<RendererState>,
    frame_count: u64,
}

impl Renderer {
    /// Phase 1: configuration only, no GPU resources.
    #[must_use]
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            size: (0, 0),
            state: None,
            frame_count: 0,
        }
    }

    /// Phase 2: acquires the GPU and builds the pipelines for `window`.
    pub async fn init<W>(&mut self, window: W, width: u32, height: u32) -> Result<()>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        if self.state.is_some() {
            return Ok(());
        }

        let context = WgpuContext::new(window, &self.settings, width, height).await?;
        let device = &context.device;

        let frame = FrameResources::new(device, &context.queue);
        let color_format = context.color_format();
        let samples = context.sample_count;
        let background =
            BackgroundPass::new(device, &frame.layout, color_format, context.depth_format, samples);
        let forward = ForwardPass::new(
            device,
            &context.queue,
            &frame.layout,
            color_format,
            context.depth_format,
            samples,
        );

        log::info!(
            "Renderer initialised: {width}x{height}, surface format {color_format:?}"
        );

        self.size = context.size();
        self.state = Some(RendererState {
            context,
            frame,
            background,
            forward,
        });
        Ok(())
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    #[must_use]
    pub fn context(&self) -> Option<&WgpuContext> {
        self.state.as_ref().map(|s| &s.context)
    }

    fn draw_frame(state: &mut RendererState, scene: &Scene, camera: NodeHandle) -> Result<()> {
        let Some(camera) = scene.camera_of(camera) else {
            return Ok(());
        };

        let mut reconfigure = false;
        let output = match state.context.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) => output,
            wgpu::CurrentSurfaceTexture::Suboptimal(output) => {
                reconfigure = true;
                output
            }
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                log::warn!("Surface lost, reconfiguring");
                state.context.reconfigure();
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                log::debug!("Surface not ready, skipping frame");
                return Ok(());
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                log::error!("Render error: surface texture validation failed");
                return Err(Error::Surface(
                    "surface texture validation failed".to_string(),
                ));
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let ctx = &state.context;
        let uniforms = FrameUniforms::extract(scene, camera);
        state.frame.prepare(&ctx.device, &ctx.queue, scene, &uniforms);
        state.forward.prepare(&ctx.device, &ctx.queue, scene);

        let clear = match &scene.background {
            Background::Color(c) => wgpu::Color {
                r: f64::from(c.x),
                g: f64::from(c.y),
                b: f64::from(c.z),
                a: f64::from(c.w),
            },
            Background::Texture(_) => wgpu::Color::BLACK,
        };

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            // With MSAA the multisampled target is resolved into the surface
            // and need not be stored.
            let (target, resolve_target) = ctx.color_attachment_views(&view);
            let store = if resolve_target.is_some() {
                wgpu::StoreOp::Discard
            } else {
                wgpu::StoreOp::Store
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if scene.background.is_texture() {
                state.background.draw(&mut pass, &state.frame.bind_group);
            }
            state.forward.draw(&mut pass, &state.frame.bind_group);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        if reconfigure {
            state.context.reconfigure();
        }
        Ok(())
    }
}

impl RenderSurface for Renderer {
    fn render(&mut self, scene: &Scene, camera: NodeHandle) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        Self::draw_frame(state, scene, camera)?;

        self.frame_count += 1;
        if self.frame_count % 600 == 0 {
            state.forward.prune(scene);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        if let Some(state) = self.state.as_mut() {
            state.context.resize(width, height);
        }
    }
}

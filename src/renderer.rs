use anyhow::Result;
use glam::Vec2;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::DemoConfig;
use crate::core::scene::{QUAD_INDICES, QUAD_POSITIONS, QUAD_TEXCOORDS};
use crate::core::{
    ControlOverlay, DrawCommand, GpuContext, SceneRenderer, TextureHandle, Viewport,
    CONTROL_POINT_COUNT,
};
use crate::loaders::TextureImage;

/// Quads that fit in the per-frame model uniform buffer
const MAX_QUADS: usize = 16;

/// Dynamic uniform offsets must be multiples of this
const MODEL_STRIDE: wgpu::BufferAddress = 256;

const FRAMEBUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

// === GPU Data Structures ===

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

/// Model matrix uniform for one quad
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    matrix: [[f32; 4]; 4],
}

/// Overlay uniform: selected point and marker half size in clip units
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct OverlayUniform {
    selection: i32,
    _pad: f32,
    half_extent: [f32; 2],
}

/// Values shown in the HUD overlay
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub fps: f32,
    pub bezier_t: f32,
    pub selection: Option<(usize, Vec2)>,
}

struct SpriteTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws the scene into an off-screen framebuffer, composites it onto the
/// window surface, then overlays the control polygon and HUD
pub struct FrameRenderer {
    gpu: GpuContext,
    surface_config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    point_size: f32,

    _framebuffer: wgpu::Texture,
    framebuffer_view: wgpu::TextureView,

    quad_pipeline: wgpu::RenderPipeline,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    sprite_layout: wgpu::BindGroupLayout,
    sprite_sampler: wgpu::Sampler,
    textures: Vec<SpriteTexture>,

    composite_pipeline: wgpu::RenderPipeline,
    composite_bind_group: wgpu::BindGroup,

    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    overlay_buffer: wgpu::Buffer,
    overlay_bind_group: wgpu::BindGroup,
    control_point_buffer: wgpu::Buffer,
    uploaded_version: Option<u64>,

    pending_quads: Vec<DrawCommand>,
    pending_overlay: Option<ControlOverlay>,

    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl FrameRenderer {
    pub async fn new(window: Arc<Window>, settings: &DemoConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone()).await?;

        let surface_config = gpu.surface_config(size.width, size.height);
        gpu.surface().configure(gpu.device(), &surface_config);

        let device = gpu.device();

        let (framebuffer, framebuffer_view) =
            Self::create_framebuffer(device, settings.window.width, settings.window.height);

        let sprite_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let sprite_layout = Self::create_texture_layout(device, "Sprite Bind Group Layout");
        let (quad_pipeline, model_buffer, model_bind_group) =
            Self::create_quad_pipeline(device, &sprite_layout);
        let (quad_vertex_buffer, quad_index_buffer) = Self::create_quad_buffers(device);

        let (composite_pipeline, composite_bind_group) = Self::create_composite_pipeline(
            device,
            &framebuffer_view,
            &sprite_sampler,
            surface_config.format,
        );

        let (line_pipeline, point_pipeline, overlay_buffer, overlay_bind_group) =
            Self::create_overlay_pipelines(device, surface_config.format);

        let control_point_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Control Point Buffer"),
            size: (CONTROL_POINT_COUNT * std::mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let [r, g, b, a] = settings.clear_color;
        log::info!(
            "Renderer initialized: surface {}x{} ({:?}), framebuffer {}x{}",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            settings.window.width,
            settings.window.height
        );

        Ok(Self {
            gpu,
            surface_config,
            clear_color: wgpu::Color { r, g, b, a },
            point_size: settings.point_size,
            _framebuffer: framebuffer,
            framebuffer_view,
            quad_pipeline,
            quad_vertex_buffer,
            quad_index_buffer,
            model_buffer,
            model_bind_group,
            sprite_layout,
            sprite_sampler,
            textures: Vec::new(),
            composite_pipeline,
            composite_bind_group,
            line_pipeline,
            point_pipeline,
            overlay_buffer,
            overlay_bind_group,
            control_point_buffer,
            uploaded_version: None,
            pending_quads: Vec::with_capacity(MAX_QUADS),
            pending_overlay: None,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    /// Upload a decoded image and return a handle usable in draw commands
    pub fn upload_texture(&mut self, label: &str, image: &TextureImage) -> TextureHandle {
        let device = self.gpu.device();
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.gpu.queue().write_texture(
            texture.as_image_copy(),
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.stride()),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Self::create_texture_bind_group(
            device,
            &self.sprite_layout,
            &view,
            &self.sprite_sampler,
        );

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(SpriteTexture {
            _texture: texture,
            bind_group,
        });
        log::info!("Uploaded {} texture ({}x{})", label, image.width, image.height);
        handle
    }

    /// Current surface size as a viewport
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.surface_config.width, self.surface_config.height)
    }

    /// Resize the surface; zero-sized requests (minimised windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }

    pub fn reconfigure(&mut self) {
        log::debug!(
            "Configuring surface {}x{}",
            self.surface_config.width,
            self.surface_config.height
        );
        self.gpu
            .surface()
            .configure(self.gpu.device(), &self.surface_config);
    }

    /// Let egui see the event first; returns true when egui consumed it
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Encode and present everything queued since the last call
    pub fn render(
        &mut self,
        window: &Window,
        hud: Option<&HudInfo>,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let quads = std::mem::take(&mut self.pending_quads);
        let overlay = self.pending_overlay.take();

        if quads.len() > MAX_QUADS {
            log::warn!("Dropping {} quads past the per-frame limit", quads.len() - MAX_QUADS);
        }
        for (i, command) in quads.iter().take(MAX_QUADS).enumerate() {
            let uniform = ModelUniform {
                matrix: command.transform.to_cols_array_2d(),
            };
            self.gpu.queue().write_buffer(
                &self.model_buffer,
                i as wgpu::BufferAddress * MODEL_STRIDE,
                bytemuck::bytes_of(&uniform),
            );
        }
        if let Some(overlay) = &overlay {
            self.upload_overlay(overlay);
        }

        let output = self.gpu.surface().get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Scene pass - sprites into the off-screen framebuffer
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.framebuffer_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.quad_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (i, command) in quads.iter().take(MAX_QUADS).enumerate() {
                let Some(texture) = self.textures.get(command.texture.0 as usize) else {
                    log::warn!(
                        "Skipping {} quad: unknown texture {:?}",
                        command.slot.label(),
                        command.texture
                    );
                    continue;
                };
                let offset = (i as wgpu::BufferAddress * MODEL_STRIDE) as wgpu::DynamicOffset;
                render_pass.set_bind_group(0, &self.model_bind_group, &[offset]);
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
            }
        }

        // Composite pass - framebuffer to window, then control polygon on top
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.composite_pipeline);
            render_pass.set_bind_group(0, &self.composite_bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            if overlay.is_some() {
                let points = CONTROL_POINT_COUNT as u32;
                render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.control_point_buffer.slice(..));

                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.draw(0..points, 0..1);

                render_pass.set_pipeline(&self.point_pipeline);
                render_pass.draw(0..6, 0..points);
            }
        }

        // egui pass - HUD overlay
        let mut command_buffers = Vec::new();
        if let Some(hud) = hud {
            command_buffers = self.encode_hud(window, &mut encoder, &view, hud);
        }

        command_buffers.push(encoder.finish());
        self.gpu.queue().submit(command_buffers);
        output.present();
        Ok(())
    }

    fn upload_overlay(&mut self, overlay: &ControlOverlay) {
        if self.uploaded_version != Some(overlay.version) {
            let points = overlay.points.map(|p| p.to_array());
            self.gpu.queue().write_buffer(
                &self.control_point_buffer,
                0,
                bytemuck::cast_slice(&points),
            );
            self.uploaded_version = Some(overlay.version);
        }

        let half_extent = self.viewport().point_half_extent(self.point_size);
        let uniform = OverlayUniform {
            selection: overlay.selection,
            _pad: 0.0,
            half_extent: half_extent.to_array(),
        };
        self.gpu
            .queue()
            .write_buffer(&self.overlay_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn encode_hud(
        &mut self,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        hud: &HudInfo,
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("HUD")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0}", hud.fps))
                            .size(32.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                    ui.label(
                        egui::RichText::new(format!("t = {:.3}", hud.bezier_t))
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );
                    if let Some((index, point)) = hud.selection {
                        ui.label(
                            egui::RichText::new(format!(
                                "point {}: ({:.3}, {:.3})",
                                index, point.x, point.y
                            ))
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                        );
                    }
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(self.gpu.device(), self.gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let command_buffers = self.egui_renderer.update_buffers(
            self.gpu.device(),
            self.gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // egui-wgpu wants a 'static pass; it is dropped before the encoder is reused
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        command_buffers
    }

    fn create_framebuffer(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Framebuffer Color Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAMEBUFFER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_texture_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create_quad_buffers(device: &wgpu::Device) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertices: Vec<QuadVertex> = QUAD_POSITIONS
            .iter()
            .zip(QUAD_TEXCOORDS.iter())
            .map(|(&position, &uv)| QuadVertex { position, uv })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        (vertex_buffer, index_buffer)
    }

    fn create_quad_pipeline(
        device: &wgpu::Device,
        sprite_layout: &wgpu::BindGroupLayout,
    ) -> (wgpu::RenderPipeline, wgpu::Buffer, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let model_size = wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64);

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: model_size,
                },
                count: None,
            }],
        });

        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniform Buffer"),
            size: MODEL_STRIDE * MAX_QUADS as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: model_size,
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&model_layout, sprite_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &QUAD_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: FRAMEBUFFER_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, model_buffer, model_bind_group)
    }

    fn create_composite_pipeline(
        device: &wgpu::Device,
        framebuffer_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/composite.wgsl").into()),
        });

        let layout = Self::create_texture_layout(device, "Composite Bind Group Layout");
        let bind_group =
            Self::create_texture_bind_group(device, &layout, framebuffer_view, sampler);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Composite Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Composite Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn create_overlay_pipelines(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::RenderPipeline, wgpu::Buffer, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Overlay Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform = OverlayUniform {
            selection: -1,
            _pad: 0.0,
            half_extent: [0.0, 0.0],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let stride = std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress;
        let pipeline = |label: &str,
                        vs: &str,
                        fs: &str,
                        step_mode: wgpu::VertexStepMode,
                        topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: stride,
                        step_mode,
                        attributes: &POINT_ATTRIBUTES,
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let line_pipeline = pipeline(
            "Control Line Pipeline",
            "vs_line",
            "fs_line",
            wgpu::VertexStepMode::Vertex,
            wgpu::PrimitiveTopology::LineStrip,
        );
        let point_pipeline = pipeline(
            "Control Point Pipeline",
            "vs_point",
            "fs_point",
            wgpu::VertexStepMode::Instance,
            wgpu::PrimitiveTopology::TriangleList,
        );

        (line_pipeline, point_pipeline, buffer, bind_group)
    }
}

impl SceneRenderer for FrameRenderer {
    fn draw_quad(&mut self, command: &DrawCommand) {
        self.pending_quads.push(*command);
    }

    fn draw_overlay(&mut self, overlay: &ControlOverlay) {
        self.pending_overlay = Some(*overlay);
    }
}

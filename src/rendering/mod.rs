//! Rendering system with wgpu pipeline for the sketch's display list.

mod font;
mod frame_rate;
mod tessellate;

pub use frame_rate::FrameRateMonitor;
pub use tessellate::{tessellate, Tessellation, Vertex};

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::params::RecordingConfig;
use crate::sketch::{DrawList, Viewport};

/// Vertices the buffer holds before it has to grow
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// Uniform buffer for the 2D shader (logical pixels -> clip space)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub projection: [[f32; 4]; 4],
}

impl Uniforms {
    /// Orthographic projection with the origin at the top-left corner
    pub fn for_viewport(viewport: Viewport) -> Self {
        let width = viewport.width.max(1.0) as f32;
        let height = viewport.height.max(1.0) as f32;
        Self {
            projection: Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
                .to_cols_array_2d(),
        }
    }
}

/// Rendering system managing wgpu device, pipeline and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    size: PhysicalSize<u32>,
    scale_factor: f64,
    recording_config: Option<RecordingConfig>,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<Window>,
        recording_config: Option<RecordingConfig>,
    ) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find suitable GPU adapter")?;

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("Failed to request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            choose_surface_format(&surface_caps.formats, recording_config.is_some())
                .context("Surface offers no format usable for this session")?;

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;

        // Add COPY_SRC if recording (needed for frame capture)
        if recording_config.is_some() {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        log::info!(
            "Surface: {}x{} ({:?}, scale {})",
            size.width,
            size.height,
            surface_format,
            scale_factor
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sketch Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        let viewport = logical_viewport(size, scale_factor);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[Uniforms::for_viewport(viewport)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sketch Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sketch Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // y points down in logical space, so winding flips
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            uniform_buffer,
            uniform_bind_group,
            size,
            scale_factor,
            recording_config,
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Drawable area in logical pixels
    pub fn viewport(&self) -> Viewport {
        logical_viewport(self.size, self.scale_factor)
    }

    /// Reconfigure the surface after a window resize or scale change
    pub fn resize(&mut self, new_size: PhysicalSize<u32>, scale_factor: f64) {
        self.size = new_size;
        self.scale_factor = scale_factor;

        let uniforms = Uniforms::for_viewport(self.viewport());
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        // A minimised window has no surface to configure
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Render a frame (and optionally capture if recording)
    pub fn render(&mut self, list: &DrawList, frame_num: usize) -> Result<(), wgpu::SurfaceError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(());
        }

        let tess = tessellate(list);
        self.upload_vertices(&tess.vertices);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: tess.clear.r as f64,
                            g: tess.clear.g as f64,
                            b: tess.clear.b as f64,
                            a: tess.clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !tess.vertices.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..tess.vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        // Capture frame if recording
        if let Some(ref config) = self.recording_config {
            if let Err(e) = self.capture_frame(frame_num, config, &output) {
                log::error!("Failed to save frame {}: {:#}", frame_num, e);
            }
        }

        output.present();

        Ok(())
    }

    /// Write vertices, growing the buffer when a frame needs more room
    fn upload_vertices(&mut self, vertices: &[Vertex]) {
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Capture a frame to disk (recording mode only)
    fn capture_frame(
        &self,
        frame_num: usize,
        config: &RecordingConfig,
        texture: &wgpu::SurfaceTexture,
    ) -> Result<()> {
        let (width, height) = (self.config.width, self.config.height);
        let bytes_per_pixel = 4; // RGBA8 / BGRA8
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        // Create buffer to read texture data
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Capture Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, |_| {});
        self.device.poll(wgpu::Maintain::Wait);

        let data = buffer_slice.get_mapped_range();
        let image_data = unpad_rows(
            &data,
            width as usize,
            height as usize,
            padded_bytes_per_row as usize,
            is_bgra(self.config.format),
        );
        drop(data);
        buffer.unmap();

        let frame_path = config.frame_path(frame_num);
        image::save_buffer(
            &frame_path,
            &image_data,
            width,
            height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("Failed to write {}", frame_path.display()))
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn logical_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f64>(scale_factor);
    Viewport::new(logical.width, logical.height)
}

/// Pick the surface format.
///
/// Grey levels are given in display space, so linear 8-bit targets come
/// first and sRGB ones last. Frame capture reads back 4 bytes per pixel,
/// which limits a recording session to the 8-bit RGBA/BGRA formats.
fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    recording: bool,
) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat::*;

    let offered = |candidates: &[wgpu::TextureFormat]| {
        candidates.iter().find(|f| formats.contains(*f)).copied()
    };
    let linear = offered(&[Rgba8Unorm, Bgra8Unorm]);
    if recording {
        return linear.or_else(|| offered(&[Rgba8UnormSrgb, Bgra8UnormSrgb]));
    }

    linear
        .or_else(|| formats.iter().find(|f| !f.is_srgb()).copied())
        .or_else(|| formats.first().copied())
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Strip row padding from a texture readback and convert to RGBA
fn unpad_rows(
    data: &[u8],
    width: usize,
    height: usize,
    padded_bytes_per_row: usize,
    bgra: bool,
) -> Vec<u8> {
    let row_bytes = width * 4;
    let mut image_data = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let start = y * padded_bytes_per_row;
        image_data.extend_from_slice(&data[start..start + row_bytes]);
    }
    if bgra {
        for pixel in image_data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    image_data
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_projection_maps_corners() {
        let uniforms = Uniforms::for_viewport(Viewport::new(800.0, 600.0));
        let projection = Mat4::from_cols_array_2d(&uniforms.projection);

        let top_left = projection * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = projection * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_viewport_projection_is_finite() {
        let uniforms = Uniforms::for_viewport(Viewport::default());
        assert!(uniforms.projection.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_logical_viewport_applies_scale() {
        let viewport = logical_viewport(PhysicalSize::new(3000, 1800), 2.0);
        assert_eq!(viewport, Viewport::new(1500.0, 900.0));
    }

    #[test]
    fn test_surface_format_prefers_linear_eight_bit() {
        use wgpu::TextureFormat::*;
        let formats = [Bgra8UnormSrgb, Rgba16Float, Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(Bgra8Unorm));
        assert_eq!(choose_surface_format(&formats, true), Some(Bgra8Unorm));
    }

    #[test]
    fn test_recording_never_picks_wide_formats() {
        use wgpu::TextureFormat::*;
        assert_eq!(
            choose_surface_format(&[Rgba16Float, Bgra8UnormSrgb], true),
            Some(Bgra8UnormSrgb)
        );
        assert_eq!(choose_surface_format(&[Rgba16Float, Rgb10a2Unorm], true), None);

        // Without capture any non-sRGB format will do
        assert_eq!(
            choose_surface_format(&[Rgba16Float, Bgra8UnormSrgb], false),
            Some(Rgba16Float)
        );
        assert_eq!(
            choose_surface_format(&[Rgba16Float, Rgb10a2Unorm], false),
            Some(Rgba16Float)
        );
    }

    #[test]
    fn test_unpad_rows_swaps_bgra() {
        // 1x2 image, rows padded to 8 bytes
        let data = [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0];
        assert_eq!(
            unpad_rows(&data, 1, 2, 8, false),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(
            unpad_rows(&data, 1, 2, 8, true),
            vec![3, 2, 1, 4, 7, 6, 5, 8]
        );
    }
}

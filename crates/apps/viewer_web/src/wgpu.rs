#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use gpu::GpuError;
    use gpu::mesh::{FULLSCREEN_QUAD, MarkerVertex, MeshVertex, QuadVertex, sphere_mesh};
    use gpu::renderer::GlobeFrame;
    use gpu::shaders::{REVEAL_SHADER, atmosphere_shader, globe_shader, marker_shader};
    use gpu::surface::{GlobeSurface, RevealSurface};
    use gpu::uniforms::{GlobeGlobals, RevealGpuUniforms};
    use scene::SurfaceSize;
    use scene::reveal::RevealUniforms;
    use std::borrow::Cow;

    // Fields drop in order: the surface goes before its instance.
    struct GpuContext {
        surface: ::wgpu::Surface<'static>,
        device: ::wgpu::Device,
        queue: ::wgpu::Queue,
        config: ::wgpu::SurfaceConfiguration,
        canvas: web_sys::HtmlCanvasElement,
        _instance: ::wgpu::Instance,
    }

    async fn init_context(
        canvas: web_sys::HtmlCanvasElement,
        size: SurfaceSize,
        label: &str,
    ) -> Result<GpuContext, GpuError> {
        canvas.set_width(size.width);
        canvas.set_height(size.height);

        // A canvas-backed surface owns its target, so the instance can live
        // in the context and go away with it on release.
        let instance = ::wgpu::Instance::new(&::wgpu::InstanceDescriptor {
            backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GpuError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GpuError::Adapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some(label),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| GpuError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        // Shader colors are already display values, as on a WebGL canvas.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GpuError::Surface("no supported surface format".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == ::wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(::wgpu::CompositeAlphaMode::Auto);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(GpuContext {
            surface,
            device,
            queue,
            config,
            canvas,
            _instance: instance,
        })
    }

    fn uniform_layout(device: &::wgpu::Device, label: &str) -> ::wgpu::BindGroupLayout {
        device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("lumen-globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    fn color_pass<'a>(
        encoder: &'a mut ::wgpu::CommandEncoder,
        label: &str,
        view: &'a ::wgpu::TextureView,
        depth: Option<&'a ::wgpu::TextureView>,
    ) -> ::wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: ::wgpu::Operations {
                    load: ::wgpu::LoadOp::Clear(::wgpu::Color::TRANSPARENT),
                    store: ::wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: depth.map(|view| ::wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(::wgpu::Operations {
                    load: ::wgpu::LoadOp::Clear(1.0),
                    store: ::wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        })
    }

    struct RevealResources {
        ctx: GpuContext,
        pipeline: ::wgpu::RenderPipeline,
        uniform_buffer: ::wgpu::Buffer,
        bind_group: ::wgpu::BindGroup,
        quad_buffer: ::wgpu::Buffer,
    }

    /// Reveal program, quad and context for one canvas.
    pub struct WgpuRevealSurface {
        resources: Option<RevealResources>,
    }

    impl WgpuRevealSurface {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            size: SurfaceSize,
        ) -> Result<Self, GpuError> {
            let ctx = init_context(canvas, size, "lumen-reveal-device").await?;
            let device = &ctx.device;

            let shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
                label: Some("lumen-reveal-shader"),
                source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(REVEAL_SHADER)),
            });

            let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
                label: Some("lumen-reveal-uniforms"),
                size: std::mem::size_of::<RevealGpuUniforms>() as u64,
                usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let layout = uniform_layout(device, "lumen-reveal-bgl");
            let bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
                label: Some("lumen-reveal-bg"),
                layout: &layout,
                entries: &[::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            let pipeline_layout =
                device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                    label: Some("lumen-reveal-pipeline-layout"),
                    bind_group_layouts: &[&layout],
                    immediate_size: 0,
                });

            let pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
                label: Some("lumen-reveal-pipeline"),
                layout: Some(&pipeline_layout),
                vertex: ::wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[::wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<QuadVertex>() as ::wgpu::BufferAddress,
                        step_mode: ::wgpu::VertexStepMode::Vertex,
                        attributes: &[::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: 0,
                        }],
                    }],
                },
                fragment: Some(::wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(::wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(::wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                        write_mask: ::wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: ::wgpu::PrimitiveState {
                    topology: ::wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: ::wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: ::wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: ::wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

            let quad_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("lumen-reveal-quad"),
                contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
                usage: ::wgpu::BufferUsages::VERTEX,
            });

            Ok(Self {
                resources: Some(RevealResources {
                    ctx,
                    pipeline,
                    uniform_buffer,
                    bind_group,
                    quad_buffer,
                }),
            })
        }
    }

    impl RevealSurface for WgpuRevealSurface {
        fn draw(&mut self, uniforms: &RevealUniforms) -> Result<(), GpuError> {
            let r = self.resources.as_ref().ok_or(GpuError::Released)?;
            let frame = r
                .ctx
                .surface
                .get_current_texture()
                .map_err(|e| GpuError::Acquire(e.to_string()))?;
            let view = frame
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            let packed = RevealGpuUniforms::from(uniforms);
            r.ctx
                .queue
                .write_buffer(&r.uniform_buffer, 0, bytemuck::bytes_of(&packed));

            let mut encoder = r
                .ctx
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("lumen-reveal-encoder"),
                });
            {
                let mut rpass = color_pass(&mut encoder, "lumen-reveal-pass", &view, None);
                rpass.set_pipeline(&r.pipeline);
                rpass.set_bind_group(0, &r.bind_group, &[]);
                rpass.set_vertex_buffer(0, r.quad_buffer.slice(..));
                rpass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
            }
            r.ctx.queue.submit(std::iter::once(encoder.finish()));
            frame.present();
            Ok(())
        }

        fn release(&mut self) {
            if let Some(r) = self.resources.take() {
                r.quad_buffer.destroy();
                r.uniform_buffer.destroy();
                r.ctx.device.destroy();
            }
        }
    }

    struct GlobeResources {
        ctx: GpuContext,
        depth_view: ::wgpu::TextureView,
        globe_pipeline: ::wgpu::RenderPipeline,
        atmosphere_pipeline: ::wgpu::RenderPipeline,
        marker_pipeline: ::wgpu::RenderPipeline,
        globals_buffer: ::wgpu::Buffer,
        bind_group: ::wgpu::BindGroup,
        sphere_vertices: ::wgpu::Buffer,
        sphere_indices: ::wgpu::Buffer,
        sphere_index_count: u32,
        marker_buffer: Option<::wgpu::Buffer>,
        marker_vertex_count: u32,
    }

    /// Globe, atmosphere and marker programs for one canvas.
    pub struct WgpuGlobeSurface {
        resources: Option<GlobeResources>,
    }

    struct PipelineDesc<'a> {
        label: &'a str,
        source: String,
        buffers: &'a [::wgpu::VertexBufferLayout<'a>],
        cull_mode: Option<::wgpu::Face>,
        blend: ::wgpu::BlendState,
        depth_write: bool,
    }

    fn build_pipeline(
        device: &::wgpu::Device,
        layout: &::wgpu::PipelineLayout,
        format: ::wgpu::TextureFormat,
        desc: PipelineDesc<'_>,
    ) -> ::wgpu::RenderPipeline {
        let shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Owned(desc.source)),
        });
        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(layout),
            vertex: ::wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: desc.buffers,
            },
            fragment: Some(::wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format,
                    blend: Some(desc.blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: desc.depth_write,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: ::wgpu::StencilState::default(),
                bias: ::wgpu::DepthBiasState::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    const MESH_ATTRIBUTES: [::wgpu::VertexAttribute; 2] = [
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 1,
        },
    ];

    const MARKER_ATTRIBUTES: [::wgpu::VertexAttribute; 2] = [
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        ::wgpu::VertexAttribute {
            format: ::wgpu::VertexFormat::Float32x4,
            offset: 12,
            shader_location: 1,
        },
    ];

    impl WgpuGlobeSurface {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            size: SurfaceSize,
        ) -> Result<Self, GpuError> {
            let ctx = init_context(canvas, size, "lumen-globe-device").await?;
            let device = &ctx.device;
            let format = ctx.config.format;

            let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
                label: Some("lumen-globe-globals"),
                size: std::mem::size_of::<GlobeGlobals>() as u64,
                usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let layout = uniform_layout(device, "lumen-globe-bgl");
            let bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
                label: Some("lumen-globe-bg"),
                layout: &layout,
                entries: &[::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                }],
            });
            let pipeline_layout =
                device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                    label: Some("lumen-globe-pipeline-layout"),
                    bind_group_layouts: &[&layout],
                    immediate_size: 0,
                });

            let mesh_layout = [::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &MESH_ATTRIBUTES,
            }];
            let marker_layout = [::wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MarkerVertex>() as ::wgpu::BufferAddress,
                step_mode: ::wgpu::VertexStepMode::Vertex,
                attributes: &MARKER_ATTRIBUTES,
            }];

            let globe_pipeline = build_pipeline(
                device,
                &pipeline_layout,
                format,
                PipelineDesc {
                    label: "lumen-globe-pipeline",
                    source: globe_shader(),
                    buffers: &mesh_layout,
                    cull_mode: None,
                    blend: ::wgpu::BlendState::REPLACE,
                    depth_write: true,
                },
            );
            // Inside of the shell only, so the glow rims the globe.
            let atmosphere_pipeline = build_pipeline(
                device,
                &pipeline_layout,
                format,
                PipelineDesc {
                    label: "lumen-atmosphere-pipeline",
                    source: atmosphere_shader(),
                    buffers: &mesh_layout,
                    cull_mode: Some(::wgpu::Face::Front),
                    blend: ::wgpu::BlendState::ALPHA_BLENDING,
                    depth_write: false,
                },
            );
            let marker_pipeline = build_pipeline(
                device,
                &pipeline_layout,
                format,
                PipelineDesc {
                    label: "lumen-marker-pipeline",
                    source: marker_shader(),
                    buffers: &marker_layout,
                    cull_mode: None,
                    blend: ::wgpu::BlendState::ALPHA_BLENDING,
                    depth_write: false,
                },
            );

            let (vertices, indices) = sphere_mesh(foundation::math::GLOBE_RADIUS as f32, 64, 128);
            let sphere_vertices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("lumen-globe-vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: ::wgpu::BufferUsages::VERTEX,
            });
            let sphere_indices = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
                label: Some("lumen-globe-indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: ::wgpu::BufferUsages::INDEX,
            });
            let depth_view = create_depth_view(device, &ctx.config);

            Ok(Self {
                resources: Some(GlobeResources {
                    depth_view,
                    globe_pipeline,
                    atmosphere_pipeline,
                    marker_pipeline,
                    globals_buffer,
                    bind_group,
                    sphere_vertices,
                    sphere_indices,
                    sphere_index_count: indices.len() as u32,
                    marker_buffer: None,
                    marker_vertex_count: 0,
                    ctx,
                }),
            })
        }
    }

    impl GlobeSurface for WgpuGlobeSurface {
        fn set_markers(&mut self, markers: &[MarkerVertex]) {
            let Some(r) = self.resources.as_mut() else {
                return;
            };
            if let Some(old) = r.marker_buffer.take() {
                old.destroy();
            }
            r.marker_vertex_count = markers.len() as u32;
            if markers.is_empty() {
                return;
            }
            r.marker_buffer = Some(r.ctx.device.create_buffer_init(
                &::wgpu::util::BufferInitDescriptor {
                    label: Some("lumen-marker-vertices"),
                    contents: bytemuck::cast_slice(markers),
                    usage: ::wgpu::BufferUsages::VERTEX,
                },
            ));
        }

        fn resize(&mut self, size: SurfaceSize) {
            let Some(r) = self.resources.as_mut() else {
                return;
            };
            r.ctx.config.width = size.width.max(1);
            r.ctx.config.height = size.height.max(1);
            r.ctx.canvas.set_width(r.ctx.config.width);
            r.ctx.canvas.set_height(r.ctx.config.height);
            r.ctx.surface.configure(&r.ctx.device, &r.ctx.config);
            r.depth_view = create_depth_view(&r.ctx.device, &r.ctx.config);
        }

        fn draw(&mut self, frame: &GlobeFrame) -> Result<(), GpuError> {
            let r = self.resources.as_ref().ok_or(GpuError::Released)?;
            let texture = r
                .ctx
                .surface
                .get_current_texture()
                .map_err(|e| GpuError::Acquire(e.to_string()))?;
            let view = texture
                .texture
                .create_view(&::wgpu::TextureViewDescriptor::default());

            r.ctx
                .queue
                .write_buffer(&r.globals_buffer, 0, bytemuck::bytes_of(&frame.globals));

            let mut encoder = r
                .ctx
                .device
                .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                    label: Some("lumen-globe-encoder"),
                });
            {
                let mut rpass =
                    color_pass(&mut encoder, "lumen-globe-pass", &view, Some(&r.depth_view));
                rpass.set_bind_group(0, &r.bind_group, &[]);
                rpass.set_vertex_buffer(0, r.sphere_vertices.slice(..));
                rpass.set_index_buffer(r.sphere_indices.slice(..), ::wgpu::IndexFormat::Uint16);

                rpass.set_pipeline(&r.globe_pipeline);
                rpass.draw_indexed(0..r.sphere_index_count, 0, 0..1);

                if frame.draw_atmosphere {
                    rpass.set_pipeline(&r.atmosphere_pipeline);
                    rpass.draw_indexed(0..r.sphere_index_count, 0, 0..1);
                }

                if let Some(markers) = &r.marker_buffer {
                    rpass.set_pipeline(&r.marker_pipeline);
                    rpass.set_vertex_buffer(0, markers.slice(..));
                    rpass.draw(0..r.marker_vertex_count, 0..1);
                }
            }
            r.ctx.queue.submit(std::iter::once(encoder.finish()));
            texture.present();
            Ok(())
        }

        fn release(&mut self) {
            if let Some(r) = self.resources.take() {
                if let Some(markers) = r.marker_buffer {
                    markers.destroy();
                }
                r.sphere_vertices.destroy();
                r.sphere_indices.destroy();
                r.globals_buffer.destroy();
                r.ctx.device.destroy();
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use gpu::GpuError;
    use gpu::mesh::MarkerVertex;
    use gpu::renderer::GlobeFrame;
    use gpu::surface::{GlobeSurface, RevealSurface};
    use scene::SurfaceSize;
    use scene::reveal::RevealUniforms;

    fn unsupported() -> GpuError {
        GpuError::Surface("wgpu rendering is only available on wasm32 targets".to_string())
    }

    #[derive(Debug, Default)]
    pub struct WgpuRevealSurface;

    impl WgpuRevealSurface {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            _size: SurfaceSize,
        ) -> Result<Self, GpuError> {
            Err(unsupported())
        }
    }

    impl RevealSurface for WgpuRevealSurface {
        fn draw(&mut self, _uniforms: &RevealUniforms) -> Result<(), GpuError> {
            Err(unsupported())
        }

        fn release(&mut self) {}
    }

    #[derive(Debug, Default)]
    pub struct WgpuGlobeSurface;

    impl WgpuGlobeSurface {
        pub async fn new(
            canvas: web_sys::HtmlCanvasElement,
            _size: SurfaceSize,
        ) -> Result<Self, GpuError> {
            Err(unsupported())
        }
    }

    impl GlobeSurface for WgpuGlobeSurface {
        fn set_markers(&mut self, _markers: &[MarkerVertex]) {}

        fn resize(&mut self, _size: SurfaceSize) {}

        fn draw(&mut self, _frame: &GlobeFrame) -> Result<(), GpuError> {
            Err(unsupported())
        }

        fn release(&mut self) {}
    }
}

pub use imp::{WgpuGlobeSurface, WgpuRevealSurface};

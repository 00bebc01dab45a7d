use wgpu::util::DeviceExt;

use crate::geometry::{quad_xz, ColorVertex, MeshData, MeshVertex};
use crate::scene::{DrawCmd, DrawList, MeshId, SceneView, Shading, TextureId};
use crate::texture::TextureData;

use super::common::{
    aligned_stride, alpha_blend, depth_state, uniform_binding_size, DrawUniform, FrameUniform,
};
use super::texture::{self, GpuTexture};
use super::{RenderCtx, RenderTarget};

const SCENE_WGSL: &str = include_str!("shaders/scene.wgsl");

/// Forward renderer for the 3D draw stream.
///
/// One render pass per call. Items are encoded in `DrawList` paint order;
/// per-draw transforms live in a single uniform buffer addressed with dynamic
/// offsets, and immediate-mode geometry (triangles/lines) is packed into one
/// shared vertex buffer.
///
/// Meshes and textures are uploaded once and referenced by handle.
#[derive(Default)]
pub struct SceneRenderer {
    layouts: Option<Layouts>,

    pipeline_key: Option<(wgpu::TextureFormat, u32)>,
    pipelines: Option<Pipelines>,

    frame_ubo: Option<wgpu::Buffer>,
    frame_bind_group: Option<wgpu::BindGroup>,

    draw_ubo: Option<wgpu::Buffer>,
    draw_bind_group: Option<wgpu::BindGroup>,
    draw_capacity: usize,
    draw_stride: u64,

    dynamic_vbo: Option<wgpu::Buffer>,
    dynamic_capacity: usize,

    decal_quad: Option<GpuMesh>,
    meshes: Vec<GpuMesh>,
    textures: Vec<GpuTexture>,

    // Reused across frames.
    plan: Vec<Planned>,
    uniform_bytes: Vec<u8>,
    vertices: Vec<ColorVertex>,

    warned_missing_handle: bool,
}

struct Layouts {
    frame: wgpu::BindGroupLayout,
    draw: wgpu::BindGroupLayout,
    texture: wgpu::BindGroupLayout,
}

struct Pipelines {
    mesh: wgpu::RenderPipeline,
    decal: wgpu::RenderPipeline,
    flat_opaque: wgpu::RenderPipeline,
    flat_blend: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PipelineKind {
    Mesh,
    Decal,
    FlatOpaque,
    FlatBlend,
    Lines,
}

#[derive(Debug)]
enum Planned {
    Mesh { mesh: usize, texture: usize, slot: u32 },
    Decal { texture: usize, slot: u32 },
    Flat { first: u32, count: u32, slot: u32, opaque: bool },
    Lines { first: u32, count: u32, slot: u32 },
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads an indexed mesh and returns its handle.
    pub fn upload_mesh(&mut self, ctx: &RenderCtx<'_>, mesh: &MeshData) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(GpuMesh::new(ctx.device, mesh, "globus mesh"));
        log::debug!(
            "uploaded mesh {:?}: {} vertices, {} triangles",
            id,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        id
    }

    /// Uploads a texture and returns its handle.
    pub fn upload_texture(&mut self, ctx: &RenderCtx<'_>, data: &TextureData) -> TextureId {
        let layouts = self.layouts.get_or_insert_with(|| Layouts::new(ctx.device));

        let id = TextureId(self.textures.len() as u32);
        self.textures
            .push(GpuTexture::new(ctx.device, ctx.queue, &layouts.texture, data));
        log::debug!("uploaded texture {:?}: {}x{}", id, data.width(), data.height());
        id
    }

    /// Replaces the image behind an existing handle.
    ///
    /// Returns `false` (and changes nothing) if `id` was not issued by this
    /// renderer.
    pub fn replace_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        id: TextureId,
        data: &TextureData,
    ) -> bool {
        let layouts = self.layouts.get_or_insert_with(|| Layouts::new(ctx.device));
        let Some(slot) = self.textures.get_mut(id.0 as usize) else {
            return false;
        };

        let old = slot.size;
        *slot = GpuTexture::new(ctx.device, ctx.queue, &layouts.texture, data);
        log::debug!(
            "replaced texture {:?}: {}x{} -> {}x{}",
            id,
            old.0,
            old.1,
            slot.size.0,
            slot.size.1
        );
        true
    }

    /// Renders `draw_list` into `target` as seen through `view`.
    ///
    /// Draws referencing unknown mesh/texture handles are skipped (one-time
    /// debug message).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: &SceneView,
        draw_list: &mut DrawList,
    ) {
        self.ensure_layouts(ctx);
        self.ensure_pipelines(ctx);
        self.ensure_frame_bindings(ctx);
        self.ensure_static_buffers(ctx);

        self.build_plan(ctx, draw_list);

        self.write_frame_uniform(ctx, view);
        self.ensure_draw_capacity(ctx, self.plan.len());
        self.ensure_vertex_capacity(ctx, self.vertices.len());

        if let Some(ubo) = self.draw_ubo.as_ref() {
            if !self.uniform_bytes.is_empty() {
                ctx.queue.write_buffer(ubo, 0, &self.uniform_bytes);
            }
        }
        if let Some(vbo) = self.dynamic_vbo.as_ref() {
            if !self.vertices.is_empty() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertices));
            }
        }

        // Now take immutable borrows.
        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(frame_bg) = self.frame_bind_group.as_ref() else { return };
        let Some(draw_bg) = self.draw_bind_group.as_ref() else { return };
        let Some(dynamic_vbo) = self.dynamic_vbo.as_ref() else { return };
        let Some(decal_quad) = self.decal_quad.as_ref() else { return };

        let clear = target.clear.take();
        let color_load = clear.map_or(wgpu::LoadOp::Load, |c| wgpu::LoadOp::Clear(c.to_wgpu()));
        let depth_load = if clear.is_some() {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("globus scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: target.resolve_target,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, frame_bg, &[]);

        let stride = self.draw_stride;
        let mut bound: Option<PipelineKind> = None;
        let mut bind = |rpass: &mut wgpu::RenderPass<'_>, kind: PipelineKind| {
            if bound != Some(kind) {
                rpass.set_pipeline(pipelines.get(kind));
                bound = Some(kind);
            }
        };

        for planned in &self.plan {
            match *planned {
                Planned::Mesh { mesh, texture, slot } => {
                    let mesh = &self.meshes[mesh];
                    bind(&mut rpass, PipelineKind::Mesh);
                    rpass.set_bind_group(1, draw_bg, &[dynamic_offset(slot, stride)]);
                    rpass.set_bind_group(2, &self.textures[texture].bind_group, &[]);
                    mesh.draw(&mut rpass);
                }
                Planned::Decal { texture, slot } => {
                    bind(&mut rpass, PipelineKind::Decal);
                    rpass.set_bind_group(1, draw_bg, &[dynamic_offset(slot, stride)]);
                    rpass.set_bind_group(2, &self.textures[texture].bind_group, &[]);
                    decal_quad.draw(&mut rpass);
                }
                Planned::Flat { first, count, slot, opaque } => {
                    let kind = if opaque {
                        PipelineKind::FlatOpaque
                    } else {
                        PipelineKind::FlatBlend
                    };
                    bind(&mut rpass, kind);
                    rpass.set_bind_group(1, draw_bg, &[dynamic_offset(slot, stride)]);
                    rpass.set_vertex_buffer(0, dynamic_vbo.slice(..));
                    rpass.draw(first..first + count, 0..1);
                }
                Planned::Lines { first, count, slot } => {
                    bind(&mut rpass, PipelineKind::Lines);
                    rpass.set_bind_group(1, draw_bg, &[dynamic_offset(slot, stride)]);
                    rpass.set_vertex_buffer(0, dynamic_vbo.slice(..));
                    rpass.draw(first..first + count, 0..1);
                }
            }
        }
    }

    fn build_plan(&mut self, ctx: &RenderCtx<'_>, draw_list: &mut DrawList) {
        self.plan.clear();
        self.uniform_bytes.clear();
        self.vertices.clear();

        let stride = aligned_stride(
            std::mem::size_of::<DrawUniform>() as u64,
            ctx.device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        self.draw_stride = stride;

        let mut missing = false;
        for item in draw_list.iter_in_paint_order() {
            let slot = self.plan.len() as u32;
            let (planned, uniform) = match &item.cmd {
                DrawCmd::Mesh(cmd) => {
                    let (mesh, texture) = (cmd.mesh.0 as usize, cmd.texture.0 as usize);
                    if mesh >= self.meshes.len() || texture >= self.textures.len() {
                        missing = true;
                        continue;
                    }
                    (
                        Planned::Mesh { mesh, texture, slot },
                        DrawUniform::new(cmd.model, cmd.tint.to_array(), cmd.shading),
                    )
                }
                DrawCmd::Decal(cmd) => {
                    let texture = cmd.texture.0 as usize;
                    if texture >= self.textures.len() {
                        missing = true;
                        continue;
                    }
                    (
                        Planned::Decal { texture, slot },
                        DrawUniform::new(cmd.model, cmd.tint.to_array(), Shading::Unlit),
                    )
                }
                DrawCmd::Triangles(cmd) => {
                    let first = self.vertices.len() as u32;
                    self.vertices.extend_from_slice(&cmd.vertices);
                    (
                        Planned::Flat {
                            first,
                            count: cmd.vertices.len() as u32,
                            slot,
                            opaque: cmd.is_opaque(),
                        },
                        DrawUniform::flat(cmd.model),
                    )
                }
                DrawCmd::Lines(cmd) => {
                    let first = self.vertices.len() as u32;
                    self.vertices.extend_from_slice(&cmd.vertices);
                    (
                        Planned::Lines { first, count: cmd.vertices.len() as u32, slot },
                        DrawUniform::flat(cmd.model),
                    )
                }
            };

            self.plan.push(planned);
            self.uniform_bytes.extend_from_slice(bytemuck::bytes_of(&uniform));
            self.uniform_bytes.resize(self.plan.len() * stride as usize, 0);
        }

        if missing && !self.warned_missing_handle {
            log::debug!("SceneRenderer: draw with unknown mesh/texture handle skipped");
            self.warned_missing_handle = true;
        }
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.layouts.is_none() {
            self.layouts = Some(Layouts::new(ctx.device));
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        let key = (ctx.surface_format, ctx.sample_count);
        if self.pipeline_key == Some(key) && self.pipelines.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globus scene shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });

        let textured_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globus textured pipeline layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.draw, &layouts.texture],
            immediate_size: 0,
        });

        let flat_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("globus flat pipeline layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.draw],
            immediate_size: 0,
        });

        let builder = PipelineBuilder {
            device: ctx.device,
            shader: &shader,
            format: ctx.surface_format,
            sample_count: ctx.sample_count,
        };

        let less = wgpu::CompareFunction::Less;
        let less_equal = wgpu::CompareFunction::LessEqual;
        let triangles = wgpu::PrimitiveTopology::TriangleList;

        let pipelines = Pipelines {
            mesh: builder.build(PipelineDesc {
                label: "globus mesh pipeline",
                layout: &textured_layout,
                vertex: ("vs_mesh", MeshVertex::layout()),
                fragment: "fs_mesh",
                topology: triangles,
                blend: None,
                depth: depth_state(true, less),
            }),
            decal: builder.build(PipelineDesc {
                label: "globus decal pipeline",
                layout: &textured_layout,
                vertex: ("vs_mesh", MeshVertex::layout()),
                fragment: "fs_decal",
                topology: triangles,
                blend: Some(alpha_blend()),
                depth: depth_state(false, less_equal),
            }),
            flat_opaque: builder.build(PipelineDesc {
                label: "globus flat pipeline",
                layout: &flat_layout,
                vertex: ("vs_flat", ColorVertex::layout()),
                fragment: "fs_flat",
                topology: triangles,
                blend: None,
                depth: depth_state(true, less),
            }),
            flat_blend: builder.build(PipelineDesc {
                label: "globus flat blend pipeline",
                layout: &flat_layout,
                vertex: ("vs_flat", ColorVertex::layout()),
                fragment: "fs_flat",
                topology: triangles,
                blend: Some(alpha_blend()),
                depth: depth_state(false, less_equal),
            }),
            lines: builder.build(PipelineDesc {
                label: "globus lines pipeline",
                layout: &flat_layout,
                vertex: ("vs_flat", ColorVertex::layout()),
                fragment: "fs_flat",
                topology: wgpu::PrimitiveTopology::LineList,
                blend: Some(alpha_blend()),
                depth: depth_state(false, less_equal),
            }),
        };

        log::debug!(
            "scene pipelines built for {:?} at {}x MSAA",
            ctx.surface_format,
            ctx.sample_count
        );

        self.pipeline_key = Some(key);
        self.pipelines = Some(pipelines);
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globus frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globus frame bind group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        self.frame_ubo = Some(frame_ubo);
        self.frame_bind_group = Some(frame_bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.decal_quad.is_some() {
            return;
        }
        self.decal_quad = Some(GpuMesh::new(ctx.device, &quad_xz(1.0), "globus decal quad"));
    }

    fn write_frame_uniform(&mut self, ctx: &RenderCtx<'_>, view: &SceneView) {
        let Some(ubo) = self.frame_ubo.as_ref() else { return };
        let u = FrameUniform::new(view, ctx.aspect());
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_draw_capacity(&mut self, ctx: &RenderCtx<'_>, required_draws: usize) {
        if required_draws <= self.draw_capacity && self.draw_ubo.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let new_cap = required_draws.next_power_of_two().max(16);
        let draw_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globus draw ubo"),
            size: new_cap as u64 * self.draw_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let draw_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globus draw bind group"),
            layout: &layouts.draw,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_ubo,
                    offset: 0,
                    size: uniform_binding_size::<DrawUniform>(),
                }),
            }],
        });

        self.draw_ubo = Some(draw_ubo);
        self.draw_bind_group = Some(draw_bind_group);
        self.draw_capacity = new_cap;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required_vertices: usize) {
        if required_vertices <= self.dynamic_capacity && self.dynamic_vbo.is_some() {
            return;
        }

        let new_cap = required_vertices.next_power_of_two().max(256);
        let new_size = (new_cap * std::mem::size_of::<ColorVertex>()) as u64;

        self.dynamic_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globus dynamic vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.dynamic_capacity = new_cap;
    }
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = |dynamic: bool, size| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: size,
            },
            count: None,
        };

        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globus frame bgl"),
            entries: &[uniform_entry(false, uniform_binding_size::<FrameUniform>())],
        });

        let draw = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globus draw bgl"),
            entries: &[uniform_entry(true, uniform_binding_size::<DrawUniform>())],
        });

        Self {
            frame,
            draw,
            texture: texture::bind_group_layout(device),
        }
    }
}

impl Pipelines {
    fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Mesh => &self.mesh,
            PipelineKind::Decal => &self.decal,
            PipelineKind::FlatOpaque => &self.flat_opaque,
            PipelineKind::FlatBlend => &self.flat_blend,
            PipelineKind::Lines => &self.lines,
        }
    }
}

impl GpuMesh {
    fn new(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    shader: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

struct PipelineDesc<'a> {
    label: &'static str,
    layout: &'a wgpu::PipelineLayout,
    vertex: (&'static str, wgpu::VertexBufferLayout<'static>),
    fragment: &'static str,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
    depth: wgpu::DepthStencilState,
}

impl PipelineBuilder<'_> {
    fn build(&self, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
        let (vs_entry, vertex_layout) = desc.vertex;

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(desc.layout),

            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: Some(vs_entry),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },

            fragment: Some(wgpu::FragmentState {
                module: self.shader,
                entry_point: Some(desc.fragment),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Double-sided: quads and the sphere are drawn regardless of winding.
            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(desc.depth),
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        })
    }
}

#[inline]
fn dynamic_offset(slot: u32, stride: u64) -> wgpu::DynamicOffset {
    (slot as u64 * stride) as wgpu::DynamicOffset
}

//! wgpu + winit implementation of [`GraphicsApi`].
//!
//! GL-shaped calls map onto wgpu as follows:
//! - `buffer_data` replaces the whole `wgpu::Buffer`; the old one stays alive until
//!   the GPU is done with it
//! - a vertex array is a record of (layout, vertex buffer, index buffer) resolved at draw
//! - a program owns a CPU copy of the uniform block, uploaded right before each draw
//! - pipelines are built lazily per (program, layout, primitive)
//! - each draw is its own render pass into the offscreen back buffer

mod entry_point;
mod pipelines;
mod present;
mod readback;
mod targets;

use std::collections::HashMap;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::window::{PlatformWindow, WindowConfig};

use super::types::{
    BufferId, BufferTarget, BufferUsage, PlatformEvent, Primitive, ProgramId, ShaderId,
    ShaderStage, UniformLocation, UniformValue, VertexArrayId, VertexLayout,
};
use super::uniform_block;
use super::GraphicsApi;

use pipelines::{PipelineCache, PipelineKey};
use present::BlitPass;
use targets::FrameTargets;

/// Real backend: one window, one device.
pub struct WgpuBackend {
    next_id: u32,
    /// `None` once terminated.
    live: Option<Live>,
}

struct Live {
    window: PlatformWindow,
    gpu: Gpu,
    targets: FrameTargets,
    blit: BlitPass,
    pipelines: PipelineCache,
    clear_color: wgpu::Color,
    /// Events produced by the backend itself, delivered on the next poll.
    pending: Vec<PlatformEvent>,

    buffers: HashMap<BufferId, BufferEntry>,
    vertex_arrays: HashMap<VertexArrayId, VertexArrayEntry>,
    shaders: HashMap<ShaderId, ShaderEntry>,
    programs: HashMap<ProgramId, ProgramEntry>,
}

struct BufferEntry {
    /// `None` until the first `buffer_data`.
    buffer: Option<wgpu::Buffer>,
}

struct VertexArrayEntry {
    layout: VertexLayout,
    vertex_buffer: BufferId,
    index_buffer: Option<BufferId>,
}

struct ShaderEntry {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
    log: Option<String>,
}

struct ProgramEntry {
    /// Vertex and fragment modules; `None` when linking failed.
    stages: Option<(wgpu::ShaderModule, wgpu::ShaderModule)>,
    log: Option<String>,
    block: Vec<u8>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WgpuBackend {
    /// Opens a window and initializes a device for it.
    pub fn open(window: &WindowConfig, gpu_init: &GpuInit, clear_color: [f64; 4]) -> Result<Self> {
        let (platform, handle) = PlatformWindow::open(window.clone())?;

        let gpu = pollster::block_on(Gpu::new(handle, gpu_init.clone()))
            .context("GPU initialization failed for window")?;

        let size = gpu.size();
        let targets = FrameTargets::new(gpu.device(), size.width, size.height);
        let blit = BlitPass::new(gpu.device(), gpu.surface_format(), &targets.front_view);
        let pipelines = PipelineCache::new(gpu.device());

        log::info!(
            "render context ready: {}x{} ({:?})",
            targets.width,
            targets.height,
            gpu.surface_format()
        );

        let [r, g, b, a] = clear_color;
        Ok(Self {
            next_id: 1,
            live: Some(Live {
                window: platform,
                gpu,
                targets,
                blit,
                pipelines,
                clear_color: wgpu::Color { r, g, b, a },
                pending: Vec::new(),
                buffers: HashMap::new(),
                vertex_arrays: HashMap::new(),
                shaders: HashMap::new(),
                programs: HashMap::new(),
            }),
        })
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Live {
    fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(PhysicalSize::new(width, height));
        if width == 0 || height == 0 {
            // Minimized; keep the old targets until there is an area again.
            return;
        }
        self.targets = FrameTargets::new(self.gpu.device(), width, height);
        self.blit.rebind(self.gpu.device(), &self.targets.front_view);
        log::debug!("framebuffer resized to {width}x{height}");
    }

    fn compile(&self, stage: ShaderStage, source: &str) -> ShaderEntry {
        let label = format!("lumen {stage} shader");
        let module = self
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label.as_str()),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let info = pollster::block_on(module.get_compilation_info());
        let mut errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
            .map(|m| match &m.location {
                Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
                None => m.message.clone(),
            })
            .collect();

        errors.extend(entry_point::entry_point_error(stage, source));

        ShaderEntry {
            stage,
            module,
            log: (!errors.is_empty()).then(|| errors.join("\n")),
        }
    }

    fn link(&self, vertex: ShaderId, fragment: ShaderId) -> ProgramEntry {
        let (stages, log) = match (self.shaders.get(&vertex), self.shaders.get(&fragment)) {
            (Some(vs), Some(fs)) if vs.stage == ShaderStage::Vertex && fs.stage == ShaderStage::Fragment => {
                match (&vs.log, &fs.log) {
                    (None, None) => (Some((vs.module.clone(), fs.module.clone())), None),
                    _ => (None, Some("attached stages did not compile".to_string())),
                }
            }
            (Some(_), Some(_)) => (None, Some("stages attached in the wrong slots".to_string())),
            _ => (None, Some("unknown shader handle".to_string())),
        };

        let uniform_buffer = self.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen uniform block"),
            size: uniform_block::BLOCK_SIZE as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen uniform bind group"),
            layout: self.pipelines.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        ProgramEntry {
            stages,
            log,
            block: vec![0u8; uniform_block::BLOCK_SIZE],
            uniform_buffer,
            bind_group,
        }
    }

    fn draw(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
        indexed: bool,
    ) {
        if count == 0 {
            return;
        }

        let Some(prog) = self.programs.get(&program) else {
            log::debug!("draw skipped: unknown program {}", program.raw());
            return;
        };
        let Some((vs, fs)) = prog.stages.as_ref() else {
            log::debug!("draw skipped: program {} is not linked", program.raw());
            return;
        };
        let Some(vao) = self.vertex_arrays.get(&vertex_array) else {
            log::debug!("draw skipped: unknown vertex array {}", vertex_array.raw());
            return;
        };
        let Some(vbo) = self
            .buffers
            .get(&vao.vertex_buffer)
            .and_then(|b| b.buffer.as_ref())
            .filter(|b| b.size() > 0)
        else {
            log::debug!("draw skipped: vertex buffer has no storage");
            return;
        };
        let ibo = if indexed {
            let Some(ibo) = vao
                .index_buffer
                .and_then(|id| self.buffers.get(&id))
                .and_then(|b| b.buffer.as_ref())
                .filter(|b| b.size() > 0)
            else {
                log::debug!("draw skipped: indexed draw without index storage");
                return;
            };
            Some(ibo)
        } else {
            None
        };

        let device = self.gpu.device();
        let queue = self.gpu.queue();

        queue.write_buffer(&prog.uniform_buffer, 0, &prog.block);

        let key = PipelineKey {
            program,
            layout: vao.layout,
            primitive,
        };
        let pipeline = self.pipelines.get_or_create(device, key, vs, fs);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lumen draw encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.back_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &prog.bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));

            match ibo {
                Some(ibo) => {
                    rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..count, 0, 0..1);
                }
                None => rpass.draw(0..count, 0..1),
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn clear(&mut self) {
        let mut encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen clear encoder"),
            });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.back_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
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

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }

    fn swap(&mut self) {
        let mut encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen swap encoder"),
            });

        encoder.copy_texture_to_texture(
            self.targets.back.as_image_copy(),
            self.targets.front.as_image_copy(),
            self.targets.extent(),
        );

        let frame = match self.gpu.acquire() {
            Ok(frame) => Some(frame),
            Err(err) => {
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost for good; closing the window");
                        self.pending.push(PlatformEvent::CloseRequested);
                    }
                    action => log::debug!("present skipped ({action:?})"),
                }
                None
            }
        };

        if let Some(frame) = &frame {
            self.blit.encode(&mut encoder, &frame.view);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));

        if let Some(frame) = frame {
            if let Some(window) = self.window.window() {
                window.pre_present_notify();
            }
            frame.surface_texture.present();
        }
    }

    fn poll(&mut self) -> Vec<PlatformEvent> {
        let mut events = std::mem::take(&mut self.pending);
        events.extend(self.window.pump());

        for ev in &events {
            if let PlatformEvent::Resized { width, height } = *ev {
                self.resize(width, height);
            }
        }
        events
    }
}

impl GraphicsApi for WgpuBackend {
    fn gen_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next());
        if let Some(live) = self.live.as_mut() {
            live.buffers.insert(id, BufferEntry { buffer: None });
        }
        id
    }

    fn buffer_data(
        &mut self,
        buffer: BufferId,
        target: BufferTarget,
        size: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) {
        let Some(live) = self.live.as_mut() else { return };
        let device = live.gpu.device();

        let Some(entry) = live.buffers.get_mut(&buffer) else {
            log::debug!("buffer_data on unknown buffer {}", buffer.raw());
            return;
        };

        let usages = match target {
            BufferTarget::Array => wgpu::BufferUsages::VERTEX,
            BufferTarget::ElementArray => wgpu::BufferUsages::INDEX,
        } | wgpu::BufferUsages::COPY_DST;

        let label = match usage {
            BufferUsage::Static => "lumen static buffer",
            BufferUsage::Stream => "lumen stream buffer",
        };

        // Dropping the previous buffer only releases our handle; queued work keeps it alive.
        entry.buffer = Some(match data {
            Some(bytes) => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: usages,
            }),
            None => device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize) as u64,
                usage: usages,
                mapped_at_creation: false,
            }),
        });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(live) = self.live.as_mut() {
            live.buffers.remove(&buffer);
        }
    }

    fn gen_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferId,
        index_buffer: Option<BufferId>,
    ) -> VertexArrayId {
        let id = VertexArrayId(self.next());
        if let Some(live) = self.live.as_mut() {
            live.vertex_arrays.insert(
                id,
                VertexArrayEntry {
                    layout: *layout,
                    vertex_buffer,
                    index_buffer,
                },
            );
        }
        id
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        if let Some(live) = self.live.as_mut() {
            live.vertex_arrays.remove(&vertex_array);
        }
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderId {
        let id = ShaderId(self.next());
        if let Some(live) = self.live.as_mut() {
            let entry = live.compile(stage, source);
            live.shaders.insert(id, entry);
        }
        id
    }

    fn shader_info_log(&self, shader: ShaderId) -> Option<String> {
        let live = self.live.as_ref()?;
        match live.shaders.get(&shader) {
            Some(entry) => entry.log.clone(),
            None => Some("unknown shader handle".to_string()),
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        if let Some(live) = self.live.as_mut() {
            live.shaders.remove(&shader);
        }
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> ProgramId {
        let id = ProgramId(self.next());
        if let Some(live) = self.live.as_mut() {
            let entry = live.link(vertex, fragment);
            live.programs.insert(id, entry);
        }
        id
    }

    fn program_info_log(&self, program: ProgramId) -> Option<String> {
        let live = self.live.as_ref()?;
        match live.programs.get(&program) {
            Some(entry) => entry.log.clone(),
            None => Some("unknown program handle".to_string()),
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(live) = self.live.as_mut() {
            live.programs.remove(&program);
            live.pipelines.evict(program);
        }
    }

    fn use_program(&mut self, _program: ProgramId) {
        // Draws name their program explicitly; there is no global binding to update.
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let live = self.live.as_ref()?;
        live.programs.get(&program)?.stages.as_ref()?;
        uniform_block::lookup(name)
    }

    fn set_uniform(&mut self, program: ProgramId, location: UniformLocation, value: &UniformValue) {
        let Some(live) = self.live.as_mut() else { return };
        let Some(prog) = live.programs.get_mut(&program) else { return };
        if !uniform_block::write(&mut prog.block, location, value) {
            let name = uniform_block::slot(location).map_or("?", |s| s.name);
            log::debug!("uniform {name}: value does not match the declared type");
        }
    }

    fn draw_arrays(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        if let Some(live) = self.live.as_mut() {
            live.draw(program, vertex_array, primitive, count, false);
        }
    }

    fn draw_elements(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        if let Some(live) = self.live.as_mut() {
            live.draw(program, vertex_array, primitive, count, true);
        }
    }

    fn clear(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.clear();
        }
    }

    fn swap_buffers(&mut self) {
        if let Some(live) = self.live.as_mut() {
            live.swap();
        }
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        match self.live.as_mut() {
            Some(live) => live.poll(),
            None => Vec::new(),
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        match self.live.as_ref() {
            Some(live) => (live.targets.width, live.targets.height),
            None => (0, 0),
        }
    }

    fn read_front_buffer(
        &mut self,
        width: u32,
        height: u32,
        row_alignment: usize,
    ) -> Result<Vec<u8>> {
        let live = self
            .live
            .as_ref()
            .context("render context has been terminated")?;

        readback::read_region(
            live.gpu.device(),
            live.gpu.queue(),
            &live.targets.front,
            (live.targets.width, live.targets.height),
            width,
            height,
            row_alignment,
        )
    }

    fn terminate(&mut self) {
        let Some(mut live) = self.live.take() else { return };

        let leaked = live.buffers.len() + live.vertex_arrays.len() + live.programs.len();
        if leaked > 0 {
            log::debug!("terminating with {leaked} live GPU objects");
        }

        live.pipelines.clear();
        live.window.close();
        drop(live);
        log::info!("render context terminated");
    }
}

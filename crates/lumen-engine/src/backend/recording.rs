//! Recording test double.
//!
//! `RecordingBackend` implements [`GraphicsApi`] without a GPU or a window. It
//! keeps an ordered log of every call, tracks which handles are alive, counts
//! allocations and frees, replays scripted platform events and synthesises a
//! front buffer for read-back.
//!
//! Clones share one recorder, so a test can keep a handle and inspect the log
//! after the context that owned the backend has been destroyed.

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use super::types::{
    BufferId, BufferTarget, BufferUsage, PlatformEvent, Primitive, ProgramId, ShaderId,
    ShaderStage, UniformLocation, UniformValue, VertexArrayId, VertexLayout,
};
use super::uniform_block;
use super::GraphicsApi;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GenBuffer(BufferId),
    BufferData {
        buffer: BufferId,
        target: BufferTarget,
        size: usize,
        with_data: bool,
        usage: BufferUsage,
    },
    DeleteBuffer(BufferId),
    GenVertexArray {
        vertex_array: VertexArrayId,
        vertex_buffer: BufferId,
        index_buffer: Option<BufferId>,
        stride: u32,
    },
    DeleteVertexArray(VertexArrayId),
    CompileShader { shader: ShaderId, stage: ShaderStage },
    DeleteShader(ShaderId),
    LinkProgram { program: ProgramId, vertex: ShaderId, fragment: ShaderId },
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    SetUniform { program: ProgramId, name: &'static str, value: UniformValue },
    DrawArrays { program: ProgramId, vertex_array: VertexArrayId, primitive: Primitive, count: u32 },
    DrawElements { program: ProgramId, vertex_array: VertexArrayId, primitive: Primitive, count: u32 },
    Clear,
    SwapBuffers,
    PollEvents,
    ReadFrontBuffer { width: u32, height: u32 },
    Terminate,
}

/// Allocation / free counters per object kind.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AllocationCounts {
    pub buffers_created: usize,
    pub buffers_deleted: usize,
    pub vertex_arrays_created: usize,
    pub vertex_arrays_deleted: usize,
    pub shaders_created: usize,
    pub shaders_deleted: usize,
    pub programs_created: usize,
    pub programs_deleted: usize,
}

impl AllocationCounts {
    /// True when every created object has been deleted.
    pub fn balanced(&self) -> bool {
        self.buffers_created == self.buffers_deleted
            && self.vertex_arrays_created == self.vertex_arrays_deleted
            && self.shaders_created == self.shaders_deleted
            && self.programs_created == self.programs_deleted
    }
}

/// See module docs.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    inner: Rc<RefCell<Recorder>>,
}

#[derive(Debug)]
struct Recorder {
    calls: Vec<Call>,
    counts: AllocationCounts,
    next_id: u32,

    buffers: HashMap<BufferId, usize>,
    vertex_arrays: HashSet<VertexArrayId>,
    shader_logs: HashMap<ShaderId, Option<String>>,
    program_logs: HashMap<ProgramId, Option<String>>,
    uniforms: HashMap<(ProgramId, &'static str), UniformValue>,
    current_program: Option<ProgramId>,

    failing_stages: HashSet<ShaderStage>,
    scripted_events: VecDeque<Vec<PlatformEvent>>,
    framebuffer: (u32, u32),
    terminated: bool,
}

impl RecordingBackend {
    /// Creates a backend with a `width x height` framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recorder::new(width, height))),
        }
    }

    fn rec(&self) -> Ref<'_, Recorder> {
        self.inner.borrow()
    }

    /// Makes every later compile of `stage` fail.
    pub fn fail_stage(&self, stage: ShaderStage) {
        self.inner.borrow_mut().failing_stages.insert(stage);
    }

    /// Queues the events returned by the next `poll_events` call.
    ///
    /// Each call to this function scripts one poll; polls with nothing scripted
    /// return no events.
    pub fn script_events(&self, events: Vec<PlatformEvent>) {
        self.inner.borrow_mut().scripted_events.push_back(events);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.rec().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn counts(&self) -> AllocationCounts {
        self.rec().counts
    }

    /// Size of a live buffer's current storage.
    pub fn buffer_size(&self, buffer: BufferId) -> Option<usize> {
        self.rec().buffers.get(&buffer).copied()
    }

    /// Number of live buffers, vertex arrays, shaders and programs combined.
    pub fn live_objects(&self) -> usize {
        let r = self.rec();
        r.buffers.len() + r.vertex_arrays.len() + r.shader_logs.len() + r.program_logs.len()
    }

    /// Last value written to a uniform of `program`.
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        self.rec()
            .uniforms
            .iter()
            .find(|((p, n), _)| *p == program && *n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn current_program(&self) -> Option<ProgramId> {
        self.rec().current_program
    }

    pub fn is_terminated(&self) -> bool {
        self.rec().terminated
    }

    /// Draw calls in call order.
    pub fn draw_calls(&self) -> Vec<Call> {
        self.rec()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::DrawArrays { .. } | Call::DrawElements { .. }))
            .cloned()
            .collect()
    }

    /// Synthetic front-buffer pixel at window coordinates (`y = 0` is the bottom row).
    pub fn front_pixel(x: u32, y: u32) -> [u8; 3] {
        [(x % 256) as u8, (y % 256) as u8, 0x7f]
    }
}

impl Recorder {
    fn new(width: u32, height: u32) -> Self {
        Self {
            calls: Vec::new(),
            counts: AllocationCounts::default(),
            next_id: 1,
            buffers: HashMap::new(),
            vertex_arrays: HashSet::new(),
            shader_logs: HashMap::new(),
            program_logs: HashMap::new(),
            uniforms: HashMap::new(),
            current_program: None,
            failing_stages: HashSet::new(),
            scripted_events: VecDeque::new(),
            framebuffer: (width, height),
            terminated: false,
        }
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GraphicsApi for Recorder {
    fn gen_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next());
        self.buffers.insert(id, 0);
        self.counts.buffers_created += 1;
        self.calls.push(Call::GenBuffer(id));
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
        if let Some(slot) = self.buffers.get_mut(&buffer) {
            *slot = size;
        }
        if let Some(bytes) = data {
            debug_assert_eq!(bytes.len(), size, "buffer_data size mismatch");
        }
        self.calls.push(Call::BufferData {
            buffer,
            target,
            size,
            with_data: data.is_some(),
            usage,
        });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_some() {
            self.counts.buffers_deleted += 1;
        }
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn gen_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferId,
        index_buffer: Option<BufferId>,
    ) -> VertexArrayId {
        let id = VertexArrayId(self.next());
        self.vertex_arrays.insert(id);
        self.counts.vertex_arrays_created += 1;
        self.calls.push(Call::GenVertexArray {
            vertex_array: id,
            vertex_buffer,
            index_buffer,
            stride: layout.stride,
        });
        id
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        if self.vertex_arrays.remove(&vertex_array) {
            self.counts.vertex_arrays_deleted += 1;
        }
        self.calls.push(Call::DeleteVertexArray(vertex_array));
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderId {
        let id = ShaderId(self.next());
        let log = if source.trim().is_empty() {
            Some("empty shader source".to_string())
        } else if self.failing_stages.contains(&stage) {
            Some(format!("{stage} stage rejected by test backend"))
        } else {
            None
        };
        self.shader_logs.insert(id, log);
        self.counts.shaders_created += 1;
        self.calls.push(Call::CompileShader { shader: id, stage });
        id
    }

    fn shader_info_log(&self, shader: ShaderId) -> Option<String> {
        self.shader_logs.get(&shader).cloned().flatten()
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        if self.shader_logs.remove(&shader).is_some() {
            self.counts.shaders_deleted += 1;
        }
        self.calls.push(Call::DeleteShader(shader));
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> ProgramId {
        let id = ProgramId(self.next());
        let stage_ok = |s: &ShaderId| matches!(self.shader_logs.get(s), Some(None));
        let log = if stage_ok(&vertex) && stage_ok(&fragment) {
            None
        } else {
            Some("attached stages did not compile".to_string())
        };
        self.program_logs.insert(id, log);
        self.counts.programs_created += 1;
        self.calls.push(Call::LinkProgram { program: id, vertex, fragment });
        id
    }

    fn program_info_log(&self, program: ProgramId) -> Option<String> {
        self.program_logs.get(&program).cloned().flatten()
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.program_logs.remove(&program).is_some() {
            self.counts.programs_deleted += 1;
        }
        self.uniforms.retain(|(p, _), _| *p != program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
        self.calls.push(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current_program = Some(program);
        self.calls.push(Call::UseProgram(program));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        if !self.program_logs.contains_key(&program) {
            return None;
        }
        uniform_block::lookup(name)
    }

    fn set_uniform(&mut self, program: ProgramId, location: UniformLocation, value: &UniformValue) {
        let Some(slot) = uniform_block::slot(location) else { return };
        self.uniforms.insert((program, slot.name), value.clone());
        self.calls.push(Call::SetUniform {
            program,
            name: slot.name,
            value: value.clone(),
        });
    }

    fn draw_arrays(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        self.calls.push(Call::DrawArrays { program, vertex_array, primitive, count });
    }

    fn draw_elements(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        self.calls.push(Call::DrawElements { program, vertex_array, primitive, count });
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn swap_buffers(&mut self) {
        self.calls.push(Call::SwapBuffers);
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.calls.push(Call::PollEvents);
        let events = self.scripted_events.pop_front().unwrap_or_default();
        for ev in &events {
            if let PlatformEvent::Resized { width, height } = ev {
                self.framebuffer = (*width, *height);
            }
        }
        events
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.framebuffer
    }

    fn read_front_buffer(
        &mut self,
        width: u32,
        height: u32,
        row_alignment: usize,
    ) -> anyhow::Result<Vec<u8>> {
        self.calls.push(Call::ReadFrontBuffer { width, height });

        let stride = (width as usize * 3).next_multiple_of(row_alignment.max(1));
        let mut out = vec![0u8; stride * height as usize];
        let (fb_w, fb_h) = self.framebuffer;

        for y in 0..height.min(fb_h) {
            let row = &mut out[y as usize * stride..];
            for x in 0..width.min(fb_w) {
                let px = RecordingBackend::front_pixel(x, y);
                row[x as usize * 3..x as usize * 3 + 3].copy_from_slice(&px);
            }
        }
        Ok(out)
    }

    fn terminate(&mut self) {
        self.terminated = true;
        self.calls.push(Call::Terminate);
    }
}

impl GraphicsApi for RecordingBackend {
    fn gen_buffer(&mut self) -> BufferId {
        self.inner.borrow_mut().gen_buffer()
    }

    fn buffer_data(
        &mut self,
        buffer: BufferId,
        target: BufferTarget,
        size: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) {
        self.inner.borrow_mut().buffer_data(buffer, target, size, data, usage);
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.inner.borrow_mut().delete_buffer(buffer);
    }

    fn gen_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferId,
        index_buffer: Option<BufferId>,
    ) -> VertexArrayId {
        self.inner
            .borrow_mut()
            .gen_vertex_array(layout, vertex_buffer, index_buffer)
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.inner.borrow_mut().delete_vertex_array(vertex_array);
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderId {
        self.inner.borrow_mut().compile_shader(stage, source)
    }

    fn shader_info_log(&self, shader: ShaderId) -> Option<String> {
        self.rec().shader_info_log(shader)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.inner.borrow_mut().delete_shader(shader);
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> ProgramId {
        self.inner.borrow_mut().link_program(vertex, fragment)
    }

    fn program_info_log(&self, program: ProgramId) -> Option<String> {
        self.rec().program_info_log(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.inner.borrow_mut().delete_program(program);
    }

    fn use_program(&mut self, program: ProgramId) {
        self.inner.borrow_mut().use_program(program);
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.rec().uniform_location(program, name)
    }

    fn set_uniform(&mut self, program: ProgramId, location: UniformLocation, value: &UniformValue) {
        self.inner.borrow_mut().set_uniform(program, location, value);
    }

    fn draw_arrays(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        self.inner
            .borrow_mut()
            .draw_arrays(program, vertex_array, primitive, count);
    }

    fn draw_elements(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    ) {
        self.inner
            .borrow_mut()
            .draw_elements(program, vertex_array, primitive, count);
    }

    fn clear(&mut self) {
        self.inner.borrow_mut().clear();
    }

    fn swap_buffers(&mut self) {
        self.inner.borrow_mut().swap_buffers();
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.inner.borrow_mut().poll_events()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.rec().framebuffer_size()
    }

    fn read_front_buffer(
        &mut self,
        width: u32,
        height: u32,
        row_alignment: usize,
    ) -> anyhow::Result<Vec<u8>> {
        self.inner
            .borrow_mut()
            .read_front_buffer(width, height, row_alignment)
    }

    fn terminate(&mut self) {
        self.inner.borrow_mut().terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_never_repeat() {
        let mut b = RecordingBackend::new(4, 4);
        let a = b.gen_buffer();
        let c = b.gen_buffer();
        assert_eq!(a.raw(), 1);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_source_fails_to_compile_and_link() {
        let mut b = RecordingBackend::new(4, 4);
        let vs = b.compile_shader(ShaderStage::Vertex, "");
        let fs = b.compile_shader(ShaderStage::Fragment, "fn main() {}");
        assert!(b.shader_info_log(vs).is_some());
        assert!(b.shader_info_log(fs).is_none());

        let p = b.link_program(vs, fs);
        assert!(b.program_info_log(p).is_some());
    }

    #[test]
    fn read_back_rows_are_padded() {
        let mut b = RecordingBackend::new(5, 2);
        let px = b.read_front_buffer(5, 2, 4).unwrap();
        // 5 * 3 = 15 bytes, padded to 16.
        assert_eq!(px.len(), 32);
        assert_eq!(&px[16..19], &RecordingBackend::front_pixel(0, 1));
        assert_eq!(px[15], 0);
    }

    #[test]
    fn clones_share_one_log() {
        let b = RecordingBackend::new(4, 4);
        let mut owned = b.clone();
        owned.gen_buffer();
        owned.terminate();
        drop(owned);
        assert_eq!(b.counts().buffers_created, 1);
        assert!(b.is_terminated());
    }

    #[test]
    fn scripted_events_are_consumed_one_poll_at_a_time() {
        let mut b = RecordingBackend::new(4, 4);
        b.script_events(vec![PlatformEvent::CloseRequested]);
        assert_eq!(b.poll_events(), vec![PlatformEvent::CloseRequested]);
        assert!(b.poll_events().is_empty());
    }
}

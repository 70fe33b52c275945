//! Graphics backend seam.
//!
//! Everything above this module talks to the GPU and the window system through
//! [`GraphicsApi`], a small GL-shaped interface over integer handles:
//! - [`WgpuBackend`] drives a real winit window and a wgpu device
//! - [`RecordingBackend`] records every call for tests, no GPU required
//!
//! Handles are plain `Copy` ids. Nothing here frees GPU objects on drop; callers
//! release what they allocate, on the thread that owns the context.

mod types;
pub mod uniform_block;
pub mod recording;
pub mod wgpu_backend;

pub use recording::{AllocationCounts, Call, RecordingBackend};
pub use types::{
    BufferId,
    BufferTarget,
    BufferUsage,
    PlatformEvent,
    Primitive,
    ProgramId,
    ShaderId,
    ShaderStage,
    UniformLocation,
    UniformValue,
    VertexArrayId,
    VertexAttribute,
    VertexLayout,
};
pub use wgpu_backend::WgpuBackend;

/// GPU + window operations used by the render layer.
///
/// The contract mirrors a classic immediate-mode graphics API:
/// - `buffer_data` always (re)allocates the whole buffer; `data = None` allocates
///   uninitialized storage of `size` bytes
/// - compile/link never fail hard; failures are reported through the info logs
/// - uniform writes target a program's persistent uniform storage
/// - draws render into the back buffer; `swap_buffers` makes it the front buffer
pub trait GraphicsApi {
    /// Allocates a buffer name without storage.
    fn gen_buffer(&mut self) -> BufferId;

    /// (Re)allocates `size` bytes of storage for `buffer`, optionally filled with `data`.
    ///
    /// The previous storage is discarded; in-flight draws keep using it.
    fn buffer_data(
        &mut self,
        buffer: BufferId,
        target: BufferTarget,
        size: usize,
        data: Option<&[u8]>,
        usage: BufferUsage,
    );

    fn delete_buffer(&mut self, buffer: BufferId);

    /// Creates a vertex array binding `vertex_buffer` (and `index_buffer`) with `layout`.
    fn gen_vertex_array(
        &mut self,
        layout: &VertexLayout,
        vertex_buffer: BufferId,
        index_buffer: Option<BufferId>,
    ) -> VertexArrayId;

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    /// Compiles one stage. Always returns a handle; see [`shader_info_log`](Self::shader_info_log).
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderId;

    /// Compiler diagnostics; `None` when the stage compiled cleanly.
    fn shader_info_log(&self, shader: ShaderId) -> Option<String>;

    fn delete_shader(&mut self, shader: ShaderId);

    /// Links two stages. Always returns a handle; see [`program_info_log`](Self::program_info_log).
    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> ProgramId;

    /// Linker diagnostics; `None` when the program linked.
    fn program_info_log(&self, program: ProgramId) -> Option<String>;

    fn delete_program(&mut self, program: ProgramId);

    /// Marks `program` as current.
    fn use_program(&mut self, program: ProgramId);

    /// Looks up a uniform by exact name. `None` if the program has no such uniform.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    fn set_uniform(&mut self, program: ProgramId, location: UniformLocation, value: &UniformValue);

    /// Non-indexed draw of `count` vertices.
    fn draw_arrays(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    );

    /// Indexed draw of `count` indices.
    fn draw_elements(
        &mut self,
        program: ProgramId,
        vertex_array: VertexArrayId,
        primitive: Primitive,
        count: u32,
    );

    /// Clears color and depth of the back buffer.
    fn clear(&mut self);

    /// Presents the back buffer.
    fn swap_buffers(&mut self);

    /// Drains pending window-system events.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Current framebuffer size in physical pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Reads the `width x height` region at the bottom-left of the front buffer.
    ///
    /// Output is RGB8, bottom row first, each row padded to `row_alignment` bytes.
    /// Pixels outside the framebuffer read as zero.
    fn read_front_buffer(
        &mut self,
        width: u32,
        height: u32,
        row_alignment: usize,
    ) -> anyhow::Result<Vec<u8>>;

    /// Releases the window and every GPU object still owned by the backend.
    fn terminate(&mut self);
}

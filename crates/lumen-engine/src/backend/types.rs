use std::fmt;

use crate::input::KeyCode;

/// Handle to a GPU buffer (vertex or index storage).
///
/// Ids are handed out by the backend starting at 1; 0 never names a live object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BufferId(pub(crate) u32);

/// Handle to a vertex array: a vertex buffer, an optional index buffer and a layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexArrayId(pub(crate) u32);

/// Handle to a compiled shader stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ShaderId(pub(crate) u32);

/// Handle to a linked shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramId(pub(crate) u32);

macro_rules! impl_raw {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// Raw integer value of the handle.
                #[inline]
                pub fn raw(self) -> u32 {
                    self.0
                }
            }
        )*
    };
}

impl_raw!(BufferId, VertexArrayId, ShaderId, ProgramId);

/// Binding point a buffer is allocated for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
    /// Index data (`u32` indices).
    ElementArray,
}

/// Allocation usage hint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten every few frames (orphaning re-uploads).
    Stream,
}

/// Primitive assembly mode for a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Triangles,
    Points,
}

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("VERTEX"),
            ShaderStage::Fragment => f.write_str("FRAGMENT"),
        }
    }
}

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components (1..=4).
    pub components: u32,
    /// Offset from the start of the vertex, in floats.
    pub offset: u32,
}

/// Interleaved `f32` vertex layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexLayout {
    /// Floats per vertex.
    pub stride: u32,
    pub attributes: &'static [VertexAttribute],
}

impl VertexLayout {
    /// Vertex stride in bytes.
    #[inline]
    pub fn stride_bytes(&self) -> u64 {
        u64::from(self.stride) * std::mem::size_of::<f32>() as u64
    }
}

/// Location of a uniform inside a program's uniform storage.
///
/// Obtained from [`GraphicsApi::uniform_location`](super::GraphicsApi::uniform_location).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub(crate) u32);

/// A value written to a uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
    FloatArray(Vec<f32>),
}

/// Window-system notification drained by `poll_events`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PlatformEvent {
    Key { code: KeyCode, pressed: bool },
    FocusLost,
    Resized { width: u32, height: u32 },
    CloseRequested,
}

//! GPU-resident geometry.
//!
//! [`Mesh`] draws indexed triangles, [`Cloud`] draws points. Both own their GPU
//! handles and must be handed back with `release`; dropping one without
//! releasing it leaks the GPU objects until the context is destroyed.

use crate::backend::{
    BufferId, BufferTarget, BufferUsage, GraphicsApi, Primitive, VertexArrayId, VertexAttribute,
    VertexLayout,
};

use super::context::RenderContext;
use super::pose::Pose;
use super::shader::ShaderProgram;

/// Position (3), normal (3), colour (4).
pub const MESH_LAYOUT: VertexLayout = VertexLayout {
    stride: 10,
    attributes: &[
        VertexAttribute { location: 0, components: 3, offset: 0 },
        VertexAttribute { location: 1, components: 3, offset: 3 },
        VertexAttribute { location: 2, components: 4, offset: 6 },
    ],
};

/// Position (3), colour (4).
pub const CLOUD_LAYOUT: VertexLayout = VertexLayout {
    stride: 7,
    attributes: &[
        VertexAttribute { location: 0, components: 3, offset: 0 },
        VertexAttribute { location: 1, components: 4, offset: 3 },
    ],
};

/// Vertex array + vertex buffer shared by both drawables.
#[derive(Debug)]
struct GpuGeometry {
    vao: VertexArrayId,
    vbo: BufferId,
    /// Floats in the last upload.
    floats: usize,
    layout: VertexLayout,
}

impl GpuGeometry {
    fn upload<G: GraphicsApi>(
        api: &mut G,
        layout: VertexLayout,
        vertices: &[f32],
        ebo: Option<BufferId>,
    ) -> Self {
        if vertices.len() % layout.stride as usize != 0 {
            log::warn!(
                "vertex data has {} floats, not a multiple of the {}-float stride",
                vertices.len(),
                layout.stride
            );
        }

        let vbo = api.gen_buffer();
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        api.buffer_data(vbo, BufferTarget::Array, bytes.len(), Some(bytes), BufferUsage::Static);
        let vao = api.gen_vertex_array(&layout, vbo, ebo);

        Self {
            vao,
            vbo,
            floats: vertices.len(),
            layout,
        }
    }

    /// Orphans the vertex storage and refills it. Returns `false` if the length changed.
    fn reupload<G: GraphicsApi>(&mut self, api: &mut G, vertices: &[f32]) -> bool {
        if vertices.len() != self.floats {
            log::warn!(
                "re-upload of {} floats rejected, buffer holds {}",
                vertices.len(),
                self.floats
            );
            return false;
        }

        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        api.buffer_data(self.vbo, BufferTarget::Array, bytes.len(), None, BufferUsage::Stream);
        api.buffer_data(self.vbo, BufferTarget::Array, bytes.len(), Some(bytes), BufferUsage::Stream);
        true
    }

    fn vertex_count(&self) -> usize {
        self.floats / self.layout.stride as usize
    }

    fn byte_size(&self) -> usize {
        self.floats * std::mem::size_of::<f32>()
    }

    fn release<G: GraphicsApi>(self, api: &mut G) {
        api.delete_vertex_array(self.vao);
        api.delete_buffer(self.vbo);
    }
}

fn set_pose<G: GraphicsApi>(ctx: &mut RenderContext<G>, program: &ShaderProgram, pose: &Pose) {
    program.set_vec3(ctx, "objPos", pose.position_array());
    program.set_vec4(ctx, "objQuat", pose.orientation_xyzw());
}

/// Indexed triangle mesh.
#[derive(Debug)]
pub struct Mesh {
    geometry: GpuGeometry,
    ebo: BufferId,
    index_count: usize,
}

impl Mesh {
    /// Uploads interleaved vertices ([`MESH_LAYOUT`]) and `u32` triangle indices.
    pub fn upload<G: GraphicsApi>(ctx: &mut RenderContext<G>, vertices: &[f32], indices: &[u32]) -> Self {
        let api = ctx.api_mut();

        let ebo = api.gen_buffer();
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);
        api.buffer_data(
            ebo,
            BufferTarget::ElementArray,
            index_bytes.len(),
            Some(index_bytes),
            BufferUsage::Static,
        );

        let geometry = GpuGeometry::upload(api, MESH_LAYOUT, vertices, Some(ebo));
        log::debug!(
            "mesh uploaded: {} vertices, {} indices",
            geometry.vertex_count(),
            indices.len()
        );

        Self {
            geometry,
            ebo,
            index_count: indices.len(),
        }
    }

    /// Replaces the vertex data with a same-length payload. Indices are kept.
    pub fn reupload<G: GraphicsApi>(&mut self, ctx: &mut RenderContext<G>, vertices: &[f32]) -> bool {
        self.geometry.reupload(ctx.api_mut(), vertices)
    }

    /// Sets the object pose and draws every index as triangles.
    pub fn draw<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, program: &ShaderProgram, pose: &Pose) {
        set_pose(ctx, program, pose);
        ctx.api_mut().draw_elements(
            program.id(),
            self.geometry.vao,
            Primitive::Triangles,
            self.index_count as u32,
        );
    }

    /// Number of indices drawn.
    pub fn element_count(&self) -> usize {
        self.index_count
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Vertex storage size in bytes.
    pub fn byte_size(&self) -> usize {
        self.geometry.byte_size()
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.geometry.layout
    }

    pub fn release<G: GraphicsApi>(self, ctx: &mut RenderContext<G>) {
        let api = ctx.api_mut();
        self.geometry.release(api);
        api.delete_buffer(self.ebo);
    }
}

/// Point cloud, one point per vertex.
#[derive(Debug)]
pub struct Cloud {
    geometry: GpuGeometry,
}

impl Cloud {
    /// Uploads interleaved vertices ([`CLOUD_LAYOUT`]).
    pub fn upload<G: GraphicsApi>(ctx: &mut RenderContext<G>, vertices: &[f32]) -> Self {
        let geometry = GpuGeometry::upload(ctx.api_mut(), CLOUD_LAYOUT, vertices, None);
        log::debug!("cloud uploaded: {} points", geometry.vertex_count());
        Self { geometry }
    }

    pub fn reupload<G: GraphicsApi>(&mut self, ctx: &mut RenderContext<G>, vertices: &[f32]) -> bool {
        self.geometry.reupload(ctx.api_mut(), vertices)
    }

    pub fn draw<G: GraphicsApi>(&self, ctx: &mut RenderContext<G>, program: &ShaderProgram, pose: &Pose) {
        set_pose(ctx, program, pose);
        ctx.api_mut().draw_arrays(
            program.id(),
            self.geometry.vao,
            Primitive::Points,
            self.geometry.vertex_count() as u32,
        );
    }

    /// Number of points drawn.
    pub fn element_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    pub fn byte_size(&self) -> usize {
        self.geometry.byte_size()
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.geometry.layout
    }

    pub fn release<G: GraphicsApi>(self, ctx: &mut RenderContext<G>) {
        self.geometry.release(ctx.api_mut());
    }
}

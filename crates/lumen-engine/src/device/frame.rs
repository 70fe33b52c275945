/// A swapchain image acquired for one present.
///
/// Present or drop it before acquiring the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

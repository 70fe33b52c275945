/// Color format of the back and front buffers.
pub(super) const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen double buffer.
///
/// Draws land in `back`; a swap copies `back` into `front`, which is what gets
/// presented and what read-back sees. The surface texture itself is never read.
pub(super) struct FrameTargets {
    pub back: wgpu::Texture,
    pub back_view: wgpu::TextureView,
    pub front: wgpu::Texture,
    pub front_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl FrameTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let color = |label: &str| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: extent(width, height),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: COLOR_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        };

        let back = color("lumen back buffer");
        let front = color("lumen front buffer");

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen depth buffer"),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let back_view = back.create_view(&wgpu::TextureViewDescriptor::default());
        let front_view = front.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            back,
            back_view,
            front,
            front_view,
            depth_view,
            width,
            height,
        }
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        extent(self.width, self.height)
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

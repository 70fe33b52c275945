use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What the caller should do after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The swapchain was rebuilt; retry next frame.
    Reconfigured,
    /// Drop this frame and carry on.
    SkipFrame,
    /// The surface cannot recover; close the window.
    Fatal,
}

/// The window surface and its current configuration.
pub(crate) struct SwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl SwapChain {
    /// Picks a format and alpha mode from the surface capabilities and configures it.
    pub(crate) fn configure(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Option<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, init.srgb_surface)?;

        let alpha_mode = init
            .alpha_mode
            .filter(|m| caps.alpha_modes.contains(m))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let present_mode = if caps.present_modes.contains(&init.present_mode) {
            init.present_mode
        } else {
            log::warn!("present mode {:?} unsupported, using Fifo", init.present_mode);
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(device, &config);

        Some(Self {
            surface,
            config,
            size,
        })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Records the new size; reconfigures only when it has an area.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.size = size;
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device, &self.config);
    }

    pub(crate) fn current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

/// First preferred 8-bit format the surface supports, else its first format.
fn pick_format(formats: &[wgpu::TextureFormat], srgb: bool) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat as F;

    let preferred = if srgb {
        [F::Bgra8UnormSrgb, F::Rgba8UnormSrgb]
    } else {
        [F::Bgra8Unorm, F::Rgba8Unorm]
    };

    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.first().copied())
}

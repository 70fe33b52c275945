use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::SwapChain;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and swapchain for one window.
///
/// The surface keeps an `Arc` of the window alive, so `Gpu` has no lifetime
/// parameter.
pub struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    swapchain: SwapChain,
    adapter_info: wgpu::AdapterInfo,
}

impl Gpu {
    /// Requests an adapter and device able to present to `window`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "window has zero size ({}x{})",
            size.width,
            size.height
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let adapter_info = adapter.get_info();
        log::info!(
            "adapter: {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features: init.features,
                required_limits: init.limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open the GPU device")?;

        // Validation errors are logged; the default handler panics.
        device.on_uncaptured_error(Arc::new(|err: wgpu::Error| {
            log::error!("wgpu: {err}");
        }));

        let swapchain = SwapChain::configure(surface, &adapter, &device, size, &init)
            .context("surface reports no supported formats")?;

        log::debug!("swapchain format {:?}", swapchain.format());

        Ok(Self {
            device,
            queue,
            swapchain,
            adapter_info,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Swapchain size in physical pixels. May be zero while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.swapchain.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.swapchain.resize(&self.device, size);
    }

    /// Acquires the next swapchain image.
    pub fn acquire(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.swapchain.current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(GpuFrame {
            surface_texture,
            view,
        })
    }

    /// Tries to recover from a failed [`acquire`](Self::acquire).
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        self.swapchain.recover(&self.device, err)
    }
}

/// Adapter, device and swapchain settings for a render context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Which adapter to ask for when several are present.
    pub power_preference: wgpu::PowerPreference,

    /// Use an sRGB swapchain format when the surface offers one.
    ///
    /// Off by default: shaders write display-ready colours and frame captures
    /// read them back unchanged.
    pub srgb_surface: bool,

    /// Swapchain present mode. `Fifo` is the only mode every platform supports.
    pub present_mode: wgpu::PresentMode,

    /// Requested compositor alpha mode; falls back to the surface's first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub features: wgpu::Features,
    pub limits: wgpu::Limits,

    /// Swapchain latency hint in frames.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            srgb_surface: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}

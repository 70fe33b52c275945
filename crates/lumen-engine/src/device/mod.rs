//! wgpu device and window surface.
//!
//! [`Gpu`] owns the instance objects for one window: adapter, device, queue and
//! the configured swapchain. Rendering itself happens offscreen in the backend;
//! the swapchain is only the final blit target.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;

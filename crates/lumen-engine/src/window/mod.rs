//! Window + event pump.
//!
//! Owns the `winit` EventLoop and Window. The loop is pumped from the caller's
//! thread instead of taking over `main`, so an embedding host keeps control.

mod platform;

pub use platform::{PlatformWindow, WindowConfig};

//! Lumen engine crate.
//!
//! A thin real-time 3D layer for scripting hosts: one window, compiled shader
//! programs, meshes and point clouds, a camera, point lights, keyboard polling
//! and frame capture. Hosts normally go through the facades in [`host`]; the
//! [`render`] layer underneath is generic over the [`backend::GraphicsApi`] seam.

pub mod backend;
pub mod device;
pub mod host;
pub mod input;
pub mod time;
pub mod window;

pub mod logging;
pub mod render;

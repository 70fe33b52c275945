//! Platform key translation.

pub mod winit;
